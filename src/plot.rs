//! PNG charts for selection results.
//!
//! Plots are plain rasters without text; the JSON report carries the numbers.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::ml::metrics::{ConfusionMatrix, DistributionComparison};

const CELL: u32 = 64;
const MARGIN: u32 = 16;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const ACTUAL: Rgb<u8> = Rgb([66, 114, 196]);
const PREDICTED: Rgb<u8> = Rgb([237, 125, 49]);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Nothing to plot: {0}")]
    Empty(&'static str),
    #[error("Failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Heatmap of `cm`: rows are true labels, columns predictions, darker cells
/// hold more rows.
pub fn confusion_heatmap(cm: &ConfusionMatrix) -> Result<RgbImage, PlotError> {
    let k = cm.n_classes() as u32;
    if k == 0 {
        return Err(PlotError::Empty("confusion matrix has no labels"));
    }
    let size = k * CELL + 2 * MARGIN;
    let mut image = RgbImage::from_pixel(size, size, BACKGROUND);
    let max = cm.counts.iter().copied().max().unwrap_or(0).max(1) as f32;
    for truth in 0..k {
        for pred in 0..k {
            let intensity = cm.get(truth as usize, pred as usize) as f32 / max;
            let colour = blend(BACKGROUND, Rgb([8, 48, 107]), intensity);
            fill_rect(
                &mut image,
                MARGIN + pred * CELL,
                MARGIN + truth * CELL,
                CELL - 1,
                CELL - 1,
                colour,
            );
        }
    }
    Ok(image)
}

/// Grouped bars per label: actual count then predicted count.
pub fn distribution_chart(dist: &DistributionComparison) -> Result<RgbImage, PlotError> {
    if dist.labels.is_empty() {
        return Err(PlotError::Empty("distribution has no labels"));
    }
    let bar = 24u32;
    let group = bar * 2 + 16;
    let height = 240u32;
    let width = dist.labels.len() as u32 * group + 2 * MARGIN;
    let mut image = RgbImage::from_pixel(width, height + 2 * MARGIN, BACKGROUND);
    let max = dist
        .actual_counts
        .iter()
        .chain(&dist.predicted_counts)
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f32;
    let base = MARGIN + height;
    for (idx, (&actual, &predicted)) in dist
        .actual_counts
        .iter()
        .zip(&dist.predicted_counts)
        .enumerate()
    {
        let x = MARGIN + idx as u32 * group + 8;
        for (offset, count, colour) in [(0, actual, ACTUAL), (bar, predicted, PREDICTED)] {
            let h = ((count as f32 / max) * height as f32).round() as u32;
            fill_rect(&mut image, x + offset, base - h, bar, h, colour);
        }
    }
    fill_rect(&mut image, MARGIN, base, width - 2 * MARGIN, 1, AXIS);
    Ok(image)
}

/// Per-component explained-variance ratios as a line, with the cumulative
/// curve above it.
pub fn variance_curve(ratios: &[f64]) -> Result<RgbImage, PlotError> {
    if ratios.is_empty() {
        return Err(PlotError::Empty("no components"));
    }
    let width = 640u32;
    let height = 240u32;
    let mut image = RgbImage::from_pixel(width + 2 * MARGIN, height + 2 * MARGIN, BACKGROUND);
    let step = width as f64 / ratios.len().max(2).saturating_sub(1) as f64;
    let to_y = |v: f64| MARGIN + height - (v.clamp(0.0, 1.0) * height as f64).round() as u32;
    let mut cumulative = 0.0;
    for (idx, ratio) in ratios.iter().enumerate() {
        cumulative += ratio;
        let x = MARGIN + (idx as f64 * step).round() as u32;
        fill_rect(&mut image, x, to_y(*ratio), 2, 2, ACTUAL);
        fill_rect(&mut image, x, to_y(cumulative), 2, 2, PREDICTED);
    }
    fill_rect(&mut image, MARGIN, MARGIN + height, width, 1, AXIS);
    Ok(image)
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), PlotError> {
    image.save(path).map_err(|source| PlotError::Save {
        path: path.to_path_buf(),
        source,
    })
}

fn blend(from: Rgb<u8>, to: Rgb<u8>, t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb([mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2])])
}

fn fill_rect(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, colour: Rgb<u8>) {
    let x_end = (x + w).min(image.width());
    let y_end = (y + h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, colour);
        }
    }
}
