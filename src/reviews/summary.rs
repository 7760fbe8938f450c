use std::collections::BTreeMap;

use serde::Serialize;

use super::Review;

/// Mean rating and review count for one brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSummary {
    pub brand: String,
    pub mean_rating: f64,
    pub reviews: usize,
}

/// Group reviews by brand, best mean rating first (ties by name).
pub fn brand_summary(reviews: &[Review]) -> Vec<BrandSummary> {
    let mut totals: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
    for review in reviews {
        let entry = totals.entry(review.brand.as_str()).or_default();
        entry.0 += review.rating;
        entry.1 += 1;
    }
    let mut summary: Vec<BrandSummary> = totals
        .into_iter()
        .map(|(brand, (sum, count))| BrandSummary {
            brand: brand.to_string(),
            mean_rating: sum as f64 / count as f64,
            reviews: count,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.mean_rating
            .total_cmp(&a.mean_rating)
            .then_with(|| a.brand.cmp(&b.brand))
    });
    summary
}
