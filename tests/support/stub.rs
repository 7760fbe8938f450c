use ndarray::{Array1, ArrayView1, ArrayView2};
use starsift::ml::{Classifier, FittedModel, ModelError};

/// Predicts the mean training label for every row.
pub struct MeanStub;

#[derive(Debug)]
pub struct MeanModel(f64);

impl Classifier for MeanStub {
    fn name(&self) -> &str {
        "mean_stub"
    }

    fn fit(
        &self,
        _x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let mean = y.mean().ok_or(ModelError::EmptyTrainingSet)?;
        Ok(Box::new(MeanModel(mean)))
    }
}

impl FittedModel for MeanModel {
    fn name(&self) -> &str {
        "mean_stub"
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        Array1::from_elem(x.nrows(), self.0)
    }
}

/// Predicts a fixed value regardless of input.
pub struct Constant(pub f64);

#[derive(Debug)]
pub struct ConstantModel(f64);

impl Classifier for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    fn fit(
        &self,
        _x: ArrayView2<'_, f64>,
        _y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        Ok(Box::new(ConstantModel(self.0)))
    }
}

impl FittedModel for ConstantModel {
    fn name(&self) -> &str {
        "constant"
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        Array1::from_elem(x.nrows(), self.0)
    }
}
