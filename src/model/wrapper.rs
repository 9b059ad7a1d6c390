use crate::activation::activation::sigmoid;
use crate::math::matrix::Matrix;
use crate::model::classifier::BinaryClassifier;

/// Wraps a trained classifier so that forward passes yield probabilities
/// instead of raw logits. Intended for deployment, where downstream
/// consumers expect values in [0, 1].
#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    pub model: BinaryClassifier,
}

impl ProbabilityModel {
    pub fn new(model: BinaryClassifier) -> ProbabilityModel {
        ProbabilityModel { model }
    }

    /// Sigmoid of the wrapped model's raw output for a single sample.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        self.model.forward(input).iter().map(|z| sigmoid(*z)).collect()
    }

    /// Sigmoid of the wrapped model's raw output for a batch, in eval mode.
    pub fn forward_batch(&mut self, input: &Matrix) -> Matrix {
        self.model.forward_batch(input, false).map(sigmoid)
    }

    pub fn into_inner(self) -> BinaryClassifier {
        self.model
    }
}
