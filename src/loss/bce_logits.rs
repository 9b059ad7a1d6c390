use crate::activation::activation::sigmoid;

/// Binary cross-entropy computed directly from raw logits, with per-sample
/// weights. The combined sigmoid+BCE form stays finite for any logit.
pub struct BceWithLogitsLoss;

impl BceWithLogitsLoss {
    /// Per-sample losses: ℓ = max(z, 0) − z·y + ln(1 + e^(−|z|))
    ///
    /// Algebraically equal to −[y·ln σ(z) + (1−y)·ln(1−σ(z))] but safe for
    /// extreme logits, where the naive form overflows or takes log(0).
    pub fn per_sample(logits: &[f64], targets: &[f64]) -> Vec<f64> {
        logits.iter().zip(targets.iter())
            .map(|(z, y)| z.max(0.0) - z * y + (-z.abs()).exp().ln_1p())
            .collect()
    }

    /// Weighted batch loss: mean(w ⊙ ℓ).
    ///
    /// The divisor is the full batch size regardless of the weights, so a
    /// zero weight removes a sample from the numerator only.
    pub fn weighted(logits: &[f64], targets: &[f64], weights: &[f64]) -> f64 {
        assert_eq!(logits.len(), targets.len(), "logits and targets must have equal length");
        assert_eq!(logits.len(), weights.len(), "logits and weights must have equal length");

        let n = logits.len() as f64;
        Self::per_sample(logits, targets).iter()
            .zip(weights.iter())
            .map(|(l, w)| l * w)
            .sum::<f64>() / n
    }

    /// Per-sample gradient of the weighted batch loss w.r.t. each logit:
    ///   ∂L/∂z_i = w_i · (σ(z_i) − y_i) / n
    ///
    /// This is the initial delta passed into the backward pass by the trainer.
    pub fn derivative(logits: &[f64], targets: &[f64], weights: &[f64]) -> Vec<f64> {
        let n = logits.len() as f64;
        logits.iter().zip(targets.iter()).zip(weights.iter())
            .map(|((z, y), w)| w * (sigmoid(*z) - y) / n)
            .collect()
    }
}
