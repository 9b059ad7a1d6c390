use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
/// Receivers use this to drive progress displays or to record a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Weighted mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Weighted mean validation loss, if a validation set was provided.
    pub val_loss: Option<f64>,
    /// Fraction of training samples on the correct side of the 0.5 threshold.
    pub train_accuracy: f64,
    /// Validation accuracy, if a validation set was provided.
    pub val_accuracy: Option<f64>,
    /// Learning rate used for this epoch (reflects the schedule, if any).
    pub learning_rate: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
