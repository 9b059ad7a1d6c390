use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;

use crate::error::ModelError;
use crate::loss::bce_logits::BceWithLogitsLoss;
use crate::math::matrix::Matrix;
use crate::model::classifier::BinaryClassifier;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `model` for `config.epochs` epochs and returns the weighted mean
/// training loss of the **last completed epoch**.
///
/// The optimizer and the optional learning-rate schedule come from the
/// model's own spec via `configure_optimizer()`; the schedule is applied
/// once per epoch, with epoch 0 trained at the base rate.
///
/// # Arguments
/// - `model`         — mutable reference to the classifier; modified in place
/// - `train_inputs`  — training samples, each a `Vec<f64>` of length `input_size`
/// - `train_labels`  — targets in {0, 1}, same length as `train_inputs`
/// - `train_weights` — nonnegative per-sample weights, same length
/// - `val_inputs`    — optional validation samples
/// - `val_labels`    — optional validation targets (required iff `val_inputs` is `Some`)
/// - `val_weights`   — optional validation weights (required iff `val_inputs` is `Some`)
/// - `config`        — epochs, batch size, optional progress channel, optional stop flag
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped (natural disconnect), **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Panics
/// Panics if `train_inputs` is empty, lengths mismatch, `batch_size == 0`,
/// or the model has more than one output logit. A trailing mini-batch of a
/// single sample is skipped, since batch statistics are undefined for it.
pub fn train_loop(
    model: &mut BinaryClassifier,
    train_inputs: &[Vec<f64>],
    train_labels: &[f64],
    train_weights: &[f64],
    val_inputs: Option<&[Vec<f64>]>,
    val_labels: Option<&[f64]>,
    val_weights: Option<&[f64]>,
    config: &TrainConfig,
) -> Result<f64, ModelError> {
    assert!(!train_inputs.is_empty(), "train_inputs must not be empty");
    assert_eq!(
        train_inputs.len(),
        train_labels.len(),
        "train_inputs and train_labels must have equal length"
    );
    assert_eq!(
        train_inputs.len(),
        train_weights.len(),
        "train_inputs and train_weights must have equal length"
    );
    assert!(config.batch_size > 0, "batch_size must be at least 1");
    assert_eq!(model.spec.output_size, 1, "binary training requires a single output logit");

    let (mut optimizer, schedule) = model.configure_optimizer()?;
    let base_lr = optimizer.learning_rate;

    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        // Check stop flag at the top of each epoch.
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        if let Some(ref schedule) = schedule {
            optimizer.learning_rate = schedule.lr_at(base_lr, epoch - 1);
        }

        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let train_loss = run_one_epoch(
            model,
            train_inputs,
            train_labels,
            train_weights,
            &optimizer,
            config.batch_size,
        );
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let train_accuracy = compute_accuracy(model, train_inputs, train_labels);

        // ── Validation ────────────────────────────────────────────────────
        let (val_loss, val_accuracy) =
            if let (Some(vi), Some(vl), Some(vw)) = (val_inputs, val_labels, val_weights) {
                (Some(evaluate(model, vi, vl, vw)), Some(compute_accuracy(model, vi, vl)))
            } else {
                (None, None)
            };

        debug!(
            "epoch {}/{}: train_loss={:.6} val_loss={:?} lr={:.6} ({} ms)",
            epoch, config.epochs, train_loss, val_loss, optimizer.learning_rate, elapsed_ms
        );

        // ── Emit progress ─────────────────────────────────────────────────
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
            learning_rate: optimizer.learning_rate,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }

        // Check stop flag again after potentially expensive eval.
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }
    }

    info!("training finished: final train loss {:.6}", last_train_loss);
    Ok(last_train_loss)
}

/// Weighted mean BCE over a dataset in eval mode (running statistics, no
/// updates). This is the test phase; it uses the same loss formula as
/// training and validation.
pub fn evaluate(
    model: &mut BinaryClassifier,
    inputs: &[Vec<f64>],
    labels: &[f64],
    weights: &[f64],
) -> f64 {
    assert_eq!(inputs.len(), labels.len(), "inputs and labels must have equal length");
    assert_eq!(inputs.len(), weights.len(), "inputs and weights must have equal length");
    if inputs.is_empty() {
        return 0.0;
    }

    let logits = model.forward_batch(&Matrix::from_data(inputs.to_vec()), false);
    let logits: Vec<f64> = logits.data.iter().map(|row| row[0]).collect();
    BceWithLogitsLoss::weighted(&logits, labels, weights)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of mini-batch SGD over the weighted training data.
/// Returns the weighted mean loss over all samples that took a step.
fn run_one_epoch(
    model: &mut BinaryClassifier,
    inputs: &[Vec<f64>],
    labels: &[f64],
    weights: &[f64],
    optimizer: &Sgd,
    batch_size: usize,
) -> f64 {
    let n = inputs.len();
    let mut total_weighted_loss = 0.0;
    let mut samples_seen = 0usize;

    // Shuffle sample order each epoch.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rand::thread_rng());

    for batch_start in (0..n).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(n);
        let batch = &indices[batch_start..batch_end];

        // Batch statistics are undefined for a single sample.
        if batch.len() < 2 {
            debug!("skipping trailing batch of {} sample(s)", batch.len());
            continue;
        }

        let x = Matrix::from_data(batch.iter().map(|&idx| inputs[idx].clone()).collect());
        let y: Vec<f64> = batch.iter().map(|&idx| labels[idx]).collect();
        let w: Vec<f64> = batch.iter().map(|&idx| weights[idx]).collect();

        let logits = model.forward_batch(&x, true);
        let logits: Vec<f64> = logits.data.iter().map(|row| row[0]).collect();

        let batch_loss = BceWithLogitsLoss::weighted(&logits, &y, &w);
        total_weighted_loss += batch_loss * batch.len() as f64;
        samples_seen += batch.len();

        // Initial delta: ∂L/∂z per logit, already weighted and batch-averaged.
        let dz = BceWithLogitsLoss::derivative(&logits, &y, &w);
        let mut delta = Matrix::from_data(dz.into_iter().map(|g| vec![g]).collect());

        // Backward pass. The normalization stage is parameter-free and sits
        // first, so the walk stops at the input dense layer.
        for i in (0..model.layers.len()).rev() {
            let input_for_layer = if i == 0 {
                model.norm.output.clone()
            } else {
                model.layers[i - 1].activations.clone()
            };

            let (w_grad, b_grad, prev_delta) =
                model.layers[i].compute_gradients(&delta, &input_for_layer);
            delta = prev_delta;

            optimizer.step(&mut model.layers[i], w_grad, b_grad);
        }
    }

    if samples_seen == 0 {
        return 0.0;
    }
    total_weighted_loss / samples_seen as f64
}

/// Fraction of samples whose predicted probability lands on the correct side
/// of the 0.5 threshold.
fn compute_accuracy(model: &mut BinaryClassifier, inputs: &[Vec<f64>], labels: &[f64]) -> f64 {
    if inputs.is_empty() {
        return 0.0;
    }
    let probs = model.predict(inputs);
    let correct = probs.iter().zip(labels.iter())
        .filter(|(p, y)| (**p >= 0.5) == (**y >= 0.5))
        .count();
    correct as f64 / inputs.len() as f64
}
