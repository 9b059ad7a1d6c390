use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use sift_nn::{evaluate, train_loop, BinaryClassifier, ClassifierSpec, TrainConfig};

/// Two linearly separable arms, 40 samples, unit weights.
fn separable_dataset() -> (Vec<Vec<f64>>, Vec<f64>, Vec<f64>) {
    let mut inputs = Vec::new();
    let mut labels = Vec::new();
    for i in 0..20 {
        let t = i as f64 / 20.0;
        inputs.push(vec![-1.0 - t, -1.0 + 0.3 * t]);
        labels.push(0.0);
        inputs.push(vec![1.0 + t, 1.0 - 0.3 * t]);
        labels.push(1.0);
    }
    let weights = vec![1.0; inputs.len()];
    (inputs, labels, weights)
}

#[test]
fn test_training_reduces_weighted_loss() {
    let (inputs, labels, weights) = separable_dataset();

    let mut spec = ClassifierSpec::new("separable", 2, 8, 1);
    spec.learning_rate = 0.1;
    let mut model = BinaryClassifier::new(spec).unwrap();

    let initial = evaluate(&mut model, &inputs, &labels, &weights);
    let config = TrainConfig::new(30, 8);
    let last = train_loop(&mut model, &inputs, &labels, &weights, None, None, None, &config).unwrap();
    let trained = evaluate(&mut model, &inputs, &labels, &weights);

    assert!(last.is_finite());
    assert!(trained < initial, "loss should drop: {} -> {}", initial, trained);
}

#[test]
fn test_validation_metrics_are_reported() {
    let (inputs, labels, weights) = separable_dataset();

    let mut model = BinaryClassifier::new(ClassifierSpec::new("val-run", 2, 4, 0)).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(3, 8);
    config.progress_tx = Some(tx);

    train_loop(
        &mut model,
        &inputs,
        &labels,
        &weights,
        Some(&inputs),
        Some(&labels),
        Some(&weights),
        &config,
    )
    .unwrap();

    let stats: Vec<_> = rx.try_iter().collect();
    assert_eq!(stats.len(), 3);
    for (i, s) in stats.iter().enumerate() {
        assert_eq!(s.epoch, i + 1);
        assert_eq!(s.total_epochs, 3);
        assert!(s.val_loss.is_some());
        assert!(s.val_accuracy.is_some());
        assert!(s.train_loss.is_finite());
    }
}

#[test]
fn test_progress_reports_scheduled_learning_rate() {
    let (inputs, labels, weights) = separable_dataset();

    let mut spec = ClassifierSpec::new("sched-run", 2, 4, 0);
    spec.learning_rate = 0.08;
    spec.scheduler = Some("ExponentialLR".to_string());
    spec.gamma = Some(0.5);
    let mut model = BinaryClassifier::new(spec).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(3, 8);
    config.progress_tx = Some(tx);

    train_loop(&mut model, &inputs, &labels, &weights, None, None, None, &config).unwrap();

    let lrs: Vec<f64> = rx.try_iter().map(|s| s.learning_rate).collect();
    assert_eq!(lrs.len(), 3);
    for (lr, expected) in lrs.iter().zip([0.08, 0.04, 0.02]) {
        assert!((lr - expected).abs() < 1e-12, "lr {} vs expected {}", lr, expected);
    }
}

#[test]
fn test_zero_weights_leave_parameters_unchanged() {
    let (inputs, labels, _) = separable_dataset();
    let weights = vec![0.0; inputs.len()];

    let mut model = BinaryClassifier::new(ClassifierSpec::new("frozen", 2, 4, 0)).unwrap();
    let before = model.clone();

    let config = TrainConfig::new(3, 8);
    let last = train_loop(&mut model, &inputs, &labels, &weights, None, None, None, &config).unwrap();

    // Every loss term is zeroed, so every gradient is zero.
    assert_eq!(last, 0.0);
    for (layer, before_layer) in model.layers.iter().zip(before.layers.iter()) {
        assert_eq!(layer.weights.data, before_layer.weights.data);
        assert_eq!(layer.biases.data, before_layer.biases.data);
    }
    // Normalization statistics still track the data; they are weight-independent.
    assert_ne!(model.norm.running_var, before.norm.running_var);
}

#[test]
fn test_running_statistics_track_training_data() {
    // Single feature centered near 5; labels are irrelevant to the statistics.
    let inputs: Vec<Vec<f64>> = (0..40).map(|i| vec![5.0 + (i % 7) as f64 * 0.1]).collect();
    let labels: Vec<f64> = (0..40).map(|i| (i % 2) as f64).collect();
    let weights = vec![1.0; 40];

    let mut model = BinaryClassifier::new(ClassifierSpec::new("drift", 1, 4, 0)).unwrap();
    let config = TrainConfig::new(5, 8);
    train_loop(&mut model, &inputs, &labels, &weights, None, None, None, &config).unwrap();

    assert!(
        model.norm.running_mean[0] > 2.5,
        "running mean should drift toward the data: {}",
        model.norm.running_mean[0]
    );
}

#[test]
fn test_stop_flag_halts_before_first_epoch() {
    let (inputs, labels, weights) = separable_dataset();

    let mut model = BinaryClassifier::new(ClassifierSpec::new("stopped", 2, 4, 0)).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(10, 8);
    config.progress_tx = Some(tx);
    config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

    let last = train_loop(&mut model, &inputs, &labels, &weights, None, None, None, &config).unwrap();

    assert_eq!(last, 0.0);
    assert_eq!(rx.try_iter().count(), 0);
}
