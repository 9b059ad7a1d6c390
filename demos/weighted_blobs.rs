use std::sync::mpsc;

use rand::prelude::*;
use sift_nn::{train_loop, BinaryClassifier, ClassifierSpec, ProbabilityModel, TrainConfig};

fn main() {
    env_logger::init();

    let mut rng = rand::thread_rng();
    let mut inputs = Vec::new();
    let mut labels = Vec::new();
    let mut weights = Vec::new();

    // Background blob around (-1, -1), signal blob around (1, 1). The signal
    // samples carry twice the weight.
    for _ in 0..400 {
        inputs.push(vec![
            -1.0 + 0.6 * (rng.gen::<f64>() - 0.5),
            -1.0 + 0.6 * (rng.gen::<f64>() - 0.5),
        ]);
        labels.push(0.0);
        weights.push(1.0);
    }
    for _ in 0..400 {
        inputs.push(vec![
            1.0 + 0.6 * (rng.gen::<f64>() - 0.5),
            1.0 + 0.6 * (rng.gen::<f64>() - 0.5),
        ]);
        labels.push(1.0);
        weights.push(2.0);
    }

    let mut spec = ClassifierSpec::new("weighted-blobs", 2, 16, 1);
    spec.learning_rate = 0.05;
    spec.scheduler = Some("CosineAnnealingLR".to_string());
    spec.t_max = Some(30);

    let mut model = BinaryClassifier::new(spec).expect("spec is valid");

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(30, 32);
    config.progress_tx = Some(tx);

    let final_loss = train_loop(&mut model, &inputs, &labels, &weights, None, None, None, &config)
        .expect("optimizer configuration is valid");

    for stats in rx.try_iter() {
        if stats.epoch % 5 == 0 {
            println!(
                "Epoch {:>2}/{}: loss = {:.6}, accuracy = {:.3}, lr = {:.5}",
                stats.epoch, stats.total_epochs, stats.train_loss, stats.train_accuracy, stats.learning_rate
            );
        }
    }
    println!("Final train loss: {final_loss:.6}");

    let mut wrapped = ProbabilityModel::new(model);
    for probe in [[-1.0, -1.0], [0.0, 0.0], [1.0, 1.0]] {
        let p = wrapped.forward(&probe);
        println!("Input: {:?} -> p(signal) = {:.4}", probe, p[0]);
    }
}
