use serde::{Serialize, Deserialize};

use crate::activation::activation::{sigmoid, ActivationFunction};
use crate::error::ModelError;
use crate::layers::batch_norm::BatchNorm;
use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;
use crate::model::spec::ClassifierSpec;
use crate::optim::schedule::LrSchedule;
use crate::optim::sgd::Sgd;

/// One element of the flattened forward sequence, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BatchNorm { features: usize },
    Linear { inputs: usize, outputs: usize },
    ReLU,
}

/// Feed-forward binary classifier over weighted samples.
///
/// Topology: batch-norm → linear(input→hidden) →
/// [ReLU → linear(hidden→hidden)] × `num_hidden_layers` → ReLU →
/// linear(hidden→output). The output is a raw logit; wrap the model in
/// [`crate::ProbabilityModel`] to get probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryClassifier {
    pub spec: ClassifierSpec,
    pub norm: BatchNorm,
    pub layers: Vec<Dense>,
}

impl BinaryClassifier {
    /// Builds an untrained classifier from a validated spec.
    pub fn new(spec: ClassifierSpec) -> Result<BinaryClassifier, ModelError> {
        spec.validate()?;

        let norm = BatchNorm::new(spec.input_size);

        let mut layers = vec![
            Dense::new(spec.input_size, spec.hidden_size, ActivationFunction::ReLU),
        ];
        for _ in 0..spec.num_hidden_layers {
            layers.push(Dense::new(spec.hidden_size, spec.hidden_size, ActivationFunction::ReLU));
        }
        layers.push(Dense::new(spec.hidden_size, spec.output_size, ActivationFunction::Identity));

        Ok(BinaryClassifier { spec, norm, layers })
    }

    /// The flattened stage sequence, as the layer stack applies it.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::BatchNorm { features: self.norm.num_features }];
        for layer in &self.layers {
            stages.push(Stage::Linear { inputs: layer.inputs, outputs: layer.outputs });
            if layer.activator == ActivationFunction::ReLU {
                stages.push(Stage::ReLU);
            }
        }
        stages
    }

    /// Raw logits for a batch (one sample per row).
    ///
    /// `training` selects batch statistics (and running-estimate updates) in
    /// the normalization stage; eval mode uses the running estimates.
    pub fn forward_batch(&mut self, input: &Matrix, training: bool) -> Matrix {
        let mut current = self.norm.forward(input, training);
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        current
    }

    /// Raw logits for a single sample, in eval mode.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let out = self.forward_batch(&Matrix::from_data(vec![input.to_vec()]), false);
        out.data[0].clone()
    }

    /// Probability of the positive class for each sample, in eval mode.
    pub fn predict(&mut self, inputs: &[Vec<f64>]) -> Vec<f64> {
        assert_eq!(self.spec.output_size, 1, "predict requires a single output logit");
        if inputs.is_empty() {
            return Vec::new();
        }
        let logits = self.forward_batch(&Matrix::from_data(inputs.to_vec()), false);
        logits.data.iter().map(|row| sigmoid(row[0])).collect()
    }

    /// Builds the SGD optimizer and the optional learning-rate schedule from
    /// the spec.
    ///
    /// Fails with [`ModelError::SchedulerNotImplemented`] for an unrecognized
    /// scheduler name. A recognized scheduler with its required parameter
    /// missing panics with a message naming the field, since that is a
    /// configuration bug rather than a recoverable condition.
    pub fn configure_optimizer(&self) -> Result<(Sgd, Option<LrSchedule>), ModelError> {
        let optimizer = Sgd::new(self.spec.learning_rate, self.spec.weight_decay);

        let schedule = match self.spec.scheduler.as_deref() {
            None => None,
            Some("CosineAnnealingLR") => {
                let t_max = self.spec.t_max
                    .expect("T_max must be provided for the CosineAnnealingLR scheduler; set it in the classifier spec");
                Some(LrSchedule::CosineAnnealing { t_max })
            }
            Some("ExponentialLR") => {
                let gamma = self.spec.gamma
                    .expect("gamma must be provided for the ExponentialLR scheduler; set it in the classifier spec");
                Some(LrSchedule::Exponential { gamma })
            }
            Some(name) => {
                return Err(ModelError::SchedulerNotImplemented { name: name.to_string() });
            }
        };

        Ok((optimizer, schedule))
    }

    /// Serializes the full model (spec, running statistics, weights) to a
    /// pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a classifier from a JSON file previously written by
    /// `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<BinaryClassifier> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
