use serde::{Serialize, Deserialize};

use crate::error::ModelError;
use crate::model::metadata::ModelMetadata;

/// A fully serializable description of a classifier architecture plus its
/// optimization hyperparameters and optional metadata.
///
/// `ClassifierSpec` can be saved to / loaded from JSON independently of the
/// trained weights, making it possible to store run configurations before
/// training starts. It also travels inside every saved model, so a
/// checkpoint carries the hyperparameters that produced it.
///
/// Fields:
/// - `input_size`        — dimension of the feature vector
/// - `hidden_size`       — width of every hidden layer
/// - `output_size`       — number of output logits (1 for binary training)
/// - `num_hidden_layers` — hidden ReLU→linear repetitions beyond the input layer
/// - `learning_rate`     — SGD step size (default 1e-3)
/// - `weight_decay`      — L2 coefficient added to the gradient (default 0)
/// - `scheduler`         — `None`, `"CosineAnnealingLR"`, or `"ExponentialLR"`
/// - `T_max`             — annealing period in epochs; required iff cosine
/// - `gamma`             — per-epoch decay factor; required iff exponential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    pub input_size: usize,
    pub hidden_size: usize,
    #[serde(default = "default_output_size")]
    pub output_size: usize,
    pub num_hidden_layers: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub weight_decay: f64,
    #[serde(default)]
    pub scheduler: Option<String>,
    #[serde(default, rename = "T_max")]
    pub t_max: Option<usize>,
    #[serde(default)]
    pub gamma: Option<f64>,
    /// Optional metadata (description, feature names, positive-class label).
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

fn default_output_size() -> usize {
    1
}

fn default_learning_rate() -> f64 {
    1e-3
}

impl ClassifierSpec {
    /// Creates a spec with default optimization settings and no scheduler.
    pub fn new(name: &str, input_size: usize, hidden_size: usize, num_hidden_layers: usize) -> ClassifierSpec {
        ClassifierSpec {
            name: name.to_string(),
            input_size,
            hidden_size,
            output_size: default_output_size(),
            num_hidden_layers,
            learning_rate: default_learning_rate(),
            weight_decay: 0.0,
            scheduler: None,
            t_max: None,
            gamma: None,
            metadata: None,
        }
    }

    /// Rejects degenerate architectures before any layer is allocated.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.input_size == 0 {
            return Err(ModelError::InvalidSpec { message: "input_size must be at least 1".to_string() });
        }
        if self.hidden_size == 0 {
            return Err(ModelError::InvalidSpec { message: "hidden_size must be at least 1".to_string() });
        }
        if self.output_size == 0 {
            return Err(ModelError::InvalidSpec { message: "output_size must be at least 1".to_string() });
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `ClassifierSpec` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<ClassifierSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
