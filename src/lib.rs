pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod model;
pub mod optim;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{sigmoid, ActivationFunction};
pub use layers::batch_norm::BatchNorm;
pub use layers::dense::Dense;
pub use loss::bce_logits::BceWithLogitsLoss;
pub use model::classifier::{BinaryClassifier, Stage};
pub use model::spec::ClassifierSpec;
pub use model::wrapper::ProbabilityModel;
pub use optim::schedule::LrSchedule;
pub use optim::sgd::Sgd;
pub use train::loop_fn::{evaluate, train_loop};
pub use train::epoch_stats::EpochStats;
pub use train::train_config::TrainConfig;
pub use error::ModelError;
