pub mod classifier;
pub mod metadata;
pub mod spec;
pub mod wrapper;

pub use classifier::{BinaryClassifier, Stage};
pub use metadata::ModelMetadata;
pub use spec::ClassifierSpec;
pub use wrapper::ProbabilityModel;
