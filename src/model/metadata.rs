use serde::{Deserialize, Serialize};

/// Optional annotations attached to a saved classifier.
/// All fields are Option<> so old models (without metadata) deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Human-readable names for the input features, in column order.
    pub feature_names: Option<Vec<String>>,
    /// Human-readable name for the positive class (label 1).
    pub positive_label: Option<String>,
}
