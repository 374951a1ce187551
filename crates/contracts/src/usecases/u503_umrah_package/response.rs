use serde::{Deserialize, Serialize};

/// Result of publishing an Umrah package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPackage {
    pub package_id: String,
    pub images: Vec<String>,
}
