//! Regions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    pub available: bool,
    #[serde(default)]
    pub features: Vec<String>,
}
