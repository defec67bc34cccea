use serde::{Deserialize, Serialize};

/// Character size requested for a receipt section
///
/// Kept exactly as the caller supplied it (a level 1-4, a name, or anything
/// else); the encoder maps it to a firmware code through a fixed table and
/// unknown values fall back to the default size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSetting {
    Level(i64),
    Named(String),
    Other(serde_json::Value),
}

impl SizeSetting {
    pub fn normal() -> Self {
        Self::Named("normal".to_string())
    }

    pub fn large() -> Self {
        Self::Named("large".to_string())
    }

    pub fn xlarge() -> Self {
        Self::Named("xlarge".to_string())
    }
}

impl From<i64> for SizeSetting {
    fn from(level: i64) -> Self {
        Self::Level(level)
    }
}

impl From<&str> for SizeSetting {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}
