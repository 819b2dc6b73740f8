use std::collections::HashMap;

use crate::error::Result;

/// Identifier of the injected wrapper component and of its default import.
pub const TAG_DEFAULT_NAME: &str = "BuriedReport";
/// Module the wrapper component is imported from.
pub const SOURCE_NAME: &str = "buried-component-report";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub tag_name: String,
    pub source_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tag_name: TAG_DEFAULT_NAME.to_string(),
            source_name: SOURCE_NAME.to_string(),
        }
    }
}

impl ReportConfig {
    /// Build from a loose JSON config map. Unknown keys are ignored and
    /// missing, non-string or empty values keep their defaults.
    pub fn new(mut config: HashMap<String, serde_json::Value>) -> Self {
        let mut take = |key: &str| {
            config
                .remove(key)
                .and_then(|v| v.as_str().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();
        Self {
            tag_name: take("tag_name").unwrap_or(defaults.tag_name),
            source_name: take("source_name").unwrap_or(defaults.source_name),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let map: HashMap<String, serde_json::Value> = serde_json::from_str(raw)?;
        Ok(Self::new(map))
    }
}
