use crate::{
    error::{CaptureError, Result},
    mapping::{Mapping, TriggerEvent},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Ordered list of mappings loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MappingSet {
    pub mappings: Vec<Mapping>,
}

/// Object form of a mapping file, entries decoded one at a time
#[derive(Deserialize)]
struct RawMappingSet {
    mappings: Vec<Value>,
}

fn invalid_json(e: serde_json::Error) -> CaptureError {
    CaptureError::MappingLoad(format!("Invalid mapping JSON: {}", e))
}

/// Decode each entry separately so an error names the mapping that caused it
fn decode_mappings(entries: Vec<Value>) -> Result<Vec<Mapping>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry)
                .map_err(|e| CaptureError::MappingLoad(format!("Invalid mapping at index {}: {}", index, e)))
        })
        .collect()
}

impl MappingSet {
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    /// Parse a mapping file's contents: a bare array, or an object with a
    /// `mappings` key
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries = if json.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Value>>(json).map_err(invalid_json)?
        } else {
            serde_json::from_str::<RawMappingSet>(json).map_err(invalid_json)?.mappings
        };

        Ok(Self::new(decode_mappings(entries)?))
    }

    /// Read and parse a mapping file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CaptureError::MappingLoad(format!("Failed to read {}: {}", path.display(), e)))?;

        let set = Self::from_json_str(&contents)?;
        log::debug!("Loaded {} mappings from {}", set.len(), path.display());
        Ok(set)
    }

    /// JSON schema describing a mapping file
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(MappingSet)).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    pub fn as_slice(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Count of mappings that fire once on load
    pub fn count_on_load(&self) -> usize {
        self.mappings.iter().filter(|m| m.event == TriggerEvent::OnLoad).count()
    }
}
