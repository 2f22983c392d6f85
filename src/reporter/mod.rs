//! Sinks for captured values
//!
//! The engine hands every accepted value to a [`Reporter`] and forgets about
//! it. Delivery, deduplication and storage belong to the reporter.

pub mod json_lines;
pub mod memory;

pub use json_lines::JsonLinesReporter;
pub use memory::MemoryReporter;

use crate::mapping::MappingId;
use serde::{Deserialize, Serialize};

/// Receives validated `(id, value)` pairs
pub trait Reporter {
    fn send(&self, id: &MappingId, value: &str);
}

/// One value captured for a mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub id: MappingId,
    pub value: String,
}

impl CaptureEvent {
    pub fn new(id: MappingId, value: impl Into<String>) -> Self {
        Self { id, value: value.into() }
    }
}

/// Writes every value to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn send(&self, id: &MappingId, value: &str) {
        log::info!("captured {} = {:?}", id, value);
    }
}
