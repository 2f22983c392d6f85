//! The mapping-driven capture pipeline
//!
//! mapping → trigger (load or change) → [`extract`] → [`validate`] → reporter

pub mod engine;
pub mod extract;
pub mod listener;
pub mod validate;

pub use engine::{CaptureEngine, InitSummary, MappingFailure};
pub use extract::{CHECKED, UNCHECKED, extract};
pub use listener::ChangeHandler;
pub use validate::validate;

use crate::{dom::FieldElement, error::Result, mapping::Mapping};

/// Extract then validate; `Ok(None)` means the value is discarded
pub fn capture_value<E: FieldElement + ?Sized>(mapping: &Mapping, element: &E) -> Result<Option<String>> {
    let raw = extract(mapping, element)?;
    Ok(validate(mapping, raw))
}
