//! # form-capture
//!
//! A mapping-driven form capture engine: it reads page fields described by
//! declarative mappings, validates the values, and forwards them to a reporter.
//!
//! ## Features
//!
//! - **Declarative mappings**: selector, attribute kind, trigger and validation per field
//! - **Two triggers**: capture once on load, or on every change event
//! - **Validation**: UK phone numbers and email addresses; invalid values are silently dropped
//! - **Pluggable pages**: static HTML, fixed selector tables, or a live Chrome tab
//! - **Pluggable reporters**: in-memory, JSON lines, or the `log` facade
//!
//! ## Library Usage
//!
//! ```rust
//! use form_capture::{CaptureEngine, HtmlPage, MappingSet, MemoryReporter};
//! use std::rc::Rc;
//!
//! # fn main() -> form_capture::Result<()> {
//! let page = HtmlPage::parse(r#"<html><body>
//!     <input class="email" value="jane@example.com">
//!     <input type="checkbox" id="optin" checked>
//! </body></html>"#)?;
//!
//! let mappings = MappingSet::from_json_str(r##"[
//!     {"id": 5, "selector": ".email", "attribute": "value", "event": "onLoad", "isEmail": true},
//!     {"id": 6, "selector": "#optin", "attribute": "checkbox", "event": "onChange"}
//! ]"##)?;
//!
//! let reporter = Rc::new(MemoryReporter::new());
//! let engine = CaptureEngine::new(page, reporter.clone());
//! let summary = engine.initialize(mappings.as_slice());
//!
//! assert!(summary.is_clean());
//! assert_eq!(reporter.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ### Live pages
//!
//! ```rust,no_run
//! use form_capture::{BrowserSession, CaptureEngine, JsonLinesReporter, LaunchOptions, MappingSet};
//! use std::rc::Rc;
//!
//! # fn main() -> form_capture::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let page = session.open("https://example.com/signup")?;
//!
//! let mappings = MappingSet::load("mappings.json")?;
//! let engine = CaptureEngine::new(page, Rc::new(JsonLinesReporter::stdout()));
//! engine.initialize(mappings.as_slice());
//!
//! // Deliver change events as they happen
//! loop {
//!     engine.page().pump_events()?;
//!     std::thread::sleep(std::time::Duration::from_millis(250));
//! }
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`capture`]: the engine, extraction and validation
//! - [`mapping`]: mapping records and mapping files
//! - [`dom`]: the page surface and in-process pages
//! - [`browser`]: Chrome sessions and live pages
//! - [`reporter`]: sinks for captured values
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod capture;
pub mod dom;
pub mod error;
pub mod mapping;
pub mod reporter;

pub use browser::{BrowserSession, ChromePage, ConnectionOptions, LaunchOptions};
pub use capture::{CaptureEngine, ChangeHandler, InitSummary, capture_value, extract, validate};
pub use dom::{ChangeListener, ElementNode, FieldElement, FormElement, HtmlPage, Page, SelectorMap};
pub use error::{CaptureError, Result};
pub use mapping::{AttributeKind, Mapping, MappingId, MappingSet, TriggerEvent, ValueRule};
pub use reporter::{CaptureEvent, JsonLinesReporter, LogReporter, MemoryReporter, Reporter};
