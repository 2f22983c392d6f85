//! The page surface the capture engine reads from
//!
//! The engine only needs to select elements by CSS selector, read an element's
//! markup, value and checked state, and subscribe to its change notifications.
//! This module defines that surface and two in-process implementations:
//! - [`SelectorMap`]: a fixed table of selectors to elements
//! - [`HtmlPage`]: static HTML parsed with real CSS selector matching
//!
//! A live Chrome tab is provided by [`crate::browser::ChromePage`].

pub mod element;
pub mod html;
pub mod selector_map;

pub use element::{ElementNode, FormElement};
pub use html::HtmlPage;
pub use selector_map::SelectorMap;

use crate::error::Result;
use std::rc::Rc;

/// Callback invoked when an element reports a change
pub trait ChangeListener {
    fn on_change(&self) -> Result<()>;
}

/// A single form field on a page
pub trait FieldElement {
    /// Rendered markup of the element
    fn inner_html(&self) -> Result<String>;

    /// Current input value; empty for elements without one
    fn value(&self) -> Result<String>;

    /// Current checked state
    fn checked(&self) -> Result<bool>;

    /// Subscribe to change notifications for as long as the element lives
    fn add_change_listener(&self, listener: Rc<dyn ChangeListener>) -> Result<()>;
}

/// A document that can be queried for elements
pub trait Page {
    type Element: FieldElement + Clone + 'static;

    /// All elements matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>>;
}
