use crate::{
    dom::{FormElement, Page},
    error::Result,
};
use indexmap::IndexMap;

/// Page whose selector results are fixed up front
///
/// Useful when the elements are built in code rather than parsed: each
/// selector is registered with the exact elements it should return. Unknown
/// selectors match nothing.
#[derive(Debug, Clone, Default)]
pub struct SelectorMap {
    /// Map from selector to the elements it matches, in registration order
    map: IndexMap<String, Vec<FormElement>>,
}

impl SelectorMap {
    /// Create a new empty SelectorMap
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// Builder method: register the elements a selector matches
    pub fn with(mut self, selector: impl Into<String>, elements: Vec<FormElement>) -> Self {
        self.register(selector, elements);
        self
    }

    /// Register the elements a selector matches, replacing any previous entry
    pub fn register(&mut self, selector: impl Into<String>, elements: Vec<FormElement>) {
        self.map.insert(selector.into(), elements);
    }

    /// Append one element to a selector's matches
    pub fn push(&mut self, selector: impl Into<String>, element: FormElement) {
        self.map.entry(selector.into()).or_default().push(element);
    }

    /// Get the elements registered for a selector
    pub fn get(&self, selector: &str) -> Option<&[FormElement]> {
        self.map.get(selector).map(Vec::as_slice)
    }

    /// Check if a selector is registered
    pub fn contains(&self, selector: &str) -> bool {
        self.map.contains_key(selector)
    }

    /// Remove a selector
    pub fn remove(&mut self, selector: &str) -> Option<Vec<FormElement>> {
        self.map.shift_remove(selector)
    }

    /// Get the number of registered selectors
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get all selectors
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

impl Page for SelectorMap {
    type Element = FormElement;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<FormElement>> {
        Ok(self.map.get(selector).cloned().unwrap_or_default())
    }
}
