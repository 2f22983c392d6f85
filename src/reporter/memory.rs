use crate::{
    mapping::MappingId,
    reporter::{CaptureEvent, Reporter},
};
use indexmap::IndexMap;
use std::cell::RefCell;

/// Keeps every event plus the latest value per mapping
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: RefCell<Vec<CaptureEvent>>,
    data: RefCell<IndexMap<MappingId, String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received, in order
    pub fn events(&self) -> Vec<CaptureEvent> {
        self.events.borrow().clone()
    }

    /// Latest value per mapping, in order of first capture
    pub fn data(&self) -> IndexMap<MappingId, String> {
        self.data.borrow().clone()
    }

    pub fn latest(&self, id: &MappingId) -> Option<String> {
        self.data.borrow().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        self.data.borrow_mut().clear();
    }
}

impl Reporter for MemoryReporter {
    fn send(&self, id: &MappingId, value: &str) {
        self.events.borrow_mut().push(CaptureEvent::new(id.clone(), value));
        self.data.borrow_mut().insert(id.clone(), value.to_string());
    }
}
