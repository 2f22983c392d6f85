use crate::{
    capture::capture_value,
    dom::{ChangeListener, FieldElement},
    error::Result,
    mapping::Mapping,
    reporter::Reporter,
};
use std::rc::Rc;

/// Change listener bound to one mapping and one element
///
/// Each handler re-reads its own element when fired, so events on different
/// elements never report under each other's mapping.
pub struct ChangeHandler<E> {
    mapping: Rc<Mapping>,
    element: E,
    reporter: Rc<dyn Reporter>,
}

impl<E: FieldElement> ChangeHandler<E> {
    pub fn new(mapping: Rc<Mapping>, element: E, reporter: Rc<dyn Reporter>) -> Self {
        Self { mapping, element, reporter }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }
}

impl<E: FieldElement> ChangeListener for ChangeHandler<E> {
    fn on_change(&self) -> Result<()> {
        if let Some(value) = capture_value(&self.mapping, &self.element)? {
            log::trace!("Change on mapping {}: sending value", self.mapping.id);
            self.reporter.send(&self.mapping.id, &value);
        }
        Ok(())
    }
}
