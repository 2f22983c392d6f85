use crate::{
    dom::{ChangeListener, FieldElement},
    error::Result,
};
use std::{cell::RefCell, fmt, rc::Rc};

/// State of a form element held in memory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementNode {
    /// HTML tag name (e.g., "input", "select", "div")
    pub tag_name: String,

    /// Markup inside the element
    pub inner_html: String,

    /// Current input value
    pub value: String,

    /// Current checked state
    pub checked: bool,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    /// Builder method: set inner markup
    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    /// Builder method: set value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Builder method: set checked state
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

/// Shared handle to an in-memory element and its change listeners
///
/// Clones refer to the same element, so a value set through one handle is
/// seen by listeners registered through another.
#[derive(Clone)]
pub struct FormElement {
    node: Rc<RefCell<ElementNode>>,
    listeners: Rc<RefCell<Vec<Rc<dyn ChangeListener>>>>,
}

impl FormElement {
    pub fn new(node: ElementNode) -> Self {
        Self {
            node: Rc::new(RefCell::new(node)),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shorthand for an element with only a tag name
    pub fn tag(tag_name: &str) -> Self {
        Self::new(ElementNode::new(tag_name))
    }

    /// Copy of the current element state
    pub fn snapshot(&self) -> ElementNode {
        self.node.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.node.borrow_mut().value = value.into();
    }

    pub fn set_checked(&self, checked: bool) {
        self.node.borrow_mut().checked = checked;
    }

    pub fn set_inner_html(&self, html: impl Into<String>) {
        self.node.borrow_mut().inner_html = html.into();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether two handles refer to the same element
    pub fn same_element(&self, other: &FormElement) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Fire a change event: every listener runs, in registration order.
    ///
    /// A failing listener does not stop the others; the first error is
    /// returned once all of them have run.
    pub fn dispatch_change(&self) -> Result<()> {
        let listeners: Vec<_> = self.listeners.borrow().clone();
        let mut first_error = None;

        for listener in listeners {
            if let Err(e) = listener.on_change() {
                log::warn!("Change listener on <{}> failed: {}", self.node.borrow().tag_name, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FormElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormElement")
            .field("node", &self.node.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl FieldElement for FormElement {
    fn inner_html(&self) -> Result<String> {
        Ok(self.node.borrow().inner_html.clone())
    }

    fn value(&self) -> Result<String> {
        Ok(self.node.borrow().value.clone())
    }

    fn checked(&self) -> Result<bool> {
        Ok(self.node.borrow().checked)
    }

    fn add_change_listener(&self, listener: Rc<dyn ChangeListener>) -> Result<()> {
        self.listeners.borrow_mut().push(listener);
        Ok(())
    }
}
