use crate::{
    dom::FieldElement,
    error::Result,
    mapping::{AttributeKind, Mapping},
};

pub const CHECKED: &str = "Checked";
pub const UNCHECKED: &str = "Unchecked";

/// Read the raw value a mapping asks for from an element.
///
/// Only reads the element. An unchecked radio yields an empty string, which
/// is a real value and not a discard.
pub fn extract<E: FieldElement + ?Sized>(mapping: &Mapping, element: &E) -> Result<String> {
    let value = match mapping.attribute_kind()? {
        AttributeKind::Text => element.inner_html()?,
        AttributeKind::Value => element.value()?,
        AttributeKind::Checkbox => {
            if element.checked()? {
                CHECKED.to_string()
            } else {
                UNCHECKED.to_string()
            }
        }
        AttributeKind::Radio => {
            if element.checked()? {
                element.value()?
            } else {
                String::new()
            }
        }
    };

    Ok(value)
}
