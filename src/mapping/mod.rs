//! Declarative field mappings
//!
//! A [`Mapping`] describes one field to capture: where it lives on the page,
//! how to read it, when to read it, and which validation rule applies.
//! Mapping files are JSON with camelCase keys:
//!
//! ```json
//! [
//!   { "id": 5, "selector": ".email", "attribute": "value", "event": "onLoad", "isEmail": true },
//!   { "id": "newsletter", "selector": "#optin", "attribute": "checkbox", "event": "onChange" }
//! ]
//! ```

pub mod set;

pub use set::MappingSet;

use crate::error::CaptureError;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Opaque identifier handed to the reporter with every captured value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MappingId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MappingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingId::Number(n) => write!(f, "{}", n),
            MappingId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MappingId {
    fn from(id: i64) -> Self {
        MappingId::Number(id)
    }
}

impl From<i32> for MappingId {
    fn from(id: i32) -> Self {
        MappingId::Number(id.into())
    }
}

impl From<&str> for MappingId {
    fn from(id: &str) -> Self {
        MappingId::Text(id.to_string())
    }
}

impl From<String> for MappingId {
    fn from(id: String) -> Self {
        MappingId::Text(id)
    }
}

/// How a value is read from an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Rendered markup of the element
    Text,
    /// Current input value
    Value,
    /// `"Checked"` or `"Unchecked"`
    Checkbox,
    /// The value when checked, otherwise an empty string
    Radio,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Text => "text",
            AttributeKind::Value => "value",
            AttributeKind::Checkbox => "checkbox",
            AttributeKind::Radio => "radio",
        }
    }
}

impl FromStr for AttributeKind {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(AttributeKind::Text),
            "value" => Ok(AttributeKind::Value),
            "checkbox" => Ok(AttributeKind::Checkbox),
            "radio" => Ok(AttributeKind::Radio),
            other => Err(CaptureError::UnexpectedAttribute(other.to_string())),
        }
    }
}

/// When a mapping fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TriggerEvent {
    /// Once, as soon as the engine is initialized
    #[serde(rename = "onLoad")]
    OnLoad,
    /// Every time a matched element reports a change
    #[default]
    #[serde(rename = "onChange")]
    OnChange,
}

impl TriggerEvent {
    /// Only the exact name `onLoad` selects the load trigger.
    pub fn from_name(name: &str) -> Self {
        if name == "onLoad" {
            TriggerEvent::OnLoad
        } else {
            TriggerEvent::OnChange
        }
    }
}

impl<'de> Deserialize<'de> for TriggerEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Any JSON value is accepted; only the string "onLoad" is special
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(name)) => TriggerEvent::from_name(&name),
            _ => TriggerEvent::OnChange,
        })
    }
}

/// Validation rule applied to an extracted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    PhoneNumber,
    Email,
}

/// One field to capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Identifier passed through to the reporter
    pub id: MappingId,

    /// CSS selector locating zero or more elements
    pub selector: String,

    /// Extraction kind: `text`, `value`, `checkbox` or `radio`
    pub attribute: String,

    /// `onLoad`, or anything else for change-triggered capture
    #[serde(default)]
    #[schemars(with = "String")]
    pub event: TriggerEvent,

    /// Only report values that look like an email address
    #[serde(default)]
    pub is_email: bool,

    /// Only report values that look like a UK phone number
    #[serde(default)]
    pub is_phone_number: bool,
}

impl Mapping {
    /// Create a change-triggered mapping with no validation
    pub fn new(id: impl Into<MappingId>, selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selector: selector.into(),
            attribute: attribute.into(),
            event: TriggerEvent::OnChange,
            is_email: false,
            is_phone_number: false,
        }
    }

    /// Builder method: capture once on load
    pub fn on_load(mut self) -> Self {
        self.event = TriggerEvent::OnLoad;
        self
    }

    /// Builder method: capture on every change
    pub fn on_change(mut self) -> Self {
        self.event = TriggerEvent::OnChange;
        self
    }

    /// Builder method: require an email address
    pub fn email(mut self) -> Self {
        self.is_email = true;
        self
    }

    /// Builder method: require a phone number
    pub fn phone_number(mut self) -> Self {
        self.is_phone_number = true;
        self
    }

    /// Parse the attribute into its closed kind
    pub fn attribute_kind(&self) -> Result<AttributeKind, CaptureError> {
        self.attribute.parse()
    }

    /// Validation rules in evaluation order; only the first one applies
    pub fn rules(&self) -> impl Iterator<Item = ValueRule> {
        [
            self.is_phone_number.then_some(ValueRule::PhoneNumber),
            self.is_email.then_some(ValueRule::Email),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_from_json() {
        let json = serde_json::json!({
            "id": 5,
            "selector": ".email",
            "attribute": "value",
            "event": "onLoad",
            "isEmail": true
        });

        let mapping: Mapping = serde_json::from_value(json).unwrap();
        assert_eq!(mapping.id, MappingId::Number(5));
        assert_eq!(mapping.selector, ".email");
        assert_eq!(mapping.event, TriggerEvent::OnLoad);
        assert!(mapping.is_email);
        assert!(!mapping.is_phone_number);
    }

    #[test]
    fn test_unknown_event_means_change() {
        let json = serde_json::json!({
            "id": "phone",
            "selector": "#phone",
            "attribute": "text",
            "event": "onload"
        });

        let mapping: Mapping = serde_json::from_value(json).unwrap();
        assert_eq!(mapping.id, MappingId::Text("phone".to_string()));
        assert_eq!(mapping.event, TriggerEvent::OnChange);
    }

    #[test]
    fn test_missing_event_means_change() {
        let json = serde_json::json!({ "id": 1, "selector": "#a", "attribute": "value" });
        let mapping: Mapping = serde_json::from_value(json).unwrap();
        assert_eq!(mapping.event, TriggerEvent::OnChange);
    }

    #[test]
    fn test_null_or_numeric_event_means_change() {
        for event in [serde_json::json!(null), serde_json::json!(7), serde_json::json!(["onLoad"])] {
            let json = serde_json::json!({ "id": 1, "selector": "#a", "attribute": "value", "event": event });
            let mapping: Mapping = serde_json::from_value(json).unwrap();
            assert_eq!(mapping.event, TriggerEvent::OnChange);
        }
    }

    #[test]
    fn test_attribute_kind() {
        assert_eq!("text".parse::<AttributeKind>().unwrap(), AttributeKind::Text);
        assert_eq!("radio".parse::<AttributeKind>().unwrap(), AttributeKind::Radio);
        assert_eq!(AttributeKind::Checkbox.as_str(), "checkbox");

        let err = Mapping::new(1, "#a", "bacon").attribute_kind().unwrap_err();
        assert_eq!(err.to_string(), "Unexpected attribute: bacon");
    }

    #[test]
    fn test_rules_order() {
        let both = Mapping::new(1, "#a", "value").email().phone_number();
        let rules: Vec<_> = both.rules().collect();
        assert_eq!(rules, vec![ValueRule::PhoneNumber, ValueRule::Email]);

        assert_eq!(Mapping::new(1, "#a", "value").rules().count(), 0);
    }

    #[test]
    fn test_mapping_id_display() {
        assert_eq!(MappingId::from(5).to_string(), "5");
        assert_eq!(MappingId::from("email").to_string(), "email");
    }

    #[test]
    fn test_event_serializes_as_name() {
        let mapping = Mapping::new(1, "#a", "value").on_load();
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["event"], "onLoad");
        assert_eq!(json["isPhoneNumber"], false);
    }
}
