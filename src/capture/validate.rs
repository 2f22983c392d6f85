use crate::mapping::{Mapping, ValueRule};
use regex::Regex;
use std::sync::LazyLock;

/// Separator class for phone numbers: ECMAScript `\s`, which differs from
/// Unicode `White_Space` (it adds U+FEFF and leaves out U+0085)
const SPACE: &str = r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

/// UK numbers in `+44` or national `0` form, with an optional `#` extension
static PHONE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = concat!(
        r"^(",
        r"((\+44\s?[0-9]{4}|\(?0[0-9]{4}\)?)\s?[0-9]{3}\s?[0-9]{3})",
        r"|((\+44\s?[0-9]{3}|\(?0[0-9]{3}\)?)\s?[0-9]{3}\s?[0-9]{4})",
        r"|((\+44\s?[0-9]{2}|\(?0[0-9]{2}\)?)\s?[0-9]{4}\s?[0-9]{4})",
        r")(\s?#([0-9]{4}|[0-9]{3}))?$",
    );
    Regex::new(&pattern.replace(r"\s", SPACE)).expect("phone number pattern is valid")
});

/// Case folding is ASCII-only, so `ſ` and the Kelvin sign never match `[a-z]`
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i-u)^[-a-z0-9~!$%^&*_=+}{'?]+(\.[-a-z0-9~!$%^&*_=+}{'?]+)*",
        r"@([a-z0-9_][-a-z0-9_]*(\.[-a-z0-9_]+)*",
        r"\.(aero|arpa|biz|com|coop|edu|gov|info|int|mil|museum|name|net|org|pro|travel|mobi|[a-z][a-z])",
        r"|([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}))",
        r"(:[0-9]{1,5})?$",
    ))
    .expect("email pattern is valid")
});

impl ValueRule {
    /// Whether a raw value satisfies this rule
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ValueRule::PhoneNumber => PHONE_NUMBER_RE.is_match(value),
            ValueRule::Email => EMAIL_RE.is_match(value),
        }
    }
}

/// Accept or discard a raw value.
///
/// Returns the value unchanged when it passes, `None` when it must not be
/// reported. Only the first rule the mapping enables is checked; a mapping
/// with no rules accepts everything, including the empty string.
pub fn validate(mapping: &Mapping, value: String) -> Option<String> {
    match mapping.rules().next() {
        Some(rule) if !rule.matches(&value) => {
            log::trace!("Discarding value for mapping {}: fails {:?}", mapping.id, rule);
            None
        }
        _ => Some(value),
    }
}
