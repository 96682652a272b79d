use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationType, DraftEntry, FieldName};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 50;

pub const NAME_LENGTH_MESSAGE: &str = "Application Name must be between 3 and 50 characters";
pub const NAME_CHARSET_MESSAGE: &str = "Application Name cannot contain special characters";
pub const CONTACT_MESSAGE: &str = "Please enter a valid email address";
pub const APPLICATION_TYPE_MESSAGE: &str = "Please select an application type";

static NAME_FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9 ]").expect("invalid name pattern"));

static CONTACT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid contact pattern"));

/// Switches for checks that are off unless a deployment asks for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Reject the `Select option` placeholder as an application type.
    pub require_application_type: bool,
}

/// Per-field messages from the most recent validation pass. An empty string
/// means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    pub application_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub application_type: String,
    pub contact: String,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.application_name.is_empty()
            && self.application_type.is_empty()
            && self.contact.is_empty()
    }

    /// Message for `field`, or `None` when it passed.
    pub fn message(&self, field: FieldName) -> Option<&str> {
        let message = match field {
            FieldName::ApplicationName => &self.application_name,
            FieldName::ApplicationType => &self.application_type,
            FieldName::Contact => &self.contact,
        };
        (!message.is_empty()).then_some(message.as_str())
    }
}

/// Checks the draft and returns whether it may be submitted together with a
/// freshly built error map.
pub fn validate(draft: &DraftEntry, policy: &ValidationPolicy) -> (bool, ValidationErrors) {
    let errors = ValidationErrors {
        application_name: check_application_name(&draft.application_name)
            .unwrap_or_default()
            .to_string(),
        application_type: check_application_type(draft.application_type, policy)
            .unwrap_or_default()
            .to_string(),
        contact: check_contact(&draft.contact).unwrap_or_default().to_string(),
    };

    (errors.is_empty(), errors)
}

fn check_application_name(name: &str) -> Option<&'static str> {
    let length = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) {
        return Some(NAME_LENGTH_MESSAGE);
    }
    if NAME_FORBIDDEN_CHARS.is_match(name) {
        return Some(NAME_CHARSET_MESSAGE);
    }
    None
}

fn check_application_type(
    kind: ApplicationType,
    policy: &ValidationPolicy,
) -> Option<&'static str> {
    if policy.require_application_type && kind == ApplicationType::SelectOption {
        Some(APPLICATION_TYPE_MESSAGE)
    } else {
        None
    }
}

fn check_contact(contact: &str) -> Option<&'static str> {
    if contact.is_empty() || !CONTACT_SHAPE.is_match(contact) {
        Some(CONTACT_MESSAGE)
    } else {
        None
    }
}
