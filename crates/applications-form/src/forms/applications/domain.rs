use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Choices offered by the application type selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationType {
    /// Placeholder shown before the user picks a real option.
    #[serde(rename = "Select option")]
    SelectOption,
    #[default]
    #[serde(rename = "COTS")]
    Cots,
    #[serde(rename = "Custom")]
    Custom,
}

impl ApplicationType {
    pub const ALL: [ApplicationType; 3] = [
        ApplicationType::SelectOption,
        ApplicationType::Cots,
        ApplicationType::Custom,
    ];

    /// Value stored in the list column and posted by the selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::SelectOption => "Select option",
            ApplicationType::Cots => "COTS",
            ApplicationType::Custom => "Custom",
        }
    }

    /// Text shown inside the selector.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationType::SelectOption => "---Select---",
            ApplicationType::Cots => "COTS",
            ApplicationType::Custom => "Custom",
        }
    }

    /// Maps a submitted value onto the enumeration. Anything unrecognised
    /// collapses to the placeholder.
    pub fn from_input(value: &str) -> Self {
        value.parse().unwrap_or(ApplicationType::SelectOption)
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application type '{0}'")]
pub struct UnknownApplicationType(pub String);

impl FromStr for ApplicationType {
    type Err = UnknownApplicationType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownApplicationType(value.to_string()))
    }
}

/// Names of the editable draft fields, spelled the way the form posts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    ApplicationName,
    ApplicationType,
    Contact,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::ApplicationName => "applicationName",
            FieldName::ApplicationType => "applicationType",
            FieldName::Contact => "contact",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "applicationName" => Ok(FieldName::ApplicationName),
            "applicationType" => Ok(FieldName::ApplicationType),
            "contact" => Ok(FieldName::Contact),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// In-progress form values that have not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntry {
    pub application_name: String,
    pub application_type: ApplicationType,
    pub contact: String,
}

impl DraftEntry {
    /// Returns a copy with only `field` replaced.
    pub fn with_field(&self, field: FieldName, value: &str) -> Self {
        let mut next = self.clone();
        match field {
            FieldName::ApplicationName => next.application_name = value.to_string(),
            FieldName::ApplicationType => next.application_type = ApplicationType::from_input(value),
            FieldName::Contact => next.contact = value.to_string(),
        }
        next
    }

    pub fn to_new_entry(&self) -> NewEntry {
        NewEntry {
            title: self.application_name.clone(),
            application_type: self.application_type,
            contact: self.contact.clone(),
        }
    }
}

/// Payload posted to the list when creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewEntry {
    pub title: String,
    pub application_type: ApplicationType,
    pub contact: String,
}

/// Item as stored in the remote list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersistedEntry {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Kept verbatim: the list column is free text and may hold values the
    /// selector does not offer.
    #[serde(default)]
    pub application_type: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_entry_serializes_with_list_column_names() {
        let entry = NewEntry {
            title: "My App 1".to_string(),
            application_type: ApplicationType::Cots,
            contact: "a@b.com".to_string(),
        };

        let value = serde_json::to_value(&entry).expect("serializes");
        assert_eq!(
            value,
            json!({ "Title": "My App 1", "ApplicationType": "COTS", "Contact": "a@b.com" })
        );
    }

    #[test]
    fn persisted_entry_tolerates_missing_columns() {
        let entry: PersistedEntry =
            serde_json::from_value(json!({ "Id": 7, "Title": "Payroll" })).expect("parses");
        assert_eq!(entry.id, 7);
        assert_eq!(entry.title.as_deref(), Some("Payroll"));
        assert_eq!(entry.application_type, None);
        assert_eq!(entry.contact, None);
    }

    #[test]
    fn unknown_application_type_collapses_to_placeholder() {
        assert_eq!(ApplicationType::from_input("Custom"), ApplicationType::Custom);
        assert_eq!(
            ApplicationType::from_input("Bespoke"),
            ApplicationType::SelectOption
        );
    }

    #[test]
    fn with_field_only_touches_named_field() {
        let draft = DraftEntry {
            application_name: "Ledger".to_string(),
            application_type: ApplicationType::Custom,
            contact: "ops@example.com".to_string(),
        };

        let next = draft.with_field(FieldName::Contact, "it@example.com");
        assert_eq!(next.application_name, "Ledger");
        assert_eq!(next.application_type, ApplicationType::Custom);
        assert_eq!(next.contact, "it@example.com");
    }
}
