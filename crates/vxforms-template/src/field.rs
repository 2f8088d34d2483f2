//! Typed form field specifications
//!
//! The interpreter's output. [`FormTemplate`] serializes to the shape the
//! rendering layer consumes:
//!
//! ```text
//! { name, fields, selectOptions, disabledFields, selectMode }
//! ```

use crate::error::FieldDiagnostic;
use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Value pre-populated in the UI for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    /// Text (also used for placeholders and constants)
    Text(String),
    /// Integer
    Integer(i64),
    /// Boolean
    Boolean(bool),
    /// Sequence of strings
    Texts(Vec<String>),
    /// Sequence of integers
    Integers(Vec<i64>),
    /// Sequence of floats
    Floats(Vec<f64>),
}

impl ResolvedValue {
    /// Empty text
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Get as string slice, if this is text
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer, if this is one
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for ResolvedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ResolvedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Specification of one form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Pre-populated value
    pub value: ResolvedValue,
    /// Select options; `Some` when the field renders as a select control
    pub select_options: Option<Vec<String>>,
    /// Constant field, not editable
    pub disabled: bool,
}

impl FieldSpec {
    /// Editable field with a plain value
    #[inline]
    #[must_use]
    pub fn editable(value: ResolvedValue) -> Self {
        Self {
            value,
            select_options: None,
            disabled: false,
        }
    }

    /// Select field with options
    #[inline]
    #[must_use]
    pub fn selectable(value: ResolvedValue, options: Vec<String>) -> Self {
        Self {
            value,
            select_options: Some(options),
            disabled: false,
        }
    }

    /// Disabled field holding a fixed constant
    #[inline]
    pub fn constant(value: impl Into<String>) -> Self {
        Self {
            value: ResolvedValue::Text(value.into()),
            select_options: None,
            disabled: true,
        }
    }

    /// Whether the field renders as a select control
    #[inline]
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.select_options.is_some()
    }
}

/// Template-level selection hint for the rendering layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectMode {
    /// Select controls allow multiple choices
    #[default]
    Multiple,
    /// A lookup-driven field is present; select controls are single-choice
    LookupDriven,
}

impl SelectMode {
    /// Wire form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Multiple => "multiple",
            Self::LookupDriven => "single",
        }
    }
}

impl fmt::Display for SelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SelectMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An interpreted template, ready for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormTemplate {
    /// Template name
    pub name: String,
    /// One specification per raw template key
    pub fields: BTreeMap<String, FieldSpec>,
    /// Template-level select mode
    pub select_mode: SelectMode,
    /// Fields that degraded to placeholders
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl FormTemplate {
    /// Create empty template
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get field specification
    #[inline]
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.get(key)
    }

    /// Get resolved value of a field
    #[inline]
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&ResolvedValue> {
        self.fields.get(key).map(|f| &f.value)
    }

    /// Get select options of a field
    #[inline]
    #[must_use]
    pub fn select_options(&self, key: &str) -> Option<&[String]> {
        self.fields.get(key).and_then(|f| f.select_options.as_deref())
    }

    /// Whether a field is disabled
    #[inline]
    #[must_use]
    pub fn is_disabled(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|f| f.disabled)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormTemplateView<'a> {
    name: &'a str,
    fields: BTreeMap<&'a str, &'a ResolvedValue>,
    select_options: BTreeMap<&'a str, &'a [String]>,
    disabled_fields: BTreeMap<&'a str, bool>,
    select_mode: SelectMode,
}

impl Serialize for FormTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = FormTemplateView {
            name: &self.name,
            fields: self
                .fields
                .iter()
                .map(|(k, f)| (k.as_str(), &f.value))
                .collect(),
            select_options: self
                .fields
                .iter()
                .filter_map(|(k, f)| f.select_options.as_deref().map(|o| (k.as_str(), o)))
                .collect(),
            disabled_fields: self
                .fields
                .iter()
                .map(|(k, f)| (k.as_str(), f.disabled))
                .collect(),
            select_mode: self.select_mode,
        };
        view.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_to_rendering_contract() {
        let mut template = FormTemplate::new("DataSource");
        template.fields.insert(
            "builder_type".into(),
            FieldSpec::constant("NetcdfMetarObsBuilderV01"),
        );
        template.fields.insert(
            "ids".into(),
            FieldSpec::selectable(
                ResolvedValue::Integers(vec![1, 2]),
                vec!["1".into(), "2".into()],
            ),
        );
        template
            .fields
            .insert("flag".into(), FieldSpec::editable(ResolvedValue::Boolean(true)));
        template.select_mode = SelectMode::LookupDriven;

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "DataSource",
                "fields": {
                    "builder_type": "NetcdfMetarObsBuilderV01",
                    "flag": true,
                    "ids": [1, 2]
                },
                "selectOptions": {"ids": ["1", "2"]},
                "disabledFields": {"builder_type": true, "flag": false, "ids": false},
                "selectMode": "single"
            })
        );
    }

    #[test]
    fn select_mode_defaults_to_multiple() {
        assert_eq!(SelectMode::default().as_str(), "multiple");
    }

    #[test]
    fn accessors_on_missing_field() {
        let template = FormTemplate::new("empty");
        assert!(template.value("x").is_none());
        assert!(template.select_options("x").is_none());
        assert!(!template.is_disabled("x"));
    }
}
