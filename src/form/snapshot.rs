//! In-memory form state that can be loaded from and saved to disk
//!
//! A snapshot is the set of field values a page holds at one moment:
//!
//! ```yaml
//! fields:
//!   base_daily_rate: 100
//!   labor_days: 5
//!   extra_cost: 50
//!   margin_range: 20
//!   tax_input: 10
//! gear_items:
//!   - name: Camera body
//!     value: 20
//!   - 30
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::form::binding::{FormSink, FormSource};
use crate::form::fields::FieldId;
use crate::yaml::{parse_yaml_str, YamlError};

/// Raw text of a field. Accepts any YAML/JSON scalar so that numbers do not
/// need quoting; `null` reads as an empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldText(pub String);

impl FieldText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldText {
    fn from(s: &str) -> Self {
        FieldText(s.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldTextVisitor;

        impl<'de> Visitor<'de> for FieldTextVisitor {
            type Value = FieldText;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number, boolean or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldText, E> {
                Ok(FieldText(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<FieldText, E> {
                Ok(FieldText(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldText, E> {
                Ok(FieldText(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldText, E> {
                Ok(FieldText(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldText, E> {
                Ok(FieldText(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<FieldText, E> {
                Ok(FieldText(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<FieldText, E> {
                Ok(FieldText::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<FieldText, E> {
                Ok(FieldText::default())
            }
        }

        deserializer.deserialize_any(FieldTextVisitor)
    }
}

/// One equipment line on the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GearEntry")]
pub struct GearItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Value attribute; `None` when the line carries none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldText>,
}

/// Gear lines may be written as a bare value or as a name/value map
#[derive(Deserialize)]
#[serde(untagged)]
enum GearEntry {
    Bare(FieldText),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        value: Option<FieldText>,
    },
}

impl From<GearEntry> for GearItem {
    fn from(entry: GearEntry) -> Self {
        match entry {
            GearEntry::Bare(value) => GearItem {
                name: None,
                value: Some(value),
            },
            GearEntry::Detailed { name, value } => GearItem { name, value },
        }
    }
}

/// Errors loading or saving a form snapshot
#[derive(Debug, Error, miette::Diagnostic)]
pub enum FormError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("invalid JSON in {path}: {source}")]
    #[diagnostic(code(orca::form::json))]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown form field '{0}'")]
    #[diagnostic(
        code(orca::form::unknown_field),
        help("valid fields: base_daily_rate, labor_days, extra_cost, margin_range, tax_input and the output fields")
    )]
    UnknownField(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(orca::form::io))]
    Io(#[from] std::io::Error),

    #[error("failed to serialize form: {0}")]
    #[diagnostic(code(orca::form::serialize))]
    Serialize(String),
}

/// Complete form state: named fields plus the gear list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    #[serde(default)]
    pub fields: BTreeMap<FieldId, FieldText>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gear_items: Vec<GearItem>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by name, rejecting names the form does not have
    pub fn set_named(&mut self, name: &str, text: impl Into<String>) -> Result<(), FormError> {
        let field = name
            .parse::<FieldId>()
            .map_err(|_| FormError::UnknownField(name.to_string()))?;
        self.fields.insert(field, FieldText(text.into()));
        Ok(())
    }

    /// Append a gear line
    pub fn push_gear(&mut self, name: Option<String>, value: impl Into<String>) {
        self.gear_items.push(GearItem {
            name,
            value: Some(FieldText(value.into())),
        });
    }

    /// Current text of a field
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.fields.get(&field).map(FieldText::as_str)
    }

    /// Parse a snapshot from YAML (JSON is valid YAML too)
    pub fn from_yaml(content: &str, filename: &str) -> Result<Self, FormError> {
        Ok(parse_yaml_str(content, filename)?)
    }

    /// Load a snapshot; `.json` files use the JSON parser, anything else YAML
    pub fn load(path: &Path) -> Result<Self, FormError> {
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            serde_json::from_str(&content).map_err(|source| FormError::Json {
                path: path.display().to_string(),
                source,
            })
        } else {
            Self::from_yaml(&content, &path.display().to_string())
        }
    }

    /// Save the snapshot in the format its extension names
    pub fn save(&self, path: &Path) -> Result<(), FormError> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| FormError::Serialize(e.to_string()))?
        } else {
            serde_yml::to_string(self).map_err(|e| FormError::Serialize(e.to_string()))?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl FormSource for FormSnapshot {
    fn value(&self, field: FieldId) -> Option<&str> {
        self.get(field)
    }

    fn gear_values(&self) -> Vec<Option<&str>> {
        self.gear_items
            .iter()
            .map(|item| item.value.as_ref().map(FieldText::as_str))
            .collect()
    }
}

impl FormSink for FormSnapshot {
    fn set_field(&mut self, field: FieldId, text: String) {
        self.fields.insert(field, FieldText(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::binding::recalculate;
    use tempfile::TempDir;

    const REFERENCE: &str = r#"
fields:
  base_daily_rate: 100
  labor_days: "5"
  extra_cost: 50.0
  margin_range: 20
  tax_input: 10
gear_items:
  - name: Lens kit
    value: 20
  - 30
"#;

    #[test]
    fn test_from_yaml_accepts_numbers_and_strings() {
        let form = FormSnapshot::from_yaml(REFERENCE, "form.yaml").unwrap();
        assert_eq!(form.get(FieldId::BaseDailyRate), Some("100"));
        assert_eq!(form.get(FieldId::LaborDays), Some("5"));
        assert_eq!(form.get(FieldId::ExtraCost), Some("50"));
        assert_eq!(form.gear_items.len(), 2);
        assert_eq!(form.gear_items[0].name.as_deref(), Some("Lens kit"));
        assert_eq!(form.gear_values(), vec![Some("20"), Some("30")]);
    }

    #[test]
    fn test_gear_item_without_value() {
        let form = FormSnapshot::from_yaml("gear_items:\n  - name: Tripod\n", "form.yaml").unwrap();
        assert_eq!(form.gear_values(), vec![None]);
    }

    #[test]
    fn test_null_field_is_empty() {
        let form = FormSnapshot::from_yaml("fields:\n  tax_input: ~\n", "form.yaml").unwrap();
        assert_eq!(form.get(FieldId::TaxInput), Some(""));
    }

    #[test]
    fn test_unknown_field_in_document_is_rejected() {
        let result = FormSnapshot::from_yaml("fields:\n  discount: 5\n", "form.yaml");
        assert!(matches!(result, Err(FormError::Yaml(_))));
    }

    #[test]
    fn test_set_named() {
        let mut form = FormSnapshot::new();
        form.set_named("margin_range", "35").unwrap();
        assert_eq!(form.get(FieldId::MarginRange), Some("35"));
        assert!(matches!(
            form.set_named("discount", "5"),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn test_recalculate_snapshot() {
        let mut form = FormSnapshot::from_yaml(REFERENCE, "form.yaml").unwrap();
        let output = recalculate(&mut form);

        assert_eq!(output.total_cost, 600.0);
        assert_eq!(form.get(FieldId::DisplayCost), Some("600.00"));
        assert_eq!(form.get(FieldId::FinalPriceDisplay), Some("857.14"));
        assert_eq!(form.get(FieldId::AlertMsg), Some(""));
    }

    #[test]
    fn test_save_and_load_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("form.yaml");

        let mut form = FormSnapshot::from_yaml(REFERENCE, "form.yaml").unwrap();
        recalculate(&mut form);
        form.save(&path).unwrap();

        let loaded = FormSnapshot::load(&path).unwrap();
        assert_eq!(loaded.get(FieldId::DisplayCost), Some("600.00"));
        assert_eq!(loaded.gear_items.len(), 2);
    }

    #[test]
    fn test_load_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("form.json");
        std::fs::write(
            &path,
            r#"{"fields": {"base_daily_rate": 200, "labor_days": "2"}, "gear_items": ["15"]}"#,
        )
        .unwrap();

        let form = FormSnapshot::load(&path).unwrap();
        assert_eq!(form.get(FieldId::BaseDailyRate), Some("200"));
        assert_eq!(form.gear_values(), vec![Some("15")]);
    }

    #[test]
    fn test_load_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("form.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(FormSnapshot::load(&path), Err(FormError::Json { .. })));
    }
}
