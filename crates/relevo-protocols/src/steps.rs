use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;

/// The value shape and constraints a field accepts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "type")]
#[ts(export)]
pub enum FieldType {
    /// Free text; rejects empty and whitespace-only values.
    Text,
    /// A numeric value within an inclusive range.
    Number { min: f64, max: f64 },
    Boolean,
    /// One of a fixed option set.
    Choice { options: Vec<String> },
    /// An RFC 3339 timestamp string.
    Timestamp,
    /// A list of short text entries. May be explicitly empty: for allergy
    /// fields an empty list is the NKDA statement, not an absence.
    TextList,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldDefinition {
    pub fn required(id: &str, label: &str, field_type: FieldType) -> Self {
        FieldDefinition {
            id: id.to_string(),
            label: label.to_string(),
            field_type,
            required: true,
        }
    }

    pub fn optional(id: &str, label: &str, field_type: FieldType) -> Self {
        FieldDefinition {
            id: id.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
        }
    }

    fn check(&self, step_id: &str, value: &Value) -> Option<ValidationError> {
        let message = match &self.field_type {
            FieldType::Text => match value.as_str() {
                Some(s) if !s.trim().is_empty() => None,
                Some(_) => Some(format!("{} cannot be empty", self.label)),
                None => Some(format!("{} must be text", self.label)),
            },
            FieldType::Number { min, max } => match value.as_f64() {
                Some(n) if (*min..=*max).contains(&n) => None,
                Some(n) => Some(format!(
                    "{} value {} is outside [{}, {}]",
                    self.label, n, min, max
                )),
                None => Some(format!("{} must be a number", self.label)),
            },
            FieldType::Boolean => {
                if value.is_boolean() {
                    None
                } else {
                    Some(format!("{} must be true or false", self.label))
                }
            }
            FieldType::Choice { options } => match value.as_str() {
                Some(s) if options.iter().any(|o| o == s) => None,
                _ => Some(format!(
                    "{} must be one of: {}",
                    self.label,
                    options.join(", ")
                )),
            },
            FieldType::Timestamp => match value.as_str() {
                Some(s) if s.parse::<jiff::Timestamp>().is_ok() => None,
                _ => Some(format!("{} must be an RFC 3339 timestamp", self.label)),
            },
            FieldType::TextList => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => None,
                _ => Some(format!("{} must be a list of text entries", self.label)),
            },
        };

        message.map(|message| ValidationError {
            step_id: step_id.to_string(),
            field_id: self.id.clone(),
            message,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldDefinition>,
}

impl StepDefinition {
    pub fn new(id: &str, title: &str, fields: Vec<FieldDefinition>) -> Self {
        StepDefinition {
            id: id.to_string(),
            title: title.to_string(),
            fields,
        }
    }

    /// Validate the merged field map for this step: every required field
    /// must be present, every provided value must satisfy its constraints,
    /// and unknown field ids are rejected.
    pub fn validate(&self, values: &BTreeMap<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for field in &self.fields {
            match values.get(&field.id).filter(|v| !v.is_null()) {
                None => {
                    if field.required {
                        errors.push(ValidationError {
                            step_id: self.id.clone(),
                            field_id: field.id.clone(),
                            message: format!("{} is required", field.label),
                        });
                    }
                }
                Some(value) => {
                    if let Some(error) = field.check(&self.id, value) {
                        errors.push(error);
                    }
                }
            }
        }

        for key in values.keys() {
            if !self.fields.iter().any(|f| f.id == *key) {
                errors.push(ValidationError {
                    step_id: self.id.clone(),
                    field_id: key.clone(),
                    message: format!("unknown field '{key}' for step '{}'", self.id),
                });
            }
        }

        errors
    }
}

/// A field-level validation failure. Recoverable: it blocks advancing past
/// the offending step (or completing the session) and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[error("{message}")]
#[ts(export)]
pub struct ValidationError {
    pub step_id: String,
    pub field_id: String,
    pub message: String,
}
