// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Structural validation of scene and dialog documents.
//!
//! Validators take untyped JSON, walk it collecting every problem they find
//! as a `(path, message)` issue, and only build the typed document when no
//! issue was found. A document is accepted whole or not at all.

pub mod dialog;
pub mod expr;
pub mod scene;

use serde_json::{Map, Value};

pub use dialog::{validate_dialog_project, validate_dialog_value};
pub use expr::{Condition, ExprError};
pub use scene::{validate_scene_project, validate_scene_value};

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Location such as `scenes[0].hotspots[2].rect.w`; empty for the root.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A document failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("document failed validation with {} issue(s): {}", .issues.len(), summary(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

fn summary(issues: &[Issue]) -> String {
    match issues {
        [] => String::new(),
        [only] => only.to_string(),
        [first, ..] => format!("{first} (and {} more)", issues.len() - 1),
    }
}

impl ValidationError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Issue collector with typed field accessors.
///
/// Every accessor records an issue when the field has the wrong type and
/// returns `None`, so callers can keep walking and report everything in
/// one pass.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    issues: Vec<Issue>,
}

impl Checker {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn mismatch(&mut self, path: String, expected: &str, found: &Value) {
        self.push(path, format!("expected {expected}, found {}", type_name(found)));
    }

    pub fn object<'a>(&mut self, path: &str, value: &'a Value) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.mismatch(path.to_string(), "object", other);
                None
            }
        }
    }

    pub fn required<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> Option<&'a Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.push(join(path, key), "required field is missing");
        }
        value
    }

    pub fn required_object<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        let value = self.required(obj, path, key)?;
        self.object(&join(path, key), value)
    }

    pub fn required_string<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> Option<&'a str> {
        let value = self.required(obj, path, key)?;
        self.string_value(join(path, key), value)
    }

    pub fn optional_string<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> Option<&'a str> {
        let value = obj.get(key)?;
        self.string_value(join(path, key), value)
    }

    fn string_value<'a>(&mut self, path: String, value: &'a Value) -> Option<&'a str> {
        match value {
            Value::String(s) => Some(s),
            other => {
                self.mismatch(path, "string", other);
                None
            }
        }
    }

    pub fn required_number(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<f64> {
        let value = self.required(obj, path, key)?;
        self.number_value(join(path, key), value)
    }

    pub fn optional_number(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<f64> {
        let value = obj.get(key)?;
        self.number_value(join(path, key), value)
    }

    pub fn number_value(&mut self, path: String, value: &Value) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.mismatch(path, "number", value);
                None
            }
        }
    }

    pub fn optional_bool(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<bool> {
        match obj.get(key)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.mismatch(join(path, key), "boolean", other);
                None
            }
        }
    }

    pub fn optional_object<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        let value = obj.get(key)?;
        self.object(&join(path, key), value)
    }

    /// Array field that defaults to empty when absent.
    pub fn list<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> &'a [Value] {
        match obj.get(key) {
            None => &[],
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.mismatch(join(path, key), "array", other);
                &[]
            }
        }
    }

    /// Optional string field that must parse as a condition expression.
    pub fn condition(&mut self, obj: &Map<String, Value>, path: &str, key: &str) {
        if let Some(source) = self.optional_string(obj, path, key) {
            if let Err(err) = Condition::parse(source) {
                self.push(join(path, key), format!("invalid condition: {err}"));
            }
        }
    }

    /// Record an issue for a repeated id and remember the id otherwise.
    pub fn unique_id<'a>(&mut self, seen: &mut Vec<&'a str>, id: Option<&'a str>, path: &str, what: &str) {
        if let Some(id) = id {
            if seen.contains(&id) {
                self.push(join(path, "id"), format!("duplicate {what} id '{id}'"));
            } else {
                seen.push(id);
            }
        }
    }

    /// Turn the collected issues into a result, deserializing `value` into
    /// `T` only when the walk found nothing wrong.
    pub fn finish<T: serde::de::DeserializeOwned>(self, value: Value) -> Result<T, ValidationError> {
        if !self.issues.is_empty() {
            return Err(ValidationError { issues: self.issues });
        }
        serde_json::from_value(value).map_err(|e| ValidationError::single("", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(join("", "scenes"), "scenes");
        assert_eq!(join(&index("scenes", 2), "id"), "scenes[2].id");
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError {
            issues: vec![
                Issue {
                    path: "scenes[0].id".to_string(),
                    message: "required field is missing".to_string(),
                },
                Issue {
                    path: String::new(),
                    message: "bad".to_string(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("scenes[0].id: required field is missing (and 1 more)"));
        assert_eq!(err.issues[1].to_string(), "<root>: bad");
    }
}
