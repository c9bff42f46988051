//! Field rules used by entity validators.
//!
//! ```rust,ignore
//! validator.body("title").exists("Title is required.").not_empty("Title is required.");
//! validator.id().is_id("Task id is required.");
//! ```

use serde_json::Value;
use uuid::Uuid;

use crate::http::ApiRequest;
use crate::validation::{ValidationError, ValidationErrors};

/// Collects errors for one request.
pub struct Validator<'a> {
    request: &'a ApiRequest,
    errors: ValidationErrors,
}

impl<'a> Validator<'a> {
    pub fn new(request: &'a ApiRequest) -> Self {
        Self {
            request,
            errors: ValidationErrors::default(),
        }
    }

    /// Start a rule chain on a top-level body field.
    pub fn body(&mut self, field: &str) -> Check<'_> {
        let value = self.request.body.get(field).cloned();
        Check::new(field, value, &mut self.errors)
    }

    /// Start a rule chain on the trailing `_id` path segment.
    pub fn id(&mut self) -> Check<'_> {
        let value = self.request.descriptor.id.clone().map(Value::String);
        Check::new("_id", value, &mut self.errors)
    }

    /// Start a rule chain on a query string parameter.
    pub fn query(&mut self, key: &str) -> Check<'_> {
        let value = self.request.query.get(key).cloned().map(Value::String);
        Check::new(key, value, &mut self.errors)
    }

    pub fn finish(self) -> ValidationErrors {
        self.errors
    }
}

/// A rule chain on a single value. The first failing rule records its
/// message; later rules in the same chain are skipped.
pub struct Check<'v> {
    param: String,
    value: Option<Value>,
    failed: bool,
    errors: &'v mut ValidationErrors,
}

impl<'v> Check<'v> {
    fn new(param: &str, value: Option<Value>, errors: &'v mut ValidationErrors) -> Self {
        Self {
            param: param.to_string(),
            value,
            failed: false,
            errors,
        }
    }

    fn rule(mut self, passed: impl FnOnce(Option<&Value>) -> bool, message: &str) -> Self {
        if !self.failed && !passed(self.value.as_ref()) {
            self.failed = true;
            self.errors.push(ValidationError::new(self.param.clone(), message));
        }
        self
    }

    /// The value is present (JSON `null` counts as present).
    pub fn exists(self, message: &str) -> Self {
        self.rule(|value| value.is_some(), message)
    }

    /// The value is present and not blank.
    pub fn not_empty(self, message: &str) -> Self {
        self.rule(
            |value| match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(Value::Array(items)) => !items.is_empty(),
                Some(Value::Object(map)) => !map.is_empty(),
                Some(_) => true,
            },
            message,
        )
    }

    /// The value, when present, is one of `allowed`.
    pub fn is_in(self, allowed: &[&str], message: &str) -> Self {
        self.rule(
            |value| match value {
                None => true,
                Some(Value::String(s)) => allowed.contains(&s.as_str()),
                Some(_) => false,
            },
            message,
        )
    }

    /// The value is a document id.
    pub fn is_id(self, message: &str) -> Self {
        self.rule(
            |value| matches!(value, Some(Value::String(s)) if Uuid::parse_str(s).is_ok()),
            message,
        )
    }
}
