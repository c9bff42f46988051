//! Request validation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     entities.rs registers one validator per (version, controller, file?)
//!     → ValidatorRegistry (immutable, shared via Arc)
//!
//! Per request (validator middleware):
//!     resolved RouteDescriptor → ValidatorRegistry::get
//!     → None: nothing to check
//!     → Some(validator): validator(method, &mut Validator)
//!         → rules.rs field checks push {param, message}
//!     → ValidationErrors stored in request extensions
//! ```
//!
//! # Design Decisions
//! - A missing validator is normal and silent
//! - Validators record errors, they never reject; the dispatch router does
//! - One chain per field stops at its first failing rule

pub mod entities;
pub mod rules;

use std::collections::HashMap;

use serde::Serialize;

use crate::routing::RouteDescriptor;

pub use rules::{Check, Validator};

/// One field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub param: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Ordered list of failures recorded for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

/// Validation rules for every method of one controller (or controller file).
pub type ValidatorFn = fn(method: &str, validator: &mut Validator<'_>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ValidatorKey {
    version: String,
    controller: String,
    file: Option<String>,
}

/// Lookup table from `(version, controller, file?)` to its validator.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<ValidatorKey, ValidatorFn>,
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("routes", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the validator for a controller, or for one file of it.
    pub fn register(
        &mut self,
        version: &str,
        controller: &str,
        file: Option<&str>,
        validator: ValidatorFn,
    ) -> &mut Self {
        let key = ValidatorKey {
            version: version.to_string(),
            controller: controller.to_string(),
            file: file.map(str::to_string),
        };
        if self.validators.insert(key, validator).is_some() {
            tracing::warn!(version, controller, file, "Validator registered twice, keeping the last");
        }
        self
    }

    /// Validator for the descriptor's route, if one was registered.
    pub fn get(&self, descriptor: &RouteDescriptor) -> Option<ValidatorFn> {
        let key = ValidatorKey {
            version: descriptor.version.clone(),
            controller: descriptor.controller.clone(),
            file: descriptor.file.clone(),
        };
        self.validators.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
