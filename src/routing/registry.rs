//! Controller registry.
//!
//! # Responsibilities
//! - Store handlers keyed by `(version, controller, file?, method)`
//! - Resolve path segments to exactly one handler, or nothing
//!
//! # Design Decisions
//! - Built once through explicit registration, immutable afterwards
//!   (shared via Arc, no locks)
//! - Resolution walks version → controller → method and stops at the first
//!   miss; every miss looks the same to the caller
//! - Underscore-prefixed methods may be registered but never resolve

use std::collections::{HashMap, HashSet};

use crate::routing::descriptor::RouteDescriptor;
use crate::routing::handler::{into_boxed, BoxedHandler, Handler};

/// Dispatch key of a registered handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub version: String,
    pub controller: String,
    pub file: Option<String>,
    pub method: String,
}

impl From<&RouteDescriptor> for RouteKey {
    fn from(d: &RouteDescriptor) -> Self {
        Self {
            version: d.version.clone(),
            controller: d.controller.clone(),
            file: d.file.clone(),
            method: d.method.clone(),
        }
    }
}

/// Immutable handler table.
pub struct ControllerRegistry {
    versions: HashSet<String>,
    controllers: HashSet<(String, String)>,
    handlers: HashMap<RouteKey, BoxedHandler>,
}

impl ControllerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve path segments to a descriptor and its handler.
    ///
    /// Candidates are tried in declaration order; the first one that passes
    /// every check wins.
    pub fn resolve(&self, segments: &[&str]) -> Option<(RouteDescriptor, BoxedHandler)> {
        RouteDescriptor::candidates(segments)
            .into_iter()
            .find_map(|descriptor| {
                let handler = self.lookup(&descriptor)?;
                Some((descriptor, handler))
            })
    }

    /// Check a single descriptor against the table.
    pub fn lookup(&self, descriptor: &RouteDescriptor) -> Option<BoxedHandler> {
        if descriptor.version.is_empty() || !self.versions.contains(&descriptor.version) {
            return None;
        }
        let controller = (descriptor.version.clone(), descriptor.controller.clone());
        if !self.controllers.contains(&controller) {
            return None;
        }
        let handler = self.handlers.get(&RouteKey::from(descriptor))?;
        if descriptor.is_private() {
            tracing::debug!(method = %descriptor.method, "Refusing to dispatch private method");
            return None;
        }
        Some(handler.clone())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Every registered key, sorted; used for start-up logging.
    pub fn routes(&self) -> Vec<&RouteKey> {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort_by(|a, b| {
            (&a.version, &a.controller, &a.file, &a.method)
                .cmp(&(&b.version, &b.controller, &b.file, &b.method))
        });
        keys
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("routes", &self.routes())
            .finish()
    }
}

/// Collects registrations, then freezes into a [`ControllerRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<RouteKey, BoxedHandler>,
}

impl RegistryBuilder {
    /// Register a handler under an explicit key.
    pub fn register<H: Handler>(
        &mut self,
        version: &str,
        controller: &str,
        file: Option<&str>,
        method: &str,
        handler: H,
    ) -> &mut Self {
        let key = RouteKey {
            version: version.to_string(),
            controller: controller.to_string(),
            file: file.map(str::to_string),
            method: method.to_string(),
        };
        if self.handlers.insert(key, into_boxed(handler)).is_some() {
            tracing::warn!(version, controller, file, method, "Handler registered twice, keeping the last");
        }
        self
    }

    /// Scope further registrations to one controller (and optional file).
    pub fn controller<'b>(
        &'b mut self,
        version: &'b str,
        controller: &'b str,
        file: Option<&'b str>,
    ) -> ControllerScope<'b> {
        ControllerScope {
            builder: self,
            version,
            controller,
            file,
        }
    }

    pub fn build(self) -> ControllerRegistry {
        let versions = self.handlers.keys().map(|k| k.version.clone()).collect();
        let controllers = self
            .handlers
            .keys()
            .map(|k| (k.version.clone(), k.controller.clone()))
            .collect();
        ControllerRegistry {
            versions,
            controllers,
            handlers: self.handlers,
        }
    }
}

/// Registration helper bound to one controller.
pub struct ControllerScope<'b> {
    builder: &'b mut RegistryBuilder,
    version: &'b str,
    controller: &'b str,
    file: Option<&'b str>,
}

impl ControllerScope<'_> {
    pub fn method<H: Handler>(&mut self, method: &str, handler: H) -> &mut Self {
        self.builder
            .register(self.version, self.controller, self.file, method, handler);
        self
    }
}
