//! v1 controllers.
//!
//! # Registration
//! ```text
//! registry()
//!     → crud::register per entity (create, update, details, list, delete)
//!     → certificates::download
//!     → ControllerRegistry (frozen, shared by every request)
//! ```

pub mod certificates;
pub mod crud;

use crate::helpers::EntityKind;
use crate::routing::ControllerRegistry;

pub const VERSION: &str = "v1";

pub static PROGRAMS: EntityKind = EntityKind {
    controller: "programs",
    file: None,
    collection: "programs",
    label: "Program",
    search_fields: &["name", "description", "externalId"],
};

pub static SOLUTIONS: EntityKind = EntityKind {
    controller: "solutions",
    file: None,
    collection: "solutions",
    label: "Solution",
    search_fields: &["name", "description", "externalId"],
};

pub static TASKS: EntityKind = EntityKind {
    controller: "tasks",
    file: None,
    collection: "tasks",
    label: "Task",
    search_fields: &["title", "description"],
};

pub static CERTIFICATES: EntityKind = EntityKind {
    controller: "certificates",
    file: None,
    collection: "certificates",
    label: "Certificate",
    search_fields: &["name"],
};

pub static OBSERVATIONS: EntityKind = EntityKind {
    controller: "observations",
    file: None,
    collection: "observations",
    label: "Observation",
    search_fields: &["name", "solutionId"],
};

pub static CONFIGURATIONS: EntityKind = EntityKind {
    controller: "configurations",
    file: None,
    collection: "configurations",
    label: "Configuration",
    search_fields: &["code"],
};

pub static LIBRARY_CATEGORIES: EntityKind = EntityKind {
    controller: "library",
    file: Some("categories"),
    collection: "projectCategories",
    label: "Library category",
    search_fields: &["name", "externalId"],
};

/// Every entity served with the standard CRUD methods.
pub static ENTITIES: [&EntityKind; 7] = [
    &PROGRAMS,
    &SOLUTIONS,
    &TASKS,
    &CERTIFICATES,
    &OBSERVATIONS,
    &CONFIGURATIONS,
    &LIBRARY_CATEGORIES,
];

/// Build the registry with every v1 controller method.
pub fn registry() -> ControllerRegistry {
    let mut builder = ControllerRegistry::builder();
    for kind in ENTITIES {
        crud::register(&mut builder, VERSION, kind);
    }
    builder
        .controller(VERSION, CERTIFICATES.controller, None)
        .method("download", certificates::download);
    builder.build()
}
