//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request below the base path ("v1/tasks/details/<id>")
//!     → descriptor.rs (split into candidate RouteDescriptors)
//!     → registry.rs (first candidate with a registered, public handler)
//!     → router.rs (validation check, handler call, rendering)
//!     → Return: response, or the terminal 404
//!
//! Registry construction (at startup):
//!     controllers::registry
//!     → RegistryBuilder::register per (version, controller, file?, method)
//!     → Freeze as immutable ControllerRegistry
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - Deterministic: same path always resolves to the same handler
//! - First candidate wins (file/method before method/_id)

pub mod descriptor;
pub mod handler;
pub mod registry;
pub mod router;

pub use descriptor::{split_path, RouteDescriptor};
pub use handler::{BoxedHandler, Handler, HandlerOutcome, HandlerResult, JsonReply, StreamSource};
pub use registry::{ControllerRegistry, RegistryBuilder, RouteKey};
pub use router::{dispatch, not_found, NOT_FOUND_BODY};
