//! Business helpers between controllers and storage.
//!
//! # Responsibilities
//! - Own bookkeeping fields (`_id`, timestamps, actors, soft delete)
//! - Turn storage misses into `ApiError`s with entity-specific messages
//!
//! # Design Decisions
//! - Helpers are synchronous; the store never blocks on I/O
//! - Controllers never touch `Database` directly

pub mod entity;

pub use entity::EntityKind;
