//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! helpers (business rules)
//!     → store.rs (insert / find_by_id / find / update)
//!     → collection map → document map (JSON documents keyed by _id)
//! ```
//!
//! # Design Decisions
//! - One cloneable handle shared by every request (Arc inside)
//! - Concurrent maps instead of a global lock
//! - Documents are plain JSON objects; schema rules live in the helpers
//! - Nothing is ever physically removed; deletion is a flag set by helpers

pub mod store;

pub use store::{Database, Page, Query, ID_FIELD};
