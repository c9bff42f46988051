//! Request middleware, applied in this order:
//! authenticator → pagination → validator → dispatch.

pub mod authenticator;
pub mod pagination;
pub mod validator;

pub use authenticator::{authenticator_middleware, UserDetails};
pub use pagination::{pagination_middleware, Pagination, MAX_LIMIT};
pub use validator::validator_middleware;
