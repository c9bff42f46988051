//! Dependencies handed to every handler.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::database::Database;

/// Process-wide handles, cloned into each handler invocation.
#[derive(Clone)]
pub struct ServiceContext {
    pub db: Database,
    pub config: Arc<ServiceConfig>,
}

impl ServiceContext {
    pub fn new(db: Database, config: Arc<ServiceConfig>) -> Self {
        Self { db, config }
    }
}
