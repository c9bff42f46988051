//! Route descriptors parsed from path segments.
//!
//! # Responsibilities
//! - Turn the segments below the base path into candidate descriptors
//! - Order candidates the way the route table is declared
//!
//! # Design Decisions
//! - Four segments are ambiguous (`file/method` vs `method/_id`);
//!   both are returned, `file/method` first
//! - Shapes other than 3, 4 or 5 segments yield no candidates

use serde::Serialize;

/// The dispatch key of one request plus its optional trailing id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub version: String,
    pub controller: String,
    pub file: Option<String>,
    pub method: String,
    pub id: Option<String>,
}

impl RouteDescriptor {
    pub fn new(
        version: &str,
        controller: &str,
        file: Option<&str>,
        method: &str,
        id: Option<&str>,
    ) -> Self {
        Self {
            version: version.to_string(),
            controller: controller.to_string(),
            file: file.map(str::to_string),
            method: method.to_string(),
            id: id.map(str::to_string),
        }
    }

    /// Candidate interpretations of `segments`, in resolution order.
    pub fn candidates(segments: &[&str]) -> Vec<RouteDescriptor> {
        match *segments {
            [version, controller, method] => {
                vec![Self::new(version, controller, None, method, None)]
            }
            [version, controller, second, third] => vec![
                Self::new(version, controller, Some(second), third, None),
                Self::new(version, controller, None, second, Some(third)),
            ],
            [version, controller, file, method, id] => {
                vec![Self::new(version, controller, Some(file), method, Some(id))]
            }
            _ => Vec::new(),
        }
    }

    /// Methods with a leading underscore are never reachable over HTTP.
    pub fn is_private(&self) -> bool {
        self.method.starts_with('_')
    }
}

/// Split a request path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
