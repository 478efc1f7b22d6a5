//! DTOs exposed by the visit API endpoints.

use serde::Serialize;

use crate::domain::visit::Visit;

/// Result payload returned by visit list endpoints.
#[derive(Debug, Serialize)]
pub struct VisitsResponse {
    /// Total number of visits matching the filter.
    pub total: usize,
    /// Page of visits requested by the caller.
    pub visits: Vec<Visit>,
}
