//! DTOs exposed by the client API endpoints.

use serde::Serialize;

use crate::domain::client::Client;

/// Result payload returned by the client list endpoint.
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// Total number of registered clients.
    pub total: usize,
    /// Page of clients requested by the caller.
    pub clients: Vec<Client>,
}
