//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers and workers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// PUB endpoint where `visit.created` events are published for the
    /// reporting collaborator.
    pub zmq_reports_pub: String,
    /// SUB endpoint delivering signature-completion notifications.
    pub zmq_sign_sub: String,
}
