//! DTOs exposed by the contract API endpoints.

use serde::Serialize;

use crate::domain::contract::Contract;
use crate::domain::visit::Visit;
use crate::services::contract::ContractDetail;

/// Result payload returned by the contract list endpoint.
#[derive(Debug, Serialize)]
pub struct ContractsResponse {
    /// Total number of contracts matching the filter.
    pub total: usize,
    /// Page of contracts requested by the caller.
    pub contracts: Vec<Contract>,
}

/// A contract with its generation counters.
#[derive(Debug, Serialize)]
pub struct ContractResponse {
    pub contract: Contract,
    pub visits_count: usize,
    pub total_visits: i64,
}

impl From<ContractDetail> for ContractResponse {
    fn from(detail: ContractDetail) -> Self {
        Self {
            contract: detail.contract,
            visits_count: detail.visits_count,
            total_visits: detail.total_visits,
        }
    }
}

/// Result payload of the generation and extra-visit endpoints.
#[derive(Debug, Serialize)]
pub struct GeneratedVisitsResponse {
    /// Number of visits created by the call; zero means the month was
    /// already satisfied.
    pub created: usize,
    pub visits: Vec<Visit>,
}

impl From<Vec<Visit>> for GeneratedVisitsResponse {
    fn from(visits: Vec<Visit>) -> Self {
        Self {
            created: visits.len(),
            visits,
        }
    }
}
