use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientId, ContractId, FolderId, TypeConstraintError, VisitId, VisitMonth,
};

/// Lifecycle state of a single visit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisitState {
    Pending,
    Done,
    Cancelled,
}

impl Display for VisitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitState::Pending => write!(f, "pending"),
            VisitState::Done => write!(f, "done"),
            VisitState::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for VisitState {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VisitState::Pending),
            "done" => Ok(VisitState::Done),
            "cancelled" => Ok(VisitState::Cancelled),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown visit state: {other}"
            ))),
        }
    }
}

/// How the visit came to exist: generated against the monthly quota, or
/// added on top of it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisitKind {
    Scheduled,
    Extra,
}

impl Display for VisitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitKind::Scheduled => write!(f, "scheduled"),
            VisitKind::Extra => write!(f, "extra"),
        }
    }
}

impl FromStr for VisitKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(VisitKind::Scheduled),
            "extra" => Ok(VisitKind::Extra),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown visit kind: {other}"
            ))),
        }
    }
}

/// A single service occurrence, contracted or ad-hoc.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id: VisitId,
    /// Human-readable reference assigned by the repository, e.g. `VIS-00042`.
    pub reference: String,
    /// Absent for visits to non-contracted clients.
    pub contract_id: Option<ContractId>,
    /// Set for non-contracted visits; contracted visits reach the client
    /// through their contract.
    pub client_id: Option<ClientId>,
    pub folder_id: Option<FolderId>,
    pub scheduled_month: VisitMonth,
    /// Position of the visit within its month, starting at 1.
    pub sequence: i32,
    pub state: VisitState,
    pub kind: VisitKind,
    pub visit_date: NaiveDate,
    pub engineer: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to persist a new visit. State is always Pending on
/// creation; the reference is assigned by the repository.
#[derive(Clone, Debug, Deserialize)]
pub struct NewVisit {
    pub contract_id: Option<ContractId>,
    pub client_id: Option<ClientId>,
    pub folder_id: Option<FolderId>,
    pub scheduled_month: VisitMonth,
    pub sequence: i32,
    pub kind: VisitKind,
    pub visit_date: NaiveDate,
    pub engineer: Option<String>,
    pub reason: Option<String>,
}

/// Engineer-editable fields of an existing visit.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateVisit {
    pub engineer: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_state_round_trips() {
        for state in [VisitState::Pending, VisitState::Done, VisitState::Cancelled] {
            assert_eq!(state.to_string().parse::<VisitState>().unwrap(), state);
        }
        assert!("archived".parse::<VisitState>().is_err());
    }

    #[test]
    fn visit_kind_round_trips() {
        for kind in [VisitKind::Scheduled, VisitKind::Extra] {
            assert_eq!(kind.to_string().parse::<VisitKind>().unwrap(), kind);
        }
    }
}
