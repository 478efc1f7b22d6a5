use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientId, ContractId, ContractName, FolderId, TypeConstraintError, VisitMonth, VisitsPerMonth,
};

/// Lifecycle state of a visit contract.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    Draft,
    InProgress,
    Closed,
}

impl Display for ContractState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractState::Draft => write!(f, "draft"),
            ContractState::InProgress => write!(f, "in_progress"),
            ContractState::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for ContractState {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ContractState::Draft),
            "in_progress" => Ok(ContractState::InProgress),
            "closed" => Ok(ContractState::Closed),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown contract state: {other}"
            ))),
        }
    }
}

/// A recurring-visit agreement with a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    pub id: ContractId,
    pub name: ContractName,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub visits_per_month: VisitsPerMonth,
    pub state: ContractState,
    /// Root document folder, set when the contract is activated.
    pub folder_id: Option<FolderId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Contract {
    pub fn start_month(&self) -> VisitMonth {
        VisitMonth::from_date(self.start_date)
    }

    pub fn end_month(&self) -> VisitMonth {
        VisitMonth::from_date(self.end_date)
    }

    /// Whether `month` falls inside the contract period, truncated to whole
    /// months on both ends.
    pub fn contains_month(&self, month: VisitMonth) -> bool {
        self.start_month() <= month && month <= self.end_month()
    }

    /// Number of calendar months the contract spans, counting partial months
    /// at either end as whole ones.
    pub fn months_in_span(&self) -> i32 {
        self.start_month().months_until(self.end_month()) + 1
    }

    /// Total number of scheduled visits over the whole contract. No proration
    /// is applied to partial first or last months.
    pub fn total_visits(&self) -> i64 {
        self.months_in_span() as i64 * self.visits_per_month.get() as i64
    }
}

/// Data required to register a new contract, still in Draft state.
#[derive(Clone, Debug, Deserialize)]
pub struct NewContract {
    pub name: ContractName,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub visits_per_month: VisitsPerMonth,
}

impl NewContract {
    /// Builds a new contract payload, rejecting inverted date ranges.
    pub fn try_new(
        name: ContractName,
        client_id: ClientId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        visits_per_month: VisitsPerMonth,
    ) -> Result<Self, TypeConstraintError> {
        if end_date < start_date {
            return Err(TypeConstraintError::InvalidValue(
                "end date precedes start date".to_string(),
            ));
        }
        Ok(Self {
            name,
            client_id,
            start_date,
            end_date,
            visits_per_month,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contract(start: NaiveDate, end: NaiveDate, quota: i32) -> Contract {
        let now = Utc::now().naive_utc();
        Contract {
            id: ContractId::new(1).unwrap(),
            name: ContractName::new("Maintenance").unwrap(),
            client_id: ClientId::new(1).unwrap(),
            start_date: start,
            end_date: end,
            visits_per_month: VisitsPerMonth::new(quota).unwrap(),
            state: ContractState::InProgress,
            folder_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn span_counts_partial_months_as_whole() {
        let c = contract(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            8,
        );
        assert_eq!(c.months_in_span(), 3);
        assert_eq!(c.total_visits(), 24);
    }

    #[test]
    fn contains_month_truncates_to_whole_months() {
        let c = contract(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            2,
        );
        assert!(c.contains_month("2025-01".parse().unwrap()));
        assert!(c.contains_month("2025-03".parse().unwrap()));
        assert!(!c.contains_month("2024-12".parse().unwrap()));
        assert!(!c.contains_month("2025-04".parse().unwrap()));
    }

    #[test]
    fn new_contract_rejects_inverted_range() {
        let result = NewContract::try_new(
            ContractName::new("Maintenance").unwrap(),
            ClientId::new(1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            VisitsPerMonth::new(1).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn contract_state_round_trips() {
        for state in [
            ContractState::Draft,
            ContractState::InProgress,
            ContractState::Closed,
        ] {
            assert_eq!(state.to_string().parse::<ContractState>().unwrap(), state);
        }
        assert!("cancelled".parse::<ContractState>().is_err());
    }
}
