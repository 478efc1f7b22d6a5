use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::contract::NewContract;
use crate::domain::types::{ClientId, ContractName, TypeConstraintError, VisitsPerMonth};

#[derive(Deserialize, Validate)]
/// Form data for registering a new contract.
pub struct NewContractForm {
    /// Contract display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Client the contract belongs to.
    pub client_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Monthly visit quota.
    #[validate(range(min = 1))]
    pub visits_per_month: i32,
}

impl TryFrom<&NewContractForm> for NewContract {
    type Error = TypeConstraintError;

    fn try_from(form: &NewContractForm) -> Result<Self, Self::Error> {
        NewContract::try_new(
            ContractName::new(form.name.as_str())?,
            ClientId::new(form.client_id)?,
            form.start_date,
            form.end_date,
            VisitsPerMonth::new(form.visits_per_month)?,
        )
    }
}

#[derive(Deserialize, Validate)]
/// Form data for the extra-visit wizard.
pub struct ExtraVisitForm {
    /// Target month in `YYYY-MM` form.
    pub month: String,
    /// Number of extra visits to add.
    #[validate(range(min = 1))]
    pub count: i32,
    /// Why the extra visits are needed.
    #[validate(length(min = 1))]
    pub reason: String,
}
