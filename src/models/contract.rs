//! Diesel models for visit contracts.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::contract::{Contract as DomainContract, NewContract as DomainNewContract};
use crate::domain::types::{
    ClientId, ContractId, ContractName, FolderId, TypeConstraintError, VisitsPerMonth,
};
use crate::models::client::Client;
use crate::models::folder::Folder;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(belongs_to(Folder, foreign_key = folder_id))]
#[diesel(table_name = crate::schema::contracts)]
pub struct Contract {
    pub id: i32,
    pub name: String,
    pub client_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub visits_per_month: i32,
    pub state: String,
    pub folder_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contracts)]
pub struct NewContract<'a> {
    pub name: &'a str,
    pub client_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub visits_per_month: i32,
    pub state: String,
}

impl TryFrom<Contract> for DomainContract {
    type Error = TypeConstraintError;

    fn try_from(contract: Contract) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContractId::new(contract.id)?,
            name: ContractName::new(contract.name)?,
            client_id: ClientId::new(contract.client_id)?,
            start_date: contract.start_date,
            end_date: contract.end_date,
            visits_per_month: VisitsPerMonth::new(contract.visits_per_month)?,
            state: contract.state.parse()?,
            folder_id: contract.folder_id.map(FolderId::new).transpose()?,
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewContract> for NewContract<'a> {
    fn from(contract: &'a DomainNewContract) -> Self {
        use crate::domain::contract::ContractState;

        Self {
            name: contract.name.as_str(),
            client_id: contract.client_id.get(),
            start_date: contract.start_date,
            end_date: contract.end_date,
            visits_per_month: contract.visits_per_month.get(),
            state: ContractState::Draft.to_string(),
        }
    }
}
