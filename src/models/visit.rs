//! Diesel models for visit records.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::types::{ClientId, ContractId, FolderId, TypeConstraintError, VisitId};
use crate::domain::visit::{
    NewVisit as DomainNewVisit, UpdateVisit as DomainUpdateVisit, Visit as DomainVisit,
};
use crate::models::contract::Contract;
use crate::models::folder::Folder;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Contract, foreign_key = contract_id))]
#[diesel(belongs_to(Folder, foreign_key = folder_id))]
#[diesel(table_name = crate::schema::visits)]
pub struct Visit {
    pub id: i32,
    pub reference: String,
    pub contract_id: Option<i32>,
    pub client_id: Option<i32>,
    pub folder_id: Option<i32>,
    pub scheduled_month: String,
    pub sequence: i32,
    pub state: String,
    pub kind: String,
    pub visit_date: NaiveDate,
    pub engineer: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::visits)]
pub struct NewVisit {
    pub contract_id: Option<i32>,
    pub client_id: Option<i32>,
    pub folder_id: Option<i32>,
    pub scheduled_month: String,
    pub sequence: i32,
    pub state: String,
    pub kind: String,
    pub visit_date: NaiveDate,
    pub engineer: Option<String>,
    pub reason: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::visits)]
/// Engineer-editable columns of a [`Visit`] record.
pub struct UpdateVisit<'a> {
    pub engineer: Option<&'a str>,
    pub reason: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl TryFrom<Visit> for DomainVisit {
    type Error = TypeConstraintError;

    fn try_from(visit: Visit) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VisitId::new(visit.id)?,
            reference: visit.reference,
            contract_id: visit.contract_id.map(ContractId::new).transpose()?,
            client_id: visit.client_id.map(ClientId::new).transpose()?,
            folder_id: visit.folder_id.map(FolderId::new).transpose()?,
            scheduled_month: visit.scheduled_month.parse()?,
            sequence: visit.sequence,
            state: visit.state.parse()?,
            kind: visit.kind.parse()?,
            visit_date: visit.visit_date,
            engineer: visit.engineer,
            reason: visit.reason,
            notes: visit.notes,
            created_at: visit.created_at,
            updated_at: visit.updated_at,
        })
    }
}

impl From<&DomainNewVisit> for NewVisit {
    fn from(visit: &DomainNewVisit) -> Self {
        use crate::domain::visit::VisitState;

        Self {
            contract_id: visit.contract_id.map(ContractId::get),
            client_id: visit.client_id.map(ClientId::get),
            folder_id: visit.folder_id.map(FolderId::get),
            scheduled_month: visit.scheduled_month.to_string(),
            sequence: visit.sequence,
            state: VisitState::Pending.to_string(),
            kind: visit.kind.to_string(),
            visit_date: visit.visit_date,
            engineer: visit.engineer.clone(),
            reason: visit.reason.clone(),
        }
    }
}

impl<'a> From<&'a DomainUpdateVisit> for UpdateVisit<'a> {
    fn from(updates: &'a DomainUpdateVisit) -> Self {
        Self {
            engineer: updates.engineer.as_deref(),
            reason: updates.reason.as_deref(),
            notes: updates.notes.as_deref(),
        }
    }
}
