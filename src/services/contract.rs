//! Contract lifecycle use-cases.

use chrono::NaiveDate;

use crate::domain::contract::{Contract, ContractState, NewContract};
use crate::domain::folder::NewFolder;
use crate::domain::types::{ContractId, VisitMonth};
use crate::domain::visit::Visit;
use crate::repository::{
    ClientReader, ContractListQuery, ContractReader, ContractWriter, FolderReader, FolderWriter,
    VisitListQuery, VisitReader, VisitWriter,
};
use crate::services::generator;
use crate::services::{ServiceError, ServiceResult};

/// A contract together with its generation progress.
#[derive(Debug, Clone)]
pub struct ContractDetail {
    pub contract: Contract,
    /// Visits generated so far, cancelled ones included.
    pub visits_count: usize,
    /// Expected total over the whole period.
    pub total_visits: i64,
}

/// Registers a new contract in Draft state.
pub fn create_contract<R>(repo: &R, new_contract: NewContract) -> ServiceResult<Contract>
where
    R: ClientReader + ContractWriter + ?Sized,
{
    if repo.get_client_by_id(new_contract.client_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }
    repo.create_contract(&new_contract).map_err(Into::into)
}

/// Activates a Draft contract: builds the folder tree (root folder named
/// after the client, one child per calendar month of the period), flips the
/// state to InProgress and generates the current month's visits when today
/// falls inside the period.
pub fn activate_contract<R>(
    repo: &R,
    contract_id: ContractId,
    today: NaiveDate,
) -> ServiceResult<(Contract, Vec<Visit>)>
where
    R: ClientReader
        + ContractReader
        + ContractWriter
        + FolderReader
        + FolderWriter
        + VisitReader
        + VisitWriter
        + ?Sized,
{
    let contract = repo
        .get_contract_by_id(contract_id)?
        .ok_or(ServiceError::NotFound)?;
    if contract.state != ContractState::Draft {
        return Err(ServiceError::InvalidState);
    }

    let client = repo
        .get_client_by_id(contract.client_id)?
        .ok_or(ServiceError::NotFound)?;

    let root = repo.create_folder(&NewFolder {
        name: client.name.as_str().to_string(),
        parent_id: None,
    })?;

    let mut month = contract.start_month();
    let end = contract.end_month();
    while month <= end {
        repo.create_folder(&NewFolder {
            name: month.folder_name(),
            parent_id: Some(root.id),
        })?;
        month = month.succ();
    }

    repo.set_contract_folder(contract.id, root.id)?;
    let contract = repo.set_contract_state(contract.id, ContractState::InProgress)?;

    let created =
        generator::generate_monthly_visits(repo, &contract, VisitMonth::from_date(today), today)?;
    Ok((contract, created))
}

/// Manual "generate current month" action on a contract record.
pub fn generate_current_month<R>(
    repo: &R,
    contract_id: ContractId,
    today: NaiveDate,
) -> ServiceResult<Vec<Visit>>
where
    R: ContractReader + VisitReader + VisitWriter + FolderReader + ?Sized,
{
    let contract = repo
        .get_contract_by_id(contract_id)?
        .ok_or(ServiceError::NotFound)?;

    generator::generate_monthly_visits(repo, &contract, VisitMonth::from_date(today), today)
}

/// Manually closes a contract.
pub fn close_contract<R>(repo: &R, contract_id: ContractId) -> ServiceResult<Contract>
where
    R: ContractReader + ContractWriter + ?Sized,
{
    let contract = repo
        .get_contract_by_id(contract_id)?
        .ok_or(ServiceError::NotFound)?;
    if contract.state == ContractState::Closed {
        return Err(ServiceError::InvalidState);
    }
    repo.set_contract_state(contract.id, ContractState::Closed)
        .map_err(Into::into)
}

/// Closes every in-progress contract whose end date has passed.
pub fn close_expired_contracts<R>(repo: &R, as_of: NaiveDate) -> ServiceResult<Vec<Contract>>
where
    R: ContractWriter + ?Sized,
{
    repo.close_expired_contracts(as_of).map_err(Into::into)
}

/// Fetches a contract with its generation counters.
pub fn get_contract_detail<R>(repo: &R, contract_id: ContractId) -> ServiceResult<ContractDetail>
where
    R: ContractReader + VisitReader + ?Sized,
{
    let contract = repo
        .get_contract_by_id(contract_id)?
        .ok_or(ServiceError::NotFound)?;

    let (visits_count, _) = repo.list_visits(
        VisitListQuery::new()
            .contract(contract.id)
            .include_cancelled()
            .paginate(1, 1),
    )?;

    let total_visits = contract.total_visits();
    Ok(ContractDetail {
        contract,
        visits_count,
        total_visits,
    })
}

/// Lists contracts with optional state filter and pagination.
pub fn list_contracts<R>(
    repo: &R,
    query: ContractListQuery,
) -> ServiceResult<(usize, Vec<Contract>)>
where
    R: ContractReader + ?Sized,
{
    repo.list_contracts(query).map_err(Into::into)
}

/// Contracts the daily trigger should generate visits for.
pub fn list_active_contracts<R>(repo: &R) -> ServiceResult<Vec<Contract>>
where
    R: ContractReader + ?Sized,
{
    let (_, contracts) =
        repo.list_contracts(ContractListQuery::new().state(ContractState::InProgress))?;
    Ok(contracts)
}
