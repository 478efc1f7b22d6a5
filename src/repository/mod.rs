use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool};
use crate::domain::client::{Client, NewClient};
use crate::domain::contract::{Contract, ContractState, NewContract};
use crate::domain::folder::{Folder, NewFolder};
use crate::domain::types::{ClientId, ContractId, FolderId, VisitId, VisitMonth};
use crate::domain::visit::{NewVisit, UpdateVisit, Visit, VisitKind, VisitState};
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod contract;
pub mod errors;
pub mod folder;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod visit;

/// Shared Diesel-backed repository handed to services and routes.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ContractListQuery {
    pub state: Option<ContractState>,
    pub client_id: Option<ClientId>,
    pub pagination: Option<Pagination>,
}

impl ContractListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: ContractState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisitListQuery {
    pub contract_id: Option<ContractId>,
    pub client_id: Option<ClientId>,
    pub folder_id: Option<FolderId>,
    pub month: Option<VisitMonth>,
    pub kind: Option<VisitKind>,
    /// Cancelled visits are excluded unless explicitly requested; they no
    /// longer count toward the monthly quota.
    pub include_cancelled: bool,
    pub pagination: Option<Pagination>,
}

impl VisitListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract(mut self, contract_id: ContractId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn folder(mut self, folder_id: FolderId) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    pub fn month(mut self, month: VisitMonth) -> Self {
        self.month = Some(month);
        self
    }

    pub fn kind(mut self, kind: VisitKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn include_cancelled(mut self) -> Self {
        self.include_cancelled = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, pagination: Option<Pagination>)
    -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
}

pub trait ContractReader {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>>;
    fn list_contracts(&self, query: ContractListQuery) -> RepositoryResult<(usize, Vec<Contract>)>;
}

pub trait ContractWriter {
    fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract>;
    fn set_contract_state(&self, id: ContractId, state: ContractState)
    -> RepositoryResult<Contract>;
    fn set_contract_folder(&self, id: ContractId, folder_id: FolderId)
    -> RepositoryResult<Contract>;
    /// Closes every in-progress contract whose end date precedes `as_of`,
    /// returning the contracts that were transitioned.
    fn close_expired_contracts(&self, as_of: NaiveDate) -> RepositoryResult<Vec<Contract>>;
}

pub trait VisitReader {
    fn get_visit_by_id(&self, id: VisitId) -> RepositoryResult<Option<Visit>>;
    fn list_visits(&self, query: VisitListQuery) -> RepositoryResult<(usize, Vec<Visit>)>;
}

pub trait VisitWriter {
    /// Persists the batch inside one transaction, assigning references.
    fn create_visits(&self, new_visits: &[NewVisit]) -> RepositoryResult<Vec<Visit>>;
    fn set_visit_state(&self, id: VisitId, state: VisitState) -> RepositoryResult<Visit>;
    fn update_visit(&self, id: VisitId, updates: &UpdateVisit) -> RepositoryResult<Visit>;
}

pub trait FolderReader {
    fn get_folder_by_id(&self, id: FolderId) -> RepositoryResult<Option<Folder>>;
    /// Lists children of `parent_id`, or root folders when `None`.
    fn list_folders(&self, parent_id: Option<FolderId>) -> RepositoryResult<Vec<Folder>>;
    /// Finds the month folder under `parent_id` whose name starts with the
    /// `YYYY-MM` prefix of `month`.
    fn find_month_folder(
        &self,
        parent_id: FolderId,
        month: VisitMonth,
    ) -> RepositoryResult<Option<Folder>>;
    /// Finds a root folder by exact name.
    fn find_root_folder(&self, name: &str) -> RepositoryResult<Option<Folder>>;
}

pub trait FolderWriter {
    fn create_folder(&self, new_folder: &NewFolder) -> RepositoryResult<Folder>;
}
