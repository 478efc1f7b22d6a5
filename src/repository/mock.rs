//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDate;
use mockall::mock;

use crate::domain::client::{Client, NewClient};
use crate::domain::contract::{Contract, ContractState, NewContract};
use crate::domain::folder::{Folder, NewFolder};
use crate::domain::types::{ClientId, ContractId, FolderId, VisitId, VisitMonth};
use crate::domain::visit::{NewVisit, UpdateVisit, Visit, VisitState};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientReader, ClientWriter, ContractListQuery, ContractReader, ContractWriter, FolderReader,
    FolderWriter, Pagination, VisitListQuery, VisitReader, VisitWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(
            &self,
            pagination: Option<Pagination>,
        ) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    }

    impl ContractReader for Repository {
        fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>>;
        fn list_contracts(
            &self,
            query: ContractListQuery,
        ) -> RepositoryResult<(usize, Vec<Contract>)>;
    }

    impl ContractWriter for Repository {
        fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract>;
        fn set_contract_state(
            &self,
            id: ContractId,
            state: ContractState,
        ) -> RepositoryResult<Contract>;
        fn set_contract_folder(
            &self,
            id: ContractId,
            folder_id: FolderId,
        ) -> RepositoryResult<Contract>;
        fn close_expired_contracts(&self, as_of: NaiveDate) -> RepositoryResult<Vec<Contract>>;
    }

    impl VisitReader for Repository {
        fn get_visit_by_id(&self, id: VisitId) -> RepositoryResult<Option<Visit>>;
        fn list_visits(&self, query: VisitListQuery) -> RepositoryResult<(usize, Vec<Visit>)>;
    }

    impl VisitWriter for Repository {
        fn create_visits(&self, new_visits: &[NewVisit]) -> RepositoryResult<Vec<Visit>>;
        fn set_visit_state(&self, id: VisitId, state: VisitState) -> RepositoryResult<Visit>;
        fn update_visit(&self, id: VisitId, updates: &UpdateVisit) -> RepositoryResult<Visit>;
    }

    impl FolderReader for Repository {
        fn get_folder_by_id(&self, id: FolderId) -> RepositoryResult<Option<Folder>>;
        fn list_folders(&self, parent_id: Option<FolderId>) -> RepositoryResult<Vec<Folder>>;
        fn find_month_folder(
            &self,
            parent_id: FolderId,
            month: VisitMonth,
        ) -> RepositoryResult<Option<Folder>>;
        fn find_root_folder(&self, name: &str) -> RepositoryResult<Option<Folder>>;
    }

    impl FolderWriter for Repository {
        fn create_folder(&self, new_folder: &NewFolder) -> RepositoryResult<Folder>;
    }
}
