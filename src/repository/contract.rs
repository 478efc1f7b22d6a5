//! Repository implementation for visit contracts.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::contract::{Contract, ContractState, NewContract};
use crate::domain::types::{ContractId, FolderId};
use crate::models::contract::{Contract as DbContract, NewContract as DbNewContract};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContractListQuery, ContractReader, ContractWriter, DieselRepository};

impl ContractReader for DieselRepository {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;
        let db_contract = contracts::table
            .find(id.get())
            .first::<DbContract>(&mut conn)
            .optional()?;

        match db_contract {
            Some(db_contract) => Ok(Some(
                Contract::try_from(db_contract).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_contracts(&self, query: ContractListQuery) -> RepositoryResult<(usize, Vec<Contract>)> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = contracts::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(state) = &query.state {
                items = items.filter(contracts::state.eq(state.to_string()));
            }
            if let Some(client_id) = &query.client_id {
                items = items.filter(contracts::client_id.eq(client_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let contracts = items
            .order(contracts::id.asc())
            .load::<DbContract>(&mut conn)?
            .into_iter()
            .map(|contract| Contract::try_from(contract).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, contracts))
    }
}

impl ContractWriter for DieselRepository {
    fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let db_new_contract: DbNewContract = new_contract.into();
        let db_contract = diesel::insert_into(contracts::table)
            .values(&db_new_contract)
            .get_result::<DbContract>(&mut conn)?;

        Contract::try_from(db_contract).map_err(RepositoryError::from)
    }

    fn set_contract_state(
        &self,
        id: ContractId,
        state: ContractState,
    ) -> RepositoryResult<Contract> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let db_contract = diesel::update(contracts::table.find(id.get()))
            .set((
                contracts::state.eq(state.to_string()),
                contracts::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbContract>(&mut conn)?;

        Contract::try_from(db_contract).map_err(RepositoryError::from)
    }

    fn set_contract_folder(
        &self,
        id: ContractId,
        folder_id: FolderId,
    ) -> RepositoryResult<Contract> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let db_contract = diesel::update(contracts::table.find(id.get()))
            .set((
                contracts::folder_id.eq(folder_id.get()),
                contracts::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbContract>(&mut conn)?;

        Contract::try_from(db_contract).map_err(RepositoryError::from)
    }

    fn close_expired_contracts(&self, as_of: NaiveDate) -> RepositoryResult<Vec<Contract>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let closed = diesel::update(
            contracts::table
                .filter(contracts::state.eq(ContractState::InProgress.to_string()))
                .filter(contracts::end_date.lt(as_of)),
        )
        .set((
            contracts::state.eq(ContractState::Closed.to_string()),
            contracts::updated_at.eq(diesel::dsl::now),
        ))
        .get_results::<DbContract>(&mut conn)?;

        closed
            .into_iter()
            .map(|contract| Contract::try_from(contract).map_err(RepositoryError::from))
            .collect()
    }
}
