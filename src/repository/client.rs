use diesel::prelude::*;

use crate::domain::client::{Client, NewClient};
use crate::domain::types::ClientId;
use crate::models::client::{Client as DbClient, NewClient as DbNewClient};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientReader, ClientWriter, DieselRepository, Pagination};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        match db_client {
            Some(db_client) => Ok(Some(
                Client::try_from(db_client).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_clients(
        &self,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let total = clients::table.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = clients::table
            .order(clients::id.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let clients = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(|client| Client::try_from(client).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let db_new_client: DbNewClient = new_client.into();
        let db_client = diesel::insert_into(clients::table)
            .values(&db_new_client)
            .get_result::<DbClient>(&mut conn)?;

        Client::try_from(db_client).map_err(RepositoryError::from)
    }
}
