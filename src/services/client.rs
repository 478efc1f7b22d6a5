//! Client registry use-cases.

use crate::domain::client::{Client, NewClient};
use crate::domain::types::ClientId;
use crate::repository::{ClientReader, ClientWriter, Pagination};
use crate::services::{ServiceError, ServiceResult};

pub fn get_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_clients<R>(
    repo: &R,
    pagination: Option<Pagination>,
) -> ServiceResult<(usize, Vec<Client>)>
where
    R: ClientReader + ?Sized,
{
    repo.list_clients(pagination).map_err(Into::into)
}

pub fn create_client<R>(repo: &R, new_client: NewClient) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    repo.create_client(&new_client).map_err(Into::into)
}
