use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::client::NewClient;
use crate::domain::types::ClientId;
use crate::dto::client::ClientsResponse;
use crate::forms::client::AddClientForm;
use crate::repository::{DieselRepository, Pagination};
use crate::routes::{DEFAULT_ITEMS_PER_PAGE, validate_form};
use crate::services::ServiceError;
use crate::services::client as client_service;

#[derive(Deserialize)]
pub struct ClientsQueryParams {
    page: Option<usize>,
}

#[post("/clients")]
pub async fn add_client(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddClientForm>,
) -> Result<HttpResponse, ServiceError> {
    validate_form(&form)?;
    let new_client = NewClient::try_from(&form)?;
    let client = client_service::create_client(repo.get_ref(), new_client)?;
    Ok(HttpResponse::Created().json(client))
}

#[get("/clients")]
pub async fn list_clients(
    repo: web::Data<DieselRepository>,
    params: web::Query<ClientsQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let pagination = Pagination {
        page: params.page.unwrap_or(1),
        per_page: DEFAULT_ITEMS_PER_PAGE,
    };
    let (total, clients) = client_service::list_clients(repo.get_ref(), Some(pagination))?;
    Ok(HttpResponse::Ok().json(ClientsResponse { total, clients }))
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    repo: web::Data<DieselRepository>,
    client_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let client_id = ClientId::new(client_id.into_inner())?;
    let client = client_service::get_client(repo.get_ref(), client_id)?;
    Ok(HttpResponse::Ok().json(client))
}
