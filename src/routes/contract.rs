use std::sync::Arc;

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use serde::Deserialize;

use crate::domain::contract::{ContractState, NewContract};
use crate::domain::types::{ContractId, VisitMonth};
use crate::domain::visit::VisitKind;
use crate::dto::contract::{ContractResponse, ContractsResponse, GeneratedVisitsResponse};
use crate::dto::visit::VisitsResponse;
use crate::forms::contract::{ExtraVisitForm, NewContractForm};
use crate::repository::{ContractListQuery, DieselRepository, VisitListQuery};
use crate::routes::{DEFAULT_ITEMS_PER_PAGE, validate_form};
use crate::services::ServiceError;
use crate::services::contract as contract_service;
use crate::services::visit as visit_service;
use crate::zmq::EventPublisher;

#[derive(Deserialize)]
pub struct ContractsQueryParams {
    state: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
pub struct ContractVisitsQueryParams {
    month: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    include_cancelled: bool,
    page: Option<usize>,
}

#[post("/contracts")]
pub async fn add_contract(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<NewContractForm>,
) -> Result<HttpResponse, ServiceError> {
    validate_form(&form)?;
    let new_contract = NewContract::try_from(&form)?;
    let contract = contract_service::create_contract(repo.get_ref(), new_contract)?;
    Ok(HttpResponse::Created().json(contract))
}

#[get("/contracts")]
pub async fn list_contracts(
    repo: web::Data<DieselRepository>,
    params: web::Query<ContractsQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let mut query =
        ContractListQuery::new().paginate(params.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);
    if let Some(state) = &params.state {
        let state: ContractState = state.parse()?;
        query = query.state(state);
    }

    let (total, contracts) = contract_service::list_contracts(repo.get_ref(), query)?;
    Ok(HttpResponse::Ok().json(ContractsResponse { total, contracts }))
}

#[get("/contracts/{contract_id}")]
pub async fn show_contract(
    repo: web::Data<DieselRepository>,
    contract_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let contract_id = ContractId::new(contract_id.into_inner())?;
    let detail = contract_service::get_contract_detail(repo.get_ref(), contract_id)?;
    Ok(HttpResponse::Ok().json(ContractResponse::from(detail)))
}

#[get("/contracts/{contract_id}/visits")]
pub async fn list_contract_visits(
    repo: web::Data<DieselRepository>,
    contract_id: web::Path<i32>,
    params: web::Query<ContractVisitsQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let contract_id = ContractId::new(contract_id.into_inner())?;

    let mut query = VisitListQuery::new()
        .contract(contract_id)
        .paginate(params.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);
    if let Some(month) = &params.month {
        let month: VisitMonth = month.parse()?;
        query = query.month(month);
    }
    if let Some(kind) = &params.kind {
        let kind: VisitKind = kind.parse()?;
        query = query.kind(kind);
    }
    if params.include_cancelled {
        query = query.include_cancelled();
    }

    let (total, visits) = visit_service::list_visits(repo.get_ref(), query)?;
    Ok(HttpResponse::Ok().json(VisitsResponse { total, visits }))
}

#[post("/contracts/{contract_id}/activate")]
pub async fn activate_contract(
    repo: web::Data<DieselRepository>,
    publisher: web::Data<Arc<EventPublisher>>,
    contract_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let contract_id = ContractId::new(contract_id.into_inner())?;
    let today = Utc::now().date_naive();

    let (contract, created) =
        contract_service::activate_contract(repo.get_ref(), contract_id, today)?;
    publisher.publish_visits_created(&created);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "contract": contract,
        "created": created.len(),
    })))
}

#[post("/contracts/{contract_id}/generate")]
pub async fn generate_contract_visits(
    repo: web::Data<DieselRepository>,
    publisher: web::Data<Arc<EventPublisher>>,
    contract_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let contract_id = ContractId::new(contract_id.into_inner())?;
    let today = Utc::now().date_naive();

    let created = contract_service::generate_current_month(repo.get_ref(), contract_id, today)?;
    publisher.publish_visits_created(&created);

    Ok(HttpResponse::Ok().json(GeneratedVisitsResponse::from(created)))
}

#[post("/contracts/{contract_id}/extra")]
pub async fn add_extra_visits(
    repo: web::Data<DieselRepository>,
    publisher: web::Data<Arc<EventPublisher>>,
    contract_id: web::Path<i32>,
    web::Json(form): web::Json<ExtraVisitForm>,
) -> Result<HttpResponse, ServiceError> {
    validate_form(&form)?;
    let contract_id = ContractId::new(contract_id.into_inner())?;
    let month: VisitMonth = form.month.parse()?;
    let today = Utc::now().date_naive();

    let created = crate::services::generator::add_extra_for_contract(
        repo.get_ref(),
        contract_id,
        month,
        form.count,
        &form.reason,
        today,
    )?;
    publisher.publish_visits_created(&created);

    Ok(HttpResponse::Created().json(GeneratedVisitsResponse::from(created)))
}

#[post("/contracts/{contract_id}/close")]
pub async fn close_contract(
    repo: web::Data<DieselRepository>,
    contract_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let contract_id = ContractId::new(contract_id.into_inner())?;
    let contract = contract_service::close_contract(repo.get_ref(), contract_id)?;
    Ok(HttpResponse::Ok().json(contract))
}
