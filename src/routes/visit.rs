use std::sync::Arc;

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;

use crate::domain::types::{ClientId, VisitId};
use crate::forms::visit::{NotContractedVisitForm, UpdateVisitForm};
use crate::repository::DieselRepository;
use crate::routes::validate_form;
use crate::services::ServiceError;
use crate::services::visit as visit_service;
use crate::zmq::EventPublisher;

#[post("/visits")]
pub async fn add_not_contracted_visit(
    repo: web::Data<DieselRepository>,
    publisher: web::Data<Arc<EventPublisher>>,
    web::Json(form): web::Json<NotContractedVisitForm>,
) -> Result<HttpResponse, ServiceError> {
    validate_form(&form)?;
    let client_id = ClientId::new(form.client_id)?;
    let visit_date = form.visit_date.unwrap_or_else(|| Utc::now().date_naive());

    let visit = visit_service::create_not_contracted_visit(
        repo.get_ref(),
        client_id,
        visit_date,
        form.engineer.clone(),
        Some(form.reason.clone()),
    )?;
    publisher.publish_visits_created(std::slice::from_ref(&visit));

    Ok(HttpResponse::Created().json(visit))
}

#[get("/visits/{visit_id}")]
pub async fn show_visit(
    repo: web::Data<DieselRepository>,
    visit_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let visit_id = VisitId::new(visit_id.into_inner())?;
    let visit = visit_service::get_visit(repo.get_ref(), visit_id)?;
    Ok(HttpResponse::Ok().json(visit))
}

#[post("/visits/{visit_id}")]
pub async fn save_visit(
    repo: web::Data<DieselRepository>,
    visit_id: web::Path<i32>,
    web::Json(form): web::Json<UpdateVisitForm>,
) -> Result<HttpResponse, ServiceError> {
    validate_form(&form)?;
    let visit_id = VisitId::new(visit_id.into_inner())?;
    let updates = form.to_updates()?;

    let visit = visit_service::update_visit_details(repo.get_ref(), visit_id, &updates)?;
    Ok(HttpResponse::Ok().json(visit))
}

#[post("/visits/{visit_id}/done")]
pub async fn mark_visit_done(
    repo: web::Data<DieselRepository>,
    visit_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let visit_id = VisitId::new(visit_id.into_inner())?;
    let visit = visit_service::mark_visit_done(repo.get_ref(), visit_id)?;
    Ok(HttpResponse::Ok().json(visit))
}

#[post("/visits/{visit_id}/cancel")]
pub async fn cancel_visit(
    repo: web::Data<DieselRepository>,
    visit_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let visit_id = VisitId::new(visit_id.into_inner())?;
    let visit = visit_service::cancel_visit(repo.get_ref(), visit_id)?;
    Ok(HttpResponse::Ok().json(visit))
}
