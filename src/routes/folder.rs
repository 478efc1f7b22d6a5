use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::types::FolderId;
use crate::dto::folder::FolderResponse;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::folder as folder_service;

#[derive(Deserialize)]
pub struct FoldersQueryParams {
    /// Lists children of this folder; root folders when omitted.
    parent: Option<i32>,
}

#[get("/folders")]
pub async fn list_folders(
    repo: web::Data<DieselRepository>,
    params: web::Query<FoldersQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let parent_id = params.parent.map(FolderId::new).transpose()?;
    let folders = folder_service::list_folders(repo.get_ref(), parent_id)?;
    Ok(HttpResponse::Ok().json(folders))
}

#[get("/folders/{folder_id}")]
pub async fn show_folder(
    repo: web::Data<DieselRepository>,
    folder_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let folder_id = FolderId::new(folder_id.into_inner())?;
    let detail = folder_service::get_folder_detail(repo.get_ref(), folder_id)?;
    Ok(HttpResponse::Ok().json(FolderResponse::from(detail)))
}
