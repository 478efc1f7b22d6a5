//! Visit-level use-cases: state changes, engineer edits, ad-hoc visits.

use chrono::NaiveDate;

use crate::domain::folder::{Folder, NewFolder};
use crate::domain::types::{ClientId, FolderId, VisitId, VisitMonth};
use crate::domain::visit::{NewVisit, UpdateVisit, Visit, VisitKind, VisitState};
use crate::repository::{
    ClientReader, FolderReader, FolderWriter, VisitListQuery, VisitReader, VisitWriter,
};
use crate::services::{ServiceError, ServiceResult};

/// Root folder collecting visits to companies without a contract.
pub const NOT_CONTRACTED_ROOT: &str = "Not Contracted Visits";

pub fn get_visit<R>(repo: &R, visit_id: VisitId) -> ServiceResult<Visit>
where
    R: VisitReader + ?Sized,
{
    repo.get_visit_by_id(visit_id)?.ok_or(ServiceError::NotFound)
}

pub fn list_visits<R>(repo: &R, query: VisitListQuery) -> ServiceResult<(usize, Vec<Visit>)>
where
    R: VisitReader + ?Sized,
{
    repo.list_visits(query).map_err(Into::into)
}

/// Marks a visit done, typically on signature completion. Idempotent: a
/// visit that is already done is returned unchanged so the consumer can
/// replay notifications safely.
pub fn mark_visit_done<R>(repo: &R, visit_id: VisitId) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let visit = repo
        .get_visit_by_id(visit_id)?
        .ok_or(ServiceError::NotFound)?;
    if visit.state == VisitState::Done {
        return Ok(visit);
    }
    repo.set_visit_state(visit.id, VisitState::Done)
        .map_err(Into::into)
}

/// Cancels a visit. Visits are never hard-deleted; a cancelled visit keeps
/// its row but releases its sequence slot for future generation.
pub fn cancel_visit<R>(repo: &R, visit_id: VisitId) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let visit = repo
        .get_visit_by_id(visit_id)?
        .ok_or(ServiceError::NotFound)?;
    if visit.state == VisitState::Cancelled {
        return Ok(visit);
    }
    repo.set_visit_state(visit.id, VisitState::Cancelled)
        .map_err(Into::into)
}

/// Applies engineer edits to a visit.
pub fn update_visit_details<R>(
    repo: &R,
    visit_id: VisitId,
    updates: &UpdateVisit,
) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    if repo.get_visit_by_id(visit_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }
    repo.update_visit(visit_id, updates).map_err(Into::into)
}

/// Records an ad-hoc visit to a company without a contract, filed under the
/// shared non-contracted folder tree (created lazily).
pub fn create_not_contracted_visit<R>(
    repo: &R,
    client_id: ClientId,
    visit_date: NaiveDate,
    engineer: Option<String>,
    reason: Option<String>,
) -> ServiceResult<Visit>
where
    R: ClientReader + FolderReader + FolderWriter + VisitReader + VisitWriter + ?Sized,
{
    if repo.get_client_by_id(client_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let month = VisitMonth::from_date(visit_date);
    let folder = not_contracted_month_folder(repo, month)?;

    let (_, existing) = repo.list_visits(VisitListQuery::new().client(client_id).month(month))?;
    let next_sequence = existing.iter().map(|v| v.sequence).max().unwrap_or(0) + 1;

    let new_visit = NewVisit {
        contract_id: None,
        client_id: Some(client_id),
        folder_id: Some(folder.id),
        scheduled_month: month,
        sequence: next_sequence,
        kind: VisitKind::Extra,
        visit_date,
        engineer,
        reason,
    };

    let mut created = repo.create_visits(std::slice::from_ref(&new_visit))?;
    created.pop().ok_or(ServiceError::Repository(
        crate::repository::errors::RepositoryError::Unexpected(
            "insert returned no visit".to_string(),
        ),
    ))
}

/// Finds or creates the month folder under the shared non-contracted root.
fn not_contracted_month_folder<R>(repo: &R, month: VisitMonth) -> ServiceResult<Folder>
where
    R: FolderReader + FolderWriter + ?Sized,
{
    let root = match repo.find_root_folder(NOT_CONTRACTED_ROOT)? {
        Some(root) => root,
        None => repo.create_folder(&NewFolder {
            name: NOT_CONTRACTED_ROOT.to_string(),
            parent_id: None,
        })?,
    };

    month_folder_under(repo, root.id, month)
}

fn month_folder_under<R>(repo: &R, parent_id: FolderId, month: VisitMonth) -> ServiceResult<Folder>
where
    R: FolderReader + FolderWriter + ?Sized,
{
    match repo.find_month_folder(parent_id, month)? {
        Some(folder) => Ok(folder),
        None => repo
            .create_folder(&NewFolder {
                name: month.folder_name(),
                parent_id: Some(parent_id),
            })
            .map_err(Into::into),
    }
}
