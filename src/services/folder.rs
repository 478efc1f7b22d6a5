//! Read-side of the folder tree consumed by the browsing UI.

use crate::domain::folder::Folder;
use crate::domain::types::FolderId;
use crate::domain::visit::Visit;
use crate::repository::{FolderReader, VisitListQuery, VisitReader};
use crate::services::{ServiceError, ServiceResult};

/// A folder with its children and the visits filed in it.
#[derive(Debug, Clone)]
pub struct FolderDetail {
    pub folder: Folder,
    pub subfolders: Vec<Folder>,
    pub visits: Vec<Visit>,
}

/// Lists children of `parent_id`, or root folders when `None`.
pub fn list_folders<R>(repo: &R, parent_id: Option<FolderId>) -> ServiceResult<Vec<Folder>>
where
    R: FolderReader + ?Sized,
{
    repo.list_folders(parent_id).map_err(Into::into)
}

pub fn get_folder_detail<R>(repo: &R, folder_id: FolderId) -> ServiceResult<FolderDetail>
where
    R: FolderReader + VisitReader + ?Sized,
{
    let folder = repo
        .get_folder_by_id(folder_id)?
        .ok_or(ServiceError::NotFound)?;
    let subfolders = repo.list_folders(Some(folder.id))?;
    let (_, visits) = repo.list_visits(
        VisitListQuery::new()
            .folder(folder.id)
            .include_cancelled(),
    )?;

    Ok(FolderDetail {
        folder,
        subfolders,
        visits,
    })
}
