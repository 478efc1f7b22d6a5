//! DTOs exposed by the folder browsing endpoints.

use serde::Serialize;

use crate::domain::folder::Folder;
use crate::domain::visit::Visit;
use crate::services::folder::FolderDetail;

/// A folder with its children and the visits filed in it.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub folder: Folder,
    pub subfolders: Vec<Folder>,
    pub visits: Vec<Visit>,
}

impl From<FolderDetail> for FolderResponse {
    fn from(detail: FolderDetail) -> Self {
        Self {
            folder: detail.folder,
            subfolders: detail.subfolders,
            visits: detail.visits,
        }
    }
}
