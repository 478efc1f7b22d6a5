use serde::{Deserialize, Serialize};

use crate::domain::types::FolderId;

/// A node in the two-level document folder tree: contract root folders at
/// the top, one child folder per calendar month below.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub parent_id: Option<FolderId>,
}

impl Folder {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewFolder {
    pub name: String,
    pub parent_id: Option<FolderId>,
}
