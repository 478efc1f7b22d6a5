use diesel::prelude::*;

use crate::domain::folder::{Folder as DomainFolder, NewFolder as DomainNewFolder};
use crate::domain::types::{FolderId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::folders)]
/// Diesel model for [`crate::domain::folder::Folder`].
pub struct Folder {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::folders)]
pub struct NewFolder<'a> {
    pub name: &'a str,
    pub parent_id: Option<i32>,
}

impl TryFrom<Folder> for DomainFolder {
    type Error = TypeConstraintError;

    fn try_from(folder: Folder) -> Result<Self, Self::Error> {
        Ok(Self {
            id: FolderId::new(folder.id)?,
            name: folder.name,
            parent_id: folder.parent_id.map(FolderId::new).transpose()?,
        })
    }
}

impl<'a> From<&'a DomainNewFolder> for NewFolder<'a> {
    fn from(folder: &'a DomainNewFolder) -> Self {
        Self {
            name: &folder.name,
            parent_id: folder.parent_id.map(FolderId::get),
        }
    }
}
