use diesel::prelude::*;

use crate::domain::folder::{Folder, NewFolder};
use crate::domain::types::{FolderId, VisitMonth};
use crate::models::folder::{Folder as DbFolder, NewFolder as DbNewFolder};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, FolderReader, FolderWriter};

impl FolderReader for DieselRepository {
    fn get_folder_by_id(&self, id: FolderId) -> RepositoryResult<Option<Folder>> {
        use crate::schema::folders;

        let mut conn = self.conn()?;
        let db_folder = folders::table
            .find(id.get())
            .first::<DbFolder>(&mut conn)
            .optional()?;

        match db_folder {
            Some(db_folder) => Ok(Some(
                Folder::try_from(db_folder).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_folders(&self, parent_id: Option<FolderId>) -> RepositoryResult<Vec<Folder>> {
        use crate::schema::folders;

        let mut conn = self.conn()?;

        let mut query = folders::table
            .order(folders::name.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();
        query = match parent_id {
            Some(parent_id) => query.filter(folders::parent_id.eq(parent_id.get())),
            None => query.filter(folders::parent_id.is_null()),
        };

        query
            .load::<DbFolder>(&mut conn)?
            .into_iter()
            .map(|folder| Folder::try_from(folder).map_err(RepositoryError::from))
            .collect()
    }

    fn find_month_folder(
        &self,
        parent_id: FolderId,
        month: VisitMonth,
    ) -> RepositoryResult<Option<Folder>> {
        use crate::schema::folders;

        let mut conn = self.conn()?;

        // Month folders are named `YYYY-MM (MonthName)`.
        let pattern = format!("{month}%");
        let db_folder = folders::table
            .filter(folders::parent_id.eq(parent_id.get()))
            .filter(folders::name.like(pattern))
            .first::<DbFolder>(&mut conn)
            .optional()?;

        match db_folder {
            Some(db_folder) => Ok(Some(
                Folder::try_from(db_folder).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn find_root_folder(&self, name: &str) -> RepositoryResult<Option<Folder>> {
        use crate::schema::folders;

        let mut conn = self.conn()?;

        let db_folder = folders::table
            .filter(folders::parent_id.is_null())
            .filter(folders::name.eq(name))
            .first::<DbFolder>(&mut conn)
            .optional()?;

        match db_folder {
            Some(db_folder) => Ok(Some(
                Folder::try_from(db_folder).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }
}

impl FolderWriter for DieselRepository {
    fn create_folder(&self, new_folder: &NewFolder) -> RepositoryResult<Folder> {
        use crate::schema::folders;

        let mut conn = self.conn()?;

        let db_new_folder: DbNewFolder = new_folder.into();
        let db_folder = diesel::insert_into(folders::table)
            .values(&db_new_folder)
            .get_result::<DbFolder>(&mut conn)?;

        Folder::try_from(db_folder).map_err(RepositoryError::from)
    }
}
