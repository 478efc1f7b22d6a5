//! Repository implementation for visit records.

use diesel::prelude::*;

use crate::domain::types::VisitId;
use crate::domain::visit::{NewVisit, UpdateVisit, Visit, VisitState};
use crate::models::visit::{
    NewVisit as DbNewVisit, UpdateVisit as DbUpdateVisit, Visit as DbVisit,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, VisitListQuery, VisitReader, VisitWriter};

impl VisitReader for DieselRepository {
    fn get_visit_by_id(&self, id: VisitId) -> RepositoryResult<Option<Visit>> {
        use crate::schema::visits;

        let mut conn = self.conn()?;
        let db_visit = visits::table
            .find(id.get())
            .first::<DbVisit>(&mut conn)
            .optional()?;

        match db_visit {
            Some(db_visit) => Ok(Some(
                Visit::try_from(db_visit).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_visits(&self, query: VisitListQuery) -> RepositoryResult<(usize, Vec<Visit>)> {
        use crate::schema::visits;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = visits::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(contract_id) = &query.contract_id {
                items = items.filter(visits::contract_id.eq(contract_id.get()));
            }
            if let Some(client_id) = &query.client_id {
                items = items.filter(visits::client_id.eq(client_id.get()));
            }
            if let Some(folder_id) = &query.folder_id {
                items = items.filter(visits::folder_id.eq(folder_id.get()));
            }
            if let Some(month) = &query.month {
                items = items.filter(visits::scheduled_month.eq(month.to_string()));
            }
            if let Some(kind) = &query.kind {
                items = items.filter(visits::kind.eq(kind.to_string()));
            }
            if !query.include_cancelled {
                items = items.filter(visits::state.ne(VisitState::Cancelled.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let visits = items
            .order((visits::sequence.asc(), visits::id.asc()))
            .load::<DbVisit>(&mut conn)?
            .into_iter()
            .map(|visit| Visit::try_from(visit).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, visits))
    }
}

impl VisitWriter for DieselRepository {
    fn create_visits(&self, new_visits: &[NewVisit]) -> RepositoryResult<Vec<Visit>> {
        use crate::schema::visits;

        let mut conn = self.conn()?;

        let created = conn.transaction::<Vec<DbVisit>, diesel::result::Error, _>(|conn| {
            let mut created = Vec::with_capacity(new_visits.len());
            for new_visit in new_visits {
                let db_new_visit: DbNewVisit = new_visit.into();
                let inserted = diesel::insert_into(visits::table)
                    .values(&db_new_visit)
                    .get_result::<DbVisit>(conn)?;

                // The reference mirrors the row id and is only known after
                // the insert.
                let referenced = diesel::update(visits::table.find(inserted.id))
                    .set(visits::reference.eq(format!("VIS-{:05}", inserted.id)))
                    .get_result::<DbVisit>(conn)?;
                created.push(referenced);
            }
            Ok(created)
        })?;

        created
            .into_iter()
            .map(|visit| Visit::try_from(visit).map_err(RepositoryError::from))
            .collect()
    }

    fn set_visit_state(&self, id: VisitId, state: VisitState) -> RepositoryResult<Visit> {
        use crate::schema::visits;

        let mut conn = self.conn()?;

        let db_visit = diesel::update(visits::table.find(id.get()))
            .set((
                visits::state.eq(state.to_string()),
                visits::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbVisit>(&mut conn)?;

        Visit::try_from(db_visit).map_err(RepositoryError::from)
    }

    fn update_visit(&self, id: VisitId, updates: &UpdateVisit) -> RepositoryResult<Visit> {
        use crate::schema::visits;

        let mut conn = self.conn()?;

        let db_updates: DbUpdateVisit = updates.into();
        let db_visit = diesel::update(visits::table.find(id.get()))
            .set((&db_updates, visits::updated_at.eq(diesel::dsl::now)))
            .get_result::<DbVisit>(&mut conn)?;

        Visit::try_from(db_visit).map_err(RepositoryError::from)
    }
}
