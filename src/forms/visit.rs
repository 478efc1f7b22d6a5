use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{TypeConstraintError, VisitNote};
use crate::domain::visit::UpdateVisit;

#[derive(Deserialize, Validate)]
/// Form data for recording a visit to a company without a contract.
pub struct NotContractedVisitForm {
    pub client_id: i32,
    /// Defaults to today when omitted.
    pub visit_date: Option<NaiveDate>,
    pub engineer: Option<String>,
    /// Type of problem prompting the visit.
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Deserialize, Validate)]
/// Form data for engineer edits to an existing visit.
pub struct UpdateVisitForm {
    pub engineer: Option<String>,
    pub reason: Option<String>,
    /// Free-text comments; sanitized before persisting.
    pub notes: Option<String>,
}

impl UpdateVisitForm {
    /// Converts the form into persistable updates, sanitizing the notes.
    pub fn to_updates(&self) -> Result<UpdateVisit, TypeConstraintError> {
        let trimmed = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let notes = trimmed(&self.notes)
            .map(VisitNote::new)
            .transpose()?
            .map(VisitNote::into_inner);

        Ok(UpdateVisit {
            engineer: trimmed(&self.engineer),
            reason: trimmed(&self.reason),
            notes,
        })
    }
}
