//! Wire messages exchanged with the reporting and e-signature collaborators.

use serde::{Deserialize, Serialize};

use crate::domain::visit::Visit;

/// Published once per created visit; the reporting collaborator renders the
/// visit report into the linked month folder.
#[derive(Debug, Deserialize, Serialize)]
pub struct VisitCreatedMessage {
    pub visit_id: i32,
    pub reference: String,
    pub contract_id: Option<i32>,
    pub folder_id: Option<i32>,
    pub scheduled_month: String,
    pub sequence: i32,
    pub kind: String,
}

impl From<&Visit> for VisitCreatedMessage {
    fn from(visit: &Visit) -> Self {
        Self {
            visit_id: visit.id.get(),
            reference: visit.reference.clone(),
            contract_id: visit.contract_id.map(Into::into),
            folder_id: visit.folder_id.map(Into::into),
            scheduled_month: visit.scheduled_month.to_string(),
            sequence: visit.sequence,
            kind: visit.kind.to_string(),
        }
    }
}

/// Received when the e-signature collaborator completes a request; the
/// linked visit is then marked done.
#[derive(Debug, Deserialize, Serialize)]
pub struct SignCompletedMessage {
    pub visit_id: i32,
}
