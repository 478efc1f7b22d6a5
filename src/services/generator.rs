//! Monthly visit generation.
//!
//! Reconciles the visits persisted for a `(contract, month)` pair against the
//! contract's monthly quota and creates only the missing ones. The deficit
//! check against persisted state is the sole idempotence mechanism: a rerun
//! after a partial failure resumes where the previous attempt stopped.

use chrono::NaiveDate;

use crate::domain::contract::{Contract, ContractState};
use crate::domain::folder::Folder;
use crate::domain::types::{ContractId, VisitMonth};
use crate::domain::visit::{NewVisit, Visit, VisitKind};
use crate::repository::{ContractReader, FolderReader, VisitListQuery, VisitReader, VisitWriter};
use crate::services::{ServiceError, ServiceResult};

/// Brings the target month of an in-progress contract up to its quota.
///
/// Months outside the contract period are a silent no-op: the daily trigger
/// sweeps every active contract without pre-filtering by date range, so a
/// contract whose period does not cover the current month must not raise.
/// Returns the newly created visits; an empty vector means the month was
/// already satisfied (or out of range).
pub fn generate_monthly_visits<R>(
    repo: &R,
    contract: &Contract,
    target_month: VisitMonth,
    today: NaiveDate,
) -> ServiceResult<Vec<Visit>>
where
    R: VisitReader + VisitWriter + FolderReader + ?Sized,
{
    if contract.state != ContractState::InProgress {
        return Err(ServiceError::InvalidState);
    }
    if !contract.contains_month(target_month) {
        return Ok(Vec::new());
    }

    let (_, existing) = repo.list_visits(
        VisitListQuery::new()
            .contract(contract.id)
            .month(target_month),
    )?;

    // Full quota for every month of the period, partial first and last
    // months included.
    let required = contract.visits_per_month.get() as usize;
    if existing.len() >= required {
        return Ok(Vec::new());
    }
    let missing = required - existing.len();

    let next_sequence = next_sequence(&existing);
    let folder_id = month_folder(repo, contract, target_month)?.map(|folder| folder.id);
    let visit_date = default_visit_date(target_month, today);

    let new_visits: Vec<NewVisit> = (0..missing as i32)
        .map(|offset| NewVisit {
            contract_id: Some(contract.id),
            client_id: None,
            folder_id,
            scheduled_month: target_month,
            sequence: next_sequence + offset,
            kind: VisitKind::Scheduled,
            visit_date,
            engineer: None,
            reason: None,
        })
        .collect();

    let created = repo.create_visits(&new_visits)?;
    Ok(created)
}

/// Adds `count` visits on top of the quota for the given month.
///
/// Extras are purely additive and never reconciled against a target, but the
/// month must fall inside the contract period; unlike [`generate_monthly_visits`]
/// an out-of-range month is surfaced to the caller.
pub fn add_extra_visits<R>(
    repo: &R,
    contract: &Contract,
    month: VisitMonth,
    count: i32,
    reason: &str,
    today: NaiveDate,
) -> ServiceResult<Vec<Visit>>
where
    R: VisitReader + VisitWriter + FolderReader + ?Sized,
{
    if contract.state != ContractState::InProgress {
        return Err(ServiceError::InvalidState);
    }
    if !contract.contains_month(month) {
        return Err(ServiceError::OutOfRange(month));
    }
    if count <= 0 {
        return Err(ServiceError::Form(
            "the number of visits must be greater than zero".to_string(),
        ));
    }

    let (_, existing) = repo.list_visits(VisitListQuery::new().contract(contract.id).month(month))?;

    let next_sequence = next_sequence(&existing);
    let folder_id = month_folder(repo, contract, month)?.map(|folder| folder.id);
    let visit_date = default_visit_date(month, today);

    let new_visits: Vec<NewVisit> = (0..count)
        .map(|offset| NewVisit {
            contract_id: Some(contract.id),
            client_id: None,
            folder_id,
            scheduled_month: month,
            sequence: next_sequence + offset,
            kind: VisitKind::Extra,
            visit_date,
            engineer: None,
            reason: Some(reason.to_string()),
        })
        .collect();

    let created = repo.create_visits(&new_visits)?;
    Ok(created)
}

/// Convenience wrapper resolving the contract first; used by the wizard
/// entry point, which addresses contracts by id.
pub fn add_extra_for_contract<R>(
    repo: &R,
    contract_id: ContractId,
    month: VisitMonth,
    count: i32,
    reason: &str,
    today: NaiveDate,
) -> ServiceResult<Vec<Visit>>
where
    R: ContractReader + VisitReader + VisitWriter + FolderReader + ?Sized,
{
    let contract = repo
        .get_contract_by_id(contract_id)?
        .ok_or(ServiceError::NotFound)?;
    add_extra_visits(repo, &contract, month, count, reason, today)
}

/// Sequence numbers continue after the highest non-cancelled one.
fn next_sequence(existing: &[Visit]) -> i32 {
    existing.iter().map(|visit| visit.sequence).max().unwrap_or(0) + 1
}

/// Visits land on today's date when generating the current month, otherwise
/// on the first day of the target month.
fn default_visit_date(month: VisitMonth, today: NaiveDate) -> NaiveDate {
    if VisitMonth::from_date(today) == month {
        today
    } else {
        month.first_day()
    }
}

fn month_folder<R>(
    repo: &R,
    contract: &Contract,
    month: VisitMonth,
) -> ServiceResult<Option<Folder>>
where
    R: FolderReader + ?Sized,
{
    let Some(root_id) = contract.folder_id else {
        log::warn!(
            "Contract {} has no root folder; visits will be unfiled",
            contract.id
        );
        return Ok(None);
    };

    let folder = repo.find_month_folder(root_id, month)?;
    if folder.is_none() {
        log::warn!("No folder for {month} under contract {}", contract.id);
    }
    Ok(folder)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::types::{ClientId, ContractId, ContractName, VisitId, VisitsPerMonth};
    use crate::domain::visit::VisitState;
    use crate::repository::mock::MockRepository;

    fn in_progress_contract(quota: i32) -> Contract {
        let now = Utc::now().naive_utc();
        Contract {
            id: ContractId::new(7).expect("valid contract id"),
            name: ContractName::new("Quarterly maintenance").expect("valid name"),
            client_id: ClientId::new(1).expect("valid client id"),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
            visits_per_month: VisitsPerMonth::new(quota).expect("valid quota"),
            state: ContractState::InProgress,
            folder_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn persisted_visit(id: i32, sequence: i32, month: VisitMonth) -> Visit {
        let now = Utc::now().naive_utc();
        Visit {
            id: VisitId::new(id).expect("valid visit id"),
            reference: format!("VIS-{id:05}"),
            contract_id: Some(ContractId::new(7).expect("valid contract id")),
            client_id: None,
            folder_id: None,
            scheduled_month: month,
            sequence,
            state: VisitState::Pending,
            kind: VisitKind::Scheduled,
            visit_date: month.first_day(),
            engineer: None,
            reason: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn expect_create(repo: &mut MockRepository) {
        repo.expect_create_visits().times(1).returning(|new_visits| {
            Ok(new_visits
                .iter()
                .enumerate()
                .map(|(i, new_visit)| {
                    let id = 100 + i as i32;
                    let now = Utc::now().naive_utc();
                    Visit {
                        id: VisitId::new(id).expect("valid visit id"),
                        reference: format!("VIS-{id:05}"),
                        contract_id: new_visit.contract_id,
                        client_id: new_visit.client_id,
                        folder_id: new_visit.folder_id,
                        scheduled_month: new_visit.scheduled_month,
                        sequence: new_visit.sequence,
                        state: VisitState::Pending,
                        kind: new_visit.kind,
                        visit_date: new_visit.visit_date,
                        engineer: new_visit.engineer.clone(),
                        reason: new_visit.reason.clone(),
                        notes: None,
                        created_at: now,
                        updated_at: now,
                    }
                })
                .collect())
        });
    }

    fn feb() -> VisitMonth {
        VisitMonth::new(2025, 2).expect("valid month")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).expect("valid date")
    }

    #[test]
    fn creates_full_quota_for_empty_month() {
        let contract = in_progress_contract(8);
        let mut repo = MockRepository::new();

        repo.expect_list_visits()
            .times(1)
            .withf(|query| {
                query.contract_id == Some(ContractId::new(7).expect("valid contract id"))
                    && query.month == Some(VisitMonth::new(2025, 2).expect("valid month"))
                    && !query.include_cancelled
            })
            .returning(|_| Ok((0, Vec::new())));
        expect_create(&mut repo);

        let created = generate_monthly_visits(&repo, &contract, feb(), today())
            .expect("generation failed");

        assert_eq!(created.len(), 8);
        let sequences: Vec<i32> = created.iter().map(|v| v.sequence).collect();
        assert_eq!(sequences, (1..=8).collect::<Vec<_>>());
        assert!(created.iter().all(|v| v.state == VisitState::Pending));
        assert!(created.iter().all(|v| v.kind == VisitKind::Scheduled));
        assert!(created.iter().all(|v| v.visit_date == today()));
    }

    #[test]
    fn second_call_is_a_no_op() {
        let contract = in_progress_contract(3);
        let mut repo = MockRepository::new();

        repo.expect_list_visits().times(1).returning(|_| {
            let month = VisitMonth::new(2025, 2).expect("valid month");
            Ok((
                3,
                (1..=3).map(|seq| persisted_visit(seq, seq, month)).collect(),
            ))
        });

        let created = generate_monthly_visits(&repo, &contract, feb(), today())
            .expect("generation failed");
        assert!(created.is_empty());
    }

    #[test]
    fn tops_up_a_partial_month() {
        let contract = in_progress_contract(8);
        let mut repo = MockRepository::new();

        repo.expect_list_visits().times(1).returning(|_| {
            let month = VisitMonth::new(2025, 2).expect("valid month");
            Ok((
                3,
                (1..=3).map(|seq| persisted_visit(seq, seq, month)).collect(),
            ))
        });
        expect_create(&mut repo);

        let created = generate_monthly_visits(&repo, &contract, feb(), today())
            .expect("generation failed");

        assert_eq!(created.len(), 5);
        let sequences: Vec<i32> = created.iter().map(|v| v.sequence).collect();
        assert_eq!(sequences, (4..=8).collect::<Vec<_>>());
    }

    #[test]
    fn over_quota_month_is_left_alone() {
        let contract = in_progress_contract(2);
        let mut repo = MockRepository::new();

        repo.expect_list_visits().times(1).returning(|_| {
            let month = VisitMonth::new(2025, 2).expect("valid month");
            Ok((
                3,
                (1..=3).map(|seq| persisted_visit(seq, seq, month)).collect(),
            ))
        });

        let created = generate_monthly_visits(&repo, &contract, feb(), today())
            .expect("generation failed");
        assert!(created.is_empty());
    }

    #[test]
    fn out_of_range_month_is_silent() {
        let contract = in_progress_contract(8);
        let repo = MockRepository::new();

        let before = VisitMonth::new(2024, 12).expect("valid month");
        let after = VisitMonth::new(2025, 4).expect("valid month");
        assert!(
            generate_monthly_visits(&repo, &contract, before, today())
                .expect("generation failed")
                .is_empty()
        );
        assert!(
            generate_monthly_visits(&repo, &contract, after, today())
                .expect("generation failed")
                .is_empty()
        );
    }

    #[test]
    fn rejects_contract_not_in_progress() {
        let mut contract = in_progress_contract(8);
        contract.state = ContractState::Draft;
        let repo = MockRepository::new();

        let result = generate_monthly_visits(&repo, &contract, feb(), today());
        assert!(matches!(result, Err(ServiceError::InvalidState)));
    }

    #[test]
    fn extras_are_added_regardless_of_quota() {
        let contract = in_progress_contract(8);
        let mut repo = MockRepository::new();

        repo.expect_list_visits().times(1).returning(|_| {
            let month = VisitMonth::new(2025, 2).expect("valid month");
            Ok((
                8,
                (1..=8).map(|seq| persisted_visit(seq, seq, month)).collect(),
            ))
        });
        expect_create(&mut repo);

        let created = add_extra_visits(&repo, &contract, feb(), 3, "client request", today())
            .expect("extra creation failed");

        assert_eq!(created.len(), 3);
        let sequences: Vec<i32> = created.iter().map(|v| v.sequence).collect();
        assert_eq!(sequences, vec![9, 10, 11]);
        assert!(created.iter().all(|v| v.kind == VisitKind::Extra));
        assert!(
            created
                .iter()
                .all(|v| v.reason.as_deref() == Some("client request"))
        );
    }

    #[test]
    fn extras_outside_the_period_are_rejected() {
        let contract = in_progress_contract(8);
        let repo = MockRepository::new();

        let month = VisitMonth::new(2025, 6).expect("valid month");
        let result = add_extra_visits(&repo, &contract, month, 1, "late request", today());
        assert!(matches!(result, Err(ServiceError::OutOfRange(m)) if m == month));
    }

    #[test]
    fn extras_require_a_positive_count() {
        let contract = in_progress_contract(8);
        let mut repo = MockRepository::new();
        repo.expect_list_visits()
            .returning(|_| Ok((0, Vec::new())));

        let result = add_extra_visits(&repo, &contract, feb(), 0, "none", today());
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
