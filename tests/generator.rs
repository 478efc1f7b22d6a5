//! End-to-end generation scenarios against a real SQLite database.

use chrono::NaiveDate;

use visit_tracker::domain::client::NewClient;
use visit_tracker::domain::contract::{Contract, ContractState, NewContract};
use visit_tracker::domain::types::{
    ClientId, ClientName, ContractName, VisitMonth, VisitsPerMonth,
};
use visit_tracker::domain::visit::{NewVisit, VisitKind, VisitState};
use visit_tracker::repository::{
    ClientWriter, ContractReader, ContractWriter, DieselRepository, FolderReader, VisitListQuery,
    VisitReader, VisitWriter,
};
use visit_tracker::services::visit::NOT_CONTRACTED_ROOT;
use visit_tracker::services::{ServiceError, contract as contract_service, generator, visit as visit_service};

mod common;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn month(year: i32, m: u32) -> VisitMonth {
    VisitMonth::new(year, m).expect("valid month")
}

/// Client + activated contract spanning 2025-01-01..2025-03-31, quota 8,
/// activated with `today` = 2025-01-10.
fn activated_contract(repo: &DieselRepository) -> Contract {
    let client = repo
        .create_client(&NewClient::new(
            ClientName::new("Acme Marine").unwrap(),
            None,
            None,
            None,
        ))
        .unwrap();
    let contract = contract_service::create_contract(
        repo,
        NewContract::try_new(
            ContractName::new("Quarterly maintenance").unwrap(),
            client.id,
            date(2025, 1, 1),
            date(2025, 3, 31),
            VisitsPerMonth::new(8).unwrap(),
        )
        .unwrap(),
    )
    .unwrap();

    let (contract, _) =
        contract_service::activate_contract(repo, contract.id, date(2025, 1, 10)).unwrap();
    contract
}

fn count_for_month(repo: &DieselRepository, contract: &Contract, m: VisitMonth) -> usize {
    let (total, _) = repo
        .list_visits(VisitListQuery::new().contract(contract.id).month(m))
        .unwrap();
    total
}

#[test]
fn activation_builds_folder_tree_and_first_month() {
    let test_db = common::TestDb::new("activation_builds_folder_tree.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    assert_eq!(contract.state, ContractState::InProgress);

    let root_id = contract.folder_id.expect("root folder assigned");
    let root = repo.get_folder_by_id(root_id).unwrap().unwrap();
    assert_eq!(root.name, "Acme Marine");

    let months = repo.list_folders(Some(root_id)).unwrap();
    let names: Vec<&str> = months.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "2025-01 (January)",
            "2025-02 (February)",
            "2025-03 (March)"
        ]
    );

    // Activation generated the current month up to quota, filed in the
    // January folder.
    let (total, visits) = repo
        .list_visits(VisitListQuery::new().contract(contract.id).month(month(2025, 1)))
        .unwrap();
    assert_eq!(total, 8);
    let january = repo
        .find_month_folder(root_id, month(2025, 1))
        .unwrap()
        .unwrap();
    assert!(visits.iter().all(|v| v.folder_id == Some(january.id)));
    assert!(visits.iter().all(|v| v.visit_date == date(2025, 1, 10)));
}

#[test]
fn activation_requires_draft_state() {
    let test_db = common::TestDb::new("activation_requires_draft.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let result = contract_service::activate_contract(&repo, contract.id, date(2025, 1, 10));
    assert!(matches!(result, Err(ServiceError::InvalidState)));
}

#[test]
fn generate_creates_quota_then_is_idempotent() {
    let test_db = common::TestDb::new("generate_quota_idempotent.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let today = date(2025, 2, 1);

    let created = generator::generate_monthly_visits(&repo, &contract, month(2025, 2), today)
        .expect("generation failed");
    assert_eq!(created.len(), 8);
    let sequences: Vec<i32> = created.iter().map(|v| v.sequence).collect();
    assert_eq!(sequences, (1..=8).collect::<Vec<_>>());
    assert!(created.iter().all(|v| v.state == VisitState::Pending));
    assert!(created.iter().all(|v| v.kind == VisitKind::Scheduled));

    // A second identical call creates none.
    let repeat = generator::generate_monthly_visits(&repo, &contract, month(2025, 2), today)
        .expect("generation failed");
    assert!(repeat.is_empty());
    assert_eq!(count_for_month(&repo, &contract, month(2025, 2)), 8);
}

#[test]
fn generate_resumes_after_partial_creation() {
    let test_db = common::TestDb::new("generate_resumes_partial.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let target = month(2025, 3);

    // Simulate a crash after 3 of 8 visits were persisted.
    let seeded: Vec<NewVisit> = (1..=3)
        .map(|sequence| NewVisit {
            contract_id: Some(contract.id),
            client_id: None,
            folder_id: None,
            scheduled_month: target,
            sequence,
            kind: VisitKind::Scheduled,
            visit_date: target.first_day(),
            engineer: None,
            reason: None,
        })
        .collect();
    repo.create_visits(&seeded).unwrap();

    let created = generator::generate_monthly_visits(&repo, &contract, target, date(2025, 3, 2))
        .expect("generation failed");
    assert_eq!(created.len(), 5);
    let sequences: Vec<i32> = created.iter().map(|v| v.sequence).collect();
    assert_eq!(sequences, (4..=8).collect::<Vec<_>>());
    assert_eq!(count_for_month(&repo, &contract, target), 8);
}

#[test]
fn cancelled_visits_are_regenerated_with_fresh_sequences() {
    let test_db = common::TestDb::new("cancelled_visits_regenerated.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let target = month(2025, 2);
    let today = date(2025, 2, 5);

    let created =
        generator::generate_monthly_visits(&repo, &contract, target, today).unwrap();
    visit_service::cancel_visit(&repo, created[2].id).unwrap();
    assert_eq!(count_for_month(&repo, &contract, target), 7);

    // The deficit is recomputed from non-cancelled rows; the replacement
    // continues numbering past the highest surviving sequence.
    let replacement =
        generator::generate_monthly_visits(&repo, &contract, target, today).unwrap();
    assert_eq!(replacement.len(), 1);
    assert_eq!(replacement[0].sequence, 9);
    assert_eq!(count_for_month(&repo, &contract, target), 8);
}

#[test]
fn extras_bypass_the_quota_and_count_toward_it() {
    let test_db = common::TestDb::new("extras_bypass_quota.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let target = month(2025, 2);
    let today = date(2025, 2, 5);

    generator::generate_monthly_visits(&repo, &contract, target, today).unwrap();

    let extras =
        generator::add_extra_visits(&repo, &contract, target, 3, "client request", today)
            .expect("extra creation failed");
    assert_eq!(extras.len(), 3);
    let sequences: Vec<i32> = extras.iter().map(|v| v.sequence).collect();
    assert_eq!(sequences, vec![9, 10, 11]);
    assert!(extras.iter().all(|v| v.kind == VisitKind::Extra));
    assert!(extras.iter().all(|v| v.reason.as_deref() == Some("client request")));

    // The over-satisfied month stays untouched by the next sweep.
    let repeat = generator::generate_monthly_visits(&repo, &contract, target, today).unwrap();
    assert!(repeat.is_empty());
    assert_eq!(count_for_month(&repo, &contract, target), 11);
}

#[test]
fn out_of_range_handling_differs_between_entry_points() {
    let test_db = common::TestDb::new("out_of_range_handling.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let today = date(2025, 1, 10);

    // The daily sweep silently skips months outside the period.
    for out_of_range in [month(2024, 12), month(2025, 4)] {
        let created =
            generator::generate_monthly_visits(&repo, &contract, out_of_range, today).unwrap();
        assert!(created.is_empty());
        assert_eq!(count_for_month(&repo, &contract, out_of_range), 0);
    }

    // The wizard surfaces the same condition as a validation failure.
    let result =
        generator::add_extra_visits(&repo, &contract, month(2025, 4), 2, "late request", today);
    assert!(matches!(result, Err(ServiceError::OutOfRange(_))));
    assert_eq!(count_for_month(&repo, &contract, month(2025, 4)), 0);
}

#[test]
fn draft_and_closed_contracts_reject_generation() {
    let test_db = common::TestDb::new("draft_closed_reject.db");
    let repo = test_db.repository();

    let client = repo
        .create_client(&NewClient::new(
            ClientName::new("Acme Marine").unwrap(),
            None,
            None,
            None,
        ))
        .unwrap();
    let draft = contract_service::create_contract(
        &repo,
        NewContract::try_new(
            ContractName::new("Quarterly maintenance").unwrap(),
            client.id,
            date(2025, 1, 1),
            date(2025, 3, 31),
            VisitsPerMonth::new(8).unwrap(),
        )
        .unwrap(),
    )
    .unwrap();

    let today = date(2025, 1, 10);
    let result = generator::generate_monthly_visits(&repo, &draft, month(2025, 1), today);
    assert!(matches!(result, Err(ServiceError::InvalidState)));

    let closed = repo
        .set_contract_state(draft.id, ContractState::Closed)
        .unwrap();
    let result = generator::add_extra_visits(&repo, &closed, month(2025, 1), 1, "why not", today);
    assert!(matches!(result, Err(ServiceError::InvalidState)));
}

#[test]
fn daily_sweep_generates_for_active_contracts_and_closes_expired() {
    let test_db = common::TestDb::new("daily_sweep.db");
    let repo = test_db.repository();

    let active = activated_contract(&repo);

    let client = repo
        .create_client(&NewClient::new(
            ClientName::new("Harbour Freight").unwrap(),
            None,
            None,
            None,
        ))
        .unwrap();
    let expired = contract_service::create_contract(
        &repo,
        NewContract::try_new(
            ContractName::new("Expired maintenance").unwrap(),
            client.id,
            date(2024, 1, 1),
            date(2024, 6, 30),
            VisitsPerMonth::new(2).unwrap(),
        )
        .unwrap(),
    )
    .unwrap();
    repo.set_contract_state(expired.id, ContractState::InProgress)
        .unwrap();

    // The worker's sweep: close expired contracts, then generate the
    // current month for the remainder.
    let today = date(2025, 2, 3);
    let closed = contract_service::close_expired_contracts(&repo, today).unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, expired.id);

    let contracts = contract_service::list_active_contracts(&repo).unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].id, active.id);

    let current_month = VisitMonth::from_date(today);
    for contract in &contracts {
        generator::generate_monthly_visits(&repo, contract, current_month, today).unwrap();
    }
    assert_eq!(count_for_month(&repo, &active, current_month), 8);
    assert_eq!(
        count_for_month(&repo, &repo.get_contract_by_id(expired.id).unwrap().unwrap(), current_month),
        0
    );
}

#[test]
fn manual_generation_matches_the_daily_sweep() {
    let test_db = common::TestDb::new("manual_generation.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let today = date(2025, 2, 14);

    let created = contract_service::generate_current_month(&repo, contract.id, today).unwrap();
    assert_eq!(created.len(), 8);

    // The button reports zero once the month is satisfied.
    let repeat = contract_service::generate_current_month(&repo, contract.id, today).unwrap();
    assert!(repeat.is_empty());
}

#[test]
fn not_contracted_visits_build_their_folder_tree_lazily() {
    let test_db = common::TestDb::new("not_contracted_visits.db");
    let repo = test_db.repository();

    let client = repo
        .create_client(&NewClient::new(
            ClientName::new("Walk-in Co").unwrap(),
            None,
            None,
            None,
        ))
        .unwrap();

    let first = visit_service::create_not_contracted_visit(
        &repo,
        client.id,
        date(2025, 5, 6),
        Some("J. Moran".to_string()),
        Some("Boiler inspection".to_string()),
    )
    .unwrap();
    assert!(first.contract_id.is_none());
    assert_eq!(first.client_id, Some(client.id));
    assert_eq!(first.kind, VisitKind::Extra);
    assert_eq!(first.sequence, 1);

    let root = repo
        .find_root_folder(NOT_CONTRACTED_ROOT)
        .unwrap()
        .expect("shared root created lazily");
    let may = repo
        .find_month_folder(root.id, month(2025, 5))
        .unwrap()
        .expect("month folder created lazily");
    assert_eq!(first.folder_id, Some(may.id));

    // A second visit in the same month reuses the folder and continues the
    // per-client numbering.
    let second = visit_service::create_not_contracted_visit(
        &repo,
        client.id,
        date(2025, 5, 20),
        None,
        Some("Follow-up".to_string()),
    )
    .unwrap();
    assert_eq!(second.folder_id, Some(may.id));
    assert_eq!(second.sequence, 2);
    assert_eq!(repo.list_folders(Some(root.id)).unwrap().len(), 1);

    let missing = visit_service::create_not_contracted_visit(
        &repo,
        ClientId::new(999).unwrap(),
        date(2025, 5, 6),
        None,
        None,
    );
    assert!(matches!(missing, Err(ServiceError::NotFound)));
}

#[test]
fn signature_completion_marks_visits_done_idempotently() {
    let test_db = common::TestDb::new("signature_completion.db");
    let repo = test_db.repository();

    let contract = activated_contract(&repo);
    let (_, visits) = repo
        .list_visits(VisitListQuery::new().contract(contract.id).month(month(2025, 1)))
        .unwrap();

    let done = visit_service::mark_visit_done(&repo, visits[0].id).unwrap();
    assert_eq!(done.state, VisitState::Done);

    // Replayed notifications leave the record unchanged.
    let replay = visit_service::mark_visit_done(&repo, visits[0].id).unwrap();
    assert_eq!(replay.state, VisitState::Done);
    assert_eq!(replay.updated_at, done.updated_at);
}
