//! Background worker consuming e-signature completion notifications and
//! marking the linked visits done.

use std::env;

use config::Config;
use dotenvy::dotenv;

use visit_tracker::db::establish_connection_pool;
use visit_tracker::domain::types::VisitId;
use visit_tracker::domain::visit::VisitState;
use visit_tracker::models::config::ServerConfig;
use visit_tracker::models::zmq::SignCompletedMessage;
use visit_tracker::repository::errors::{RepositoryError, RepositoryResult};
use visit_tracker::repository::{DieselRepository, VisitReader, VisitWriter};

fn process_sign_completed<R>(msg: SignCompletedMessage, repo: &R) -> RepositoryResult<()>
where
    R: VisitReader + VisitWriter,
{
    let visit_id = VisitId::new(msg.visit_id).map_err(RepositoryError::from)?;

    let visit = match repo.get_visit_by_id(visit_id)? {
        Some(visit) => visit,
        None => {
            log::warn!("Skipping sign completion for unknown visit {visit_id}");
            return Ok(());
        }
    };

    if visit.state == VisitState::Done {
        log::info!("Visit {} already done, skipping", visit.reference);
        return Ok(());
    }

    let visit = repo.set_visit_state(visit.id, VisitState::Done)?;
    log::info!("Visit {} marked done after signature", visit.reference);
    Ok(())
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let context = zmq::Context::new();
    let subscriber = context.socket(zmq::SUB).expect("Cannot create zmq socket");
    subscriber
        .connect(&server_config.zmq_sign_sub)
        .expect("Cannot connect to zmq port");
    subscriber.set_subscribe(b"").expect("SUBSCRIBE failed");

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);

    log::info!("Starting signature event worker");

    loop {
        let msg = subscriber.recv_bytes(0).unwrap();
        match serde_json::from_slice::<SignCompletedMessage>(&msg) {
            Ok(parsed) => {
                if let Err(e) = process_sign_completed(parsed, &repo) {
                    log::error!("Error processing sign completion: {e}");
                }
            }
            Err(e) => log::error!("Error receiving sign completion message: {e}"),
        }
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use chrono::Utc;

    use visit_tracker::domain::types::{ContractId, VisitMonth};
    use visit_tracker::domain::visit::{Visit, VisitKind};
    use visit_tracker::repository::mock::MockRepository;

    fn pending_visit(id: i32) -> Visit {
        let now = Utc::now().naive_utc();
        let month = VisitMonth::new(2025, 2).expect("valid month");
        Visit {
            id: VisitId::new(id).expect("valid visit id"),
            reference: format!("VIS-{id:05}"),
            contract_id: Some(ContractId::new(1).expect("valid contract id")),
            client_id: None,
            folder_id: None,
            scheduled_month: month,
            sequence: 1,
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

    #[test]
    fn marks_pending_visit_done() {
        let mut repo = MockRepository::new();
        let visit = pending_visit(42);

        let lookup = visit.clone();
        repo.expect_get_visit_by_id()
            .times(1)
            .returning(move |_| Ok(Some(lookup.clone())));

        repo.expect_set_visit_state()
            .times(1)
            .withf(|id, state| id.get() == 42 && *state == VisitState::Done)
            .returning(move |_, _| {
                let mut done = visit.clone();
                done.state = VisitState::Done;
                Ok(done)
            });

        process_sign_completed(SignCompletedMessage { visit_id: 42 }, &repo)
            .expect("processing failed");
    }

    #[test]
    fn replayed_notification_is_skipped() {
        let mut repo = MockRepository::new();
        let mut visit = pending_visit(42);
        visit.state = VisitState::Done;

        repo.expect_get_visit_by_id()
            .times(1)
            .returning(move |_| Ok(Some(visit.clone())));
        repo.expect_set_visit_state().never();

        process_sign_completed(SignCompletedMessage { visit_id: 42 }, &repo)
            .expect("processing failed");
    }

    #[test]
    fn unknown_visit_is_skipped() {
        let mut repo = MockRepository::new();
        repo.expect_get_visit_by_id().times(1).returning(|_| Ok(None));
        repo.expect_set_visit_state().never();

        process_sign_completed(SignCompletedMessage { visit_id: 999 }, &repo)
            .expect("processing failed");
    }
}
