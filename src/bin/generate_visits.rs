//! Daily worker generating the current month's visits for every in-progress
//! contract. Intended to be run once per day by the system scheduler; every
//! repository call is its own transaction, and the generator's deficit check
//! makes reruns safe after a partial failure.

use std::env;

use chrono::Utc;
use config::Config;
use dotenvy::dotenv;

use visit_tracker::db::establish_connection_pool;
use visit_tracker::domain::types::VisitMonth;
use visit_tracker::models::config::ServerConfig;
use visit_tracker::repository::DieselRepository;
use visit_tracker::services::{contract as contract_service, generator};
use visit_tracker::zmq::EventPublisher;

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

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);

    let publisher = match EventPublisher::start(&server_config.zmq_reports_pub) {
        Ok(publisher) => publisher,
        Err(e) => {
            log::error!("Failed to start event publisher: {e}");
            std::process::exit(1);
        }
    };

    let today = Utc::now().date_naive();
    let current_month = VisitMonth::from_date(today);

    log::info!("Starting visit generation for {current_month}");

    match contract_service::close_expired_contracts(&repo, today) {
        Ok(closed) => {
            for contract in &closed {
                log::info!("Closed expired contract {} ({})", contract.id, contract.name);
            }
        }
        Err(e) => log::error!("Failed to close expired contracts: {e}"),
    }

    let contracts = match contract_service::list_active_contracts(&repo) {
        Ok(contracts) => contracts,
        Err(e) => {
            log::error!("Failed to list active contracts: {e}");
            std::process::exit(1);
        }
    };

    // Sequential sweep; a failing contract must not abort the others.
    let mut total_created = 0;
    for contract in &contracts {
        match generator::generate_monthly_visits(&repo, contract, current_month, today) {
            Ok(created) => {
                if !created.is_empty() {
                    log::info!(
                        "Generated {} visits for contract {} ({})",
                        created.len(),
                        contract.id,
                        contract.name
                    );
                    publisher.publish_visits_created(&created);
                    total_created += created.len();
                }
            }
            Err(e) => {
                log::error!("Failed to generate visits for contract {}: {e}", contract.id);
            }
        }
    }

    log::info!(
        "Visit generation finished: {} contracts swept, {} visits created",
        contracts.len(),
        total_created
    );
}
