pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
pub mod services;
#[cfg(feature = "server")]
pub mod zmq;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::db::establish_connection_pool;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::client::{add_client, list_clients, show_client};
    use crate::routes::contract::{
        activate_contract, add_contract, add_extra_visits, close_contract,
        generate_contract_visits, list_contract_visits, list_contracts, show_contract,
    };
    use crate::routes::folder::{list_folders, show_folder};
    use crate::routes::visit::{
        add_not_contracted_visit, cancel_visit, mark_visit_done, save_visit, show_visit,
    };
    use crate::zmq::EventPublisher;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Start the background publisher used for outbound report requests.
        let publisher = EventPublisher::start(&server_config.zmq_reports_pub)
            .map_err(|e| std::io::Error::other(format!("Failed to start event publisher: {e}")))?;
        let publisher = Arc::new(publisher);

        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(add_client)
                .service(list_clients)
                .service(show_client)
                .service(add_contract)
                .service(list_contracts)
                .service(show_contract)
                .service(list_contract_visits)
                .service(activate_contract)
                .service(generate_contract_visits)
                .service(add_extra_visits)
                .service(close_contract)
                .service(add_not_contracted_visit)
                .service(show_visit)
                .service(save_visit)
                .service(mark_visit_done)
                .service(cancel_visit)
                .service(list_folders)
                .service(show_folder)
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(publisher.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
