use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod identity;
mod models;
mod validation;

use config::Config;
use db::Database;
use identity::{IdentityProvider, ProxyHeaderIdentity};

pub struct AppState {
    pub db: Arc<Database>,
    pub identity: Arc<dyn IdentityProvider>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Inkpad backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(ProxyHeaderIdentity::new(&config.identity_header));

    let frontend_dist = config::frontend_dist_dir();
    if let Some(dist) = &frontend_dist {
        log::info!("Serving frontend from: {}", dist);
    }

    // Clone needed for the shutdown handler (before HttpServer moves db)
    let shutdown_db = db.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                identity: Arc::clone(&identity),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::public_notes::config);

        if let Some(dist) = &frontend_dist {
            app = app.service(Files::new("/", dist.clone()).index_file("index.html"));
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        log::info!("Received Ctrl+C, shutting down...");

        // Flush the WAL into the main database file before stopping
        if let Err(e) = shutdown_db.checkpoint() {
            log::warn!("WAL checkpoint on shutdown failed: {}", e);
        }

        server_handle.stop(true).await;
        log::info!("Shutdown complete");
    });

    server.await
}
