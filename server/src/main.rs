use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use gym_server::config::{self, AppSettings};
use gym_server::db::{create_pool, verify_connection, DocumentStore, MemoryDocumentStore, PgDocumentStore};
use gym_server::handlers;
use gym_server::models::AppState;
use gym_server::routes::configure_routes;
use gym_server::services::auth::TokenService;
use gym_server::services::bootstrap::run_bootstrap;

/// Picks the Postgres store when a database URL is configured.
async fn init_store(app_settings: &AppSettings) -> Arc<dyn DocumentStore> {
    let Some(url) = app_settings.database.url.as_deref() else {
        log::warn!("DATABASE_URL is not set, using the in-memory document store (data is lost on restart)");
        return Arc::new(MemoryDocumentStore::new());
    };

    let db_pool = match create_pool(url, &app_settings.database).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to create database connection pool: {}", e);
            log::error!("Cannot start server without a working database connection");
            std::process::exit(1);
        }
    };

    if let Err(e) = verify_connection(&db_pool).await {
        log::error!("Database connection verification failed: {}", e);
        std::process::exit(1);
    }

    let store = PgDocumentStore::new(db_pool);
    if let Err(e) = store.ensure_schema().await {
        log::error!("Failed to prepare document store schema: {}", e);
        std::process::exit(1);
    }

    log::info!("Database connection established successfully");
    Arc::new(store)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    config::load_env_file();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_settings = match config::init_config() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load application settings: {}", e);
            log::error!("Cannot start server without valid settings");
            std::process::exit(1);
        }
    };

    let tokens = match TokenService::new(&app_settings.auth.jwt_secret, app_settings.auth.token_duration_hours) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::error!("Failed to initialize JWT keys: {}", e);
            log::error!("Cannot start server without working JWT keys");
            std::process::exit(1);
        }
    };
    log::info!("JWT keys initialized successfully");

    let store = init_store(&app_settings).await;

    run_bootstrap(store.clone(), app_settings.bootstrap.admin.as_ref()).await;

    let host = app_settings.server.host.clone();
    let port = app_settings.server.port;
    let cors_origins = app_settings.server.cors_origins.clone();
    let state = AppState::new(app_settings, store, tokens);

    log::info!("Starting server at http://{}:{}", host, port);
    let listener = TcpListener::bind(format!("{}:{}", host, port))?;

    HttpServer::new(move || {
        let mut cors = Cors::default().supports_credentials();

        if cors_origins.iter().any(|origin| origin == "*") {
            cors = cors.allow_any_origin();
        } else {
            for origin in &cors_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        cors = cors.allow_any_method().allow_any_header();

        let tokens = state.tokens.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(move |cfg| configure_routes(cfg, tokens))
            .default_service(web::route().to(handlers::not_found))
    })
    .listen(listener)?
    .run()
    .await
}
