use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use gigflow_backend::auth::TokenVerifier;
use gigflow_backend::market::HireEngine;
use gigflow_backend::notify::{NotificationDispatcher, NotificationHub, NotificationLog, Notifier};
use gigflow_backend::{AppConfig, create_pool, handlers};
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db = create_pool(&config).await.map_err(std::io::Error::other)?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await.map_err(std::io::Error::other)?;
        tracing::info!("Migrations applied");
    }

    // Hire notifications go to live WebSocket connections and to the polled log.
    let hub = Arc::new(NotificationHub::new());
    let sinks: Vec<Arc<dyn Notifier>> = vec![hub.clone(), Arc::new(NotificationLog::new(db.clone()))];
    let engine = web::Data::new(HireEngine::new(db.clone(), NotificationDispatcher::new(sinks)));

    let verifier = web::Data::new(TokenVerifier::from_config(&config.auth));
    let db_data = web::Data::new(db);
    let hub_data = web::Data::new(hub);

    let bind_addr = config.bind_addr();
    let allowed_origins = config.cors_allowed_origins.clone();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        cors = if allowed_origins.is_empty() {
            cors.allow_any_origin()
        } else {
            allowed_origins
                .iter()
                .fold(cors, |cors, origin| cors.allowed_origin(origin))
                .supports_credentials()
        };

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(engine.clone())
            .app_data(verifier.clone())
            .app_data(hub_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
