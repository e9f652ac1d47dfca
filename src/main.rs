use actix_cors::Cors;
use actix_web::{http::header, middleware::{Compress, Logger}, web, App, HttpServer};
use dotenv::dotenv;
use std::time::Instant;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mentor_service::{
    api::{self, health::StartedAt},
    config::AppConfig,
    database::MongoDB,
    middleware::SecurityHeaders,
    services::TokenService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Mentor Service ({})...", config.environment);
    log::info!("📊 Database: {}", config.database_name);

    let db = MongoDB::new(&config.database_url, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    let db_data = web::Data::new(db);
    let tokens = web::Data::new(TokenService::new(
        &config.jwt_secret,
        chrono::Duration::days(config.jwt_expiration_days),
    ));
    let started = web::Data::new(StartedAt(Instant::now()));

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("🔗 API mounted at '{}'", config.api_base_path);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let frontend_url = config.frontend_url.clone();
    let base_path = config.api_base_path.clone();

    HttpServer::new(move || {
        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();
        let base_path = base_path.clone();

        App::new()
            .app_data(db_data.clone())
            .app_data(tokens.clone())
            .app_data(started.clone())
            .app_data(api::json_config())
            .wrap(cors(&frontend_url))
            .wrap(SecurityHeaders)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(move |cfg| api::configure(cfg, &base_path))
            .default_service(web::to(api::route_not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// `*` opens the API to any origin; otherwise only the configured frontend may call it.
fn cors(frontend_url: &str) -> Cors {
    let cors = if frontend_url == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default()
            .allowed_origin(frontend_url)
            .supports_credentials()
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}
