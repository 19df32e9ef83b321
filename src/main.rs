use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use skillmatch_backend::{
    auth::password::prepare_dummy_hash,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::stop_on_signal,
    handlers::system::START_TIME,
    routes::configure_routes,
    settings::{AppConfig, LogFormat, StorageBackend},
    shared_repos::SharedRepositories,
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

async fn build_repositories(config: &AppConfig) -> anyhow::Result<SharedRepositories> {
    match config.storage_backend {
        StorageBackend::Memory => Ok(SharedRepositories::in_memory()),
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.database_max_connections)
                .await
                .context("Failed to create database connection pool")?;
            run_migrations(&pool)
                .await
                .context("Failed to apply database migrations")?;
            Ok(SharedRepositories::postgres(pool))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);
    once_cell::sync::Lazy::force(&START_TIME);
    if !prepare_dummy_hash() {
        tracing::warn!("Dummy password hash unavailable; unknown-email logins will return faster");
    }
    tracing::info!("Loaded configuration: {:?}", config);

    let repos = build_repositories(&config).await?;
    let app_state = web::Data::new(AppState::new(&config, repos));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "🚀 Starting {} v{} on {} ({} storage)",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.storage_backend
    );

    let origins = config.cors_origins();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    actix_rt::spawn(stop_on_signal(server.handle()));

    server.await?;
    tracing::info!("Server stopped");
    Ok(())
}
