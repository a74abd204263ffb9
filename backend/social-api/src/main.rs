use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use social_api::config::{Config, StoreBackend};
use social_api::repository::{MemoryStore, PgPostStore, PgUserStore, PostStore, UserStore};
use social_api::security::JwtKeys;
use social_api::{http, logging, AppState};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
        }
    }
}

async fn build_stores(config: &Config) -> Result<(Arc<dyn UserStore>, Arc<dyn PostStore>)> {
    match config.app.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let posts: Arc<dyn PostStore> = store;
            Ok((users, posts))
        }
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(url)
                .await
                .context("Failed to connect to database")?;

            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .context("Failed to verify database connection")?;
            info!("Database pool created and verified");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Database migrations completed");

            let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
            let posts: Arc<dyn PostStore> = Arc::new(PgPostStore::new(pool));
            Ok((users, posts))
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: env={}, http_port={}, store={:?}",
        config.app.env, config.app.http_port, config.app.store_backend
    );

    let (users, posts) = build_stores(&config).await?;
    let keys = Arc::new(JwtKeys::new(&config.auth));
    let state = AppState::new(users, posts, keys);

    let http_addr = format!("{}:{}", config.app.host, config.app.http_port);
    info!("Starting HTTP server on {}", http_addr);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| http::configure(cfg, state.clone()))
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping HTTP server");
        handle.stop(true).await;
    });

    server.await.context("HTTP server error")?;

    info!("social-api shut down");
    Ok(())
}
