//! Stormwatch server: weather alerts and daily digests.
//!
//! Main entry point that wires all crates together and starts the HTTP API
//! and the background worker.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use stormwatch_api::AppState;
use stormwatch_auth::JwtDecoder;
use stormwatch_core::config::AppConfig;
use stormwatch_core::config::logging::LogFormat;
use stormwatch_core::traits::{Clock, SystemClock};
use stormwatch_database::{DatabasePool, Stores};
use stormwatch_provider::{
    AiRecommendationClient, OpenWeatherClient, build_email_sender, build_sms_sender,
};
use stormwatch_service::{AccountService, AlertScheduler, NotificationService, TaskService};
use stormwatch_worker::{CronScheduler, DailyDigestJob, DeliveryDispatcher, JobRunner};

#[derive(Debug, Parser)]
#[command(name = "stormwatch-server", version, about = "Weather alert and digest service")]
struct Args {
    /// Environment name; selects `config/{env}.toml`.
    #[arg(long, env = "STORMWATCH_ENV", default_value = "development")]
    env: String,

    /// Keep all data in memory instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(&args.env)
        .with_context(|| format!("Failed to load configuration for env '{}'", args.env))?;

    init_logging(&config);

    run(config, args.in_memory).await.context("Server error")
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(false)
                .init();
        }
        LogFormat::Pretty => {
            fmt().with_env_filter(filter).with_target(false).init();
        }
    }
}

async fn run(config: AppConfig, in_memory: bool) -> anyhow::Result<()> {
    tracing::info!("Starting Stormwatch v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage ──────────────────────────────────────────
    let (stores, db) = if in_memory {
        tracing::warn!("Running with in-memory stores; data is lost on exit");
        (Stores::in_memory(), None)
    } else {
        let db = DatabasePool::connect(&config.database).await?;
        stormwatch_database::migration::run_migrations(&db).await?;
        (db.stores(), Some(db))
    };

    // ── Step 2: Providers ────────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let weather = Arc::new(OpenWeatherClient::new(&config.weather)?);
    let recommendations = Arc::new(AiRecommendationClient::new(&config.weather)?);
    let email = build_email_sender(&config.messaging.smtp)?;
    let sms = build_sms_sender(&config.messaging.sms)?;
    if config.weather.api_key.is_empty() {
        tracing::warn!("weather.api_key is empty; forecast requests will be rejected");
    }

    // ── Step 3: Services ─────────────────────────────────────────
    let scheduler = AlertScheduler::new(
        Arc::clone(&stores.users),
        Arc::clone(&stores.alerts),
        weather.clone(),
        Arc::clone(&clock),
        config.weather.default_location,
        &config.worker,
    );
    let accounts = AccountService::new(
        Arc::clone(&stores.users),
        weather.clone(),
        Arc::clone(&email),
        Arc::clone(&sms),
        Arc::clone(&clock),
        &config.auth,
    );
    let tasks = TaskService::new(
        Arc::clone(&stores.tasks),
        Arc::clone(&stores.users),
        scheduler,
        Arc::clone(&sms),
    );
    let notifications = NotificationService::new(Arc::clone(&stores.alerts), Arc::clone(&clock));

    // ── Step 4: Background worker ────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let dispatcher = DeliveryDispatcher::new(
            Arc::clone(&stores.alerts),
            Arc::clone(&stores.users),
            Arc::clone(&stores.mail_log),
            Arc::clone(&email),
            Arc::clone(&sms),
        );
        let digest = DailyDigestJob::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.job_markers),
            weather.clone(),
            recommendations,
            Arc::clone(&email),
            Arc::clone(&sms),
            Arc::clone(&clock),
            &config.worker,
        )?;
        let runner = Arc::new(
            JobRunner::new(Arc::clone(&clock))
                .with_job(Arc::new(dispatcher))
                .with_job(Arc::new(digest)),
        );
        let cron = CronScheduler::new(runner, &config.worker).await?;

        Some(tokio::spawn(async move {
            if let Err(e) = cron.run_until(shutdown_rx).await {
                tracing::error!("Worker stopped with error: {}", e);
            }
        }))
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 5: HTTP server ──────────────────────────────────────
    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set STORMWATCH__AUTH__JWT_SECRET");
    }
    let state = AppState {
        jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
        accounts,
        tasks,
        notifications,
        clock,
    };
    let app = stormwatch_api::build_app(state, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Stormwatch listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .context("HTTP server failed")?;

    if let Some(handle) = worker_handle {
        tracing::info!("Waiting for the worker to stop...");
        let grace = config.server.shutdown_grace();
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within {:?}", grace);
        }
    }
    if let Some(db) = db {
        db.close().await;
    }

    tracing::info!("Stormwatch shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
