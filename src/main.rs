use std::net::TcpListener;
use std::sync::Arc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use quiniela_backend::run;
use quiniela_backend::config::settings::get_config;
use quiniela_backend::db::JornadaQueries;
use quiniela_backend::telemetry::{get_subscriber, init_subscriber};
use quiniela_backend::services::{RecalculationService, SchedulerService};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "quiniela-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(
            config.database.connection_string().expose_secret()
        )
        .expect("Failed to create Postgres connection pool");

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("❌ Failed to migrate the database: {}", e);
        std::process::exit(1);
    }

    let store = Arc::new(JornadaQueries::new(connection_pool));
    let recalculation_service = Arc::new(RecalculationService::new(store, &config.scoring));

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = if config.scheduler.enabled {
        match start_scheduler(recalculation_service.clone(), &config.scheduler.cron).await {
            Ok(scheduler) => Some(scheduler),
            Err(e) => {
                tracing::error!("❌ Failed to start scheduler: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        tracing::info!("Scheduler disabled; recomputation runs only on request");
        None
    };

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("🚀 Listening on {}", address);

    run(listener, recalculation_service)?.await
}

async fn start_scheduler(
    recalculation_service: Arc<RecalculationService>,
    cron: &str,
) -> Result<SchedulerService, tokio_cron_scheduler::JobSchedulerError> {
    let scheduler = SchedulerService::new(recalculation_service).await?;
    scheduler.schedule_recalculation(cron).await?;
    scheduler.start().await?;
    Ok(scheduler)
}
