//! Standalone trigger for a running quiniela-backend.
//!
//! Usage: `recalculate_job [round_number]`. Without an argument every active round
//! is recomputed through `POST /recalculate-all`; with one, only that round.
//! The request carries `trigger.timeout_secs` as its timeout.

use std::time::Duration;

use quiniela_backend::config::settings::{get_config, TriggerSettings};
use quiniela_backend::models::recalculation::RoundReport;
use quiniela_backend::telemetry::{get_subscriber, init_subscriber};

#[derive(Debug, thiserror::Error)]
enum TriggerError {
    #[error("Invalid round number '{0}'")]
    InvalidRound(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server answered {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

#[tokio::main]
async fn main() {
    let config = get_config().expect("Failed to read the config.");
    let subscriber = get_subscriber(
        "recalculate-job".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let round_arg = std::env::args().nth(1);
    match trigger(&config.trigger, round_arg).await {
        Ok(reports) => {
            let failed = reports.iter().filter(|r| !r.is_success()).count();
            for report in &reports {
                tracing::info!("{}", report);
            }
            tracing::info!("✅ Recomputation triggered: {} rounds, {} failed", reports.len(), failed);
        }
        Err(e) => {
            tracing::error!("❌ Recomputation trigger failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn trigger(settings: &TriggerSettings, round_arg: Option<String>) -> Result<Vec<RoundReport>, TriggerError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    let base_url = settings.base_url.trim_end_matches('/');

    match round_arg {
        Some(raw) => {
            let round_number: i32 = raw.parse().map_err(|_| TriggerError::InvalidRound(raw.clone()))?;
            let response = client
                .post(format!("{base_url}/recalculate/{round_number}"))
                .send()
                .await?;
            let report: RoundReport = check_status(response).await?.json().await?;
            Ok(vec![report])
        }
        None => {
            let response = client
                .post(format!("{base_url}/recalculate-all"))
                .send()
                .await?;
            Ok(check_status(response).await?.json().await?)
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TriggerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TriggerError::Status { status, body })
}
