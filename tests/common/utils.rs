use once_cell::sync::Lazy;
use std::net::TcpListener;
use std::sync::Arc;

use quiniela_backend::config::settings::ScoringSettings;
use quiniela_backend::db::InMemoryStore;
use quiniela_backend::run;
use quiniela_backend::services::RecalculationService;
use quiniela_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub service: Arc<RecalculationService>,
}

/// Service over a fresh in-memory store, without an HTTP server in front of it.
pub fn build_service(settings: &ScoringSettings) -> (Arc<InMemoryStore>, Arc<RecalculationService>) {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(RecalculationService::new(store.clone(), settings));
    (store, service)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_settings(ScoringSettings::default()).await
}

pub async fn spawn_app_with_settings(settings: ScoringSettings) -> TestApp {
    let (store, service) = build_service(&settings);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = run(listener, service.clone())
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        service,
    }
}
