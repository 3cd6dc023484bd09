use actix_web::{web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use std::sync::Arc;

pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod db;
pub mod scoring;
pub mod services;
pub mod telemetry;
use crate::routes::init_routes;
use crate::services::RecalculationService;

pub fn run(
    listener: TcpListener,
    recalculation_service: Arc<RecalculationService>,
) -> Result<Server, std::io::Error> {
    // web::Data wraps an Arc, so the service is shared, not cloned
    let recalculation_data = web::Data::from(recalculation_service);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(recalculation_data.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
