use actix_web::web;

use crate::handlers::backend_health_handler::backend_health_check;

pub mod recalculation;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Liveness probe; does not touch the store
    cfg.service(
        web::resource("/backend_health")
            .route(web::get().to(backend_health_check))
    );

    recalculation::init_recalculation_routes(cfg);
}
