use actix_web::web;

use crate::handlers::recalculation_handler;

pub fn init_recalculation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recalculate/{round_number}")
            .route(web::post().to(recalculation_handler::recalculate_round))
    )
    .service(
        web::resource("/recalculate-all")
            .route(web::post().to(recalculation_handler::recalculate_all))
    )
    .service(
        web::resource("/rounds/{round_number}/scores")
            .route(web::get().to(recalculation_handler::get_round_scores))
    );
}
