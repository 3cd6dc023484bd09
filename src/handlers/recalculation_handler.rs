use actix_web::{web, HttpResponse, Result};
use chrono::Utc;

use crate::models::common::ApiResponse;
use crate::services::RecalculationService;

/// Recompute exactly one round, whether or not the selector considers it active.
/// A failed round still answers 200; the report carries the failure.
pub async fn recalculate_round(
    service: web::Data<RecalculationService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let round_number = path.into_inner();
    tracing::info!("📋 Recalculation requested for round {}", round_number);

    let report = service.recalculate_round(round_number, Utc::now()).await;
    Ok(HttpResponse::Ok().json(report))
}

/// Recompute every active round.
pub async fn recalculate_all(
    service: web::Data<RecalculationService>,
) -> Result<HttpResponse> {
    tracing::info!("📋 Recalculation requested for all active rounds");

    match service.recalculate_all(Utc::now()).await {
        Ok(reports) => Ok(HttpResponse::Ok().json(reports)),
        Err(e) => {
            tracing::error!("Failed to recalculate rounds: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error_with_message(
                "Failed to recalculate rounds",
                e.to_string(),
            )))
        }
    }
}

/// Stored score records of a round, highest points first.
pub async fn get_round_scores(
    service: web::Data<RecalculationService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let round_number = path.into_inner();

    match service.round_scores(round_number).await {
        Ok(scores) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            format!("{} score records for round {}", scores.len(), round_number),
            scores,
        ))),
        Err(e) => {
            tracing::error!("Failed to load scores for round {}: {}", round_number, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error_with_message(
                "Failed to load scores",
                e.to_string(),
            )))
        }
    }
}
