use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::is_within_match_distance;
use crate::models::{HealthResponse, ScoreMatchRequest, ScoreMatchResponse};
use crate::routes::{ApiError, AppState};

/// Configure health and score preview routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score preview endpoint
///
/// POST /api/v1/matches/score
///
/// Scores one artist against one show without touching the store.
///
/// Request body:
/// ```json
/// {
///   "artist": {
///     "genres": ["punk"],
///     "latitude": 34.85, "longitude": -82.39,
///     "drawEstimate": 60,
///     "availabilityPreference": "ANY_NIGHT"
///   },
///   "show": {
///     "genres": ["punk", "hardcore"],
///     "venueLatitude": 34.85, "venueLongitude": -82.39,
///     "venueCapacity": 80,
///     "showDate": "2026-03-14"
///   }
/// }
/// ```
async fn score_match(
    state: web::Data<AppState>,
    req: web::Json<ScoreMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return Err(ApiError::Validation(errors.to_string()));
    }

    let (score, breakdown) = state.generator.matcher().score(&req.artist, &req.show);

    Ok(HttpResponse::Ok().json(ScoreMatchResponse {
        score,
        breakdown,
        within_distance: is_within_match_distance(&req.artist, &req.show),
    }))
}
