use actix_web::{http::header, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::models::SweepResponse;
use crate::routes::{ApiError, AppState};

/// Configure the sweep trigger routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/matching/run", web::post().to(run_sweep))
        .route("/matching/shows/{show_id}", web::post().to(sweep_show));
}

/// Check `Authorization: Bearer <secret>`. No configured secret rejects everything.
fn authorize(req: &HttpRequest, secret: Option<&str>) -> Result<(), ApiError> {
    let secret = secret.ok_or(ApiError::Unauthorized)?;
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    if constant_time_eq(token.as_bytes(), secret.as_bytes()) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Byte comparison whose timing does not depend on where the inputs differ
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Sweep every open show
///
/// POST /api/v1/matching/run
async fn run_sweep(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    authorize(&req, state.cron_secret.as_deref())?;

    tracing::info!("Match sweep triggered over HTTP");
    let summary = state.generator.generate_all_matches().await?;

    Ok(HttpResponse::Ok().json(SweepResponse {
        processed: summary.processed,
        failed: summary.failed,
        cancelled: summary.cancelled,
    }))
}

/// Sweep a single show
///
/// POST /api/v1/matching/shows/{show_id}
async fn sweep_show(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    authorize(&req, state.cron_secret.as_deref())?;

    let show_id = path.into_inner();
    let report = state.generator.generate_matches_for_show(show_id).await?;

    Ok(HttpResponse::Ok().json(report))
}
