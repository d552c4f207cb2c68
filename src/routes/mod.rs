// Route exports
pub mod error;
pub mod matches;
pub mod matching;

use actix_web::web;
use std::sync::Arc;

use crate::services::{MatchGenerator, MatchStore};

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub generator: Arc<MatchGenerator>,
    /// Bearer token for the sweep trigger endpoints
    pub cron_secret: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(matching::configure),
    );
}
