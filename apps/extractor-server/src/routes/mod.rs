//! HTTP routes
//!
//! Every endpoint is served at the root and again under `/api/v1`.

pub mod health;
pub mod process;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::state::AppState;

/// Room for multipart framing on top of the file size ceiling, so a file just
/// over the ceiling still reaches validation and gets a descriptive 413.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .config()
        .upload
        .max_file_size
        .saturating_add(MULTIPART_OVERHEAD);
    let cors = cors_layer(&state.config().cors);

    let api = Router::new()
        .route("/process", post(process::process_pdf))
        .route("/health", get(health::health_check));

    Router::new()
        .route("/", get(health::service_info))
        .merge(api.clone())
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Explicit origins with credentials. Header names are mirrored since a
/// wildcard cannot be combined with credentials.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter(|origin| {
            if origin.as_str() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; credentials require explicit origins");
                return false;
            }
            true
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
