// Route exports
pub mod auth;
pub mod coins;
pub mod feed;
pub mod matches;
pub mod swipes;

use actix_web::{error, http::StatusCode, web, HttpResponse, Responder, ResponseError};
use std::sync::Arc;
use thiserror::Error;

use crate::config::Settings;
use crate::core::{
    Clock, CoinLedger, CompatibilityScorer, FeedBuilder, MessagingGateway, SwipeEngine,
};
use crate::error::CoreError;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{MatchStore, Notifier};

pub use auth::AuthenticatedUser;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub feed: FeedBuilder,
    pub engine: SwipeEngine,
    pub ledger: CoinLedger,
    pub messaging: MessagingGateway,
    pub jwt_secret: String,
}

impl AppState {
    /// Wire the core components around one store, scorer, notifier and clock
    pub fn new(
        store: Arc<dyn MatchStore>,
        scorer: CompatibilityScorer,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: &Settings,
    ) -> Self {
        let ledger = CoinLedger::new(store.clone(), clock.clone(), &settings.economy);

        Self {
            feed: FeedBuilder::new(store.clone(), scorer, &settings.feed),
            engine: SwipeEngine::new(store.clone(), ledger.clone(), clock.clone(), &settings.economy),
            messaging: MessagingGateway::new(
                store.clone(),
                ledger.clone(),
                notifier,
                clock,
                &settings.messaging,
            ),
            ledger,
            store,
            jwt_secret: settings.auth.jwt_secret.clone(),
        }
    }
}

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Core(e) => e.code(),
            ApiError::Unauthorized(_) => "unauthorized",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
                CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
                CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    bad_request("invalid_json", format!("Invalid JSON: {}", err))
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    bad_request("invalid_query", format!("Invalid query: {}", err))
}

fn bad_request(code: &str, message: String) -> actix_web::Error {
    let body = ErrorResponse {
        error: code.to_string(),
        message: message.clone(),
        status_code: 400,
    };
    error::InternalError::from_response(message, HttpResponse::BadRequest().json(body)).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(feed::configure)
            .configure(swipes::configure)
            .configure(matches::configure)
            .configure(coins::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
