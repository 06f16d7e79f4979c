use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{FeedRequest, FeedResponse};
use crate::routes::{ApiError, AppState, AuthenticatedUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/discovery", web::get().to(discovery));
}

/// Discovery feed
///
/// GET /api/v1/discovery?limit=10
async fn discovery(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<FeedRequest>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    tracing::info!("Building feed for {}, limit: {}", user.id(), query.limit);

    let result = state.feed.build_feed(user.id(), query.limit as usize).await?;

    Ok(HttpResponse::Ok().json(FeedResponse {
        total_results: result.total_candidates,
        candidates: result.candidates,
    }))
}
