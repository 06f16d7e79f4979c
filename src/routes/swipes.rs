use actix_web::{web, HttpResponse};

use crate::models::SwipeRequest;
use crate::routes::{ApiError, AppState, AuthenticatedUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipes", web::post().to(record_swipe))
        .route("/swipes/undo", web::post().to(undo_swipe))
        .route("/likes/received", web::get().to(received_likes));
}

/// Record a swipe
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// { "targetId": "uuid", "action": "like" }
/// ```
async fn record_swipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state
        .engine
        .record_swipe(user.id(), req.target_id, req.action)
        .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /api/v1/swipes/undo
async fn undo_swipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.engine.undo_last_swipe(user.id()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// GET /api/v1/likes/received
async fn received_likes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let likes = state.engine.received_likes(user.id()).await?;
    Ok(HttpResponse::Ok().json(likes))
}
