use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::MessagePayload;
use crate::models::{BlockResponse, FetchMessagesRequest, SendMessageRequest};
use crate::routes::{ApiError, AppState, AuthenticatedUser};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::get().to(list_matches))
        .route("/matches/{match_id}/block", web::post().to(block_match))
        .route("/matches/{match_id}/messages", web::get().to(fetch_messages))
        .route("/matches/{match_id}/messages", web::post().to(send_message));
}

/// GET /api/v1/matches
async fn list_matches(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let matches = state.messaging.list_matches(user.id()).await?;
    Ok(HttpResponse::Ok().json(matches))
}

/// POST /api/v1/matches/{match_id}/block
async fn block_match(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let blocked = state.messaging.block_match(user.id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BlockResponse::from(&blocked)))
}

/// Fetch messages, marking them read
///
/// GET /api/v1/matches/{match_id}/messages?limit=50
async fn fetch_messages(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<FetchMessagesRequest>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let messages = state
        .messaging
        .fetch_messages(user.id(), path.into_inner(), query.limit as usize)
        .await?;

    Ok(HttpResponse::Ok().json(messages))
}

/// Send a message
///
/// POST /api/v1/matches/{match_id}/messages
///
/// Request body:
/// ```json
/// { "type": "gift", "giftId": "rose", "giftCost": 100 }
/// ```
async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let payload = MessagePayload::try_from(req.into_inner())?;
    let message = state
        .messaging
        .send_message(user.id(), path.into_inner(), payload)
        .await?;

    Ok(HttpResponse::Created().json(message))
}
