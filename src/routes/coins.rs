use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{BalanceResponse, HistoryRequest, HistoryResponse};
use crate::routes::{ApiError, AppState, AuthenticatedUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/coins/balance", web::get().to(balance))
        .route("/coins/transactions", web::get().to(transactions));
}

/// GET /api/v1/coins/balance
async fn balance(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let coins = state.ledger.balance(user.id()).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse { coins }))
}

/// GET /api/v1/coins/transactions?limit=50
async fn transactions(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<HistoryRequest>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let transactions = state.ledger.history(user.id(), query.limit as usize).await?;
    Ok(HttpResponse::Ok().json(HistoryResponse { transactions }))
}
