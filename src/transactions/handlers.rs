use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    state::AppState,
    transactions::{
        dto::{Pagination, TransactionRequest},
        repo_types::Transaction,
    },
};

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

#[instrument(skip(state, _user, body))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<TransactionRequest>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let tx = state.transactions.create(body.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

#[instrument(skip(state, _user))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<Transaction>>> {
    let rows = state.transactions.list(p.into_options()?).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, _user))]
pub async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Transaction>> {
    Ok(Json(state.transactions.get(id).await?))
}

#[instrument(skip(state, _user, body))]
pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<TransactionRequest>,
) -> AppResult<Json<Transaction>> {
    let tx = state.transactions.update(id, body.into_input()?).await?;
    Ok(Json(tx))
}

#[instrument(skip(state, _user))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.transactions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
