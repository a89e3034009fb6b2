use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::error;

use crate::server::AppState;
use crate::session::{SessionError, SessionId};
use super::model::*;

fn internal_error(e: SessionError) -> StatusCode {
    error!("Cart session access failed: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<Movie>, StatusCode> {
    let movie = state.cart.add_to_cart(&session, req.movie).await
        .map_err(internal_error)?;

    Ok(Json(movie))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(movie_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    state.cart.remove_from_cart(&session, movie_id).await
        .map_err(internal_error)?;

    Ok(StatusCode::OK)
}

pub async fn get_cart_contents(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<Vec<Movie>>, StatusCode> {
    let cart = state.cart.cart_contents(&session).await
        .map_err(internal_error)?;

    Ok(Json(cart))
}

pub async fn empty_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Result<StatusCode, StatusCode> {
    state.cart.empty_cart(&session).await
        .map_err(internal_error)?;

    Ok(StatusCode::OK)
}
