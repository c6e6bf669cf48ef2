//! Feed handler.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::feed::ATOM_CONTENT_TYPE;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Any method, any path - Serve the aggregated Atom feed.
///
/// Every request re-aggregates from scratch.
pub async fn serve_feed(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let document = state.feed.build_document().await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)],
        document,
    )
        .into_response())
}
