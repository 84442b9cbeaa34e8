//! Two-source search.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{Router, routing::get};
use serde::Deserialize;
use tracing::instrument;

use storytellers_aggregation::application::query_handlers;
use storytellers_aggregation::domain::views::SearchView;

use crate::error::{ApiError, malformed};
use crate::response::{GatewayResponse, RedirectTarget};
use crate::state::AppState;

/// Query string for GET /search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// The search term, passed to both sources as received.
    #[serde(default)]
    pub query: String,
}

/// GET /search
#[instrument(skip(state))]
async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<GatewayResponse<SearchView>, ApiError> {
    let Query(params) = params.map_err(|e| malformed(e, RedirectTarget::Home))?;
    let view = query_handlers::search(&params.query, &state.backends).await?;
    Ok(GatewayResponse::rendered(view))
}

/// Returns the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}
