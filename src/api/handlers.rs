//! API Handlers
//!
//! HTTP request handlers for the lookup endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::LookupError;
use crate::lookup::LookupService;
use crate::models::{ApiQuery, ApiResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared lookup service
    pub lookup: Arc<LookupService>,
}

impl AppState {
    /// Creates a new AppState around the given lookup service.
    pub fn new(lookup: LookupService) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

/// Handler for GET /api
///
/// Resolves the `url` query parameter. Both outcomes are HTTP 200 with a
/// JSON body whose `status` field tells them apart. The query is read as raw
/// pairs so repeated parameters cannot trigger an extractor rejection.
pub async fn api_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse>, LookupError> {
    let query = ApiQuery::from_pairs(pairs);
    let metadata = state.lookup.resolve(query.link()).await?;
    Ok(Json(ApiResponse::success(metadata)))
}
