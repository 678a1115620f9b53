//! Grouped search lists for autocomplete
//!
//! Each endpoint runs a substring search, groups the hits into the caller's
//! own records, the public (alpha) records and optionally everyone else, and
//! sorts each group alphabetically. The response interleaves section markers
//! (`{"section": "..."}`) with records.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;
use tracing::error;
use yoga_common::grouping::limit_items;
use yoga_common::models::{search_sections, Asana, DataAsset, Sequence, Series};

use crate::api::identity::Caller;
use crate::db::{self, AssetKind};
use crate::AppState;

/// Longest accepted query string
pub const MAX_QUERY_LEN: usize = 200;

/// Query parameters for all search endpoints
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match; empty lists everything
    #[serde(default)]
    pub q: String,

    /// Maximum number of records (capped by config)
    pub limit: Option<i64>,
}

/// Search response with grouped results
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub kind: String,
    pub query: String,
    pub total_results: usize,
    pub results: Vec<Value>,
}

/// GET /api/search/asanas?q=tree
pub async fn search_asanas(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    run_search::<Asana>(&state, caller, query, AssetKind::Asanas).await
}

/// GET /api/search/series?q=sun
pub async fn search_series(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    run_search::<Series>(&state, caller, query, AssetKind::Series).await
}

/// GET /api/search/sequences?q=morning
pub async fn search_sequences(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    run_search::<Sequence>(&state, caller, query, AssetKind::Sequences).await
}

async fn run_search<T>(
    state: &AppState,
    caller: Caller,
    query: SearchQuery,
    kind: AssetKind,
) -> Result<Json<SearchResponse>, SearchError>
where
    T: DataAsset + Serialize + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    if query.q.chars().count() > MAX_QUERY_LEN {
        return Err(SearchError::QueryTooLong);
    }
    let limit = effective_limit(query.limit, state.config.search_limit)?;

    let group_config = state.config.group_config(caller.user_id, caller.email);
    let creators = group_config.visible_creators();

    let records: Vec<T> = db::search_assets(&state.db, kind, &query.q, creators.as_deref())
        .await
        .map_err(|e| {
            error!("{:#}", e);
            SearchError::DatabaseError(e.to_string())
        })?;

    let sections = limit_items(search_sections(&records, &group_config), limit);

    let results = sections
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(|e| SearchError::Internal(e.to_string()))?;
    let total_results = sections.iter().filter(|e| !e.is_section()).count();

    Ok(Json(SearchResponse {
        kind: kind.table().to_string(),
        query: query.q,
        total_results,
        results,
    }))
}

/// Requested limit clamped to `[1, max]`; non-positive requests are rejected
fn effective_limit(requested: Option<i64>, max: i64) -> Result<usize, SearchError> {
    let limit = match requested {
        None => max,
        Some(n) if n < 1 => return Err(SearchError::InvalidLimit(n)),
        Some(n) => n.min(max),
    };
    usize::try_from(limit).map_err(|_| SearchError::InvalidLimit(limit))
}

/// Search errors
#[derive(Debug)]
pub enum SearchError {
    QueryTooLong,
    InvalidLimit(i64),
    DatabaseError(String),
    Internal(String),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SearchError::QueryTooLong => (
                StatusCode::BAD_REQUEST,
                format!("Query too long (max {} characters)", MAX_QUERY_LEN),
            ),
            SearchError::InvalidLimit(n) => {
                (StatusCode::BAD_REQUEST, format!("Invalid limit: {}", n))
            }
            SearchError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
            SearchError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
