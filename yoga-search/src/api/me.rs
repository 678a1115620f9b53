//! Personal data export and erasure planning for the signed-in caller

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use yoga_common::export::{build_export, ErasurePlan, ExportSource, Subject, UserDataExport};
use yoga_common::models::{Asana, Sequence, Series};

use crate::api::identity::{Caller, IdentityError};
use crate::db::{self, AssetKind};
use crate::AppState;

/// GET /api/me/export
///
/// Everything the caller created, as one JSON document.
pub async fn export_my_data(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<UserDataExport>, MeError> {
    let subject = caller.require()?;
    let export = load_export(&state, &subject).await?;

    info!(
        user_id = %subject.user_id,
        records = export.record_count(),
        "Prepared personal data export"
    );
    Ok(Json(export))
}

/// GET /api/me/erasure-plan
///
/// Ids of every record a deletion request would remove.
pub async fn erasure_plan(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ErasurePlan>, MeError> {
    let subject = caller.require()?;
    let export = load_export(&state, &subject).await?;
    Ok(Json(ErasurePlan::from_export(&export)))
}

async fn load_export(state: &AppState, subject: &Subject) -> Result<UserDataExport, MeError> {
    let source = load_source(state, subject).await.map_err(|e| {
        error!("{:#}", e);
        MeError::DatabaseError(e.to_string())
    })?;
    Ok(build_export(subject, source, Utc::now()))
}

async fn load_source(state: &AppState, subject: &Subject) -> anyhow::Result<ExportSource> {
    Ok(ExportSource {
        profile: db::user_profile(&state.db, &subject.user_id).await?,
        asanas: db::owned_assets::<Asana>(&state.db, AssetKind::Asanas, subject).await?,
        series: db::owned_assets::<Series>(&state.db, AssetKind::Series, subject).await?,
        sequences: db::owned_assets::<Sequence>(&state.db, AssetKind::Sequences, subject).await?,
        reminders: db::user_reminders(&state.db, subject).await?,
    })
}

#[derive(Debug)]
pub enum MeError {
    Identity(IdentityError),
    DatabaseError(String),
}

impl From<IdentityError> for MeError {
    fn from(e: IdentityError) -> Self {
        MeError::Identity(e)
    }
}

impl IntoResponse for MeError {
    fn into_response(self) -> Response {
        match self {
            MeError::Identity(e) => e.into_response(),
            MeError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Database error: {}", msg) })),
            )
                .into_response(),
        }
    }
}
