//! Call window configuration endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::call_window::{
    CallWindowResponse, ListCallWindowsResponse, UpsertCallWindowRequest,
};
use domain::models::CallWindowConfig;
use persistence::repositories::{CallWindowInput, CallWindowRepository, InstallationRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// List every call window configuration with its installation name.
///
/// GET /api/v1/monitoring/call-windows
pub async fn list_call_windows(
    State(state): State<AppState>,
) -> Result<Json<ListCallWindowsResponse>, ApiError> {
    let repo = CallWindowRepository::new(state.pool.clone());
    let call_windows: Vec<CallWindowResponse> = repo
        .list_with_installation()
        .await?
        .into_iter()
        .map(|row| {
            let (config, name) = row.into_parts();
            CallWindowResponse {
                installation_name: Some(name),
                ..config.into()
            }
        })
        .collect();

    Ok(Json(ListCallWindowsResponse {
        total: call_windows.len(),
        call_windows,
    }))
}

/// GET /api/v1/monitoring/installations/:installation_id/call-window
pub async fn get_call_window(
    State(state): State<AppState>,
    Path(installation_id): Path<Uuid>,
) -> Result<Json<CallWindowResponse>, ApiError> {
    let repo = CallWindowRepository::new(state.pool.clone());
    let (config, name) = repo
        .find_by_installation(installation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Call window not configured".to_string()))?
        .into_parts();

    Ok(Json(CallWindowResponse {
        installation_name: Some(name),
        ..config.into()
    }))
}

/// Create or replace the call window of an installation.
///
/// PUT /api/v1/monitoring/installations/:installation_id/call-window
pub async fn upsert_call_window(
    State(state): State<AppState>,
    Path(installation_id): Path<Uuid>,
    Json(request): Json<UpsertCallWindowRequest>,
) -> Result<Json<CallWindowResponse>, ApiError> {
    request.validate()?;
    let parsed = request.parse()?;

    let installation = InstallationRepository::new(state.pool.clone())
        .find_by_id(installation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Installation not found".to_string()))?;

    let entity = CallWindowRepository::new(state.pool.clone())
        .upsert(CallWindowInput {
            installation_id,
            interval_minutes: parsed.interval_minutes,
            window_start: parsed.window_start,
            window_end: parsed.window_end,
            enabled: parsed.enabled,
            message_template: parsed.message_template,
        })
        .await?;

    let response = CallWindowResponse {
        installation_name: Some(installation.name),
        ..CallWindowConfig::from(entity).into()
    };

    info!(
        installation_id = %installation_id,
        interval_minutes = parsed.interval_minutes,
        enabled = parsed.enabled,
        crosses_midnight = ?response.crosses_midnight,
        "Call window saved"
    );

    Ok(Json(response))
}
