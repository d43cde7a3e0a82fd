//! Call outcome endpoints.
//!
//! Outcomes are written only by explicit operator action. Recording appends
//! a row; several rows for the same slot hour are resolved by the agenda
//! (latest write wins).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::call_outcome::{
    CallHistoryQuery, CallOutcomeResponse, ListCallOutcomesResponse, RecordCallOutcomeRequest,
    UpdateCallOutcomeRequest,
};
use domain::models::{CallState, RecordedCallOutcome};
use domain::services::{localize, truncate_to_local_hour};
use persistence::repositories::{
    CallOutcomeInput, CallOutcomeRepository, CallOutcomeUpdate, InstallationRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_call_outcome;

/// Default span of the call history when no range is given.
const DEFAULT_HISTORY_DAYS: i64 = 7;

fn parse_state(state: &str) -> Result<CallState, ApiError> {
    state.parse::<CallState>().map_err(ApiError::Validation)
}

/// Record the outcome of a call.
///
/// POST /api/v1/monitoring/calls
pub async fn create_call_outcome(
    State(state): State<AppState>,
    Json(request): Json<RecordCallOutcomeRequest>,
) -> Result<(StatusCode, Json<CallOutcomeResponse>), ApiError> {
    request.validate()?;
    let call_state = parse_state(&request.state)?;

    InstallationRepository::new(state.pool.clone())
        .find_by_id(request.installation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Installation not found".to_string()))?;

    let now = state.clock.now();
    let scheduled_hour = truncate_to_local_hour(request.scheduled_hour, state.schedule.timezone);

    let entity = CallOutcomeRepository::new(state.pool.clone())
        .create(CallOutcomeInput {
            installation_id: request.installation_id,
            scheduled_hour,
            state: call_state.as_str().to_string(),
            observations: request.observations,
            executed_at: call_state.executed_at(now),
        })
        .await?;
    let outcome: RecordedCallOutcome = entity.into();

    record_call_outcome(outcome.state);
    info!(
        outcome_id = %outcome.id,
        installation_id = %outcome.installation_id,
        scheduled_hour = %outcome.scheduled_hour,
        state = %outcome.state,
        "Call outcome recorded"
    );

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Change the state and/or observations of a recorded outcome.
///
/// PATCH /api/v1/monitoring/calls/:outcome_id
pub async fn update_call_outcome(
    State(state): State<AppState>,
    Path(outcome_id): Path<Uuid>,
    Json(request): Json<UpdateCallOutcomeRequest>,
) -> Result<Json<CallOutcomeResponse>, ApiError> {
    request.validate()?;
    let call_state = request.state.as_deref().map(parse_state).transpose()?;

    if call_state.is_none() && request.observations.is_none() {
        return Err(ApiError::Validation(
            "Nothing to update: provide state or observations".to_string(),
        ));
    }

    let now = state.clock.now();
    let entity = CallOutcomeRepository::new(state.pool.clone())
        .update(
            outcome_id,
            CallOutcomeUpdate {
                state: call_state.map(|s| s.as_str().to_string()),
                observations: request.observations,
                executed_at: call_state.and_then(|s| s.executed_at(now)),
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Call outcome not found".to_string()))?;
    let outcome: RecordedCallOutcome = entity.into();

    if let Some(s) = call_state {
        record_call_outcome(s);
    }
    info!(
        outcome_id = %outcome.id,
        state = %outcome.state,
        "Call outcome updated"
    );

    Ok(Json(outcome.into()))
}

/// Recorded outcomes of one installation, newest first.
///
/// `from` and `to` are local dates, both inclusive. Defaults to the last
/// seven days up to today.
///
/// GET /api/v1/monitoring/installations/:installation_id/calls
pub async fn list_installation_calls(
    State(state): State<AppState>,
    Path(installation_id): Path<Uuid>,
    Query(query): Query<CallHistoryQuery>,
) -> Result<Json<ListCallOutcomesResponse>, ApiError> {
    let tz = state.schedule.timezone;
    let today = state.clock.now().with_timezone(&tz).date_naive();
    let to = query.to.unwrap_or(today);
    let from = match query.from {
        Some(from) => from,
        None => to
            .checked_sub_signed(chrono::Duration::days(DEFAULT_HISTORY_DAYS - 1))
            .ok_or_else(|| ApiError::Validation(format!("Date out of supported range: {}", to)))?,
    };

    if from > to {
        return Err(ApiError::Validation(
            "'from' must not be after 'to'".to_string(),
        ));
    }

    let start = local_midnight(from, tz)?;
    let end = local_midnight(
        to.succ_opt()
            .ok_or_else(|| ApiError::Validation(format!("Date out of supported range: {}", to)))?,
        tz,
    )?;

    let calls: Vec<CallOutcomeResponse> = CallOutcomeRepository::new(state.pool.clone())
        .find_by_installation_between(installation_id, start, end)
        .await?
        .into_iter()
        .map(|e| RecordedCallOutcome::from(e).into())
        .collect();

    Ok(Json(ListCallOutcomesResponse {
        total: calls.len(),
        calls,
    }))
}

fn local_midnight(date: NaiveDate, tz: chrono_tz::Tz) -> Result<DateTime<Utc>, ApiError> {
    localize(tz, date.and_time(chrono::NaiveTime::MIN))
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| ApiError::Validation(format!("Date out of supported range: {}", date)))
}
