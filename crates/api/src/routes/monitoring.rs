//! Monitoring agenda endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

use domain::models::{
    AgendaQuery, AgendaResponse, CallWindowConfig, Installation, RecordedCallOutcome, ShiftPlan,
};
use domain::services::{build_agenda, AgendaFilters, AgendaSources, OperationalDay};
use persistence::repositories::{
    CallOutcomeRepository, CallWindowRepository, InstallationRepository, ShiftPlanRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_agenda_entries, record_duplicate_outcomes};

/// Agenda of check-in calls for one operational day.
///
/// GET /api/v1/monitoring/agenda
pub async fn get_agenda(
    State(state): State<AppState>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<AgendaResponse>, ApiError> {
    let filters = AgendaFilters::from_query(&query).map_err(ApiError::Validation)?;

    // Sampled once for the whole evaluation
    let now = state.clock.now();
    let settings = state.schedule;
    let day = match query.date {
        Some(date) => OperationalDay::new(date, &settings)?,
        None => OperationalDay::containing(now, &settings)?,
    };

    let (first_shift, last_shift) = day.shift_dates();
    let shift_plans: Vec<ShiftPlan> = ShiftPlanRepository::new(state.pool.clone())
        .find_between(first_shift, last_shift)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let configs: Vec<CallWindowConfig> = CallWindowRepository::new(state.pool.clone())
        .find_enabled()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let (start, end) = day.utc_range();
    let outcomes: Vec<RecordedCallOutcome> = CallOutcomeRepository::new(state.pool.clone())
        .find_between(start, end)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let planned: BTreeSet<Uuid> = shift_plans.iter().map(|p| p.installation_id).collect();
    let installation_ids: Vec<Uuid> = configs
        .iter()
        .map(|c| c.installation_id)
        .filter(|id| planned.contains(id))
        .collect();
    let installations: Vec<Installation> = InstallationRepository::new(state.pool.clone())
        .find_by_ids(&installation_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let build = build_agenda(
        &day,
        AgendaSources {
            configs: &configs,
            shift_plans: &shift_plans,
            outcomes: &outcomes,
            installations: &installations,
        },
        &filters,
        &settings,
        now,
    );

    record_agenda_entries(build.response.entries.len());
    record_duplicate_outcomes(build.duplicate_outcomes);

    info!(
        date = %day.date,
        total = build.response.counts.total,
        urgent = build.response.counts.urgent,
        returned = build.response.entries.len(),
        "Monitoring agenda generated"
    );

    Ok(Json(build.response))
}
