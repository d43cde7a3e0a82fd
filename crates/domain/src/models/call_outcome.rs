//! Recorded call outcome domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// State of a check-in call as recorded by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    Pending,
    Successful,
    NoAnswer,
    Busy,
    Incident,
    Cancelled,
}

impl CallState {
    pub const ALL: [CallState; 6] = [
        CallState::Pending,
        CallState::Successful,
        CallState::NoAnswer,
        CallState::Busy,
        CallState::Incident,
        CallState::Cancelled,
    ];

    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Pending => "pending",
            CallState::Successful => "successful",
            CallState::NoAnswer => "no_answer",
            CallState::Busy => "busy",
            CallState::Incident => "incident",
            CallState::Cancelled => "cancelled",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CallState::Pending)
    }

    /// The call took place and someone answered.
    pub fn is_completed(&self) -> bool {
        matches!(self, CallState::Successful | CallState::Incident)
    }

    /// The call was attempted or dropped without reaching the post.
    pub fn is_not_done(&self) -> bool {
        matches!(
            self,
            CallState::NoAnswer | CallState::Busy | CallState::Cancelled
        )
    }

    /// Execution timestamp to store when moving into this state.
    pub fn executed_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_pending() {
            None
        } else {
            Some(now)
        }
    }
}

impl FromStr for CallState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(CallState::Pending),
            "successful" => Ok(CallState::Successful),
            "no_answer" => Ok(CallState::NoAnswer),
            "busy" => Ok(CallState::Busy),
            "incident" => Ok(CallState::Incident),
            "cancelled" => Ok(CallState::Cancelled),
            _ => Err(format!(
                "Unknown call state '{}'; expected one of: pending, successful, no_answer, busy, incident, cancelled",
                s
            )),
        }
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an actual call, recorded by an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedCallOutcome {
    pub id: Uuid,
    pub installation_id: Uuid,
    pub scheduled_hour: DateTime<Utc>,
    pub state: CallState,
    pub observations: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordedCallOutcome {
    /// Latest-write-wins ordering used when several outcomes share a slot.
    pub fn is_newer_than(&self, other: &RecordedCallOutcome) -> bool {
        (self.updated_at, self.created_at, self.id) > (other.updated_at, other.created_at, other.id)
    }
}

/// Request payload for recording a call outcome.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordCallOutcomeRequest {
    pub installation_id: Uuid,

    /// Any instant inside the slot's hour; stored truncated to the local hour.
    pub scheduled_hour: DateTime<Utc>,

    /// Validated against [`CallState`] by the handler so unknown values map to a 400.
    pub state: String,

    #[validate(length(max = 2000, message = "Observations must be at most 2000 characters"))]
    pub observations: Option<String>,
}

/// Request payload for updating an existing call outcome.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCallOutcomeRequest {
    pub state: Option<String>,

    #[validate(length(max = 2000, message = "Observations must be at most 2000 characters"))]
    pub observations: Option<String>,
}

/// Response payload for call outcome operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutcomeResponse {
    pub id: Uuid,
    pub installation_id: Uuid,
    pub scheduled_hour: DateTime<Utc>,
    pub state: CallState,
    pub observations: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecordedCallOutcome> for CallOutcomeResponse {
    fn from(o: RecordedCallOutcome) -> Self {
        Self {
            id: o.id,
            installation_id: o.installation_id,
            scheduled_hour: o.scheduled_hour,
            state: o.state,
            observations: o.observations,
            executed_at: o.executed_at,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// Response for listing an installation's call history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCallOutcomesResponse {
    pub calls: Vec<CallOutcomeResponse>,
    pub total: usize,
}

/// Query parameters for an installation's call history (local dates, inclusive).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
