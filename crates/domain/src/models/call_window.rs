//! Call window configuration domain model.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::time::{format_time_of_day, parse_time_of_day, TimeParseError};

/// Per-installation configuration of the automatic check-in call window.
///
/// Interval and bounds are optional because legacy rows may lack them;
/// such a configuration never produces call slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallWindowConfig {
    pub installation_id: Uuid,
    pub interval_minutes: Option<i32>,
    pub window_start: Option<NaiveTime>,
    pub window_end: Option<NaiveTime>,
    pub enabled: bool,
    pub message_template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CallWindowConfig {
    /// Whether the window wraps past midnight (`start >= end`).
    ///
    /// Returns `None` when either bound is missing.
    pub fn crosses_midnight(&self) -> Option<bool> {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) => Some(start >= end),
            _ => None,
        }
    }

    /// Returns `(interval, start, end)` if this config can schedule calls.
    pub fn schedulable(&self) -> Option<(i32, NaiveTime, NaiveTime)> {
        if !self.enabled {
            return None;
        }
        match (self.interval_minutes, self.window_start, self.window_end) {
            (Some(interval), Some(start), Some(end)) if interval > 0 => {
                Some((interval, start, end))
            }
            _ => None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Request payload for creating or replacing an installation's call window.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCallWindowRequest {
    #[validate(range(min = 1, max = 1440, message = "Interval must be between 1 and 1440 minutes"))]
    pub interval_minutes: i32,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub window_start: String,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub window_end: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[validate(length(max = 1000, message = "Message template must be at most 1000 characters"))]
    pub message_template: Option<String>,
}

/// Parsed form of [`UpsertCallWindowRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallWindowInput {
    pub interval_minutes: i32,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub enabled: bool,
    pub message_template: Option<String>,
}

impl UpsertCallWindowRequest {
    /// Parses the time-of-day strings. Blank templates are dropped.
    pub fn parse(&self) -> Result<CallWindowInput, TimeParseError> {
        Ok(CallWindowInput {
            interval_minutes: self.interval_minutes,
            window_start: parse_time_of_day(&self.window_start)?,
            window_end: parse_time_of_day(&self.window_end)?,
            enabled: self.enabled,
            message_template: self
                .message_template
                .as_ref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        })
    }
}

/// Response payload for call window operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallWindowResponse {
    pub installation_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_name: Option<String>,
    pub interval_minutes: Option<i32>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub enabled: bool,
    pub crosses_midnight: Option<bool>,
    pub message_template: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<CallWindowConfig> for CallWindowResponse {
    fn from(config: CallWindowConfig) -> Self {
        Self {
            installation_id: config.installation_id,
            installation_name: None,
            interval_minutes: config.interval_minutes,
            window_start: config.window_start.map(format_time_of_day),
            window_end: config.window_end.map(format_time_of_day),
            enabled: config.enabled,
            crosses_midnight: config.crosses_midnight(),
            message_template: config.message_template,
            updated_at: config.updated_at,
        }
    }
}

/// Response for listing call windows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCallWindowsResponse {
    pub call_windows: Vec<CallWindowResponse>,
    pub total: usize,
}
