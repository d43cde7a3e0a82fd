//! Call window configuration entity (database row mapping).

use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::CallWindowConfig;

/// Database row mapping for the call_window_configs table.
#[derive(Debug, Clone, FromRow)]
pub struct CallWindowConfigEntity {
    pub installation_id: Uuid,
    pub interval_minutes: Option<i32>,
    pub window_start: Option<NaiveTime>,
    pub window_end: Option<NaiveTime>,
    pub enabled: bool,
    pub message_template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CallWindowConfigEntity> for CallWindowConfig {
    fn from(entity: CallWindowConfigEntity) -> Self {
        Self {
            installation_id: entity.installation_id,
            interval_minutes: entity.interval_minutes,
            window_start: entity.window_start,
            window_end: entity.window_end,
            enabled: entity.enabled,
            message_template: entity.message_template,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Call window row joined with its installation name.
#[derive(Debug, Clone, FromRow)]
pub struct CallWindowWithInstallationEntity {
    #[sqlx(flatten)]
    pub config: CallWindowConfigEntity,
    pub installation_name: String,
}

impl CallWindowWithInstallationEntity {
    pub fn into_parts(self) -> (CallWindowConfig, String) {
        (self.config.into(), self.installation_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entity() -> CallWindowConfigEntity {
        CallWindowConfigEntity {
            installation_id: Uuid::new_v4(),
            interval_minutes: Some(60),
            window_start: NaiveTime::from_hms_opt(21, 0, 0),
            window_end: NaiveTime::from_hms_opt(7, 0, 0),
            enabled: true,
            message_template: Some("Control {installation} {time}".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_call_window_entity_to_domain() {
        let entity = create_test_entity();
        let config: CallWindowConfig = entity.clone().into();

        assert_eq!(config.installation_id, entity.installation_id);
        assert_eq!(config.interval_minutes, Some(60));
        assert_eq!(config.crosses_midnight(), Some(true));
        assert!(config.schedulable().is_some());
        assert_eq!(config.message_template, entity.message_template);
    }

    #[test]
    fn test_incomplete_row_is_not_schedulable() {
        let mut entity = create_test_entity();
        entity.window_end = None;
        let config: CallWindowConfig = entity.into();
        assert!(config.schedulable().is_none());
    }

    #[test]
    fn test_with_installation_into_parts() {
        let joined = CallWindowWithInstallationEntity {
            config: create_test_entity(),
            installation_name: "Colegio San Jorge".to_string(),
        };
        let (config, name) = joined.clone().into_parts();
        assert_eq!(config.installation_id, joined.config.installation_id);
        assert_eq!(name, "Colegio San Jorge");
    }
}
