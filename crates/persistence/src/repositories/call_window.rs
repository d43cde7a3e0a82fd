//! Call window configuration repository for database operations.

use chrono::NaiveTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CallWindowConfigEntity, CallWindowWithInstallationEntity};
use crate::metrics::QueryTimer;

/// Input data for creating or replacing a call window.
#[derive(Debug, Clone)]
pub struct CallWindowInput {
    pub installation_id: Uuid,
    pub interval_minutes: i32,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub enabled: bool,
    pub message_template: Option<String>,
}

/// Repository for call window configurations.
#[derive(Clone)]
pub struct CallWindowRepository {
    pool: PgPool,
}

impl CallWindowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every configuration with its installation name, ordered by name.
    pub async fn list_with_installation(
        &self,
    ) -> Result<Vec<CallWindowWithInstallationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_call_windows");
        let result = sqlx::query_as::<_, CallWindowWithInstallationEntity>(
            r#"
            SELECT c.installation_id, c.interval_minutes, c.window_start, c.window_end,
                   c.enabled, c.message_template, c.created_at, c.updated_at,
                   i.name AS installation_name
            FROM call_window_configs c
            JOIN installations i ON i.id = c.installation_id
            ORDER BY i.name, c.installation_id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Enabled configurations. Incomplete rows are returned as-is.
    pub async fn find_enabled(&self) -> Result<Vec<CallWindowConfigEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_enabled_call_windows");
        let result = sqlx::query_as::<_, CallWindowConfigEntity>(
            r#"
            SELECT installation_id, interval_minutes, window_start, window_end,
                   enabled, message_template, created_at, updated_at
            FROM call_window_configs
            WHERE enabled = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_installation(
        &self,
        installation_id: Uuid,
    ) -> Result<Option<CallWindowWithInstallationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_call_window_by_installation");
        let result = sqlx::query_as::<_, CallWindowWithInstallationEntity>(
            r#"
            SELECT c.installation_id, c.interval_minutes, c.window_start, c.window_end,
                   c.enabled, c.message_template, c.created_at, c.updated_at,
                   i.name AS installation_name
            FROM call_window_configs c
            JOIN installations i ON i.id = c.installation_id
            WHERE c.installation_id = $1
            "#,
        )
        .bind(installation_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Creates or replaces the configuration of an installation.
    ///
    /// An unknown installation surfaces as a foreign key violation.
    pub async fn upsert(
        &self,
        input: CallWindowInput,
    ) -> Result<CallWindowConfigEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_call_window");
        let result = sqlx::query_as::<_, CallWindowConfigEntity>(
            r#"
            INSERT INTO call_window_configs (
                installation_id, interval_minutes, window_start, window_end,
                enabled, message_template
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (installation_id)
            DO UPDATE SET
                interval_minutes = EXCLUDED.interval_minutes,
                window_start = EXCLUDED.window_start,
                window_end = EXCLUDED.window_end,
                enabled = EXCLUDED.enabled,
                message_template = EXCLUDED.message_template,
                updated_at = NOW()
            RETURNING installation_id, interval_minutes, window_start, window_end,
                      enabled, message_template, created_at, updated_at
            "#,
        )
        .bind(input.installation_id)
        .bind(input.interval_minutes)
        .bind(input.window_start)
        .bind(input.window_end)
        .bind(input.enabled)
        .bind(input.message_template)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
