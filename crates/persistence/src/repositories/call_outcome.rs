//! Call outcome repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CallOutcomeEntity;
use crate::metrics::QueryTimer;

/// Input data for recording a call outcome.
#[derive(Debug, Clone)]
pub struct CallOutcomeInput {
    pub installation_id: Uuid,
    /// Already truncated to the top of the local hour.
    pub scheduled_hour: DateTime<Utc>,
    pub state: String,
    pub observations: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
}

/// Partial update of a recorded outcome. `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct CallOutcomeUpdate {
    pub state: Option<String>,
    pub observations: Option<String>,
    /// Applied only when `state` is set.
    pub executed_at: Option<DateTime<Utc>>,
}

/// Repository for operator-recorded call outcomes.
#[derive(Clone)]
pub struct CallOutcomeRepository {
    pool: PgPool,
}

impl CallOutcomeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Outcomes with `scheduled_hour` in `[from, to)`, every installation.
    pub async fn find_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CallOutcomeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_call_outcomes_between");
        let result = sqlx::query_as::<_, CallOutcomeEntity>(
            r#"
            SELECT id, installation_id, scheduled_hour, state, observations,
                   executed_at, created_at, updated_at
            FROM call_outcomes
            WHERE scheduled_hour >= $1 AND scheduled_hour < $2
            ORDER BY scheduled_hour, installation_id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Outcome history of one installation in `[from, to)`, newest first.
    pub async fn find_by_installation_between(
        &self,
        installation_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CallOutcomeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_call_outcomes_by_installation");
        let result = sqlx::query_as::<_, CallOutcomeEntity>(
            r#"
            SELECT id, installation_id, scheduled_hour, state, observations,
                   executed_at, created_at, updated_at
            FROM call_outcomes
            WHERE installation_id = $1
              AND scheduled_hour >= $2 AND scheduled_hour < $3
            ORDER BY scheduled_hour DESC, updated_at DESC
            "#,
        )
        .bind(installation_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Appends a new outcome row.
    pub async fn create(&self, input: CallOutcomeInput) -> Result<CallOutcomeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_call_outcome");
        let result = sqlx::query_as::<_, CallOutcomeEntity>(
            r#"
            INSERT INTO call_outcomes (
                installation_id, scheduled_hour, state, observations, executed_at
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, installation_id, scheduled_hour, state, observations,
                      executed_at, created_at, updated_at
            "#,
        )
        .bind(input.installation_id)
        .bind(input.scheduled_hour)
        .bind(input.state)
        .bind(input.observations)
        .bind(input.executed_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates state and/or observations. Returns `None` for an unknown id.
    pub async fn update(
        &self,
        id: Uuid,
        update: CallOutcomeUpdate,
    ) -> Result<Option<CallOutcomeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_call_outcome");
        let result = sqlx::query_as::<_, CallOutcomeEntity>(
            r#"
            UPDATE call_outcomes
            SET state = COALESCE($2, state),
                observations = COALESCE($3, observations),
                executed_at = CASE WHEN $2::VARCHAR IS NULL THEN executed_at ELSE $4 END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, installation_id, scheduled_hour, state, observations,
                      executed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.state)
        .bind(update.observations)
        .bind(update.executed_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
