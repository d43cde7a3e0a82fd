//! Shift plan repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::entities::ShiftPlanEntity;
use crate::metrics::QueryTimer;

/// Read-only access to planned guard shifts.
#[derive(Clone)]
pub struct ShiftPlanRepository {
    pool: PgPool,
}

impl ShiftPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Shifts planned on any date in `[from, to]`.
    pub async fn find_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ShiftPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_shift_plans_between");
        let result = sqlx::query_as::<_, ShiftPlanEntity>(
            r#"
            SELECT installation_id, shift_date, post
            FROM shift_plans
            WHERE shift_date BETWEEN $1 AND $2
            ORDER BY shift_date, installation_id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
