//! Shift plan entity (database row mapping).

use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the shift_plans table.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftPlanEntity {
    pub installation_id: Uuid,
    pub shift_date: NaiveDate,
    pub post: String,
}

impl From<ShiftPlanEntity> for domain::models::ShiftPlan {
    fn from(entity: ShiftPlanEntity) -> Self {
        Self {
            installation_id: entity.installation_id,
            date: entity.shift_date,
            post: entity.post,
        }
    }
}
