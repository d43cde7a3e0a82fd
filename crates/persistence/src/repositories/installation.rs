//! Installation repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InstallationEntity;
use crate::metrics::QueryTimer;

/// Read-only access to installation descriptors.
#[derive(Clone)]
pub struct InstallationRepository {
    pool: PgPool,
}

impl InstallationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InstallationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_installation_by_id");
        let result = sqlx::query_as::<_, InstallationEntity>(
            r#"
            SELECT id, name, client_name, contact_phone
            FROM installations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Installations among `ids`, ordered by name.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<InstallationEntity>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("find_installations_by_ids");
        let result = sqlx::query_as::<_, InstallationEntity>(
            r#"
            SELECT id, name, client_name, contact_phone
            FROM installations
            WHERE id = ANY($1)
            ORDER BY name, id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
