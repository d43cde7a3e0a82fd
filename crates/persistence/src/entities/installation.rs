//! Installation entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the installations table.
#[derive(Debug, Clone, FromRow)]
pub struct InstallationEntity {
    pub id: Uuid,
    pub name: String,
    pub client_name: Option<String>,
    pub contact_phone: Option<String>,
}

impl From<InstallationEntity> for domain::models::Installation {
    fn from(entity: InstallationEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            client_name: entity.client_name,
            contact_phone: entity.contact_phone,
        }
    }
}
