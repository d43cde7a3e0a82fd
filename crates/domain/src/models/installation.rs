//! Installation descriptor used by the monitoring agenda.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guarded site. Owned by the operations module; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: Uuid,
    pub name: String,
    pub client_name: Option<String>,
    pub contact_phone: Option<String>,
}

/// Entry of the installation filter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Installation> for InstallationSummary {
    fn from(installation: &Installation) -> Self {
        Self {
            id: installation.id,
            name: installation.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installation() -> Installation {
        Installation {
            id: Uuid::new_v4(),
            name: "Bodega Quilicura".to_string(),
            client_name: Some("Logística Andes".to_string()),
            contact_phone: Some("+56911112222".to_string()),
        }
    }

    #[test]
    fn test_installation_summary_from() {
        let i = installation();
        let summary = InstallationSummary::from(&i);
        assert_eq!(summary.id, i.id);
        assert_eq!(summary.name, "Bodega Quilicura");
    }
}
