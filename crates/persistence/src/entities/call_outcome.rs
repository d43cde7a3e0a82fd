//! Call outcome entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{CallState, RecordedCallOutcome};

/// Database row mapping for the call_outcomes table.
#[derive(Debug, Clone, FromRow)]
pub struct CallOutcomeEntity {
    pub id: Uuid,
    pub installation_id: Uuid,
    pub scheduled_hour: DateTime<Utc>,
    pub state: String,
    pub observations: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CallOutcomeEntity {
    /// Convert to domain model.
    ///
    /// The column is constrained to known states; anything else reads as
    /// pending.
    pub fn into_domain(self) -> RecordedCallOutcome {
        let state = self.state.parse::<CallState>().unwrap_or_else(|_| {
            tracing::warn!(id = %self.id, state = %self.state, "Unknown call state in database");
            CallState::Pending
        });

        RecordedCallOutcome {
            id: self.id,
            installation_id: self.installation_id,
            scheduled_hour: self.scheduled_hour,
            state,
            observations: self.observations,
            executed_at: self.executed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<CallOutcomeEntity> for RecordedCallOutcome {
    fn from(entity: CallOutcomeEntity) -> Self {
        entity.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entity(state: &str) -> CallOutcomeEntity {
        CallOutcomeEntity {
            id: Uuid::new_v4(),
            installation_id: Uuid::new_v4(),
            scheduled_hour: Utc::now(),
            state: state.to_string(),
            observations: Some("Guardia confirma sin novedad".to_string()),
            executed_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_call_outcome_entity_to_domain() {
        let entity = create_test_entity("no_answer");
        let outcome: RecordedCallOutcome = entity.clone().into();

        assert_eq!(outcome.id, entity.id);
        assert_eq!(outcome.installation_id, entity.installation_id);
        assert_eq!(outcome.state, CallState::NoAnswer);
        assert_eq!(outcome.observations, entity.observations);
        assert_eq!(outcome.executed_at, entity.executed_at);
    }

    #[test]
    fn test_all_states_parse() {
        for state in CallState::ALL {
            let outcome = create_test_entity(state.as_str()).into_domain();
            assert_eq!(outcome.state, state);
        }
    }

    #[test]
    fn test_unknown_state_reads_as_pending() {
        let outcome = create_test_entity("escalated").into_domain();
        assert_eq!(outcome.state, CallState::Pending);
    }
}
