//! Planned guard shifts (roster rows).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// A guard shift planned for an installation on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPlan {
    pub installation_id: Uuid,
    pub date: NaiveDate,
    pub post: String,
}

/// Collapses roster rows into the set of planned days per installation.
///
/// Several posts covering the same installation on the same day count once.
pub fn planned_days(plans: &[ShiftPlan]) -> BTreeMap<Uuid, BTreeSet<NaiveDate>> {
    let mut days: BTreeMap<Uuid, BTreeSet<NaiveDate>> = BTreeMap::new();
    for plan in plans {
        days.entry(plan.installation_id).or_default().insert(plan.date);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    #[test]
    fn test_planned_days_collapses_posts() {
        let installation = Uuid::new_v4();
        let plans = vec![
            ShiftPlan {
                installation_id: installation,
                date: date(1),
                post: "Portería".to_string(),
            },
            ShiftPlan {
                installation_id: installation,
                date: date(1),
                post: "Ronda".to_string(),
            },
            ShiftPlan {
                installation_id: installation,
                date: date(2),
                post: "Portería".to_string(),
            },
        ];

        let days = planned_days(&plans);
        assert_eq!(days.len(), 1);
        let set = &days[&installation];
        assert_eq!(set.len(), 2);
        assert!(set.contains(&date(1)));
        assert!(set.contains(&date(2)));
    }

    #[test]
    fn test_planned_days_empty() {
        assert!(planned_days(&[]).is_empty());
    }
}
