//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod call_outcome;
pub mod call_window;
pub mod installation;
pub mod shift_plan;

pub use call_outcome::CallOutcomeEntity;
pub use call_window::{CallWindowConfigEntity, CallWindowWithInstallationEntity};
pub use installation::InstallationEntity;
pub use shift_plan::ShiftPlanEntity;
