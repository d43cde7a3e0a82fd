//! Repository implementations for database operations.

pub mod call_outcome;
pub mod call_window;
pub mod installation;
pub mod shift_plan;

pub use call_outcome::{CallOutcomeInput, CallOutcomeRepository, CallOutcomeUpdate};
pub use call_window::{CallWindowInput, CallWindowRepository};
pub use installation::InstallationRepository;
pub use shift_plan::ShiftPlanRepository;
