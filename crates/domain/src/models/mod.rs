//! Domain models for central monitoring.

pub mod agenda;
pub mod call_outcome;
pub mod call_window;
pub mod installation;
pub mod shift_plan;

pub use agenda::{AgendaCounts, AgendaQuery, AgendaResponse, ReconciledCallEntry, StatusFilter};
pub use call_outcome::{CallState, RecordedCallOutcome};
pub use call_window::CallWindowConfig;
pub use installation::{Installation, InstallationSummary};
pub use shift_plan::ShiftPlan;
