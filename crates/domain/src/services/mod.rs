//! Domain services for the central monitoring backend.
//!
//! Everything here is synchronous and side-effect free apart from logging.

pub mod agenda;
pub mod call_schedule;
pub mod call_status;
pub mod clock;
pub mod message_template;
pub mod reconciliation;

pub use agenda::{
    build_agenda, AgendaBuild, AgendaError, AgendaFilters, AgendaSources, OperationalDay,
    ScheduleSettings,
};
pub use call_schedule::{
    deduplicate_slots, generate_for_planned_days, generate_slots, localize, resolve_windows,
    truncate_to_local_hour, GeneratedCallSlot, SlotSeries, WindowSegment,
};
pub use call_status::{SlotStatus, StatusClassifier, DEFAULT_URGENT_AFTER_MINUTES};
pub use clock::{Clock, FixedClock, SystemClock};
pub use message_template::{render_message, MessageContext, DEFAULT_MESSAGE_TEMPLATE};
pub use reconciliation::{reconcile_slot, OutcomeIndex};
