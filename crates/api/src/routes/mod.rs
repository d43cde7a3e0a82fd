//! HTTP route handlers.

pub mod call_outcomes;
pub mod call_windows;
pub mod health;
pub mod monitoring;
