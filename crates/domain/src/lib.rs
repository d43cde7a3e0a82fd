//! Domain layer for the central monitoring backend.
//!
//! This crate contains:
//! - Domain models (call windows, shift plans, call outcomes, agenda)
//! - The call scheduling algorithm: window resolution, slot generation,
//!   per-hour deduplication, status classification and outcome reconciliation

pub mod models;
pub mod services;
