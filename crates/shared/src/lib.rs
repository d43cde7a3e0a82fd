//! Shared utilities and common types for the central monitoring backend.
//!
//! This crate provides functionality used across the other crates:
//! - Time-of-day and timezone parsing
//! - Common validation logic

pub mod time;
pub mod validation;
