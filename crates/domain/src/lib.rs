//! Domain layer for the symposium registration backend.
//!
//! This crate contains:
//! - Domain models (Student, Event, OTP, settings)
//! - Business logic services (settings store, OTP quota, notifier trait)

pub mod models;
pub mod services;
