//! Persistence layer for the symposium registration backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the registration transaction

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
