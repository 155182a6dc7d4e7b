//! Shared utilities for the symposium backend.
//!
//! This crate contains:
//! - Field validators used by request DTOs
//! - OTP code and team token generation

pub mod codes;
pub mod validation;
