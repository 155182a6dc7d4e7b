//! Domain model definitions.

pub mod event;
pub mod otp;
pub mod settings;
pub mod student;
