//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod otp;
pub mod student;

pub use event::EventEntity;
pub use otp::{OtpEntity, OtpPurposeDb};
pub use student::{MembershipWithEventEntity, RegistrantEntity, StudentEntity};
