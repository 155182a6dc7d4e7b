//! Repository implementations.
//!
//! Repositories own all SQL. The registration repository additionally owns
//! the one transaction in the system: the atomic student + membership write.

pub mod event;
pub mod otp;
pub mod registration;
pub mod student;

pub use event::EventRepository;
pub use otp::OtpRepository;
pub use registration::{
    NewStudent, RegistrationError, RegistrationRepository, ResolvedSelection,
};
pub use student::StudentRepository;
