//! Application services: email dispatch, OTP flows, registration flow.

pub mod email;
pub mod otp;
pub mod registration;

pub use email::EmailService;
pub use otp::OtpService;
pub use registration::RegistrationService;
