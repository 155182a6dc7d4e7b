//! Background jobs.

pub mod cleanup_otps;
pub mod quota_reset;
pub mod scheduler;

pub use cleanup_otps::CleanupOtpsJob;
pub use quota_reset::QuotaResetJob;
pub use scheduler::{Job, JobScheduler};
