//! Domain services.

pub mod notification;
pub mod quota;
pub mod settings;
