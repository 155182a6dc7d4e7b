//! HTTP route handlers.

pub mod admin;
pub mod events;
pub mod health;
pub mod register;
pub mod settings;
pub mod view;
