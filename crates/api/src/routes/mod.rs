//! HTTP route handlers.

pub mod audit_logs;
pub mod auth;
pub mod health;
pub mod tasks;
