//! Shared utilities and common types for the Taskboard backend.
//!
//! This crate provides functionality used across the other crates:
//! - Access token issuing and verification (JWT)
//! - Password hashing with Argon2id
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod validation;
