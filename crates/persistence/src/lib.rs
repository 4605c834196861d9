//! Persistence layer for the Taskboard backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Postgres repositories implementing the domain store traits
//! - An in-memory backend implementing the same traits

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod repositories;

pub use memory::MemoryStore;
pub use repositories::postgres_stores;
