//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-memory store used without a database and in tests
//! - **cache**: in-memory listing cache with freshness and retention windows
//! - **places**: reqwest-backed place search client
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod memory;
pub mod persistence;
pub mod places;
