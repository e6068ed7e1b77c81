//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the restaurant and visit repository ports,
//! backed by `diesel-async` with `bb8` pooling.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay internal.
//! - Every database error becomes a typed port error.
//!
//! # Example
//!
//! ```no_run
//! use lunchlog::outbound::persistence::{DbPool, DieselRestaurantRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), lunchlog::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/lunchlog")).await?;
//! let restaurants = DieselRestaurantRepository::new(pool);
//! # let _ = restaurants;
//! # Ok(())
//! # }
//! ```

mod diesel_restaurant_repository;
mod diesel_visit_repository;
mod error_mapping;
mod migrations;
mod models;
mod numeric;
mod pool;
mod schema;

pub use diesel_restaurant_repository::DieselRestaurantRepository;
pub use diesel_visit_repository::DieselVisitRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
