//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod error;
pub mod health;
pub mod places;
pub mod restaurants;
pub mod schemas;
pub mod session;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod visits;

pub use crate::domain::ApiResult;
