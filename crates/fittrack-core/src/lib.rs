//! # fittrack-core
//!
//! Core types, traits, and abstractions for the fittrack backend.
//!
//! This crate provides the domain model (accounts, profiles, body metrics,
//! the food and exercise reference catalogue, meal and workout logs, water
//! intake, goals), request validation, the dashboard aggregation, and the
//! repository and generation-backend traits that the other fittrack crates
//! implement.

pub mod dashboard;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use dashboard::{round_one_decimal, summarize, DashboardInputs, NutritionLine};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
pub use validation::Validate;
