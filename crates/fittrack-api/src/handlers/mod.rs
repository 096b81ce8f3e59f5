//! HTTP handlers, one module per resource.

pub mod accounts;
pub mod ai;
pub mod body_metrics;
pub mod dashboard;
pub mod exercises;
pub mod foods;
pub mod goals;
pub mod meals;
pub mod profile;
pub mod system;
pub mod water;
pub mod workouts;
