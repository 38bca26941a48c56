//! Shared types, formatting helpers, errors, and configuration for Metas.
//!
//! This crate provides common pieces used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for activities and areas
//! - Numeric formatting and the shared reconciliation tolerance
//! - Application-wide error types
//! - Configuration management and tracing bootstrap

pub mod config;
pub mod error;
pub mod format;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use format::TOLERANCE;
