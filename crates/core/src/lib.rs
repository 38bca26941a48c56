//! Core business logic for Metas.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It reconciles an activity's budget and target across six bimesters and
//! against its area's budget ceiling.
//!
//! # Modules
//!
//! - `quantity` - Locale-tolerant number parsing and breakdown token extraction
//! - `distribution` - Bimester allocations, live summary, and save-time validation
//! - `ledger` - Area ceiling lookup, commitment rollup, and ceiling check
//! - `engine` - Final save gate combining both checks

pub mod distribution;
pub mod engine;
pub mod ledger;
pub mod quantity;

pub use engine::{ReconcileError, SaveGate};
