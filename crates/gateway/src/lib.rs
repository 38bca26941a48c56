//! HTTP gateway to the area budget ledger service.
//!
//! Implements `metas_core::ledger::LedgerSource` by posting the rollup query
//! as JSON to `{base_url}/ledger/rollup`.

pub mod client;
pub mod error;

pub use client::{HttpLedgerSource, ROLLUP_PATH};
pub use error::GatewayError;
