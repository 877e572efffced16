//! Domain types and pure logic for the electoral mobilization platform.
//!
//! This crate has no I/O: it holds the shared ID/timestamp aliases, the
//! error taxonomy, role/capability resolution, the vehicle status enum,
//! the dashboard aggregation functions, and the bulk-import row
//! validation pipeline. Everything here is deterministic and unit-tested
//! without a database or HTTP stack.

pub mod error;
pub mod import;
pub mod roles;
pub mod stats;
pub mod status;
pub mod types;
