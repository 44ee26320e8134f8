//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod platform;
pub mod telemetry;
