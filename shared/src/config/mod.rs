//! Configuration module for Dukkan.
//!
//! This module contains configuration structures for the telemetry backend.

pub mod telemetry;

pub use telemetry::{ConfigError, TelemetryConfig};
