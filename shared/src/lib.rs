//! Dukkan Shared Library
//!
//! This crate contains the small utilities the Dukkan web client shares:
//! display formatting, field validation, and a telemetry facade.
//!
//! # Modules
//!
//! - [`format`] - Arabic date, relative-time, and status formatting
//! - [`validation`] - Email, password, username, and age validators
//! - [`telemetry`] - Leveled logging and metrics forwarded to a backend
//! - [`models`] - Log, breadcrumb, and metric value types
//! - [`config`] - Telemetry configuration from the environment
//!
//! # Example
//!
//! ```
//! use dukkan_shared::format::{format_time_ago, status_color, JUST_NOW};
//! use dukkan_shared::validation::validate_password;
//!
//! assert_eq!(format_time_ago(dukkan_shared::chrono::Utc::now()), JUST_NOW);
//! assert_eq!(status_color(true), "text-success");
//! assert!(!validate_password("short").is_valid);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod format;
pub mod models;
pub mod telemetry;
pub mod validation;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
