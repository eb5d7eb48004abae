//! Data models for the Dukkan telemetry facade.
//!
//! This module contains the value types shipped to telemetry backends:
//! log entries, breadcrumbs, and metric samples.

pub mod breadcrumb;
pub mod log;
pub mod metric;

pub use breadcrumb::{Breadcrumb, BreadcrumbLevel, LOG_CATEGORY};
pub use log::{Attributes, LogEntry, LogLevel, LogValidationError};
pub use metric::{
    MetricKind, MetricOptions, MetricSample, MetricUnit, MetricValidationError, MetricValue, Tags,
};
