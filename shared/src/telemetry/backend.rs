//! Telemetry backend traits.
//!
//! A backend is the external observability client the facade forwards to.
//! Its structured logging is an optional capability: [`TelemetryBackend::logger`]
//! returns `None` when the backend only understands breadcrumbs.

use crate::models::{Attributes, Breadcrumb, LogLevel, MetricOptions, MetricValue};

/// Optional structured-logging capability of a backend.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait LeveledLogger: Send + Sync {
    /// Whether this logger has an entry point for `level`.
    ///
    /// Levels it rejects fall back to breadcrumbs. Defaults to all levels.
    fn accepts(&self, _level: LogLevel) -> bool {
        true
    }

    /// Records a structured log message.
    fn log(&self, level: LogLevel, message: &str, data: &Attributes);
}

/// Trait for telemetry backend clients.
///
/// Every method is fire-and-forget: delivery problems are the backend's
/// own concern and never reach the caller.
pub trait TelemetryBackend: Send + Sync {
    /// Returns the structured-logging capability, if the backend has one.
    fn logger(&self) -> Option<&dyn LeveledLogger> {
        None
    }

    /// Records a breadcrumb.
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb);

    /// Adds `value` to a counter.
    fn increment(&self, name: &str, value: f64, options: &MetricOptions);

    /// Sets a gauge to `value`.
    fn gauge(&self, name: &str, value: f64, options: &MetricOptions);

    /// Records one observation of a distribution.
    fn distribution(&self, name: &str, value: f64, options: &MetricOptions);

    /// Adds a member to a unique-count set.
    fn set(&self, name: &str, value: MetricValue, options: &MetricOptions);

    /// Blocks until in-flight deliveries finish.
    fn flush(&self) {}
}

/// Backend that drops everything.
///
/// Used when no ingestion endpoint is configured; the facade then only
/// writes to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

impl TelemetryBackend for NoopBackend {
    fn add_breadcrumb(&self, _breadcrumb: Breadcrumb) {}

    fn increment(&self, _name: &str, _value: f64, _options: &MetricOptions) {}

    fn gauge(&self, _name: &str, _value: f64, _options: &MetricOptions) {}

    fn distribution(&self, _name: &str, _value: f64, _options: &MetricOptions) {}

    fn set(&self, _name: &str, _value: MetricValue, _options: &MetricOptions) {}
}
