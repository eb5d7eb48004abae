//! In-memory telemetry backend.

use std::sync::{PoisonError, RwLock};

use crate::models::{
    Attributes, Breadcrumb, LogEntry, LogLevel, MetricKind, MetricOptions, MetricSample,
    MetricValue,
};

use super::backend::{LeveledLogger, TelemetryBackend};

/// In-memory backend implementation.
///
/// Records everything it receives in `Vec`s protected by `RwLock`s. It is
/// suitable for tests and local inspection.
///
/// **Note:** Nothing is shipped anywhere.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dukkan_shared::models::LogLevel;
/// use dukkan_shared::telemetry::{InMemoryBackend, Telemetry};
///
/// let backend = Arc::new(InMemoryBackend::with_logger("dukkan-web"));
/// let telemetry = Telemetry::new(backend.clone());
///
/// telemetry.info("Cart updated", None);
///
/// let logs = backend.logs();
/// assert_eq!(logs.len(), 1);
/// assert_eq!(logs[0].level, LogLevel::Info);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    service: String,
    accepted: Option<Vec<LogLevel>>,
    logs: RwLock<Vec<LogEntry>>,
    breadcrumbs: RwLock<Vec<Breadcrumb>>,
    samples: RwLock<Vec<MetricSample>>,
}

impl InMemoryBackend {
    /// Creates a backend without structured logging; log calls become
    /// breadcrumbs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose structured logging accepts every level.
    #[must_use]
    pub fn with_logger(service: impl Into<String>) -> Self {
        Self::with_logger_levels(service, &LogLevel::ALL)
    }

    /// Creates a backend whose structured logging accepts only `levels`.
    #[must_use]
    pub fn with_logger_levels(service: impl Into<String>, levels: &[LogLevel]) -> Self {
        Self {
            service: service.into(),
            accepted: Some(levels.to_vec()),
            ..Self::default()
        }
    }

    /// Returns the recorded log entries.
    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded breadcrumbs.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.breadcrumbs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded metric samples.
    #[must_use]
    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears everything recorded so far.
    pub fn clear(&self) {
        self.logs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.breadcrumbs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.samples
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, sample: MetricSample) {
        self.samples
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample);
    }
}

impl LeveledLogger for InMemoryBackend {
    fn accepts(&self, level: LogLevel) -> bool {
        self.accepted
            .as_ref()
            .is_some_and(|levels| levels.contains(&level))
    }

    fn log(&self, level: LogLevel, message: &str, data: &Attributes) {
        let entry = LogEntry::new(level, message, self.service.as_str()).with_attributes(data.clone());
        self.logs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl TelemetryBackend for InMemoryBackend {
    fn logger(&self) -> Option<&dyn LeveledLogger> {
        if self.accepted.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.breadcrumbs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(breadcrumb);
    }

    fn increment(&self, name: &str, value: f64, options: &MetricOptions) {
        self.record(MetricSample::from_call(MetricKind::Counter, name, value, options));
    }

    fn gauge(&self, name: &str, value: f64, options: &MetricOptions) {
        self.record(MetricSample::from_call(MetricKind::Gauge, name, value, options));
    }

    fn distribution(&self, name: &str, value: f64, options: &MetricOptions) {
        self.record(MetricSample::from_call(
            MetricKind::Distribution,
            name,
            value,
            options,
        ));
    }

    fn set(&self, name: &str, value: MetricValue, options: &MetricOptions) {
        self.record(MetricSample::from_call(MetricKind::Set, name, value, options));
    }
}
