//! Logging and metrics facade.
//!
//! [`Telemetry`] writes every log call to the local [`Console`] and then
//! forwards it to a [`TelemetryBackend`]: to its structured logger when the
//! backend has one that accepts the level, otherwise as a breadcrumb.
//! Metric calls go straight to the backend's primitives.
//!
//! A process-wide instance is available through [`global`], built lazily
//! from the environment unless one was [`install`]ed first.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dukkan_shared::models::BreadcrumbLevel;
//! use dukkan_shared::telemetry::{InMemoryBackend, Telemetry};
//!
//! let backend = Arc::new(InMemoryBackend::new());
//! let telemetry = Telemetry::new(backend.clone());
//!
//! telemetry.warn("Payment slow", None);
//! telemetry.metrics().timing("payment_ms", 840.0, None);
//!
//! assert_eq!(backend.breadcrumbs()[0].level, BreadcrumbLevel::Warning);
//! assert_eq!(backend.samples().len(), 1);
//! ```

pub mod backend;
pub mod console;
pub mod http;
pub mod memory;

pub use backend::{LeveledLogger, NoopBackend, TelemetryBackend};
pub use console::{Console, ConsoleChannel, TracingConsole, CONSOLE_TARGET};
pub use http::HttpBackend;
pub use memory::InMemoryBackend;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::config::{ConfigError, TelemetryConfig};
use crate::models::{
    Attributes, Breadcrumb, LogLevel, MetricOptions, MetricUnit, MetricValue, Tags,
};

static GLOBAL: OnceCell<Telemetry> = OnceCell::new();

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// [`install`] was called after the global facade already existed.
    #[error("A global telemetry facade is already installed")]
    AlreadyInstalled,

    /// The HTTP client could not be built.
    #[error("Failed to build telemetry HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The delivery thread could not be started.
    #[error("Failed to start telemetry delivery thread: {0}")]
    Worker(std::io::Error),

    /// The configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Leveled logging and metrics facade.
///
/// Holds no mutable state of its own; all state lives in the backend.
pub struct Telemetry {
    console: Box<dyn Console>,
    backend: Arc<dyn TelemetryBackend>,
}

impl Telemetry {
    /// Creates a facade over `backend` that writes to a [`TracingConsole`].
    #[must_use]
    pub fn new(backend: Arc<dyn TelemetryBackend>) -> Self {
        Self {
            console: Box::new(TracingConsole),
            backend,
        }
    }

    /// Creates a facade with no backend; only the console receives output.
    #[must_use]
    pub fn console_only() -> Self {
        Self::new(Arc::new(NoopBackend))
    }

    /// Creates a facade for the given configuration.
    ///
    /// Uses an [`HttpBackend`] when an endpoint is configured and a
    /// [`NoopBackend`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let backend: Arc<dyn TelemetryBackend> = match &config.endpoint {
            Some(endpoint) => Arc::new(HttpBackend::new(endpoint.as_str(), config)?),
            None => Arc::new(NoopBackend),
        };
        Ok(Self::new(backend))
    }

    /// Creates a facade from `DUKKAN_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_env() -> Result<Self, TelemetryError> {
        Self::from_config(&TelemetryConfig::from_env()?)
    }

    /// Replaces the console.
    #[must_use]
    pub fn with_console(mut self, console: impl Console + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &dyn TelemetryBackend {
        self.backend.as_ref()
    }

    /// Logs `message` at `level`.
    ///
    /// The console is always written first. The backend then receives the
    /// message through its structured logger if it has one accepting
    /// `level`, or as a `"log"` breadcrumb otherwise.
    pub fn log(&self, level: LogLevel, message: &str, data: Option<Attributes>) {
        let data = data.unwrap_or_default();
        self.console
            .write(ConsoleChannel::for_level(level), message, &data);

        match self.backend.logger() {
            Some(logger) if logger.accepts(level) => logger.log(level, message, &data),
            _ => self
                .backend
                .add_breadcrumb(Breadcrumb::from_log(level, message, data)),
        }
    }

    /// Logs at debug level.
    pub fn debug(&self, message: &str, data: Option<Attributes>) {
        self.log(LogLevel::Debug, message, data);
    }

    /// Logs at info level.
    pub fn info(&self, message: &str, data: Option<Attributes>) {
        self.log(LogLevel::Info, message, data);
    }

    /// Logs at warn level.
    pub fn warn(&self, message: &str, data: Option<Attributes>) {
        self.log(LogLevel::Warn, message, data);
    }

    /// Logs at error level.
    pub fn error(&self, message: &str, data: Option<Attributes>) {
        self.log(LogLevel::Error, message, data);
    }

    /// Returns the metrics handle.
    #[must_use]
    pub fn metrics(&self) -> Metrics<'_> {
        Metrics {
            backend: self.backend.as_ref(),
        }
    }

    /// Waits for the backend to finish queued deliveries.
    pub fn flush(&self) {
        self.backend.flush();
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("structured_logs", &self.backend.logger().is_some())
            .finish_non_exhaustive()
    }
}

/// Metric primitives of a [`Telemetry`] facade.
///
/// Every call is forwarded to the backend as-is.
#[derive(Clone, Copy)]
pub struct Metrics<'a> {
    backend: &'a dyn TelemetryBackend,
}

impl Metrics<'_> {
    /// Adds `value` to the counter `name`.
    pub fn increment(&self, name: &str, value: f64, tags: Option<Tags>) {
        self.backend.increment(name, value, &options(tags));
    }

    /// Adds one to the counter `name`.
    pub fn increment_one(&self, name: &str, tags: Option<Tags>) {
        self.increment(name, 1.0, tags);
    }

    /// Sets the gauge `name` to `value`.
    pub fn gauge(&self, name: &str, value: f64, tags: Option<Tags>) {
        self.backend.gauge(name, value, &options(tags));
    }

    /// Records a duration in milliseconds as a distribution.
    pub fn timing(&self, name: &str, millis: f64, tags: Option<Tags>) {
        self.backend.distribution(
            name,
            millis,
            &options(tags).with_unit(MetricUnit::Millisecond),
        );
    }

    /// Adds `value` to the unique-count set `name`.
    pub fn set(&self, name: &str, value: impl Into<MetricValue>, tags: Option<Tags>) {
        self.backend.set(name, value.into(), &options(tags));
    }
}

fn options(tags: Option<Tags>) -> MetricOptions {
    MetricOptions::with_tags(tags.unwrap_or_default())
}

/// Installs `telemetry` as the process-wide facade.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInstalled`] if a global facade was
/// already installed or lazily built by [`global`].
pub fn install(telemetry: Telemetry) -> Result<(), TelemetryError> {
    GLOBAL
        .set(telemetry)
        .map_err(|_| TelemetryError::AlreadyInstalled)
}

/// Returns the process-wide facade, building it from the environment on
/// first use.
///
/// Falls back to a console-only facade if the environment is invalid.
pub fn global() -> &'static Telemetry {
    GLOBAL.get_or_init(|| {
        Telemetry::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid telemetry configuration, using console only");
            Telemetry::console_only()
        })
    })
}

/// Logs at debug level through the global facade.
pub fn debug(message: &str, data: Option<Attributes>) {
    global().debug(message, data);
}

/// Logs at info level through the global facade.
pub fn info(message: &str, data: Option<Attributes>) {
    global().info(message, data);
}

/// Logs at warn level through the global facade.
pub fn warn(message: &str, data: Option<Attributes>) {
    global().warn(message, data);
}

/// Logs at error level through the global facade.
pub fn error(message: &str, data: Option<Attributes>) {
    global().error(message, data);
}

/// Returns the metrics handle of the global facade.
pub fn metrics() -> Metrics<'static> {
    global().metrics()
}

/// Flushes the global facade's backend.
pub fn flush() {
    global().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreadcrumbLevel, MetricKind};
    use serde_json::json;
    use std::sync::Mutex;

    type Written = Arc<Mutex<Vec<(ConsoleChannel, String)>>>;

    #[derive(Clone, Default)]
    struct RecordingConsole {
        written: Written,
    }

    impl Console for RecordingConsole {
        fn write(&self, channel: ConsoleChannel, message: &str, _data: &Attributes) {
            self.written
                .lock()
                .unwrap()
                .push((channel, message.to_string()));
        }
    }

    fn facade(backend: InMemoryBackend) -> (Telemetry, Arc<InMemoryBackend>, Written) {
        let backend = Arc::new(backend);
        let console = RecordingConsole::default();
        let written = console.written.clone();
        let telemetry = Telemetry::new(backend.clone()).with_console(console);
        (telemetry, backend, written)
    }

    fn data() -> Attributes {
        Attributes::from([("order_id".to_string(), json!("O-1"))])
    }

    #[test]
    fn test_console_channels() {
        let (telemetry, _backend, written) = facade(InMemoryBackend::new());

        telemetry.debug("d", None);
        telemetry.info("i", None);
        telemetry.warn("w", None);
        telemetry.error("e", None);

        let channels: Vec<_> = written.lock().unwrap().iter().map(|(c, _)| *c).collect();
        assert_eq!(
            channels,
            vec![
                ConsoleChannel::Log,
                ConsoleChannel::Info,
                ConsoleChannel::Warn,
                ConsoleChannel::Error
            ]
        );
    }

    #[test]
    fn test_structured_logger_preferred() {
        let (telemetry, backend, written) = facade(InMemoryBackend::with_logger("web"));

        telemetry.error("Checkout failed", Some(data()));

        assert_eq!(written.lock().unwrap().len(), 1);
        let logs = backend.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Error);
        assert_eq!(logs[0].message, "Checkout failed");
        assert_eq!(logs[0].attributes, data());
        assert!(backend.breadcrumbs().is_empty());
    }

    #[test]
    fn test_breadcrumb_fallback_without_logger() {
        let (telemetry, backend, _written) = facade(InMemoryBackend::new());

        telemetry.warn("Slow page", Some(data()));
        telemetry.info("Loaded", None);

        let crumbs = backend.breadcrumbs();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].category, "log");
        assert_eq!(crumbs[0].message, "Slow page");
        assert_eq!(crumbs[0].level, BreadcrumbLevel::Warning);
        assert_eq!(crumbs[0].data, data());
        assert_eq!(crumbs[1].level, BreadcrumbLevel::Info);
        assert!(crumbs[1].data.is_empty());
    }

    #[test]
    fn test_breadcrumb_fallback_for_rejected_level() {
        let (telemetry, backend, _written) =
            facade(InMemoryBackend::with_logger_levels("web", &[LogLevel::Error]));

        telemetry.debug("verbose", None);
        telemetry.error("broken", None);

        assert_eq!(backend.logs().len(), 1);
        assert_eq!(backend.logs()[0].message, "broken");
        assert_eq!(backend.breadcrumbs().len(), 1);
        assert_eq!(backend.breadcrumbs()[0].level, BreadcrumbLevel::Debug);
    }

    /// Backend that checks the console already holds each message it receives.
    struct ConsoleFirst {
        written: Written,
        received: Mutex<Vec<String>>,
        structured: bool,
    }

    impl ConsoleFirst {
        fn record(&self, message: &str) {
            let console_has_it = self
                .written
                .lock()
                .unwrap()
                .iter()
                .any(|(_, written)| written == message);
            assert!(console_has_it, "backend saw '{message}' before the console");
            self.received.lock().unwrap().push(message.to_string());
        }
    }

    impl LeveledLogger for ConsoleFirst {
        fn log(&self, _level: LogLevel, message: &str, _data: &Attributes) {
            self.record(message);
        }
    }

    impl TelemetryBackend for ConsoleFirst {
        fn logger(&self) -> Option<&dyn LeveledLogger> {
            self.structured.then_some(self as &dyn LeveledLogger)
        }

        fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
            self.record(&breadcrumb.message);
        }

        fn increment(&self, _name: &str, _value: f64, _options: &MetricOptions) {}

        fn gauge(&self, _name: &str, _value: f64, _options: &MetricOptions) {}

        fn distribution(&self, _name: &str, _value: f64, _options: &MetricOptions) {}

        fn set(&self, _name: &str, _value: MetricValue, _options: &MetricOptions) {}
    }

    #[test]
    fn test_console_written_before_backend() {
        for structured in [false, true] {
            let console = RecordingConsole::default();
            let backend = Arc::new(ConsoleFirst {
                written: console.written.clone(),
                received: Mutex::new(Vec::new()),
                structured,
            });
            let telemetry = Telemetry::new(backend.clone()).with_console(console);

            telemetry.info("Cart loaded", None);
            telemetry.warn("Payment slow", Some(data()));
            telemetry.error("Checkout failed", None);

            assert_eq!(
                *backend.received.lock().unwrap(),
                vec!["Cart loaded", "Payment slow", "Checkout failed"]
            );
        }
    }

    #[test]
    fn test_console_only_never_fails() {
        let console = RecordingConsole::default();
        let written = console.written.clone();
        let telemetry = Telemetry::console_only().with_console(console);

        telemetry.error("still printed", Some(data()));
        telemetry.metrics().increment_one("ignored", None);
        telemetry.flush();

        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_metrics_forwarding() {
        let (telemetry, backend, _written) = facade(InMemoryBackend::new());
        let tags = Tags::from([("page".to_string(), "cart".to_string())]);
        let metrics = telemetry.metrics();

        metrics.increment_one("views", Some(tags.clone()));
        metrics.increment("items_added", 3.0, None);
        metrics.gauge("cart_size", 4.0, None);
        metrics.timing("render", 12.5, Some(tags.clone()));
        metrics.set("visitors", "user-7", None);

        let samples = backend.samples();
        assert_eq!(samples.len(), 5);

        assert_eq!(samples[0].kind, MetricKind::Counter);
        assert_eq!(samples[0].value.as_number(), Some(1.0));
        assert_eq!(samples[0].tags, tags);

        assert_eq!(samples[1].value.as_number(), Some(3.0));
        assert!(samples[1].tags.is_empty());

        assert_eq!(samples[2].kind, MetricKind::Gauge);

        assert_eq!(samples[3].kind, MetricKind::Distribution);
        assert_eq!(samples[3].unit, Some(MetricUnit::Millisecond));
        assert_eq!(samples[3].tags, tags);

        assert_eq!(samples[4].kind, MetricKind::Set);
        assert_eq!(samples[4].value.as_text(), Some("user-7"));
        assert!(samples[4].unit.is_none());
    }

    #[test]
    fn test_from_config_without_endpoint_is_console_only() {
        let telemetry = Telemetry::from_config(&TelemetryConfig::default()).unwrap();
        assert!(telemetry.backend().logger().is_none());
    }

    #[test]
    fn test_from_config_with_endpoint_and_logs() {
        let config = TelemetryConfig::default()
            .with_endpoint("http://127.0.0.1:9")
            .with_logs(true);
        let telemetry = Telemetry::from_config(&config).unwrap();
        assert!(telemetry.backend().logger().is_some());
    }
}
