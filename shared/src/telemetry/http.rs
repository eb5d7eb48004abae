//! HTTP telemetry backend.
//!
//! Ships JSON payloads to an ingestion service:
//!
//! | Call | Route |
//! |------|-------|
//! | structured log | `POST /api/v1/logs` |
//! | breadcrumb | `POST /api/v1/breadcrumbs` |
//! | metric sample | `POST /api/v1/metrics` |
//!
//! Payloads are queued to a single delivery thread that owns the HTTP
//! client, so the backend can be built and used from inside an async
//! runtime. Failures are logged at WARN and dropped; nothing is retried.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::thread;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::TelemetryConfig;
use crate::models::{
    Attributes, Breadcrumb, LogEntry, LogLevel, MetricKind, MetricOptions, MetricSample,
    MetricValue,
};

use super::backend::{LeveledLogger, TelemetryBackend};
use super::TelemetryError;

const LOGS_PATH: &str = "/api/v1/logs";
const BREADCRUMBS_PATH: &str = "/api/v1/breadcrumbs";
const METRICS_PATH: &str = "/api/v1/metrics";

/// Payloads waiting for delivery before new ones are dropped.
pub const QUEUE_CAPACITY: usize = 1024;

/// Work for the delivery thread.
#[derive(Debug)]
enum Job {
    Deliver { url: String, body: Value },
    Flush(Sender<()>),
}

/// Backend posting telemetry to an HTTP ingestion endpoint.
///
/// Structured logging is only offered when
/// [`TelemetryConfig::enable_logs`] is set; otherwise log calls arrive as
/// breadcrumbs.
#[derive(Debug)]
pub struct HttpBackend {
    endpoint: String,
    service: String,
    enable_logs: bool,
    queue: SyncSender<Job>,
}

impl HttpBackend {
    /// Creates a backend posting to `endpoint` (a base URL such as
    /// `https://telemetry.example.com`).
    ///
    /// Starts the delivery thread, which stops once the backend is dropped
    /// and its queue has drained.
    ///
    /// # Errors
    ///
    /// Returns an error if the delivery thread cannot be started or the
    /// HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let (queue, jobs) = mpsc::sync_channel(QUEUE_CAPACITY);
        let (ready_tx, ready_rx) = mpsc::channel();
        let timeout = config.timeout;

        thread::Builder::new()
            .name("telemetry-delivery".to_string())
            .spawn(move || {
                // The blocking client runs its own runtime; it must be built
                // and dropped outside any async context.
                let client = match Client::builder().timeout(timeout).build() {
                    Ok(client) => {
                        let _ = ready_tx.send(Ok(()));
                        client
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                run_worker(&client, &jobs);
            })
            .map_err(TelemetryError::Worker)?;

        ready_rx
            .recv()
            .map_err(|_| TelemetryError::Worker(std::io::Error::other("delivery thread exited")))??;

        tracing::debug!(
            %endpoint,
            service = %config.service,
            enable_logs = config.enable_logs,
            "HTTP telemetry backend configured"
        );

        Ok(Self {
            endpoint,
            service: config.service.clone(),
            enable_logs: config.enable_logs,
            queue,
        })
    }

    /// Returns the base URL payloads are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn deliver<T: Serialize>(&self, path: &'static str, payload: &T) {
        let url = format!("{}{}", self.endpoint, path);
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%url, error = %e, "Dropping unserializable telemetry payload");
                return;
            }
        };

        match self.queue.try_send(Job::Deliver { url, body }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(path, capacity = QUEUE_CAPACITY, "Telemetry queue full, dropping payload");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!(path, "Telemetry delivery thread stopped, dropping payload");
            }
        }
    }

    fn deliver_sample(&self, sample: &MetricSample) {
        if let Err(e) = sample.validate_sample() {
            tracing::warn!(name = %sample.name, error = %e, "Dropping invalid metric sample");
            return;
        }
        self.deliver(METRICS_PATH, sample);
    }
}

/// Posts queued payloads one at a time until every sender is gone.
fn run_worker(client: &Client, jobs: &Receiver<Job>) {
    for job in jobs {
        match job {
            Job::Deliver { url, body } => post(client, &url, &body),
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Telemetry delivery thread stopped");
}

fn post(client: &Client, url: &str, body: &Value) {
    match client.post(url).json(body).send() {
        Ok(response) if response.status().is_success() => {
            tracing::trace!(%url, status = %response.status(), "Telemetry delivered");
        }
        Ok(response) => {
            tracing::warn!(%url, status = %response.status(), "Telemetry rejected");
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "Telemetry delivery failed");
        }
    }
}

impl LeveledLogger for HttpBackend {
    fn log(&self, level: LogLevel, message: &str, data: &Attributes) {
        let entry = LogEntry::new(level, message, self.service.as_str()).with_attributes(data.clone());
        if let Err(e) = entry.validate_entry() {
            tracing::warn!(error = %e, "Dropping invalid log entry");
            return;
        }
        self.deliver(LOGS_PATH, &entry);
    }
}

impl TelemetryBackend for HttpBackend {
    fn logger(&self) -> Option<&dyn LeveledLogger> {
        if self.enable_logs {
            Some(self)
        } else {
            None
        }
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.deliver(BREADCRUMBS_PATH, &breadcrumb);
    }

    fn increment(&self, name: &str, value: f64, options: &MetricOptions) {
        self.deliver_sample(&MetricSample::from_call(MetricKind::Counter, name, value, options));
    }

    fn gauge(&self, name: &str, value: f64, options: &MetricOptions) {
        self.deliver_sample(&MetricSample::from_call(MetricKind::Gauge, name, value, options));
    }

    fn distribution(&self, name: &str, value: f64, options: &MetricOptions) {
        self.deliver_sample(&MetricSample::from_call(
            MetricKind::Distribution,
            name,
            value,
            options,
        ));
    }

    fn set(&self, name: &str, value: MetricValue, options: &MetricOptions) {
        self.deliver_sample(&MetricSample::from_call(MetricKind::Set, name, value, options));
    }

    /// Blocks until every payload queued before this call has been posted
    /// or dropped.
    fn flush(&self) {
        let (done, drained) = mpsc::channel();
        if self.queue.send(Job::Flush(done)).is_err() || drained.recv().is_err() {
            tracing::warn!("Telemetry delivery thread stopped before flushing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_capability_follows_config() {
        let config = TelemetryConfig::default();
        let backend = HttpBackend::new("http://127.0.0.1:9", &config).unwrap();
        assert!(backend.logger().is_none());

        let backend = HttpBackend::new("http://127.0.0.1:9", &config.with_logs(true)).unwrap();
        assert!(backend.logger().is_some());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let backend =
            HttpBackend::new("http://127.0.0.1:9/", &TelemetryConfig::default()).unwrap();
        assert_eq!(backend.endpoint(), "http://127.0.0.1:9");
    }

    #[test]
    fn test_flush_without_deliveries() {
        let backend = HttpBackend::new("http://127.0.0.1:9", &TelemetryConfig::default()).unwrap();
        backend.flush();
        backend.flush();
    }

    #[test]
    fn test_worker_stops_when_backend_dropped() {
        let (queue, jobs) = mpsc::sync_channel::<Job>(1);
        let client = Client::new();
        let worker = thread::spawn(move || run_worker(&client, &jobs));

        let (done, drained) = mpsc::channel();
        queue.send(Job::Flush(done)).unwrap();
        drained.recv().unwrap();

        drop(queue);
        worker.join().unwrap();
    }

    #[test]
    fn test_full_queue_drops_payload() {
        let (queue, jobs) = mpsc::sync_channel(1);
        let backend = HttpBackend {
            endpoint: "http://127.0.0.1:9".to_string(),
            service: "web".to_string(),
            enable_logs: false,
            queue,
        };

        backend.gauge("cart_size", 1.0, &MetricOptions::default());
        backend.gauge("cart_size", 2.0, &MetricOptions::default());

        let queued: Vec<_> = jobs.try_iter().collect();
        assert_eq!(queued.len(), 1);
        assert!(matches!(&queued[0], Job::Deliver { body, .. } if body["value"] == 1.0));
    }
}
