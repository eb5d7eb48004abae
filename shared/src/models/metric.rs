//! Metric data model.
//!
//! Defines the `MetricSample` structure emitted by the telemetry facade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use validator::Validate;

/// Dimensional tags attached to a metric sample.
pub type Tags = HashMap<String, String>;

/// Kind of metric primitive a sample was recorded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// A counter that only increases (e.g., page views).
    Counter,
    /// A gauge that can go up or down (e.g., cart size).
    Gauge,
    /// A distribution of observed values (e.g., request latency).
    Distribution,
    /// A set counting unique members (e.g., distinct users).
    Set,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Counter => write!(f, "counter"),
            Self::Gauge => write!(f, "gauge"),
            Self::Distribution => write!(f, "distribution"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// Unit attached to a metric sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    /// Durations in milliseconds.
    Millisecond,
}

impl std::fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millisecond => write!(f, "millisecond"),
        }
    }
}

/// The value of a metric sample.
///
/// Counters, gauges and distributions carry numbers; sets may also count
/// textual members such as user ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A numeric value.
    Number(f64),
    /// A textual set member.
    Text(String),
}

impl MetricValue {
    /// Returns the numeric value, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Returns the textual value, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Options accompanying every metric call to a backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricOptions {
    /// Dimensional tags, passed through as-is.
    pub tags: Tags,
    /// Optional unit of the value.
    pub unit: Option<MetricUnit>,
}

impl MetricOptions {
    /// Creates options carrying the given tags and no unit.
    #[must_use]
    pub fn with_tags(tags: Tags) -> Self {
        Self { tags, unit: None }
    }

    /// Sets the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: MetricUnit) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// A single metric measurement.
///
/// # Example
///
/// ```
/// use dukkan_shared::models::{MetricKind, MetricSample};
///
/// let sample = MetricSample::new("page_view", MetricKind::Counter, 1.0)
///     .with_tag("page", "home");
///
/// assert!(sample.validate_sample().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MetricSample {
    /// The name of the metric (e.g., "`checkout_completed`").
    #[validate(length(min = 1, message = "Metric name cannot be empty"))]
    pub name: String,

    /// The primitive the sample was recorded with.
    pub kind: MetricKind,

    /// The sample value.
    pub value: MetricValue,

    /// Timestamp when the sample was recorded.
    pub timestamp: DateTime<Utc>,

    /// Tags (dimensions) for the sample.
    #[serde(default)]
    pub tags: Tags,

    /// Optional unit of the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<MetricUnit>,
}

/// Errors that can occur during metric sample validation.
#[derive(Debug, Error)]
pub enum MetricValidationError {
    /// The metric name is empty.
    #[error("Metric name cannot be empty")]
    EmptyName,

    /// Only sets accept textual values.
    #[error("Metric '{0}' of kind {1} requires a numeric value")]
    NonNumericValue(String, MetricKind),

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl MetricSample {
    /// Creates a new sample with the current timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MetricKind, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            timestamp: Utc::now(),
            tags: HashMap::new(),
            unit: None,
        }
    }

    /// Creates a sample from the name, value and options of a backend call.
    #[must_use]
    pub fn from_call(
        kind: MetricKind,
        name: &str,
        value: impl Into<MetricValue>,
        options: &MetricOptions,
    ) -> Self {
        let mut sample = Self::new(name, kind, value);
        sample.tags.clone_from(&options.tags);
        sample.unit = options.unit;
        sample
    }

    /// Adds a tag to the sample.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Sets the unit of the sample.
    #[must_use]
    pub fn with_unit(mut self, unit: MetricUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Validates the sample.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is empty
    /// - A non-set sample carries a textual value
    pub fn validate_sample(&self) -> Result<(), MetricValidationError> {
        if self.name.is_empty() {
            return Err(MetricValidationError::EmptyName);
        }
        if self.kind != MetricKind::Set && self.value.as_number().is_none() {
            return Err(MetricValidationError::NonNumericValue(
                self.name.clone(),
                self.kind,
            ));
        }
        self.validate()?;
        Ok(())
    }
}
