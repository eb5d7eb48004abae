//! Breadcrumb data model.
//!
//! Breadcrumbs are lightweight contextual events a backend keeps for later
//! diagnostic replay. The facade records one per log call when the backend
//! has no structured logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log::{Attributes, LogLevel};

/// Category used for breadcrumbs produced by the log fallback.
pub const LOG_CATEGORY: &str = "log";

/// Breadcrumb severity, in the backend's own naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreadcrumbLevel {
    /// Debug information.
    Debug,
    /// Informational messages.
    Info,
    /// Warning conditions.
    Warning,
    /// Error conditions.
    Error,
}

impl From<LogLevel> for BreadcrumbLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warning,
            LogLevel::Error => Self::Error,
        }
    }
}

impl std::fmt::Display for BreadcrumbLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A timestamped contextual event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// When the breadcrumb was recorded.
    pub timestamp: DateTime<Utc>,
    /// Grouping category (e.g., "log").
    pub category: String,
    /// Human-readable message.
    pub message: String,
    /// Severity in backend naming.
    pub level: BreadcrumbLevel,
    /// Context data.
    #[serde(default)]
    pub data: Attributes,
}

impl Breadcrumb {
    /// Creates a new breadcrumb with the current timestamp.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        message: impl Into<String>,
        level: BreadcrumbLevel,
        data: Attributes,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            category: category.into(),
            message: message.into(),
            level,
            data,
        }
    }

    /// Creates the fallback breadcrumb for a log call.
    #[must_use]
    pub fn from_log(level: LogLevel, message: impl Into<String>, data: Attributes) -> Self {
        Self::new(LOG_CATEGORY, message, level.into(), data)
    }
}
