//! Local console output.
//!
//! The facade writes every log call here before touching the backend.

use crate::models::{Attributes, LogLevel};

/// Target used for console events.
pub const CONSOLE_TARGET: &str = "dukkan::console";

/// Console output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleChannel {
    /// General-purpose output.
    Log,
    /// Informational output.
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl ConsoleChannel {
    /// Channel a log level is written to. Debug goes to the general channel.
    #[must_use]
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Log,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

impl std::fmt::Display for ConsoleChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Log => write!(f, "log"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A local, synchronous output sink.
pub trait Console: Send + Sync {
    /// Writes a message with its context data.
    fn write(&self, channel: ConsoleChannel, message: &str, data: &Attributes);
}

/// Console backed by `tracing` events under [`CONSOLE_TARGET`].
///
/// The `log` and `info` channels are emitted at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn write(&self, channel: ConsoleChannel, message: &str, data: &Attributes) {
        let data = if data.is_empty() {
            String::new()
        } else {
            serde_json::to_string(data).unwrap_or_default()
        };

        match channel {
            ConsoleChannel::Log | ConsoleChannel::Info => {
                tracing::info!(target: CONSOLE_TARGET, %channel, data = %data, "{message}");
            }
            ConsoleChannel::Warn => {
                tracing::warn!(target: CONSOLE_TARGET, %channel, data = %data, "{message}");
            }
            ConsoleChannel::Error => {
                tracing::error!(target: CONSOLE_TARGET, %channel, data = %data, "{message}");
            }
        }
    }
}
