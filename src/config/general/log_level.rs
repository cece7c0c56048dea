use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity of log output.
///
/// The lowercase name doubles as the `EnvFilter` directive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failed commands and host errors only.
    Error,

    /// Also failed auto-advances and lagging subscriptions.
    Warn,

    /// Also player lifecycle and track changes.
    #[default]
    Info,

    /// Also every snapshot refresh and dropped command.
    Debug,

    /// Everything, including span entry and exit.
    Trace,
}

impl LogLevel {
    /// Filter directive for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
