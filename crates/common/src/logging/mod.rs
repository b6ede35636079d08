//! Logging subsystem with optional file and OpenTelemetry output.

pub mod manager;
pub mod service;
pub mod types;


pub use manager::{finalize, init};
pub use service::{init_logging_from_config, LoggingInitConfig};
pub use types::{FileLoggingConfig, LoggerConfig, ResourceConfig, StdoutConfig};

/// Formats a service name with an optional label suffix.
pub fn format_service_name(base: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
