//! Configuration types for the logging subsystem.

use std::path::PathBuf;

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use tracing_subscriber::fmt::format::FmtSpan;

/// Default service name reported when none is configured.
const DEFAULT_SERVICE_NAME: &str = "l1-toolbox";

/// Configuration for the stdout logging layer.
#[derive(Debug, Clone)]
pub struct StdoutConfig {
    /// Use JSON format instead of compact format.
    pub json_format: bool,
    /// Span events to log.
    pub fmt_span: FmtSpan,
}

impl Default for StdoutConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            // Close events carry the span duration.
            fmt_span: FmtSpan::CLOSE,
        }
    }
}

/// Configuration for daily rolling log files.
#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    /// Directory where log files are written.
    pub directory: PathBuf,
    /// File name prefix, e.g. `l1-toolbox` -> `l1-toolbox.2026-01-01`.
    pub file_name_prefix: String,
    pub json_format: bool,
}

impl FileLoggingConfig {
    pub fn new(directory: PathBuf, file_name_prefix: String) -> Self {
        Self {
            directory,
            file_name_prefix,
            json_format: false,
        }
    }

    pub fn with_json_format(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }
}

/// Resource attributes attached to exported spans.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub service_name: String,
    pub service_version: Option<String>,
    /// Avalanche network the process talks to, e.g. `fuji`.
    pub network: Option<String>,
}

impl ResourceConfig {
    pub fn new(service_name: String) -> Self {
        Self {
            service_name,
            service_version: None,
            network: None,
        }
    }

    /// Builds the OpenTelemetry [`Resource`].
    pub fn build_resource(&self) -> Resource {
        let mut attributes = vec![KeyValue::new("service.name", self.service_name.clone())];

        if let Some(version) = &self.service_version {
            attributes.push(KeyValue::new("service.version", version.clone()));
        }

        if let Some(network) = &self.network {
            attributes.push(KeyValue::new("avalanche.network", network.clone()));
        }

        Resource::new(attributes)
    }
}

/// Top-level logger configuration.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub resource: ResourceConfig,
    /// OTLP collector endpoint; tracing export is disabled when unset.
    pub otel_url: Option<String>,
    pub stdout_config: StdoutConfig,
    pub file_logging_config: Option<FileLoggingConfig>,
}

impl LoggerConfig {
    pub fn new(service_name: String) -> Self {
        Self {
            resource: ResourceConfig::new(service_name),
            otel_url: None,
            stdout_config: StdoutConfig::default(),
            file_logging_config: None,
        }
    }

    pub fn set_otlp_url(&mut self, url: String) {
        self.otel_url = Some(url);
    }

    pub fn with_service_version(mut self, version: String) -> Self {
        self.resource.service_version = Some(version);
        self
    }

    pub fn with_network(mut self, network: String) -> Self {
        self.resource.network = Some(network);
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.stdout_config.json_format = enabled;
        self
    }

    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file_logging_config = Some(config);
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME.to_string())
    }
}
