//! Logging initialization shared by binaries.

use std::path::Path;

use tracing::info;

use super::{format_service_name, init, FileLoggingConfig, LoggerConfig};

/// Inputs for [`init_logging_from_config`], typically merged from the config
/// file and command line flags.
#[derive(Debug)]
pub struct LoggingInitConfig<'a> {
    pub service_base_name: &'a str,
    /// Optional label appended to the service name, like `fuji`.
    pub service_label: Option<&'a str>,
    pub otlp_url: Option<&'a str>,
    /// Rolling log files named `<service_base_name>.<date>` go here.
    pub log_dir: Option<&'a Path>,
    pub json_format: bool,
}

/// Initializes logging with the standard layers for a binary.
pub fn init_logging_from_config(config: LoggingInitConfig<'_>) {
    let service_name = format_service_name(config.service_base_name, config.service_label);

    let mut lconfig = LoggerConfig::new(service_name)
        .with_service_version(env!("CARGO_PKG_VERSION").to_string())
        .with_json_logging(config.json_format);

    if let Some(label) = config.service_label {
        lconfig = lconfig.with_network(label.to_string());
    }

    if let Some(url) = config.otlp_url {
        lconfig.set_otlp_url(url.to_string());
    }

    let file_logging_config = config.log_dir.map(|dir| {
        FileLoggingConfig::new(dir.to_path_buf(), config.service_base_name.to_string())
            .with_json_format(config.json_format)
    });

    if let Some(file_config) = &file_logging_config {
        lconfig = lconfig.with_file_logging(file_config.clone());
    }

    init(lconfig);

    if let Some(url) = config.otlp_url {
        info!(%url, "using OpenTelemetry tracing output");
    }
    if let Some(file_config) = &file_logging_config {
        info!(
            log_dir = %file_config.directory.display(),
            log_prefix = %file_config.file_name_prefix,
            "file logging enabled"
        );
    }
}
