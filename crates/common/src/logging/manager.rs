//! Logging initialization and shutdown.

use std::{sync::OnceLock, time::Duration};

use opentelemetry::{
    global::{self, set_text_map_propagator},
    trace::TracerProvider,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    runtime::Tokio,
    trace::{Config, TracerProvider as SdkTracerProvider},
};
use tracing::*;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::types::LoggerConfig;

/// Timeout for a single OTLP export request.
const OTLP_EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tracer provider kept around so [`finalize`] can flush it.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Stores `provider` for [`finalize`]. If one is already installed the new
/// provider is shut down and `false` is returned.
pub(super) fn install_provider(provider: SdkTracerProvider) -> bool {
    match TRACER_PROVIDER.set(provider) {
        Ok(()) => true,
        Err(duplicate) => {
            // Runs before the subscriber exists.
            eprintln!("tracer provider already installed, dropping the new one");
            if let Err(e) = duplicate.shutdown() {
                eprintln!("failed to shut down duplicate tracer provider: {e}");
            }
            false
        }
    }
}

/// Builds the env filter: INFO by default, overridable through `RUST_LOG`.
fn build_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy()
}

/// Initializes the global subscriber from `config`.
///
/// Must be called at most once per process, from within a tokio runtime if an
/// OTLP endpoint is configured.
pub fn init(config: LoggerConfig) {
    set_text_map_propagator(TraceContextPropagator::new());

    let filt = build_filter();

    let stdout_layer = if config.stdout_config.json_format {
        layer()
            .json()
            .with_span_events(config.stdout_config.fmt_span.clone())
            .with_filter(filt.clone())
            .boxed()
    } else {
        layer()
            .compact()
            .with_span_events(config.stdout_config.fmt_span.clone())
            .with_filter(filt.clone())
            .boxed()
    };

    let file_layer = config.file_logging_config.as_ref().map(|file_config| {
        let appender = RollingFileAppender::new(
            Rotation::DAILY,
            &file_config.directory,
            &file_config.file_name_prefix,
        );

        if file_config.json_format {
            layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_filter(filt.clone())
                .boxed()
        } else {
            layer()
                .compact()
                .with_writer(appender)
                .with_ansi(false)
                .with_filter(filt.clone())
                .boxed()
        }
    });

    let otel_layer = config.otel_url.as_ref().and_then(|otel_url| {
        let trace_config = Config::default().with_resource(config.resource.build_resource());

        let exporter = opentelemetry_otlp::new_exporter()
            .tonic()
            .with_endpoint(otel_url)
            .with_timeout(OTLP_EXPORT_TIMEOUT);

        let provider = match opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(exporter)
            .with_trace_config(trace_config)
            .install_batch(Tokio)
        {
            Ok(provider) => provider,
            Err(e) => {
                // Subscriber isn't installed yet, so this goes to stderr.
                eprintln!("failed to initialize opentelemetry pipeline: {e}");
                return None;
            }
        };

        let tracer = provider.tracer(config.resource.service_name.clone());
        if !install_provider(provider) {
            return None;
        }
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(otel_layer)
        .init();

    info!(
        service_name = %config.resource.service_name,
        service_version = ?config.resource.service_version,
        network = ?config.resource.network,
        "logging initialized"
    );
}

/// Flushes pending spans and tears down the tracer provider.
pub fn finalize() {
    info!("shutting down logging");

    match TRACER_PROVIDER.get() {
        Some(provider) => {
            if let Err(e) = provider.shutdown() {
                error!(?e, "failed to shut down tracer provider");
            }
        }
        None => debug!("no tracer provider to shut down"),
    }

    global::shutdown_tracer_provider();
}
