//! Tracing subscriber setup with optional OTLP span export

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LoggingConfig, TelemetryConfig};

/// Flushes exported spans when dropped. Keep it alive for the whole run.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to flush spans: {e}");
        }
    }
}

/// Level filter from `RUST_LOG`, else the configured level (`debug` when verbose)
fn env_filter(logging: &LoggingConfig, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=info,reqwest=info")))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the OTLP exporter cannot be built.
pub fn init(
    logging: &LoggingConfig,
    telemetry: &TelemetryConfig,
    verbose: bool,
) -> Result<TelemetryGuard> {
    let fmt_layer = match logging.format.as_str() {
        "json" => fmt::layer().json().with_target(true).boxed(),
        _ => fmt::layer().with_target(true).boxed(),
    };

    let (otel_layer, provider) = match &telemetry.otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(endpoint.clone())
                .build()
                .context("Failed to build OTLP span exporter")?;
            let provider = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(
                    Resource::builder()
                        .with_service_name(telemetry.service_name.clone())
                        .build(),
                )
                .build();
            let tracer = provider.tracer("farescan");
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(provider),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter(logging, verbose))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = &telemetry.otlp_endpoint {
        tracing::info!("Exporting spans to {}", endpoint);
    }
    Ok(TelemetryGuard { provider })
}
