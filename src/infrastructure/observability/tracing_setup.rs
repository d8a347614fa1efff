//! Tracing subscriber setup with optional OpenTelemetry export

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig, OtlpConfig};

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_tracing(logging_config: &LoggingConfig, otlp_config: &OtlpConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging_config.level));

    let fmt_layer = match logging_config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    let endpoint = otlp_config.otlp_endpoint.as_deref();

    let (provider, otel_error) = match endpoint {
        Some(endpoint) => match init_otel_tracing(endpoint, otlp_config.sampling_ratio) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        },
        None => (None, None),
    };

    let telemetry_layer = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(telemetry_layer)
        .init();

    match (provider, otel_error) {
        (Some(provider), _) => {
            opentelemetry::global::set_tracer_provider(provider);
            tracing::info!(
                endpoint = endpoint.unwrap_or_default(),
                "Tracing initialized with OpenTelemetry export"
            );
        }
        (None, Some(e)) => {
            tracing::warn!("Failed to initialize OpenTelemetry: {}. Tracing disabled.", e);
        }
        (None, None) => {
            tracing::info!(level = %logging_config.level, "Tracing initialized (OpenTelemetry disabled)");
        }
    }
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

fn init_otel_tracing(
    endpoint: &str,
    sampling_ratio: f64,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler_for(sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}

/// Shutdown tracing and flush pending spans
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Tracing shutdown complete");
}
