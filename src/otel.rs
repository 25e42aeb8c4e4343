use anyhow::anyhow;
use opentelemetry::global;
use opentelemetry::metrics::Meter;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::{BatchLogProcessor, SdkLoggerProvider};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{BatchSpanProcessor, SdkTracerProvider};
use std::env;
use std::sync::OnceLock;
use tracing::subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;

const DEFAULT_SERVICE_NAME: &str = "travel-planner";

/// Initialize OpenTelemetry and return a guard that ensures proper cleanup.
pub fn init_otel() -> Result<OtelGuard, anyhow::Error> {
    let providers = OtelProviders::init()?;
    Ok(OtelGuard { providers })
}

/// Process-wide meter for building instruments.
pub fn get_meter() -> &'static Meter {
    static METER: OnceLock<Meter> = OnceLock::new();
    METER.get_or_init(|| global::meter(get_service().as_str()))
}

/// Guard that shuts OpenTelemetry providers down on drop.
pub struct OtelGuard {
    providers: OtelProviders,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Err(e) = self.providers.shutdown() {
            eprintln!("Error during OpenTelemetry shutdown: {}", e);
        }
    }
}

/// Wraps OTEL log, trace, and metric providers.
struct OtelProviders {
    pub log_provider: SdkLoggerProvider,
    pub trace_provider: SdkTracerProvider,
    pub meter_provider: SdkMeterProvider,
}

impl OtelProviders {
    fn init() -> Result<OtelProviders, anyhow::Error> {
        let log_provider = init_logs()?;

        // Bridge tracing events into the OTEL log pipeline, keeping the HTTP
        // plumbing crates out of it.
        let otel_layer = OpenTelemetryTracingBridge::new(&log_provider);
        let filter_otel = EnvFilter::new("info")
            .add_directive("hyper=off".parse()?)
            .add_directive("h2=off".parse()?)
            .add_directive("tonic=off".parse()?)
            .add_directive("reqwest=off".parse()?)
            .add_directive("opentelemetry=off".parse()?);
        let log_layer = otel_layer.with_filter(filter_otel);

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_thread_names(true)
            .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,tower_http=debug,axum::rejection=trace")
            }));

        let trace_provider = init_traces()?;
        let tracing_layer = OpenTelemetryLayer::new(trace_provider.tracer(get_service().as_str()));
        let tracing_layer = tracing_layer.with_filter(EnvFilter::new("info"));

        let subscriber = tracing_subscriber::registry()
            .with(log_layer)
            .with(tracing_layer)
            .with(fmt_layer);
        subscriber::set_global_default(subscriber)?;

        let meter_provider = init_metrics()?;

        Ok(OtelProviders {
            trace_provider,
            log_provider,
            meter_provider,
        })
    }

    fn shutdown(&self) -> Result<(), anyhow::Error> {
        let mut shutdown_errors = Vec::new();
        if let Err(e) = self.log_provider.shutdown() {
            shutdown_errors.push(format!("Shutdown log provider failed: {}", e));
        }
        if let Err(e) = self.trace_provider.shutdown() {
            shutdown_errors.push(format!("Shutdown trace provider failed: {}", e));
        }
        if let Err(e) = self.meter_provider.shutdown() {
            shutdown_errors.push(format!("Shutdown meter provider failed: {}", e));
        }
        if !shutdown_errors.is_empty() {
            return Err(anyhow!(format!(
                "Failed to shutdown providers:{}",
                shutdown_errors.join("\n")
            )));
        }
        Ok(())
    }
}

fn get_service() -> &'static String {
    static SERVICE: OnceLock<String> = OnceLock::new();
    SERVICE
        .get_or_init(|| env::var("OTEL_SERVICE_NAME").unwrap_or(DEFAULT_SERVICE_NAME.to_owned()))
}

fn get_resource() -> Resource {
    static RESOURCE: OnceLock<Resource> = OnceLock::new();
    RESOURCE
        .get_or_init(|| {
            Resource::builder()
                .with_service_name(get_service().as_str())
                .build()
        })
        .clone()
}

fn init_traces() -> Result<SdkTracerProvider, anyhow::Error> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT");
    let provider = if let Ok(endpoint) = otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        SdkTracerProvider::builder()
            .with_span_processor(BatchSpanProcessor::builder(exporter).build())
            .with_resource(get_resource())
            .build()
    } else {
        let exporter = opentelemetry_stdout::SpanExporter::default();
        SdkTracerProvider::builder()
            .with_span_processor(BatchSpanProcessor::builder(exporter).build())
            .with_resource(get_resource())
            .build()
    };

    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

fn init_metrics() -> Result<SdkMeterProvider, anyhow::Error> {
    let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT");
    let provider = if let Ok(endpoint) = otlp_endpoint {
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(exporter).build())
            .with_resource(get_resource())
            .build()
    } else {
        let exporter = opentelemetry_stdout::MetricExporter::builder().build();
        SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(exporter).build())
            .with_resource(get_resource())
            .build()
    };
    global::set_meter_provider(provider.clone());
    Ok(provider)
}

fn init_logs() -> Result<SdkLoggerProvider, anyhow::Error> {
    let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT");
    let batch_processor = if let Ok(endpoint) = otlp_endpoint {
        let otlp_exporter = opentelemetry_otlp::LogExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        BatchLogProcessor::builder(otlp_exporter).build()
    } else {
        BatchLogProcessor::builder(opentelemetry_stdout::LogExporter::default()).build()
    };

    let provider = SdkLoggerProvider::builder()
        .with_log_processor(batch_processor)
        .with_resource(get_resource())
        .build();
    Ok(provider)
}
