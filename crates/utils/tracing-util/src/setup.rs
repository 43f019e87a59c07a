use opentelemetry::trace::TraceError;
use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::trace::TracerProvider;
use tracing_subscriber::EnvFilter;

/// Whether finished spans are also written to stdout.
#[derive(Debug, Copy, Clone)]
pub enum ExportTracesStdout {
    Enable,
    Disable,
}

/// Initialize logging and tracing for a binary.
///
/// Log output goes through a `tracing-subscriber` formatter configured from `RUST_LOG`. Spans are
/// collected by a global OpenTelemetry tracer provider tagged with the service name and version,
/// and printed to stdout when `export_traces_stdout` is enabled.
pub fn initialize_tracing(
    service_name: String,
    service_version: Option<&'static str>,
    export_traces_stdout: ExportTracesStdout,
) -> Result<(), TraceError> {
    // a subscriber may already be installed, e.g. when called twice in the same process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let mut resource_entries = vec![KeyValue::new("service.name", service_name)];
    if let Some(service_version) = service_version {
        resource_entries.push(KeyValue::new("service.version", service_version));
    }
    let config = opentelemetry_sdk::trace::Config::default()
        .with_resource(opentelemetry_sdk::Resource::new(resource_entries));

    let mut tracer_provider_builder = TracerProvider::builder().with_config(config);
    if let ExportTracesStdout::Enable = export_traces_stdout {
        tracer_provider_builder = tracer_provider_builder
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
    }

    global::set_tracer_provider(tracer_provider_builder.build());
    Ok(())
}

pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}
