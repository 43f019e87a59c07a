//! Logging and OpenTelemetry tracing shared by the admin meta crates.

mod setup;
mod traceable;
mod tracer;

pub use setup::{initialize_tracing, shutdown_tracer, ExportTracesStdout};
pub use traceable::{ErrorVisibility, TraceableError};
pub use tracer::{global_tracer, SpanVisibility, Tracer};
