use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::{
    get_active_span, FutureExt, SpanRef, Status, TraceContextExt, Tracer as _,
};
use opentelemetry::KeyValue;

use crate::traceable::{failed_span_status, TraceableError};

const TRACER_NAME: &str = "admin-meta-tracing-util";

/// Who a span is meant for. `User` spans may end up in traces shown to API consumers, so
/// internal error details are masked on them.
#[derive(Clone, Copy, Debug, derive_more::Display)]
pub enum SpanVisibility {
    #[display("internal")]
    Internal,
    #[display("user")]
    User,
}

fn record_outcome<T, E: TraceableError>(
    span: &SpanRef<'_>,
    display_name: Cow<'static, str>,
    visibility: SpanVisibility,
    result: &Result<T, E>,
) {
    span.set_attribute(KeyValue::new("display.name", display_name));
    span.set_attribute(KeyValue::new("internal.visibility", visibility.to_string()));
    if let Err(error) = result {
        span.set_status(Status::Error {
            description: failed_span_status(error, visibility),
        });
        span.set_attribute(KeyValue::new("internal.error_description", error.description()));
        span.set_attribute(KeyValue::new("internal.error_details", error.details()));
    }
}

/// Wrapper around the globally installed OpenTelemetry tracer.
pub struct Tracer {
    tracer: BoxedTracer,
}

impl Tracer {
    /// Runs `f` in a new span called `name`. The span records `display_name`, its visibility and,
    /// when `f` fails, the error.
    pub fn in_span<T, E, F>(
        &self,
        name: &'static str,
        display_name: impl Into<Cow<'static, str>>,
        visibility: SpanVisibility,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: TraceableError,
    {
        let display_name = display_name.into();
        self.tracer.in_span(name, |cx| {
            let result = f();
            record_outcome(&cx.span(), display_name, visibility, &result);
            result
        })
    }

    /// Async version of [`Tracer::in_span`].
    pub async fn in_span_async<'a, T, E, F>(
        &'a self,
        name: &'static str,
        display_name: impl Into<Cow<'static, str>>,
        visibility: SpanVisibility,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>,
        E: TraceableError,
    {
        let display_name = display_name.into();
        self.tracer
            .in_span(name, |cx| {
                async move {
                    let result = f().await;
                    get_active_span(|span| {
                        record_outcome(&span, display_name, visibility, &result);
                    });
                    result
                }
                .with_context(cx)
            })
            .await
    }
}

/// Access the globally installed tracer. Without [`crate::initialize_tracing`] this is a no-op
/// tracer, which is what tests run with.
pub fn global_tracer() -> Tracer {
    Tracer {
        tracer: global::tracer(TRACER_NAME),
    }
}
