use std::borrow::Cow;
use std::fmt::{Debug, Display};

use crate::tracer::SpanVisibility;

/// Whether the details of an error may be shown to the caller of the API, or only to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorVisibility {
    Internal,
    User,
}

/// An error that can be recorded on the span it failed in.
pub trait TraceableError: Display + Debug {
    fn visibility(&self) -> ErrorVisibility;

    fn description(&self) -> String {
        self.to_string()
    }

    fn details(&self) -> String {
        format!("{self:?}")
    }
}

/// The status description a failed span ends with. Spans that users may see never carry the
/// description of an internal error.
pub(crate) fn failed_span_status<E: TraceableError>(
    error: &E,
    span_visibility: SpanVisibility,
) -> Cow<'static, str> {
    match (error.visibility(), span_visibility) {
        (ErrorVisibility::Internal, SpanVisibility::User) => "Internal error".into(),
        _ => error.description().into(),
    }
}
