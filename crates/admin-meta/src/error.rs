use async_graphql::ErrorExtensions;
use schema_builder::TypeName;
use thiserror::Error;
use tracing_util::{ErrorVisibility, TraceableError};

/// Whether internal error details should be returned to callers of the admin meta schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposeInternalErrors {
    Expose,
    Censor,
}

impl ExposeInternalErrors {
    pub fn from_flag(expose: bool) -> Self {
        if expose {
            ExposeInternalErrors::Expose
        } else {
            ExposeInternalErrors::Censor
        }
    }
}

/// Failure of the elevated item lookup behind the item view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to look up item {item_id} in list {list_key}: {message}")]
pub struct LookupError {
    pub list_key: String,
    pub item_id: String,
    pub message: String,
}

/// Errors raised while resolving the dynamic parts of the admin meta for a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{type_name}.{field_name} cannot be resolved during the build process")]
    BuildPhaseViolation {
        type_name: TypeName,
        field_name: &'static str,
    },

    #[error("Access denied")]
    AccessDenied,

    #[error("no request context was provided for this request")]
    MissingRequestContext,

    #[error("list {list_key} does not exist")]
    UnknownList { list_key: String },

    #[error("field {field_path} does not exist on list {list_key}")]
    UnknownField {
        list_key: String,
        field_path: String,
    },

    #[error(transparent)]
    RecordLookupFailed(#[from] LookupError),
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::BuildPhaseViolation { .. } => "BUILD_PHASE_VIOLATION",
            ResolveError::AccessDenied => "ACCESS_DENIED",
            ResolveError::MissingRequestContext => "MISSING_REQUEST_CONTEXT",
            ResolveError::UnknownList { .. } => "UNKNOWN_LIST",
            ResolveError::UnknownField { .. } => "UNKNOWN_FIELD",
            ResolveError::RecordLookupFailed(_) => "RECORD_LOOKUP_FAILED",
        }
    }

    /// The GraphQL error sent to the client. Internal errors are reported as `internal error`
    /// unless they are explicitly exposed.
    pub fn to_graphql_error(
        &self,
        expose_internal_errors: ExposeInternalErrors,
    ) -> async_graphql::Error {
        let message = match (self.visibility(), expose_internal_errors) {
            (ErrorVisibility::Internal, ExposeInternalErrors::Censor) => {
                "internal error".to_string()
            }
            _ => self.to_string(),
        };
        let code = self.code();
        async_graphql::Error::new(message)
            .extend_with(|_, extensions| extensions.set("code", code))
    }
}

impl TraceableError for ResolveError {
    fn visibility(&self) -> ErrorVisibility {
        match self {
            ResolveError::BuildPhaseViolation { .. } | ResolveError::AccessDenied => {
                ErrorVisibility::User
            }
            ResolveError::MissingRequestContext
            | ResolveError::UnknownList { .. }
            | ResolveError::UnknownField { .. }
            | ResolveError::RecordLookupFailed(_) => ErrorVisibility::Internal,
        }
    }
}

/// Errors in the list configuration, found while initialising lists or building the admin meta
/// root value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminMetaBuildError {
    #[error("the label field {field_path} of list {list_key} does not exist")]
    UnknownLabelField {
        list_key: String,
        field_path: String,
    },

    #[error("the initial column {field_path} of list {list_key} does not exist")]
    UnknownInitialColumn {
        list_key: String,
        field_path: String,
    },

    #[error("the initial sort field {field_path} of list {list_key} does not exist")]
    UnknownInitialSortField {
        list_key: String,
        field_path: String,
    },

    #[error("the page size of list {list_key} must be a positive integer, got {page_size}")]
    InvalidPageSize { list_key: String, page_size: i64 },

    #[error("list {list_key} is configured but was not initialised")]
    ListNotInitialised { list_key: String },

    #[error("list {list_key} was initialised but is not configured")]
    ListNotConfigured { list_key: String },

    #[error("lists {first} and {second} share the admin UI path {path}")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },
}

impl TraceableError for AdminMetaBuildError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::User
    }
}

/// Errors while synthesizing the admin meta schema and merging it into the base schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaBuildError {
    #[error("the base schema has no Query type")]
    MissingQueryType,

    #[error("the base schema declares {type_name} as {found} but it must be {expected}")]
    UnexpectedTypeKind {
        type_name: TypeName,
        expected: &'static str,
        found: &'static str,
    },

    #[error("the enum {type_name} of the base schema has no value {value}")]
    MissingEnumValue { type_name: TypeName, value: String },

    #[error("{0}")]
    SchemaBuilder(#[from] schema_builder::Error),
}

impl TraceableError for SchemaBuildError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::User
    }
}

/// Errors of the static export performed while building the admin UI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("the static admin meta query failed: {}", .0.join(", "))]
    QueryFailed(Vec<String>),

    #[error("the static admin meta is not valid JSON: {0}")]
    InvalidData(String),
}

impl TraceableError for ExportError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::Internal
    }
}
