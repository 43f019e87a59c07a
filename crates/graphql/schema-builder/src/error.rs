use thiserror::Error;
use tracing_util::{ErrorVisibility, TraceableError};

use crate::ast::TypeName;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unable to parse schema document: {0}")]
    ParseFailure(String),

    #[error("multiple schema definitions found")]
    MultipleSchemaDefinitions,

    #[error("multiple definitions of graphql type: {0}")]
    ConflictingGraphQlType(TypeName),

    #[error("field {field_name} is already defined on type {type_name}")]
    ConflictingField {
        type_name: TypeName,
        field_name: String,
    },

    #[error("type {0} is not defined")]
    TypeNotDefined(TypeName),

    #[error("expected {0} to be an object type")]
    ExpectedObjectDefinition(TypeName),

    #[error("type extensions are not supported: {0}")]
    TypeExtensionNotSupported(TypeName),

    #[error("multiple definitions of directive: @{0}")]
    ConflictingDirective(String),

    #[error("subscriptions are not supported")]
    SubscriptionsNotSupported,

    #[error("unable to build executable schema: {0}")]
    UnableToBuildExecutableSchema(String),
}

impl TraceableError for Error {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::User
    }
}
