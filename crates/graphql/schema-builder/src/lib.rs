//! A declarative model of a GraphQL schema.
//!
//! Schemas are plain values: types are kept in a map keyed by name, and every object field carries
//! the resolver it will run with. This makes it possible to inspect an existing schema, derive a
//! new one from it through [`SchemaPatch`]es, and only at the very end turn it into an executable
//! `async-graphql` schema.

mod ast;
mod error;
mod executable;
mod patch;
mod resolver;
mod schema;
mod sdl;

pub use ast::{BaseType, FieldType, TypeName};
pub use error::Error;
pub use patch::SchemaPatch;
pub use resolver::Resolver;
pub use schema::{
    Deprecation, DirectiveDefinition, Enum, EnumValue, Field, InputField, InputObject, Interface,
    InterfaceField, Object, Scalar, Schema, TypeInfo, Union,
};
