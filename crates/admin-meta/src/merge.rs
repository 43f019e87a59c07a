use schema_builder::{Schema, SchemaPatch, TypeName};
use tracing_util::SpanVisibility;

use crate::error::SchemaBuildError;
use crate::types::SchemaFragment;

const DEFAULT_QUERY_TYPE: &str = "Query";

/// Adds `fragment` to a copy of `base`: its types are added and its query fields are added to the
/// query root. A type called `Query` that is not the query root is dropped, so that the query root
/// is the only type by that name once the schema is served.
pub fn merge_schema(base: &Schema, fragment: SchemaFragment) -> Result<Schema, SchemaBuildError> {
    let tracer = tracing_util::global_tracer();
    tracer.in_span(
        "merge_schema",
        "Merge admin meta into GraphQL schema",
        SpanVisibility::Internal,
        || {
            let query_type = base
                .query_root()
                .ok_or(SchemaBuildError::MissingQueryType)?
                .name
                .clone();

            let mut patches = Vec::new();
            if query_type.as_str() != DEFAULT_QUERY_TYPE
                && base.get_type(DEFAULT_QUERY_TYPE).is_some()
            {
                tracing::warn!(
                    query_type = %query_type,
                    "dropping type {DEFAULT_QUERY_TYPE} which is not the query root"
                );
                patches.push(SchemaPatch::RemoveType(TypeName::from(DEFAULT_QUERY_TYPE)));
            }
            patches.extend(fragment.types.into_iter().map(SchemaPatch::AddType));
            patches.extend(
                fragment
                    .query_fields
                    .into_iter()
                    .map(|field| SchemaPatch::AddField {
                        type_name: query_type.clone(),
                        field,
                    }),
            );

            Ok(base.apply_patches(patches)?)
        },
    )
}
