use std::sync::Arc;

use schema_builder::Schema;
use tracing_util::SpanVisibility;

use crate::config::AdminConfig;
use crate::error::{ExposeInternalErrors, SchemaBuildError};
use crate::lists::Lists;
use crate::merge::merge_schema;
use crate::root_value::AdminMetaRootVal;
use crate::types::AdminMetaTypeBuilder;

/// Extends `graphql_schema` with `keystone { adminMeta }`. The static parts of the admin meta
/// come from `admin_meta`, the parts depending on the request are resolved from `config` and
/// `lists` for every request.
pub fn get_admin_meta_schema(
    config: Arc<AdminConfig>,
    graphql_schema: &Schema,
    lists: Arc<Lists>,
    admin_meta: Arc<AdminMetaRootVal>,
    expose_internal_errors: ExposeInternalErrors,
) -> Result<Schema, SchemaBuildError> {
    let tracer = tracing_util::global_tracer();
    tracer.in_span(
        "get_admin_meta_schema",
        "Add admin meta to GraphQL schema",
        SpanVisibility::User,
        || {
            let builder = AdminMetaTypeBuilder::new(
                config,
                graphql_schema,
                lists,
                admin_meta,
                expose_internal_errors,
            )?;
            merge_schema(graphql_schema, builder.build_fragment())
        },
    )
}
