use async_graphql::dynamic;
use serde::Serialize;
use tracing_util::SpanVisibility;

use crate::context::RequestContext;
use crate::error::ExportError;
use crate::root_value::AdminMetaRootVal;

/// Every field of the admin meta that can be resolved without a request.
pub const STATIC_ADMIN_META_QUERY: &str = "query StaticAdminMeta {
  keystone {
    adminMeta {
      enableSignout
      enableSessionItem
      lists {
        key
        itemQueryName
        listQueryName
        path
        label
        singular
        plural
        description
        initialColumns
        pageSize
        labelField
        initialSort {
          field
          direction
        }
        fields {
          path
          label
          isOrderable
          isFilterable
          fieldMeta
          viewsIndex
          customViewsIndex
          search
        }
      }
    }
  }
}";

/// Runs [`STATIC_ADMIN_META_QUERY`] the way the admin UI build does and returns its data.
pub async fn export_admin_meta(schema: &dynamic::Schema) -> Result<serde_json::Value, ExportError> {
    let tracer = tracing_util::global_tracer();
    tracer
        .in_span_async(
            "export_admin_meta",
            "Export static admin meta",
            SpanVisibility::User,
            || {
                Box::pin(async {
                    let request = async_graphql::Request::new(STATIC_ADMIN_META_QUERY)
                        .data(RequestContext::BuildTimeExport);
                    let response = schema.execute(request).await;
                    if !response.errors.is_empty() {
                        return Err(ExportError::QueryFailed(
                            response
                                .errors
                                .iter()
                                .map(|error| error.message.clone())
                                .collect(),
                        ));
                    }
                    response
                        .data
                        .into_json()
                        .map_err(|error| ExportError::InvalidData(error.to_string()))
                })
            },
        )
        .await
}

/// What the admin UI build writes out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUiBuildExport {
    /// The data of [`STATIC_ADMIN_META_QUERY`].
    pub admin_meta: serde_json::Value,
    /// The view modules `viewsIndex` and `customViewsIndex` point into.
    pub views: Vec<String>,
}

/// The static export together with the views registry of `admin_meta`, which must be the root
/// value `schema` was built from.
pub async fn export_admin_ui_build(
    schema: &dynamic::Schema,
    admin_meta: &AdminMetaRootVal,
) -> Result<AdminUiBuildExport, ExportError> {
    Ok(AdminUiBuildExport {
        admin_meta: export_admin_meta(schema).await?,
        views: admin_meta.views.clone(),
    })
}
