//! The static admin configuration: per list UI options and the fields of every list.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::field_mode::{CreateViewFieldMode, ItemViewFieldMode, ListViewFieldMode};
use crate::policy::{ItemPolicy, SessionPolicy};
use crate::root_value::{QueryMode, SortDirection};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AdminConfig {
    /// Whether a session strategy is configured.
    pub session: bool,
    pub ui: AdminUiConfig,
    pub lists: IndexMap<String, ListConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AdminUiConfig {
    /// Decides whether the caller may see the admin meta at all. Only consulted when sessions are
    /// configured, and defaults to requiring a session.
    pub is_access_allowed: Option<SessionPolicy<bool>>,
    pub enable_session_item: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListConfig {
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldConfig>,
    pub graphql: ListGraphqlConfig,
    pub ui: ListUiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListGraphqlConfig {
    /// Name of the many-item query. Defaults to the pluralized list key.
    pub plural: Option<String>,
    pub omit: GraphqlOmit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListUiConfig {
    pub label: Option<String>,
    pub singular: Option<String>,
    pub plural: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub label_field: Option<String>,
    pub hide_create: Option<SessionPolicy<bool>>,
    pub hide_delete: Option<SessionPolicy<bool>>,
    pub is_hidden: Option<SessionPolicy<bool>>,
    pub create_view: ListCreateViewConfig,
    pub list_view: ListListViewConfig,
    pub item_view: ListItemViewConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListCreateViewConfig {
    pub default_field_mode: Option<SessionPolicy<CreateViewFieldMode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListListViewConfig {
    pub default_field_mode: Option<SessionPolicy<ListViewFieldMode>>,
    pub initial_columns: Option<Vec<String>>,
    pub initial_sort: Option<InitialSortConfig>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListItemViewConfig {
    pub default_field_mode: Option<ItemPolicy<ItemViewFieldMode>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialSortConfig {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldConfig {
    pub label: Option<String>,
    /// Module implementing the field's admin UI views. Defaults to `text`.
    pub views: Option<String>,
    pub field_meta: Option<serde_json::Value>,
    pub search: Option<QueryMode>,
    pub is_filterable: Option<bool>,
    pub is_orderable: Option<bool>,
    pub graphql: FieldGraphqlConfig,
    pub ui: FieldUiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldGraphqlConfig {
    pub omit: GraphqlOmit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldUiConfig {
    /// Module overriding the views of the field type.
    pub views: Option<String>,
    pub create_view: FieldCreateViewConfig,
    pub list_view: FieldListViewConfig,
    pub item_view: FieldItemViewConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldCreateViewConfig {
    pub field_mode: Option<SessionPolicy<CreateViewFieldMode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldListViewConfig {
    pub field_mode: Option<SessionPolicy<ListViewFieldMode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldItemViewConfig {
    pub field_mode: Option<ItemPolicy<ItemViewFieldMode>>,
}

/// Operations removed from the GraphQL API, either all of them or a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GraphqlOmit {
    All(bool),
    Operations(OmittedOperations),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OmittedOperations {
    pub read: bool,
    pub create: bool,
    pub update: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
}

impl GraphqlOmit {
    pub fn omits(self, operation: Operation) -> bool {
        match self {
            GraphqlOmit::All(all) => all,
            GraphqlOmit::Operations(operations) => match operation {
                Operation::Read => operations.read,
                Operation::Create => operations.create,
                Operation::Update => operations.update,
            },
        }
    }
}

impl Default for GraphqlOmit {
    fn default() -> Self {
        GraphqlOmit::All(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_a_configuration_file() {
        let config: AdminConfig = serde_json::from_value(json!({
            "session": true,
            "ui": { "enableSessionItem": true },
            "lists": {
                "Post": {
                    "graphql": { "plural": "Posts" },
                    "ui": {
                        "labelField": "title",
                        "hideDelete": true,
                        "listView": {
                            "initialColumns": ["title", "status"],
                            "initialSort": { "field": "title", "direction": "DESC" },
                            "pageSize": 25
                        },
                        "itemView": { "defaultFieldMode": "read" }
                    },
                    "fields": {
                        "title": { "views": "text", "search": "insensitive" },
                        "status": {
                            "views": "select",
                            "fieldMeta": { "options": ["draft", "published"] },
                            "graphql": { "omit": { "create": true } },
                            "ui": { "createView": { "fieldMode": "hidden" } }
                        }
                    }
                }
            }
        }))
        .unwrap();

        assert!(config.session);
        assert!(config.ui.enable_session_item);
        assert!(config.ui.is_access_allowed.is_none());

        let post = &config.lists["Post"];
        assert!(matches!(post.ui.hide_delete, Some(Policy::Literal(true))));
        assert!(matches!(
            post.ui.item_view.default_field_mode,
            Some(Policy::Literal(ItemViewFieldMode::Read))
        ));
        assert_eq!(
            post.ui.list_view.initial_sort,
            Some(InitialSortConfig {
                field: "title".to_string(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(post.ui.list_view.page_size, Some(25));

        let fields: Vec<_> = post.fields.keys().collect();
        assert_eq!(fields, vec!["title", "status"]);
        assert_eq!(post.fields["title"].search, Some(QueryMode::Insensitive));
        let status = &post.fields["status"];
        assert!(status.graphql.omit.omits(Operation::Create));
        assert!(!status.graphql.omit.omits(Operation::Read));
        assert!(matches!(
            status.ui.create_view.field_mode,
            Some(Policy::Literal(CreateViewFieldMode::Hidden))
        ));
    }

    #[test]
    fn omit_flags() {
        let all: GraphqlOmit = serde_json::from_value(json!(true)).unwrap();
        assert!(all.omits(Operation::Read) && all.omits(Operation::Update));
        assert!(!GraphqlOmit::default().omits(Operation::Create));
    }

    #[test]
    fn rejects_unknown_options() {
        let result = serde_json::from_value::<AdminConfig>(json!({
            "lists": { "Post": { "ui": { "hideEverything": true } } }
        }));
        assert!(result.is_err());
    }
}
