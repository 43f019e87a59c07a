//! The runtime registry of lists and their fields, derived from the static configuration.

use indexmap::IndexMap;

use crate::config::{AdminConfig, FieldConfig, FieldUiConfig, GraphqlOmit, Operation};
use crate::labels::humanize;
use crate::root_value::QueryMode;

pub const ID_FIELD: &str = "id";
const DEFAULT_VIEWS: &str = "text";
const ID_VIEWS: &str = "id";

/// Initialised lists by list key, in declaration order.
pub type Lists = IndexMap<String, InitialisedList>;

#[derive(Debug, Clone)]
pub struct InitialisedList {
    pub key: String,
    pub fields: IndexMap<String, InitialisedField>,
}

#[derive(Debug, Clone)]
pub struct InitialisedField {
    pub path: String,
    pub label: String,
    pub views: String,
    pub field_meta: Option<serde_json::Value>,
    pub search: Option<QueryMode>,
    pub graphql: FieldGraphql,
    pub ui: FieldUiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGraphql {
    pub is_enabled: IsEnabled,
}

/// Which operations the GraphQL API offers for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct IsEnabled {
    pub read: bool,
    pub create: bool,
    pub update: bool,
    pub filter: bool,
    pub order_by: bool,
}

impl IsEnabled {
    pub const ALL: IsEnabled = IsEnabled {
        read: true,
        create: true,
        update: true,
        filter: true,
        order_by: true,
    };
}

pub fn initialise_lists(config: &AdminConfig) -> Lists {
    config
        .lists
        .iter()
        .map(|(list_key, list_config)| {
            let mut fields = IndexMap::new();
            if !list_config.fields.contains_key(ID_FIELD) {
                fields.insert(ID_FIELD.to_string(), id_field());
            }
            for (path, field_config) in &list_config.fields {
                fields.insert(
                    path.clone(),
                    initialise_field(path, field_config, list_config.graphql.omit),
                );
            }
            let list = InitialisedList {
                key: list_key.clone(),
                fields,
            };
            (list_key.clone(), list)
        })
        .collect()
}

fn id_field() -> InitialisedField {
    InitialisedField {
        path: ID_FIELD.to_string(),
        label: "ID".to_string(),
        views: ID_VIEWS.to_string(),
        field_meta: None,
        search: None,
        graphql: FieldGraphql {
            is_enabled: IsEnabled {
                create: false,
                update: false,
                ..IsEnabled::ALL
            },
        },
        ui: FieldUiConfig::default(),
    }
}

fn initialise_field(path: &str, config: &FieldConfig, list_omit: GraphqlOmit) -> InitialisedField {
    let enabled =
        |operation| !list_omit.omits(operation) && !config.graphql.omit.omits(operation);
    let read = enabled(Operation::Read);
    InitialisedField {
        path: path.to_string(),
        label: config.label.clone().unwrap_or_else(|| humanize(path)),
        views: config
            .views
            .clone()
            .unwrap_or_else(|| DEFAULT_VIEWS.to_string()),
        field_meta: config.field_meta.clone(),
        search: config.search,
        graphql: FieldGraphql {
            is_enabled: IsEnabled {
                read,
                create: enabled(Operation::Create),
                update: enabled(Operation::Update),
                filter: read && config.is_filterable.unwrap_or(true),
                order_by: read && config.is_orderable.unwrap_or(true),
            },
        },
        ui: config.ui.clone(),
    }
}
