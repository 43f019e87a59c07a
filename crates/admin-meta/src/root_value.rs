//! The static part of the admin meta, computed once from the configuration.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing_util::SpanVisibility;

use crate::config::{AdminConfig, ListConfig};
use crate::error::AdminMetaBuildError;
use crate::labels::{humanize, kebab_case, pluralize};
use crate::lists::{InitialisedList, Lists, ID_FIELD};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_DEFAULT_COLUMNS: usize = 3;
const LABEL_FIELD_CANDIDATES: [&str; 3] = ["label", "name", "title"];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QueryMode {
    Default,
    Insensitive,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminMetaRootVal {
    pub enable_signout: bool,
    pub enable_session_item: bool,
    pub lists_by_key: IndexMap<String, Arc<ListMetaRootVal>>,
    /// View modules used by the fields, indexed by `viewsIndex` and `customViewsIndex`.
    pub views: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListMetaRootVal {
    pub key: String,
    pub item_query_name: String,
    pub list_query_name: String,
    pub path: String,
    pub label: String,
    pub singular: String,
    pub plural: String,
    pub description: Option<String>,
    pub initial_columns: Vec<String>,
    pub page_size: i32,
    pub label_field: String,
    pub initial_sort: Option<InitialSort>,
    pub fields: Vec<Arc<FieldMetaRootVal>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialSort {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetaRootVal {
    pub list_key: String,
    pub path: String,
    pub label: String,
    pub is_orderable: bool,
    pub is_filterable: bool,
    pub field_meta: Option<serde_json::Value>,
    pub views_index: usize,
    pub custom_views_index: Option<usize>,
    pub search: Option<QueryMode>,
}

/// Builds the static admin meta. Every list of the configuration must have been initialised and
/// the other way around.
pub fn build_admin_meta_root(
    config: &AdminConfig,
    lists: &Lists,
) -> Result<AdminMetaRootVal, AdminMetaBuildError> {
    let tracer = tracing_util::global_tracer();
    tracer.in_span(
        "build_admin_meta_root",
        "Build static admin meta",
        SpanVisibility::Internal,
        || {
            if let Some(list_key) = lists.keys().find(|key| !config.lists.contains_key(*key)) {
                return Err(AdminMetaBuildError::ListNotConfigured {
                    list_key: list_key.clone(),
                });
            }

            let mut views = IndexSet::new();
            let mut lists_by_key = IndexMap::new();
            let mut list_keys_by_path: HashMap<String, String> = HashMap::new();
            for (list_key, list_config) in &config.lists {
                let list = lists.get(list_key).ok_or_else(|| {
                    AdminMetaBuildError::ListNotInitialised {
                        list_key: list_key.clone(),
                    }
                })?;
                let list_meta = build_list_meta(list_key, list_config, list, &mut views)?;
                if let Some(first) =
                    list_keys_by_path.insert(list_meta.path.clone(), list_key.clone())
                {
                    return Err(AdminMetaBuildError::DuplicatePath {
                        path: list_meta.path,
                        first,
                        second: list_key.clone(),
                    });
                }
                lists_by_key.insert(list_key.clone(), Arc::new(list_meta));
            }

            tracing::debug!(lists = lists_by_key.len(), views = views.len(), "built admin meta");
            Ok(AdminMetaRootVal {
                enable_signout: config.session,
                enable_session_item: config.ui.enable_session_item,
                lists_by_key,
                views: views.into_iter().collect(),
            })
        },
    )
}

fn build_list_meta(
    list_key: &str,
    list_config: &ListConfig,
    list: &InitialisedList,
    views: &mut IndexSet<String>,
) -> Result<ListMetaRootVal, AdminMetaBuildError> {
    let ui = &list_config.ui;
    let singular = ui.singular.clone().unwrap_or_else(|| humanize(list_key));
    let plural = ui.plural.clone().unwrap_or_else(|| pluralize(&singular));
    let label = ui.label.clone().unwrap_or_else(|| plural.clone());
    let path = ui.path.clone().unwrap_or_else(|| kebab_case(&plural));

    let label_field = match &ui.label_field {
        Some(label_field) => label_field.clone(),
        None => LABEL_FIELD_CANDIDATES
            .into_iter()
            .find(|candidate| list.fields.contains_key(*candidate))
            .unwrap_or(ID_FIELD)
            .to_string(),
    };
    if !list.fields.contains_key(&label_field) {
        return Err(AdminMetaBuildError::UnknownLabelField {
            list_key: list_key.to_string(),
            field_path: label_field,
        });
    }

    let initial_columns = match &ui.list_view.initial_columns {
        Some(columns) => {
            if let Some(unknown) = columns.iter().find(|c| !list.fields.contains_key(*c)) {
                return Err(AdminMetaBuildError::UnknownInitialColumn {
                    list_key: list_key.to_string(),
                    field_path: unknown.clone(),
                });
            }
            columns.clone()
        }
        None => std::iter::once(label_field.clone())
            .chain(
                list.fields
                    .values()
                    .filter(|field| {
                        field.graphql.is_enabled.read
                            && field.path != label_field
                            && field.path != ID_FIELD
                    })
                    .map(|field| field.path.clone()),
            )
            .take(MAX_DEFAULT_COLUMNS)
            .collect(),
    };

    let initial_sort = match &ui.list_view.initial_sort {
        Some(sort) if !list.fields.contains_key(&sort.field) => {
            return Err(AdminMetaBuildError::UnknownInitialSortField {
                list_key: list_key.to_string(),
                field_path: sort.field.clone(),
            });
        }
        Some(sort) => Some(InitialSort {
            field: sort.field.clone(),
            direction: sort.direction,
        }),
        None => None,
    };

    let requested_page_size = ui.list_view.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let page_size = i32::try_from(requested_page_size)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| AdminMetaBuildError::InvalidPageSize {
            list_key: list_key.to_string(),
            page_size: requested_page_size,
        })?;

    let fields = list
        .fields
        .values()
        .map(|field| {
            Arc::new(FieldMetaRootVal {
                list_key: list_key.to_string(),
                path: field.path.clone(),
                label: field.label.clone(),
                is_orderable: field.graphql.is_enabled.order_by,
                is_filterable: field.graphql.is_enabled.filter,
                field_meta: field.field_meta.clone(),
                views_index: views.insert_full(field.views.clone()).0,
                custom_views_index: field
                    .ui
                    .views
                    .as_ref()
                    .map(|custom_views| views.insert_full(custom_views.clone()).0),
                search: field.search,
            })
        })
        .collect();

    Ok(ListMetaRootVal {
        key: list_key.to_string(),
        item_query_name: list_key.to_string(),
        list_query_name: list_config
            .graphql
            .plural
            .clone()
            .unwrap_or_else(|| pluralize(list_key)),
        path,
        label,
        singular,
        plural,
        description: ui
            .description
            .clone()
            .or_else(|| list_config.description.clone()),
        initial_columns,
        page_size,
        label_field,
        initial_sort,
        fields,
    })
}
