//! The caller dependent parts of the admin meta, resolved by the nearest nullable field above
//! them.
//!
//! `hideCreate`, `isHidden`, `fieldMode` and friends are non-null, so a failure to resolve one of
//! them nulls the closest nullable ancestor: `adminMeta`, `list(key)` or `itemView(id)`. Those
//! fields look ahead at what the query selects below them, resolve it up front and report any
//! failure at the path of the field that failed.

use std::ops::Deref;
use std::sync::Arc;

use async_graphql::{Lookahead, PathSegment};
use futures_util::future::try_join_all;

use crate::context::RequestContext;
use crate::error::ResolveError;
use crate::field_mode::{
    CreateViewFieldMode, FieldIdentifier, FieldModeResolver, ItemFieldIdentifier,
    ItemViewFieldMode, ListViewFieldMode,
};
use crate::list_policy::{ListFlag, ListPolicyResolver};
use crate::root_value::{AdminMetaRootVal, FieldMetaRootVal, ListMetaRootVal};

/// The dynamic fields a query selects on a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSelection {
    pub hide_create: bool,
    pub hide_delete: bool,
    pub is_hidden: bool,
    pub create_view_field_mode: bool,
    pub list_view_field_mode: bool,
}

impl ListSelection {
    /// Aliases and `@skip`/`@include` are not taken into account, so a field may be resolved
    /// without ending up in the response.
    pub fn from_look_ahead(list: &Lookahead<'_>) -> Self {
        let fields = list.field("fields");
        ListSelection {
            hide_create: list.field("hideCreate").exists(),
            hide_delete: list.field("hideDelete").exists(),
            is_hidden: list.field("isHidden").exists(),
            create_view_field_mode: fields.field("createView").field("fieldMode").exists(),
            list_view_field_mode: fields.field("listView").field("fieldMode").exists(),
        }
    }

    fn selects(self, flag: ListFlag) -> bool {
        match flag {
            ListFlag::HideCreate => self.hide_create,
            ListFlag::HideDelete => self.hide_delete,
            ListFlag::IsHidden => self.is_hidden,
        }
    }
}

/// A failed dynamic field, located relative to the field that resolved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicFieldError {
    pub path: Vec<PathSegment>,
    pub error: ResolveError,
}

impl DynamicFieldError {
    pub fn at(error: ResolveError, path: Vec<PathSegment>) -> Self {
        DynamicFieldError { path, error }
    }

    /// Moves the error below `prefix`.
    pub fn within(mut self, prefix: impl IntoIterator<Item = PathSegment>) -> Self {
        let mut path: Vec<_> = prefix.into_iter().collect();
        path.append(&mut self.path);
        self.path = path;
        self
    }
}

impl From<ResolveError> for DynamicFieldError {
    fn from(error: ResolveError) -> Self {
        DynamicFieldError::at(error, Vec::new())
    }
}

fn field_segment(name: &str) -> PathSegment {
    PathSegment::Field(name.to_string())
}

/// The admin meta as seen by one caller.
#[derive(Debug, Clone)]
pub struct AdminMetaValue {
    pub root: Arc<AdminMetaRootVal>,
    /// `None` unless the query selects `lists`.
    pub lists: Option<Vec<ResolvedListMeta>>,
}

/// A list with the flags the query selects. Unselected flags are `None`.
#[derive(Debug, Clone)]
pub struct ResolvedListMeta {
    pub meta: Arc<ListMetaRootVal>,
    pub hide_create: Option<bool>,
    pub hide_delete: Option<bool>,
    pub is_hidden: Option<bool>,
    pub fields: Vec<ResolvedFieldMeta>,
}

impl ResolvedListMeta {
    /// Nothing resolved, every dynamic field is computed when it is reached.
    pub fn unresolved(meta: Arc<ListMetaRootVal>) -> Self {
        let fields = meta
            .fields
            .iter()
            .map(|field| ResolvedFieldMeta {
                meta: field.clone(),
                create_view: None,
                list_view: None,
            })
            .collect();
        ResolvedListMeta {
            meta,
            hide_create: None,
            hide_delete: None,
            is_hidden: None,
            fields,
        }
    }

    pub fn flag(&self, flag: ListFlag) -> Option<bool> {
        match flag {
            ListFlag::HideCreate => self.hide_create,
            ListFlag::HideDelete => self.hide_delete,
            ListFlag::IsHidden => self.is_hidden,
        }
    }
}

impl Deref for ResolvedListMeta {
    type Target = ListMetaRootVal;

    fn deref(&self) -> &Self::Target {
        &self.meta
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedFieldMeta {
    pub meta: Arc<FieldMetaRootVal>,
    pub create_view: Option<CreateViewFieldMode>,
    pub list_view: Option<ListViewFieldMode>,
}

impl ResolvedFieldMeta {
    pub fn identifier(&self) -> FieldIdentifier {
        FieldIdentifier {
            list_key: self.meta.list_key.clone(),
            field_path: self.meta.path.clone(),
        }
    }
}

impl Deref for ResolvedFieldMeta {
    type Target = FieldMetaRootVal;

    fn deref(&self) -> &Self::Target {
        &self.meta
    }
}

/// The item view of a field for one item. `field_mode` is `None` unless selected.
#[derive(Debug, Clone)]
pub struct ResolvedItemView {
    pub item_field: ItemFieldIdentifier,
    pub field_mode: Option<ItemViewFieldMode>,
}

/// Resolves the selected dynamic fields of lists ahead of the fields selecting them.
#[derive(Debug, Clone)]
pub struct ListMetaResolver {
    list_policies: Arc<ListPolicyResolver>,
    field_modes: Arc<FieldModeResolver>,
}

impl ListMetaResolver {
    pub fn new(
        list_policies: Arc<ListPolicyResolver>,
        field_modes: Arc<FieldModeResolver>,
    ) -> Self {
        ListMetaResolver {
            list_policies,
            field_modes,
        }
    }

    /// Every list of `admin_meta`, failures located below `lists`.
    pub async fn resolve_lists(
        &self,
        admin_meta: &AdminMetaRootVal,
        selection: ListSelection,
        context: &RequestContext,
    ) -> Result<Vec<ResolvedListMeta>, DynamicFieldError> {
        try_join_all(
            admin_meta
                .lists_by_key
                .values()
                .enumerate()
                .map(|(index, list)| async move {
                    self.resolve_list(list.clone(), selection, context)
                        .await
                        .map_err(|error| {
                            error.within([field_segment("lists"), PathSegment::Index(index)])
                        })
                }),
        )
        .await
    }

    pub async fn resolve_list(
        &self,
        list: Arc<ListMetaRootVal>,
        selection: ListSelection,
        context: &RequestContext,
    ) -> Result<ResolvedListMeta, DynamicFieldError> {
        let hide_create = self
            .resolve_flag(&list.key, ListFlag::HideCreate, selection, context)
            .await?;
        let hide_delete = self
            .resolve_flag(&list.key, ListFlag::HideDelete, selection, context)
            .await?;
        let fields = try_join_all(list.fields.iter().enumerate().map(|(index, field)| async move {
            self.resolve_field(field.clone(), selection, context)
                .await
                .map_err(|error| {
                    error.within([field_segment("fields"), PathSegment::Index(index)])
                })
        }))
        .await?;
        let is_hidden = self
            .resolve_flag(&list.key, ListFlag::IsHidden, selection, context)
            .await?;
        Ok(ResolvedListMeta {
            meta: list,
            hide_create,
            hide_delete,
            is_hidden,
            fields,
        })
    }

    async fn resolve_flag(
        &self,
        list_key: &str,
        flag: ListFlag,
        selection: ListSelection,
        context: &RequestContext,
    ) -> Result<Option<bool>, DynamicFieldError> {
        if !selection.selects(flag) {
            return Ok(None);
        }
        let field_name: &'static str = flag.into();
        self.list_policies
            .resolve(list_key, flag, context)
            .await
            .map(Some)
            .map_err(|error| DynamicFieldError::at(error, vec![field_segment(field_name)]))
    }

    async fn resolve_field(
        &self,
        field: Arc<FieldMetaRootVal>,
        selection: ListSelection,
        context: &RequestContext,
    ) -> Result<ResolvedFieldMeta, DynamicFieldError> {
        let identifier = FieldIdentifier {
            list_key: field.list_key.clone(),
            field_path: field.path.clone(),
        };
        let create_view = if selection.create_view_field_mode {
            let mode = self
                .field_modes
                .create_view(&identifier, context)
                .await
                .map_err(|error| {
                    DynamicFieldError::at(
                        error,
                        vec![field_segment("createView"), field_segment("fieldMode")],
                    )
                })?;
            Some(mode)
        } else {
            None
        };
        let list_view = if selection.list_view_field_mode {
            let mode = self
                .field_modes
                .list_view(&identifier, context)
                .await
                .map_err(|error| {
                    DynamicFieldError::at(
                        error,
                        vec![field_segment("listView"), field_segment("fieldMode")],
                    )
                })?;
            Some(mode)
        } else {
            None
        };
        Ok(ResolvedFieldMeta {
            meta: field,
            create_view,
            list_view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::context::{NoRecords, Session};
    use crate::lists::initialise_lists;
    use crate::policy::{Policy, SessionArgs};
    use crate::root_value::build_admin_meta_root;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn setup() -> (ListMetaResolver, Arc<AdminMetaRootVal>) {
        let mut config: AdminConfig = serde_json::from_value(json!({
            "lists": {
                "Post": {
                    "ui": { "hideDelete": true },
                    "fields": { "title": {}, "body": { "graphql": { "omit": true } } }
                },
                "Tag": { "fields": { "name": {} } }
            }
        }))
        .unwrap();
        config.lists["Tag"].ui.is_hidden = Some(Policy::from_fn(|args: SessionArgs| {
            args.session.is_none()
        }));
        let lists = initialise_lists(&config);
        let admin_meta = build_admin_meta_root(&config, &lists).unwrap();
        let config = Arc::new(config);
        let resolver = ListMetaResolver::new(
            Arc::new(ListPolicyResolver::new(config.clone())),
            Arc::new(FieldModeResolver::new(config, Arc::new(lists))),
        );
        (resolver, Arc::new(admin_meta))
    }

    fn everything() -> ListSelection {
        ListSelection {
            hide_create: true,
            hide_delete: true,
            is_hidden: true,
            create_view_field_mode: true,
            list_view_field_mode: true,
        }
    }

    #[tokio::test]
    async fn only_selected_fields_are_resolved() {
        let (resolver, admin_meta) = setup();
        let context = RequestContext::live(None, Arc::new(NoRecords));
        let selection = ListSelection {
            is_hidden: true,
            list_view_field_mode: true,
            ..ListSelection::default()
        };
        let lists = resolver
            .resolve_lists(&admin_meta, selection, &context)
            .await
            .unwrap();

        let tag = &lists[1];
        assert_eq!(tag.key, "Tag");
        assert_eq!(
            (tag.hide_create, tag.hide_delete, tag.is_hidden),
            (None, None, Some(true))
        );
        let post = &lists[0];
        let modes: Vec<_> = post
            .fields
            .iter()
            .map(|field| (field.path.as_str(), field.create_view, field.list_view))
            .collect();
        assert_eq!(
            modes,
            vec![
                ("id", None, Some(ListViewFieldMode::Read)),
                ("title", None, Some(ListViewFieldMode::Read)),
                ("body", None, Some(ListViewFieldMode::Hidden)),
            ]
        );
    }

    #[tokio::test]
    async fn nothing_selected_needs_no_live_request() {
        let (resolver, admin_meta) = setup();
        let lists = resolver
            .resolve_lists(
                &admin_meta,
                ListSelection::default(),
                &RequestContext::BuildTimeExport,
            )
            .await
            .unwrap();
        assert_eq!(lists.len(), 2);
        assert!(lists.iter().all(|list| list.flag(ListFlag::IsHidden).is_none()));
    }

    #[tokio::test]
    async fn failures_are_located_at_the_failing_field() {
        let (resolver, admin_meta) = setup();
        let error = resolver
            .resolve_lists(
                &admin_meta,
                ListSelection {
                    list_view_field_mode: true,
                    ..ListSelection::default()
                },
                &RequestContext::BuildTimeExport,
            )
            .await
            .unwrap_err();
        assert_eq!(
            error.path,
            vec![
                PathSegment::Field("lists".to_string()),
                PathSegment::Index(0),
                PathSegment::Field("fields".to_string()),
                PathSegment::Index(0),
                PathSegment::Field("listView".to_string()),
                PathSegment::Field("fieldMode".to_string()),
            ]
        );
        assert_eq!(error.error.code(), "BUILD_PHASE_VIOLATION");

        let tag = admin_meta.lists_by_key["Tag"].clone();
        let error = resolver
            .resolve_list(tag, everything(), &RequestContext::BuildTimeExport)
            .await
            .unwrap_err();
        assert_eq!(error.path, vec![PathSegment::Field("hideCreate".to_string())]);
    }

    #[tokio::test]
    async fn a_live_request_resolves_everything() {
        let (resolver, admin_meta) = setup();
        let context = RequestContext::live(
            Some(Session::new(json!({ "id": "admin" }))),
            Arc::new(NoRecords),
        );
        let post = resolver
            .resolve_list(admin_meta.lists_by_key["Post"].clone(), everything(), &context)
            .await
            .unwrap();
        assert_eq!(
            (post.hide_create, post.hide_delete, post.is_hidden),
            (Some(false), Some(true), Some(false))
        );
        assert_eq!(post.fields[2].create_view, Some(CreateViewFieldMode::Hidden));
        assert_eq!(post.fields[1].create_view, Some(CreateViewFieldMode::Edit));
    }
}
