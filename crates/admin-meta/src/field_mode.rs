//! How a field is shown in each admin UI view.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing_util::SpanVisibility;

use crate::config::{AdminConfig, ListUiConfig};
use crate::context::RequestContext;
use crate::error::ResolveError;
use crate::lists::{InitialisedField, Lists};
use crate::policy::{evaluate, ItemArgs, SessionArgs};
use crate::types::TypeId;

macro_rules! field_mode_enum {
    ($(#[$attr:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$attr])*
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
        pub enum $name {
            $($variant),+
        }
    };
}

field_mode_enum!(
    /// Field modes of the create view.
    CreateViewFieldMode { Edit, Hidden }
);
field_mode_enum!(
    /// Field modes of the list view.
    ListViewFieldMode { Read, Hidden }
);
field_mode_enum!(
    /// Field modes of the item view.
    ItemViewFieldMode { Edit, Read, Hidden }
);

/// A field of a list, as passed to the per view resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentifier {
    pub list_key: String,
    pub field_path: String,
}

/// A field of a specific item, as passed to the item view resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFieldIdentifier {
    pub field: FieldIdentifier,
    pub item_id: String,
}

/// Computes field modes per request. Nothing is cached, so every call evaluates the configured
/// policies again and the item view looks up its item again.
#[derive(Debug, Clone)]
pub struct FieldModeResolver {
    config: Arc<AdminConfig>,
    lists: Arc<Lists>,
}

impl FieldModeResolver {
    pub fn new(config: Arc<AdminConfig>, lists: Arc<Lists>) -> Self {
        FieldModeResolver { config, lists }
    }

    fn field(&self, field: &FieldIdentifier) -> Result<&InitialisedField, ResolveError> {
        self.lists
            .get(&field.list_key)
            .ok_or_else(|| ResolveError::UnknownList {
                list_key: field.list_key.clone(),
            })?
            .fields
            .get(&field.field_path)
            .ok_or_else(|| ResolveError::UnknownField {
                list_key: field.list_key.clone(),
                field_path: field.field_path.clone(),
            })
    }

    fn list_ui(&self, list_key: &str) -> Result<&ListUiConfig, ResolveError> {
        self.config
            .lists
            .get(list_key)
            .map(|list| &list.ui)
            .ok_or_else(|| ResolveError::UnknownList {
                list_key: list_key.to_string(),
            })
    }

    pub async fn create_view(
        &self,
        field: &FieldIdentifier,
        context: &RequestContext,
    ) -> Result<CreateViewFieldMode, ResolveError> {
        let tracer = tracing_util::global_tracer();
        tracer
            .in_span_async(
                "create_view_field_mode",
                format!("Create view field mode of {}.{}", field.list_key, field.field_path),
                SpanVisibility::Internal,
                || {
                    Box::pin(async {
                        let live_request = context
                            .live_request(TypeId::FieldMetaCreateView.to_type_name(), "fieldMode")?;
                        let initialised = self.field(field)?;
                        if !initialised.graphql.is_enabled.create {
                            return Ok(CreateViewFieldMode::Hidden);
                        }
                        let policy = match &initialised.ui.create_view.field_mode {
                            Some(policy) => Some(policy),
                            None => self
                                .list_ui(&field.list_key)?
                                .create_view
                                .default_field_mode
                                .as_ref(),
                        };
                        let args = SessionArgs {
                            session: live_request.session.clone(),
                        };
                        Ok(evaluate(policy, CreateViewFieldMode::Edit, args).await)
                    })
                },
            )
            .await
    }

    pub async fn list_view(
        &self,
        field: &FieldIdentifier,
        context: &RequestContext,
    ) -> Result<ListViewFieldMode, ResolveError> {
        let tracer = tracing_util::global_tracer();
        tracer
            .in_span_async(
                "list_view_field_mode",
                format!("List view field mode of {}.{}", field.list_key, field.field_path),
                SpanVisibility::Internal,
                || {
                    Box::pin(async {
                        let live_request = context
                            .live_request(TypeId::FieldMetaListView.to_type_name(), "fieldMode")?;
                        let initialised = self.field(field)?;
                        if !initialised.graphql.is_enabled.read {
                            return Ok(ListViewFieldMode::Hidden);
                        }
                        let policy = match &initialised.ui.list_view.field_mode {
                            Some(policy) => Some(policy),
                            None => self
                                .list_ui(&field.list_key)?
                                .list_view
                                .default_field_mode
                                .as_ref(),
                        };
                        let args = SessionArgs {
                            session: live_request.session.clone(),
                        };
                        Ok(evaluate(policy, ListViewFieldMode::Read, args).await)
                    })
                },
            )
            .await
    }

    /// The item is looked up without access control, so that policies can depend on it even when
    /// the caller may not read it. A missing item is passed on as absent.
    pub async fn item_view(
        &self,
        item_field: &ItemFieldIdentifier,
        context: &RequestContext,
    ) -> Result<ItemViewFieldMode, ResolveError> {
        let field = &item_field.field;
        let tracer = tracing_util::global_tracer();
        tracer
            .in_span_async(
                "item_view_field_mode",
                format!(
                    "Item view field mode of {}.{} for item {}",
                    field.list_key, field.field_path, item_field.item_id
                ),
                SpanVisibility::Internal,
                || {
                    Box::pin(async {
                        let live_request = context
                            .live_request(TypeId::FieldMetaItemView.to_type_name(), "fieldMode")?;
                        let initialised = self.field(field)?;
                        if !initialised.graphql.is_enabled.read {
                            return Ok(ItemViewFieldMode::Hidden);
                        }
                        if !initialised.graphql.is_enabled.update {
                            return Ok(ItemViewFieldMode::Read);
                        }
                        let policy = match &initialised.ui.item_view.field_mode {
                            Some(policy) => Some(policy),
                            None => self
                                .list_ui(&field.list_key)?
                                .item_view
                                .default_field_mode
                                .as_ref(),
                        };
                        let item = live_request
                            .unrestricted_reader
                            .find_one(&field.list_key, &item_field.item_id)
                            .await?;
                        if item.is_none() {
                            tracing::debug!(
                                list_key = %field.list_key,
                                item_id = %item_field.item_id,
                                "item not found, evaluating item view policy without it"
                            );
                        }
                        let args = ItemArgs {
                            session: live_request.session.clone(),
                            item,
                        };
                        Ok(evaluate(policy, ItemViewFieldMode::Edit, args).await)
                    })
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Item, NoRecords, Session, UnrestrictedReader};
    use crate::error::LookupError;
    use crate::lists::initialise_lists;
    use crate::policy::Policy;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Posts {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl UnrestrictedReader for Posts {
        async fn find_one(
            &self,
            list_key: &str,
            item_id: &str,
        ) -> Result<Option<Item>, LookupError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match (list_key, item_id) {
                ("Post", "1") => Ok(Some(json!({ "id": "1", "status": "published" }))),
                ("Post", "broken") => Err(LookupError {
                    list_key: list_key.to_string(),
                    item_id: item_id.to_string(),
                    message: "connection reset".to_string(),
                }),
                _ => Ok(None),
            }
        }
    }

    fn resolver() -> FieldModeResolver {
        let mut config: AdminConfig = serde_json::from_value(json!({
            "lists": {
                "Post": {
                    "ui": {
                        "createView": { "defaultFieldMode": "hidden" },
                        "listView": { "defaultFieldMode": "hidden" }
                    },
                    "fields": {
                        "title": {
                            "ui": {
                                "createView": { "fieldMode": "edit" },
                                "listView": { "fieldMode": "read" }
                            }
                        },
                        "slug": { "graphql": { "omit": { "create": true, "update": true } } },
                        "secret": { "graphql": { "omit": { "read": true } } },
                        "status": {},
                        "body": {}
                    }
                }
            }
        }))
        .unwrap();
        let post = config.lists.get_mut("Post").unwrap();
        // published posts can no longer be edited
        post.ui.item_view.default_field_mode = Some(Policy::from_fn(|args: ItemArgs| {
            match args.item {
                Some(item) if item["status"] == json!("published") => ItemViewFieldMode::Read,
                _ => ItemViewFieldMode::Edit,
            }
        }));
        // the body is hidden from anonymous callers, and left to the default otherwise
        post.fields["body"].ui.item_view.field_mode =
            Some(Policy::computed(|args: ItemArgs| async move {
                args.session.is_none().then_some(ItemViewFieldMode::Hidden)
            }));
        let lists = initialise_lists(&config);
        FieldModeResolver::new(Arc::new(config), Arc::new(lists))
    }

    fn field(path: &str) -> FieldIdentifier {
        FieldIdentifier {
            list_key: "Post".to_string(),
            field_path: path.to_string(),
        }
    }

    fn item_field(path: &str, item_id: &str) -> ItemFieldIdentifier {
        ItemFieldIdentifier {
            field: field(path),
            item_id: item_id.to_string(),
        }
    }

    fn live(reader: Arc<dyn UnrestrictedReader>) -> RequestContext {
        RequestContext::live(Some(Session::new(json!({ "id": "admin" }))), reader)
    }

    #[tokio::test]
    async fn field_policies_override_list_defaults() {
        let resolver = resolver();
        let context = live(Arc::new(NoRecords));
        assert_eq!(
            resolver.create_view(&field("title"), &context).await,
            Ok(CreateViewFieldMode::Edit)
        );
        assert_eq!(
            resolver.create_view(&field("status"), &context).await,
            Ok(CreateViewFieldMode::Hidden)
        );
        assert_eq!(
            resolver.list_view(&field("title"), &context).await,
            Ok(ListViewFieldMode::Read)
        );
        assert_eq!(
            resolver.list_view(&field("status"), &context).await,
            Ok(ListViewFieldMode::Hidden)
        );
    }

    #[tokio::test]
    async fn disabled_operations_win_over_policies() {
        let resolver = resolver();
        let reader = Arc::new(Posts {
            lookups: AtomicUsize::new(0),
        });
        let context = live(reader.clone());
        assert_eq!(
            resolver.create_view(&field("slug"), &context).await,
            Ok(CreateViewFieldMode::Hidden)
        );
        assert_eq!(
            resolver.list_view(&field("secret"), &context).await,
            Ok(ListViewFieldMode::Hidden)
        );
        assert_eq!(
            resolver.item_view(&item_field("secret", "2"), &context).await,
            Ok(ItemViewFieldMode::Hidden)
        );
        assert_eq!(
            resolver.item_view(&item_field("slug", "2"), &context).await,
            Ok(ItemViewFieldMode::Read)
        );
        // nothing had to be looked up
        assert_eq!(reader.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn item_view_policies_see_the_item() {
        let resolver = resolver();
        let reader = Arc::new(Posts {
            lookups: AtomicUsize::new(0),
        });
        let context = live(reader.clone());
        assert_eq!(
            resolver.item_view(&item_field("status", "1"), &context).await,
            Ok(ItemViewFieldMode::Read)
        );
        // a missing item is passed on as absent
        assert_eq!(
            resolver.item_view(&item_field("status", "2"), &context).await,
            Ok(ItemViewFieldMode::Edit)
        );
        // every resolution looks the item up again
        assert_eq!(
            resolver.item_view(&item_field("status", "1"), &context).await,
            Ok(ItemViewFieldMode::Read)
        );
        assert_eq!(reader.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn policies_without_a_value_fall_back_to_edit() {
        let resolver = resolver();
        let context = live(Arc::new(NoRecords));
        assert_eq!(
            resolver.item_view(&item_field("body", "2"), &context).await,
            Ok(ItemViewFieldMode::Edit)
        );
        let anonymous = RequestContext::live(None, Arc::new(NoRecords));
        assert_eq!(
            resolver.item_view(&item_field("body", "2"), &anonymous).await,
            Ok(ItemViewFieldMode::Hidden)
        );
    }

    #[tokio::test]
    async fn lookup_failures_are_errors() {
        let resolver = resolver();
        let context = live(Arc::new(Posts {
            lookups: AtomicUsize::new(0),
        }));
        assert_eq!(
            resolver
                .item_view(&item_field("status", "broken"), &context)
                .await
                .unwrap_err()
                .code(),
            "RECORD_LOOKUP_FAILED"
        );
    }

    #[tokio::test]
    async fn nothing_is_resolved_in_the_build_phase() {
        let resolver = resolver();
        let context = RequestContext::BuildTimeExport;
        let error = resolver
            .create_view(&field("title"), &context)
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "KeystoneAdminUIFieldMetaCreateView.fieldMode cannot be resolved during the build process"
        );
        assert!(matches!(
            resolver.list_view(&field("title"), &context).await,
            Err(ResolveError::BuildPhaseViolation { .. })
        ));
        assert!(matches!(
            resolver.item_view(&item_field("title", "1"), &context).await,
            Err(ResolveError::BuildPhaseViolation { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_fields_are_errors() {
        let resolver = resolver();
        let context = live(Arc::new(NoRecords));
        assert_eq!(
            resolver.create_view(&field("nope"), &context).await,
            Err(ResolveError::UnknownField {
                list_key: "Post".to_string(),
                field_path: "nope".to_string(),
            })
        );
    }
}
