//! The GraphQL types of the admin meta and the resolvers wired into them.

use std::any::Any;
use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::{Name, PathSegment, Value};
use schema_builder::{
    Enum, Field, FieldType, InputField, Object, Resolver, Scalar, Schema, TypeInfo, TypeName,
};
use strum::IntoEnumIterator;

use crate::access::AccessGate;
use crate::config::AdminConfig;
use crate::context::RequestContext;
use crate::error::{ExposeInternalErrors, ResolveError, SchemaBuildError};
use crate::field_mode::{
    CreateViewFieldMode, FieldModeResolver, ItemFieldIdentifier, ItemViewFieldMode,
    ListViewFieldMode,
};
use crate::list_policy::{ListFlag, ListPolicyResolver};
use crate::lists::Lists;
use crate::resolved::{
    AdminMetaValue, DynamicFieldError, ListMetaResolver, ListSelection, ResolvedFieldMeta,
    ResolvedItemView, ResolvedListMeta,
};
use crate::root_value::{AdminMetaRootVal, InitialSort, QueryMode, SortDirection};

/// The field added to the query root.
pub const KEYSTONE_FIELD: &str = "keystone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum TypeId {
    KeystoneMeta,
    AdminMeta,
    ListMeta,
    FieldMeta,
    FieldMetaCreateView,
    FieldMetaListView,
    FieldMetaItemView,
    CreateViewFieldMode,
    ListViewFieldMode,
    ItemViewFieldMode,
    Sort,
    SortDirection,
    Json,
    QueryMode,
}

impl TypeId {
    pub fn to_type_name(self) -> TypeName {
        TypeName::from(match self {
            TypeId::KeystoneMeta => "KeystoneMeta",
            TypeId::AdminMeta => "KeystoneAdminMeta",
            TypeId::ListMeta => "KeystoneAdminUIListMeta",
            TypeId::FieldMeta => "KeystoneAdminUIFieldMeta",
            TypeId::FieldMetaCreateView => "KeystoneAdminUIFieldMetaCreateView",
            TypeId::FieldMetaListView => "KeystoneAdminUIFieldMetaListView",
            TypeId::FieldMetaItemView => "KeystoneAdminUIFieldMetaItemView",
            TypeId::CreateViewFieldMode => "KeystoneAdminUIFieldMetaCreateViewFieldMode",
            TypeId::ListViewFieldMode => "KeystoneAdminUIFieldMetaListViewFieldMode",
            TypeId::ItemViewFieldMode => "KeystoneAdminUIFieldMetaItemViewFieldMode",
            TypeId::Sort => "KeystoneAdminUISort",
            TypeId::SortDirection => "KeystoneAdminUISortDirection",
            TypeId::Json => "JSON",
            TypeId::QueryMode => "QueryMode",
        })
    }
}

/// What the admin meta adds to a base schema.
#[derive(Debug, Clone)]
pub struct SchemaFragment {
    pub types: Vec<TypeInfo>,
    /// Fields added to the query root.
    pub query_fields: Vec<Field>,
}

/// Builds the admin meta types. The resolvers only close over shared, immutable state.
pub struct AdminMetaTypeBuilder {
    access_gate: Arc<AccessGate>,
    list_policies: Arc<ListPolicyResolver>,
    field_modes: Arc<FieldModeResolver>,
    list_meta: Arc<ListMetaResolver>,
    expose_internal_errors: ExposeInternalErrors,
    base_declares_json: bool,
    base_declares_query_mode: bool,
}

impl AdminMetaTypeBuilder {
    /// `JSON` and `QueryMode` are taken from `base` when it declares them, in which case they must
    /// be a scalar and an enum with the query mode values respectively.
    pub fn new(
        config: Arc<AdminConfig>,
        base: &Schema,
        lists: Arc<Lists>,
        admin_meta: Arc<AdminMetaRootVal>,
        expose_internal_errors: ExposeInternalErrors,
    ) -> Result<Self, SchemaBuildError> {
        let json = TypeId::Json.to_type_name();
        let base_declares_json = match base.types.get(&json) {
            None => false,
            Some(TypeInfo::Scalar(_)) => true,
            Some(other) => {
                return Err(SchemaBuildError::UnexpectedTypeKind {
                    type_name: json,
                    expected: "SCALAR",
                    found: other.kind(),
                })
            }
        };

        let query_mode = TypeId::QueryMode.to_type_name();
        let base_declares_query_mode = match base.types.get(&query_mode) {
            None => false,
            Some(TypeInfo::Enum(declared)) => {
                if let Some(missing) = QueryMode::iter()
                    .map(|mode| mode.to_string())
                    .find(|mode| !declared.contains(mode))
                {
                    return Err(SchemaBuildError::MissingEnumValue {
                        type_name: query_mode,
                        value: missing,
                    });
                }
                true
            }
            Some(other) => {
                return Err(SchemaBuildError::UnexpectedTypeKind {
                    type_name: query_mode,
                    expected: "ENUM",
                    found: other.kind(),
                })
            }
        };
        tracing::debug!(
            base_declares_json,
            base_declares_query_mode,
            "inspected base schema"
        );

        let list_policies = Arc::new(ListPolicyResolver::new(config.clone()));
        let field_modes = Arc::new(FieldModeResolver::new(config.clone(), lists));
        Ok(AdminMetaTypeBuilder {
            access_gate: Arc::new(AccessGate::new(&config, admin_meta)),
            list_meta: Arc::new(ListMetaResolver::new(
                list_policies.clone(),
                field_modes.clone(),
            )),
            list_policies,
            field_modes,
            expose_internal_errors,
            base_declares_json,
            base_declares_query_mode,
        })
    }

    pub fn build_fragment(&self) -> SchemaFragment {
        let types = TypeId::iter()
            .filter(|type_id| match type_id {
                TypeId::Json => !self.base_declares_json,
                TypeId::QueryMode => !self.base_declares_query_mode,
                _ => true,
            })
            .map(|type_id| self.build_type_info(type_id))
            .collect();
        let keystone = Field::new(
            KEYSTONE_FIELD,
            FieldType::named_non_null(TypeId::KeystoneMeta.to_type_name().0),
            Resolver::constant(Value::Object(Default::default())),
        );
        SchemaFragment {
            types,
            query_fields: vec![keystone],
        }
    }

    pub fn build_type_info(&self, type_id: TypeId) -> TypeInfo {
        let name = type_id.to_type_name().0;
        match type_id {
            TypeId::KeystoneMeta => Object::new(name)
                .field(self.admin_meta_field())
                .into(),
            TypeId::AdminMeta => self.admin_meta_object(name).into(),
            TypeId::ListMeta => self.list_meta_object(name).into(),
            TypeId::FieldMeta => self.field_meta_object(name).into(),
            TypeId::FieldMetaCreateView => {
                Object::new(name).field(self.create_view_field_mode()).into()
            }
            TypeId::FieldMetaListView => {
                Object::new(name).field(self.list_view_field_mode()).into()
            }
            TypeId::FieldMetaItemView => Object::new(name)
                .field(self.item_view_field_mode())
                .into(),
            TypeId::CreateViewFieldMode => {
                Enum::new(name, CreateViewFieldMode::iter().map(|mode| mode.to_string())).into()
            }
            TypeId::ListViewFieldMode => {
                Enum::new(name, ListViewFieldMode::iter().map(|mode| mode.to_string())).into()
            }
            TypeId::ItemViewFieldMode => {
                Enum::new(name, ItemViewFieldMode::iter().map(|mode| mode.to_string())).into()
            }
            TypeId::Sort => Object::new(name)
                .field(static_field::<InitialSort, _>(
                    "field",
                    FieldType::named_non_null("String"),
                    |sort| Value::from(sort.field.as_str()),
                ))
                .field(static_field::<InitialSort, _>(
                    "direction",
                    FieldType::named_non_null(TypeId::SortDirection.to_type_name().0),
                    |sort| enum_value(sort.direction),
                ))
                .into(),
            TypeId::SortDirection => {
                Enum::new(name, SortDirection::iter().map(|direction| direction.to_string()))
                    .into()
            }
            TypeId::Json => Scalar::new(name)
                .description(
                    "The `JSON` scalar type represents JSON values as specified by \
                     [ECMA-404](http://www.ecma-international.org/publications/files/ECMA-ST/ECMA-404.pdf).",
                )
                .into(),
            TypeId::QueryMode => {
                Enum::new(name, QueryMode::iter().map(|mode| mode.to_string())).into()
            }
        }
    }

    fn admin_meta_field(&self) -> Field {
        let access_gate = self.access_gate.clone();
        let list_meta = self.list_meta.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Field::new(
            "adminMeta",
            FieldType::named(TypeId::AdminMeta.to_type_name().0),
            Resolver::new(move |ctx| {
                let access_gate = access_gate.clone();
                let list_meta = list_meta.clone();
                let selection = {
                    let lists = ctx.look_ahead().field("lists");
                    lists
                        .exists()
                        .then(|| ListSelection::from_look_ahead(&lists))
                };
                FieldFuture::new(async move {
                    let admin_meta = async {
                        let context = request_context(&ctx)?;
                        let root = access_gate.guard(context).await?;
                        let lists = match selection {
                            Some(selection) => {
                                Some(list_meta.resolve_lists(&root, selection, context).await?)
                            }
                            None => None,
                        };
                        Ok::<_, DynamicFieldError>(AdminMetaValue { root, lists })
                    }
                    .await;
                    match admin_meta {
                        Ok(admin_meta) => Ok(Some(FieldValue::owned_any(admin_meta))),
                        Err(error) => {
                            report_error(&ctx, error, expose_internal_errors);
                            Ok(None)
                        }
                    }
                })
            }),
        )
    }

    fn admin_meta_object(&self, name: String) -> Object {
        let list_meta = self.list_meta.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Object::new(name)
            .field(static_field::<AdminMetaValue, _>(
                "enableSignout",
                FieldType::named_non_null("Boolean"),
                |admin_meta| Value::from(admin_meta.root.enable_signout),
            ))
            .field(static_field::<AdminMetaValue, _>(
                "enableSessionItem",
                FieldType::named_non_null("Boolean"),
                |admin_meta| Value::from(admin_meta.root.enable_session_item),
            ))
            .field(Field::new(
                "lists",
                FieldType::non_null_list_of_non_null(TypeId::ListMeta.to_type_name().0),
                Resolver::new(|ctx| {
                    FieldFuture::new(async move {
                        let admin_meta = ctx.parent_value.try_downcast_ref::<AdminMetaValue>()?;
                        let lists = match &admin_meta.lists {
                            Some(lists) => FieldValue::list(
                                lists.iter().map(|list| FieldValue::borrowed_any(list)),
                            ),
                            None => FieldValue::list(admin_meta.root.lists_by_key.values().map(
                                |list| {
                                    FieldValue::owned_any(ResolvedListMeta::unresolved(
                                        list.clone(),
                                    ))
                                },
                            )),
                        };
                        Ok(Some(lists))
                    })
                }),
            ))
            .field(
                Field::new(
                    "list",
                    FieldType::named(TypeId::ListMeta.to_type_name().0),
                    Resolver::new(move |ctx| {
                        let list_meta = list_meta.clone();
                        let selection = ListSelection::from_look_ahead(&ctx.look_ahead());
                        FieldFuture::new(async move {
                            let admin_meta =
                                ctx.parent_value.try_downcast_ref::<AdminMetaValue>()?;
                            let key = ctx.args.try_get("key")?;
                            let Some(list) = admin_meta.root.lists_by_key.get(key.string()?) else {
                                return Ok(None);
                            };
                            let resolved = async {
                                let context = request_context(&ctx)?;
                                list_meta.resolve_list(list.clone(), selection, context).await
                            }
                            .await;
                            match resolved {
                                Ok(list) => Ok(Some(FieldValue::owned_any(list))),
                                Err(error) => {
                                    report_error(&ctx, error, expose_internal_errors);
                                    Ok(None)
                                }
                            }
                        })
                    }),
                )
                .argument(InputField::new("key", FieldType::named_non_null("String"))),
            )
    }

    fn list_meta_object(&self, name: String) -> Object {
        Object::new(name)
            .field(static_field::<ResolvedListMeta, _>(
                "key",
                FieldType::named_non_null("String"),
                |list| Value::from(list.key.as_str()),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "itemQueryName",
                FieldType::named_non_null("String"),
                |list| Value::from(list.item_query_name.as_str()),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "listQueryName",
                FieldType::named_non_null("String"),
                |list| Value::from(list.list_query_name.as_str()),
            ))
            .field(self.list_flag_field("hideCreate", ListFlag::HideCreate))
            .field(self.list_flag_field("hideDelete", ListFlag::HideDelete))
            .field(static_field::<ResolvedListMeta, _>(
                "path",
                FieldType::named_non_null("String"),
                |list| Value::from(list.path.as_str()),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "label",
                FieldType::named_non_null("String"),
                |list| Value::from(list.label.as_str()),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "singular",
                FieldType::named_non_null("String"),
                |list| Value::from(list.singular.as_str()),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "plural",
                FieldType::named_non_null("String"),
                |list| Value::from(list.plural.as_str()),
            ))
            .field(nullable_static_field::<ResolvedListMeta, _>(
                "description",
                FieldType::named("String"),
                |list| list.description.as_deref().map(Value::from),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "initialColumns",
                FieldType::non_null_list_of_non_null("String"),
                |list| {
                    Value::List(
                        list.initial_columns
                            .iter()
                            .map(|column| Value::from(column.as_str()))
                            .collect(),
                    )
                },
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "pageSize",
                FieldType::named_non_null("Int"),
                |list| Value::Number(list.page_size.into()),
            ))
            .field(static_field::<ResolvedListMeta, _>(
                "labelField",
                FieldType::named_non_null("String"),
                |list| Value::from(list.label_field.as_str()),
            ))
            .field(Field::new(
                "fields",
                FieldType::non_null_list_of_non_null(TypeId::FieldMeta.to_type_name().0),
                Resolver::new(|ctx| {
                    FieldFuture::new(async move {
                        let list = ctx.parent_value.try_downcast_ref::<ResolvedListMeta>()?;
                        Ok(Some(FieldValue::list(
                            list.fields.iter().map(|field| FieldValue::borrowed_any(field)),
                        )))
                    })
                }),
            ))
            .field(Field::new(
                "initialSort",
                FieldType::named(TypeId::Sort.to_type_name().0),
                Resolver::new(|ctx| {
                    FieldFuture::new(async move {
                        let list = ctx.parent_value.try_downcast_ref::<ResolvedListMeta>()?;
                        Ok(list
                            .initial_sort
                            .as_ref()
                            .map(|sort| FieldValue::borrowed_any(sort)))
                    })
                }),
            ))
            .field(self.list_flag_field("isHidden", ListFlag::IsHidden))
    }

    /// Reads the flag resolved by `adminMeta` or `list(key)`, and only resolves it here when that
    /// did not happen.
    fn list_flag_field(&self, name: &str, flag: ListFlag) -> Field {
        let list_policies = self.list_policies.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Field::new(
            name,
            FieldType::named_non_null("Boolean"),
            Resolver::new(move |ctx| {
                let list_policies = list_policies.clone();
                FieldFuture::new(async move {
                    let list = ctx.parent_value.try_downcast_ref::<ResolvedListMeta>()?;
                    if let Some(value) = list.flag(flag) {
                        return Ok(Some(FieldValue::value(value)));
                    }
                    let value = async {
                        let context = request_context(&ctx)?;
                        list_policies.resolve(&list.key, flag, context).await
                    }
                    .await
                    .map_err(|error| error.to_graphql_error(expose_internal_errors))?;
                    Ok(Some(FieldValue::value(value)))
                })
            }),
        )
    }

    fn create_view_field_mode(&self) -> Field {
        let field_modes = self.field_modes.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Field::new(
            "fieldMode",
            FieldType::named_non_null(TypeId::CreateViewFieldMode.to_type_name().0),
            Resolver::new(move |ctx| {
                let field_modes = field_modes.clone();
                FieldFuture::new(async move {
                    let field = ctx.parent_value.try_downcast_ref::<ResolvedFieldMeta>()?;
                    let mode = match field.create_view {
                        Some(mode) => mode,
                        None => async {
                            let context = request_context(&ctx)?;
                            field_modes.create_view(&field.identifier(), context).await
                        }
                        .await
                        .map_err(|error| error.to_graphql_error(expose_internal_errors))?,
                    };
                    Ok(Some(FieldValue::value(enum_value(mode))))
                })
            }),
        )
    }

    fn list_view_field_mode(&self) -> Field {
        let field_modes = self.field_modes.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Field::new(
            "fieldMode",
            FieldType::named_non_null(TypeId::ListViewFieldMode.to_type_name().0),
            Resolver::new(move |ctx| {
                let field_modes = field_modes.clone();
                FieldFuture::new(async move {
                    let field = ctx.parent_value.try_downcast_ref::<ResolvedFieldMeta>()?;
                    let mode = match field.list_view {
                        Some(mode) => mode,
                        None => async {
                            let context = request_context(&ctx)?;
                            field_modes.list_view(&field.identifier(), context).await
                        }
                        .await
                        .map_err(|error| error.to_graphql_error(expose_internal_errors))?,
                    };
                    Ok(Some(FieldValue::value(enum_value(mode))))
                })
            }),
        )
    }

    /// The item view is nullable, so it resolves its field mode itself and is nulled when that
    /// fails.
    fn item_view_field(&self) -> Field {
        let field_modes = self.field_modes.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Field::new(
            "itemView",
            FieldType::named(TypeId::FieldMetaItemView.to_type_name().0),
            Resolver::new(move |ctx| {
                let field_modes = field_modes.clone();
                let selects_field_mode = ctx.look_ahead().field("fieldMode").exists();
                FieldFuture::new(async move {
                    let field = ctx.parent_value.try_downcast_ref::<ResolvedFieldMeta>()?;
                    let id = ctx.args.try_get("id")?;
                    let item_id = match id.as_value() {
                        Value::String(id) => id.clone(),
                        other => other.to_string(),
                    };
                    let item_field = ItemFieldIdentifier {
                        field: field.identifier(),
                        item_id,
                    };
                    let field_mode = if selects_field_mode {
                        let resolved = async {
                            let context = request_context(&ctx)?;
                            field_modes.item_view(&item_field, context).await
                        }
                        .await;
                        match resolved {
                            Ok(mode) => Some(mode),
                            Err(error) => {
                                let error = DynamicFieldError::at(
                                    error,
                                    vec![PathSegment::Field("fieldMode".to_string())],
                                );
                                report_error(&ctx, error, expose_internal_errors);
                                return Ok(None);
                            }
                        }
                    } else {
                        None
                    };
                    Ok(Some(FieldValue::owned_any(ResolvedItemView {
                        item_field,
                        field_mode,
                    })))
                })
            }),
        )
        .argument(InputField::new("id", FieldType::named_non_null("ID")))
    }

    fn item_view_field_mode(&self) -> Field {
        let field_modes = self.field_modes.clone();
        let expose_internal_errors = self.expose_internal_errors;
        Field::new(
            "fieldMode",
            FieldType::named_non_null(TypeId::ItemViewFieldMode.to_type_name().0),
            Resolver::new(move |ctx| {
                let field_modes = field_modes.clone();
                FieldFuture::new(async move {
                    let item_view = ctx.parent_value.try_downcast_ref::<ResolvedItemView>()?;
                    let mode = match item_view.field_mode {
                        Some(mode) => mode,
                        None => async {
                            let context = request_context(&ctx)?;
                            field_modes.item_view(&item_view.item_field, context).await
                        }
                        .await
                        .map_err(|error| error.to_graphql_error(expose_internal_errors))?,
                    };
                    Ok(Some(FieldValue::value(enum_value(mode))))
                })
            }),
        )
    }

    fn field_meta_object(&self, name: String) -> Object {
        Object::new(name)
            .field(static_field::<ResolvedFieldMeta, _>(
                "path",
                FieldType::named_non_null("String"),
                |field| Value::from(field.path.as_str()),
            ))
            .field(static_field::<ResolvedFieldMeta, _>(
                "label",
                FieldType::named_non_null("String"),
                |field| Value::from(field.label.as_str()),
            ))
            .field(static_field::<ResolvedFieldMeta, _>(
                "isOrderable",
                FieldType::named_non_null("Boolean"),
                |field| Value::from(field.is_orderable),
            ))
            .field(static_field::<ResolvedFieldMeta, _>(
                "isFilterable",
                FieldType::named_non_null("Boolean"),
                |field| Value::from(field.is_filterable),
            ))
            .field(Field::new(
                "fieldMeta",
                FieldType::named(TypeId::Json.to_type_name().0),
                Resolver::new(|ctx| {
                    FieldFuture::new(async move {
                        let field = ctx.parent_value.try_downcast_ref::<ResolvedFieldMeta>()?;
                        let field_meta = field
                            .field_meta
                            .clone()
                            .map(Value::from_json)
                            .transpose()?;
                        Ok(field_meta.map(FieldValue::value))
                    })
                }),
            ))
            .field(static_field::<ResolvedFieldMeta, _>(
                "viewsIndex",
                FieldType::named_non_null("Int"),
                |field| Value::Number(field.views_index.into()),
            ))
            .field(nullable_static_field::<ResolvedFieldMeta, _>(
                "customViewsIndex",
                FieldType::named("Int"),
                |field| field.custom_views_index.map(|index| Value::Number(index.into())),
            ))
            .field(parent_field(
                "createView",
                FieldType::named_non_null(TypeId::FieldMetaCreateView.to_type_name().0),
            ))
            .field(parent_field(
                "listView",
                FieldType::named_non_null(TypeId::FieldMetaListView.to_type_name().0),
            ))
            .field(self.item_view_field())
            .field(nullable_static_field::<ResolvedFieldMeta, _>(
                "search",
                FieldType::named(TypeId::QueryMode.to_type_name().0),
                |field| field.search.map(enum_value),
            ))
    }
}

/// A field handing its parent on to the object below it.
fn parent_field(name: &str, field_type: FieldType) -> Field {
    Field::new(
        name,
        field_type,
        Resolver::new(|ctx| {
            FieldFuture::new(async move {
                let field = ctx.parent_value.try_downcast_ref::<ResolvedFieldMeta>()?;
                Ok(Some(FieldValue::borrowed_any(field)))
            })
        }),
    )
}

/// A field whose value is computed from its parent, which must be a `T`.
fn static_field<T, F>(name: &str, field_type: FieldType, get: F) -> Field
where
    T: Any + Send + Sync,
    F: Fn(&T) -> Value + Send + Sync + 'static,
{
    nullable_static_field(name, field_type, move |parent: &T| Some(get(parent)))
}

/// Like [`static_field`], `None` being `null`.
fn nullable_static_field<T, F>(name: &str, field_type: FieldType, get: F) -> Field
where
    T: Any + Send + Sync,
    F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
{
    Field::new(
        name,
        field_type,
        Resolver::new(move |ctx| {
            let value = ctx
                .parent_value
                .try_downcast_ref::<T>()
                .map(|parent| get(parent).map(FieldValue::value));
            FieldFuture::new(async move { value })
        }),
    )
}

/// Reports `error` at the path of the field being resolved followed by the error's own path.
/// The field itself resolves to `null`.
fn report_error(
    ctx: &ResolverContext<'_>,
    error: DynamicFieldError,
    expose_internal_errors: ExposeInternalErrors,
) {
    let mut server_error = ctx.set_error_path(
        error
            .error
            .to_graphql_error(expose_internal_errors)
            .into_server_error(ctx.item.pos),
    );
    server_error.path.extend(error.path);
    ctx.add_error(server_error);
}

fn enum_value(value: impl ToString) -> Value {
    Value::Enum(Name::new(value.to_string()))
}

fn request_context<'c>(ctx: &'c ResolverContext<'_>) -> Result<&'c RequestContext, ResolveError> {
    ctx.data::<RequestContext>()
        .map_err(|_| ResolveError::MissingRequestContext)
}
