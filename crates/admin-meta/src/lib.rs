//! The admin meta: a GraphQL description of how the admin UI shows every list and field.
//!
//! The static parts (labels, columns, view modules, ...) are computed once with
//! [`build_admin_meta_root`]. [`get_admin_meta_schema`] adds `keystone { adminMeta }` to an
//! existing schema; its resolvers decide per request whether the caller may see the admin meta,
//! which lists are hidden and how every field is shown in the create, list and item views.
//! Requests against the resulting schema must carry a [`RequestContext`].

mod access;
mod config;
mod context;
mod error;
mod export;
mod field_mode;
mod labels;
mod list_policy;
mod lists;
mod merge;
mod policy;
mod resolved;
mod root_value;
mod schema;
mod types;

pub use access::AccessGate;
pub use config::{
    AdminConfig, AdminUiConfig, FieldConfig, FieldCreateViewConfig, FieldGraphqlConfig,
    FieldItemViewConfig, FieldListViewConfig, FieldUiConfig, GraphqlOmit, InitialSortConfig,
    ListConfig, ListCreateViewConfig, ListGraphqlConfig, ListItemViewConfig, ListListViewConfig,
    ListUiConfig, OmittedOperations, Operation,
};
pub use context::{Item, LiveRequest, NoRecords, RequestContext, Session, UnrestrictedReader};
pub use error::{
    AdminMetaBuildError, ExportError, ExposeInternalErrors, LookupError, ResolveError,
    SchemaBuildError,
};
pub use export::{
    export_admin_meta, export_admin_ui_build, AdminUiBuildExport, STATIC_ADMIN_META_QUERY,
};
pub use field_mode::{
    CreateViewFieldMode, FieldIdentifier, FieldModeResolver, ItemFieldIdentifier,
    ItemViewFieldMode, ListViewFieldMode,
};
pub use list_policy::{ListFlag, ListPolicyResolver};
pub use lists::{
    initialise_lists, FieldGraphql, InitialisedField, InitialisedList, IsEnabled, Lists,
};
pub use merge::merge_schema;
pub use policy::{evaluate, ItemArgs, ItemPolicy, Policy, SessionArgs, SessionPolicy};
pub use resolved::{
    DynamicFieldError, ListMetaResolver, ListSelection, ResolvedFieldMeta, ResolvedListMeta,
};
pub use root_value::{
    build_admin_meta_root, AdminMetaRootVal, FieldMetaRootVal, InitialSort, ListMetaRootVal,
    QueryMode, SortDirection,
};
pub use schema::get_admin_meta_schema;
pub use types::{AdminMetaTypeBuilder, SchemaFragment, TypeId, KEYSTONE_FIELD};
