use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use admin_meta::{
    build_admin_meta_root, get_admin_meta_schema, initialise_lists, AdminConfig,
    ExposeInternalErrors, Item, ItemArgs, ItemViewFieldMode, LookupError, Policy, RequestContext,
    Session, SessionArgs, UnrestrictedReader,
};
use async_graphql::dynamic;
use async_trait::async_trait;
use schema_builder::Schema;
use serde_json::{json, Value};

pub const BASE_SCHEMA: &str = r#"
scalar JSON

enum QueryMode {
  default
  insensitive
}

type Post {
  id: ID!
  title: String
}

type Query {
  posts: [Post!]
}
"#;

/// Items by list key and id. Counts every lookup.
#[derive(Default)]
pub struct InMemoryReader {
    items: HashMap<(String, String), Item>,
    lookups: AtomicUsize,
}

impl InMemoryReader {
    pub fn with_item(mut self, list_key: &str, item: Item) -> Self {
        let id = item["id"].as_str().unwrap_or_default().to_string();
        self.items.insert((list_key.to_string(), id), item);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnrestrictedReader for InMemoryReader {
    async fn find_one(&self, list_key: &str, item_id: &str) -> Result<Option<Item>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .items
            .get(&(list_key.to_string(), item_id.to_string()))
            .cloned())
    }
}

/// A reader whose storage is unreachable.
pub struct BrokenReader;

#[async_trait]
impl UnrestrictedReader for BrokenReader {
    async fn find_one(&self, list_key: &str, item_id: &str) -> Result<Option<Item>, LookupError> {
        Err(LookupError {
            list_key: list_key.to_string(),
            item_id: item_id.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

fn can_manage_roles(session: Option<&Session>) -> bool {
    session
        .and_then(|session| session.pointer("/data/role/canManageRoles"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// A blog with users, roles and posts, combining literal configuration with computed policies.
pub fn blog_config() -> AdminConfig {
    let mut config: AdminConfig = serde_json::from_value(json!({
        "session": true,
        "ui": { "enableSessionItem": true },
        "lists": {
            "User": {
                "ui": { "labelField": "name" },
                "fields": {
                    "name": { "search": "insensitive" },
                    "email": {
                        "graphql": { "omit": { "create": true } },
                        "ui": { "createView": { "fieldMode": "edit" } }
                    },
                    "password": {
                        "views": "password",
                        "graphql": { "omit": { "read": true } }
                    }
                }
            },
            "Role": {
                "ui": { "createView": { "defaultFieldMode": "edit" } },
                "fields": {
                    "name": {},
                    "canManageRoles": { "views": "checkbox" }
                }
            },
            "Post": {
                "description": "Articles of the blog",
                "ui": {
                    "hideDelete": true,
                    "listView": {
                        "initialSort": { "field": "title", "direction": "ASC" },
                        "pageSize": 20
                    }
                },
                "fields": {
                    "title": {},
                    "status": {
                        "views": "select",
                        "fieldMeta": { "options": ["draft", "published"] }
                    },
                    "content": { "views": "document", "ui": { "views": "./admin/content" } }
                }
            }
        }
    }))
    .expect("blog configuration should deserialize");

    let role = &mut config.lists["Role"].ui;
    role.is_hidden = Some(Policy::from_fn(|args: SessionArgs| {
        !can_manage_roles(args.session.as_ref())
    }));
    role.hide_create = Some(Policy::computed(|args: SessionArgs| async move {
        Some(!can_manage_roles(args.session.as_ref()))
    }));

    let post = &mut config.lists["Post"];
    // the content of published posts is frozen; a policy yielding nothing means the default
    post.fields["content"].ui.item_view.field_mode =
        Some(Policy::computed(|args: ItemArgs| async move {
            let item = args.item?;
            (item["status"] == json!("published")).then_some(ItemViewFieldMode::Read)
        }));

    config
}

pub fn admin_session(can_manage_roles: bool) -> Session {
    Session::new(json!({
        "itemId": "user-1",
        "data": { "role": { "canManageRoles": can_manage_roles } }
    }))
}

pub fn build_schema(
    config: AdminConfig,
    base_sdl: &str,
    expose_internal_errors: ExposeInternalErrors,
) -> anyhow::Result<Schema> {
    let base = Schema::from_sdl(base_sdl)?;
    let lists = initialise_lists(&config);
    let admin_meta = build_admin_meta_root(&config, &lists)?;
    Ok(get_admin_meta_schema(
        Arc::new(config),
        &base,
        Arc::new(lists),
        Arc::new(admin_meta),
        expose_internal_errors,
    )?)
}

pub fn blog_schema() -> anyhow::Result<dynamic::Schema> {
    Ok(build_schema(blog_config(), BASE_SCHEMA, ExposeInternalErrors::Censor)?.to_executable()?)
}

pub fn live(session: Option<Session>, reader: Arc<dyn UnrestrictedReader>) -> RequestContext {
    RequestContext::live(session, reader)
}

/// Executes `query` and returns the JSON of the whole response, errors included.
pub async fn execute(schema: &dynamic::Schema, query: &str, context: RequestContext) -> Value {
    let request = async_graphql::Request::new(query).data(context);
    let response = schema.execute(request).await;
    serde_json::to_value(response).expect("responses serialize to JSON")
}
