use std::sync::Arc;

use tracing_util::SpanVisibility;

use crate::config::AdminConfig;
use crate::context::RequestContext;
use crate::error::ResolveError;
use crate::policy::{evaluate, SessionArgs};
use crate::types::TypeId;

/// List level UI flags that depend on the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ListFlag {
    HideCreate,
    HideDelete,
    IsHidden,
}

#[derive(Debug, Clone)]
pub struct ListPolicyResolver {
    config: Arc<AdminConfig>,
}

impl ListPolicyResolver {
    pub fn new(config: Arc<AdminConfig>) -> Self {
        ListPolicyResolver { config }
    }

    /// Evaluates `flag` for the list, which is `false` unless configured otherwise.
    pub async fn resolve(
        &self,
        list_key: &str,
        flag: ListFlag,
        context: &RequestContext,
    ) -> Result<bool, ResolveError> {
        let tracer = tracing_util::global_tracer();
        tracer
            .in_span_async(
                "resolve_list_flag",
                format!("Resolve {flag} of list {list_key}"),
                SpanVisibility::Internal,
                || {
                    Box::pin(async {
                        let live_request =
                            context.live_request(TypeId::ListMeta.to_type_name(), flag.into())?;
                        let ui = &self
                            .config
                            .lists
                            .get(list_key)
                            .ok_or_else(|| ResolveError::UnknownList {
                                list_key: list_key.to_string(),
                            })?
                            .ui;
                        let policy = match flag {
                            ListFlag::HideCreate => ui.hide_create.as_ref(),
                            ListFlag::HideDelete => ui.hide_delete.as_ref(),
                            ListFlag::IsHidden => ui.is_hidden.as_ref(),
                        };
                        let args = SessionArgs {
                            session: live_request.session.clone(),
                        };
                        Ok(evaluate(policy, false, args).await)
                    })
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListConfig;
    use crate::context::{NoRecords, Session};
    use crate::policy::Policy;
    use serde_json::json;

    fn resolver() -> ListPolicyResolver {
        let mut config = AdminConfig::default();
        let mut post = ListConfig::default();
        post.ui.hide_delete = Some(Policy::literal(true));
        post.ui.is_hidden = Some(Policy::from_fn(|SessionArgs { session }| {
            !session
                .and_then(|session| session.pointer("/isAdmin").cloned())
                .is_some_and(|is_admin| is_admin == json!(true))
        }));
        config.lists.insert("Post".to_string(), post);
        ListPolicyResolver::new(Arc::new(config))
    }

    fn live(session: Option<serde_json::Value>) -> RequestContext {
        RequestContext::live(session.map(Session::new), Arc::new(NoRecords))
    }

    #[tokio::test]
    async fn flags_default_to_false() {
        let flag = resolver()
            .resolve("Post", ListFlag::HideCreate, &live(None))
            .await
            .unwrap();
        assert!(!flag);
    }

    #[tokio::test]
    async fn literal_and_computed_flags() {
        let resolver = resolver();
        assert!(resolver
            .resolve("Post", ListFlag::HideDelete, &live(None))
            .await
            .unwrap());

        let admin = live(Some(json!({ "isAdmin": true })));
        assert!(!resolver
            .resolve("Post", ListFlag::IsHidden, &admin)
            .await
            .unwrap());
        assert!(resolver
            .resolve("Post", ListFlag::IsHidden, &live(None))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn fails_in_the_build_phase() {
        let error = resolver()
            .resolve("Post", ListFlag::IsHidden, &RequestContext::BuildTimeExport)
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "KeystoneAdminUIListMeta.isHidden cannot be resolved during the build process"
        );
    }

    #[tokio::test]
    async fn unknown_lists_are_internal_errors() {
        let error = resolver()
            .resolve("Comment", ListFlag::HideCreate, &live(None))
            .await
            .unwrap_err();
        assert_eq!(
            error,
            ResolveError::UnknownList {
                list_key: "Comment".to_string(),
            }
        );
    }
}
