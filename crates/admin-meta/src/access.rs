use std::sync::Arc;

use tracing_util::SpanVisibility;

use crate::config::AdminConfig;
use crate::context::RequestContext;
use crate::error::ResolveError;
use crate::policy::{evaluate, SessionArgs, SessionPolicy};
use crate::root_value::AdminMetaRootVal;

/// Decides whether the caller may see the admin meta at all.
#[derive(Debug, Clone)]
pub struct AccessGate {
    is_access_allowed: Option<SessionPolicy<bool>>,
    admin_meta: Arc<AdminMetaRootVal>,
}

impl AccessGate {
    /// Without sessions everybody gets access. With sessions the configured predicate decides,
    /// and without one a session is required.
    pub fn new(config: &AdminConfig, admin_meta: Arc<AdminMetaRootVal>) -> Self {
        let is_access_allowed = config.session.then(|| {
            config
                .ui
                .is_access_allowed
                .clone()
                .unwrap_or_else(|| SessionPolicy::from_fn(|args| args.session.is_some()))
        });
        AccessGate {
            is_access_allowed,
            admin_meta,
        }
    }

    /// The static admin meta, if the caller may see it. The static export is always allowed.
    pub async fn guard(
        &self,
        context: &RequestContext,
    ) -> Result<Arc<AdminMetaRootVal>, ResolveError> {
        let tracer = tracing_util::global_tracer();
        tracer
            .in_span_async(
                "admin_meta_access",
                "Check access to the admin meta",
                SpanVisibility::User,
                || {
                    Box::pin(async {
                        let (policy, live_request) = match (&self.is_access_allowed, context) {
                            (None, _) | (_, RequestContext::BuildTimeExport) => {
                                return Ok(self.admin_meta.clone())
                            }
                            (Some(policy), RequestContext::LiveRequest(live_request)) => {
                                (policy, live_request)
                            }
                        };
                        let args = SessionArgs {
                            session: live_request.session.clone(),
                        };
                        if evaluate(Some(policy), false, args).await {
                            Ok(self.admin_meta.clone())
                        } else {
                            tracing::debug!("access to the admin meta denied");
                            Err(ResolveError::AccessDenied)
                        }
                    })
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NoRecords, Session};
    use crate::policy::Policy;
    use indexmap::IndexMap;
    use serde_json::json;

    fn admin_meta() -> Arc<AdminMetaRootVal> {
        Arc::new(AdminMetaRootVal {
            enable_signout: true,
            enable_session_item: false,
            lists_by_key: IndexMap::new(),
            views: vec![],
        })
    }

    fn live(session: Option<serde_json::Value>) -> RequestContext {
        RequestContext::live(session.map(Session::new), Arc::new(NoRecords))
    }

    #[tokio::test]
    async fn everybody_gets_access_without_sessions() {
        let gate = AccessGate::new(&AdminConfig::default(), admin_meta());
        assert!(gate.guard(&live(None)).await.is_ok());
    }

    #[tokio::test]
    async fn sessions_require_a_session_by_default() {
        let config = AdminConfig {
            session: true,
            ..AdminConfig::default()
        };
        let gate = AccessGate::new(&config, admin_meta());
        assert_eq!(
            gate.guard(&live(None)).await.unwrap_err(),
            ResolveError::AccessDenied
        );
        assert!(gate.guard(&live(Some(json!({ "id": "1" })))).await.is_ok());
    }

    #[tokio::test]
    async fn configured_predicate_decides() {
        let mut config = AdminConfig {
            session: true,
            ..AdminConfig::default()
        };
        config.ui.is_access_allowed = Some(Policy::computed(|args: SessionArgs| async move {
            Some(
                args.session
                    .and_then(|session| session.pointer("/isAdmin").cloned())
                    == Some(json!(true)),
            )
        }));
        let gate = AccessGate::new(&config, admin_meta());
        assert_eq!(
            gate.guard(&live(Some(json!({ "isAdmin": false }))))
                .await
                .unwrap_err(),
            ResolveError::AccessDenied
        );
        assert!(gate
            .guard(&live(Some(json!({ "isAdmin": true }))))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn the_static_export_is_always_allowed() {
        let config = AdminConfig {
            session: true,
            ..AdminConfig::default()
        };
        let gate = AccessGate::new(&config, admin_meta());
        assert!(gate.guard(&RequestContext::BuildTimeExport).await.is_ok());
    }
}
