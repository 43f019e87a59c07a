//! Configurable UI policies: either a fixed value or a function of the request.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Deserializer};

use crate::context::{Item, Session};

/// Arguments of policies that only depend on the caller.
#[derive(Debug, Clone)]
pub struct SessionArgs {
    pub session: Option<Session>,
}

/// Arguments of item view policies. `item` is absent when no record has the requested id.
#[derive(Debug, Clone)]
pub struct ItemArgs {
    pub session: Option<Session>,
    pub item: Option<Item>,
}

type PolicyFn<T, A> = dyn Fn(A) -> BoxFuture<'static, Option<T>> + Send + Sync;

/// A constant, or a possibly asynchronous function of the policy arguments. A function may
/// produce no value, in which case the default applies.
pub enum Policy<T, A> {
    Literal(T),
    Computed(Arc<PolicyFn<T, A>>),
}

pub type SessionPolicy<T> = Policy<T, SessionArgs>;
pub type ItemPolicy<T> = Policy<T, ItemArgs>;

impl<T, A> Policy<T, A> {
    pub fn literal(value: T) -> Self {
        Policy::Literal(value)
    }

    pub fn computed<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        Policy::Computed(Arc::new(move |args| f(args).boxed()))
    }

    /// A synchronous function that always produces a value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(A) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        Policy::computed(move |args| std::future::ready(Some(f(args))))
    }
}

/// Evaluates `policy`, using `default` when there is no policy or its function yields nothing.
pub async fn evaluate<T: Clone, A>(policy: Option<&Policy<T, A>>, default: T, args: A) -> T {
    match policy {
        None => default,
        Some(Policy::Literal(value)) => value.clone(),
        Some(Policy::Computed(f)) => f(args).await.unwrap_or(default),
    }
}

impl<T: Clone, A> Clone for Policy<T, A> {
    fn clone(&self) -> Self {
        match self {
            Policy::Literal(value) => Policy::Literal(value.clone()),
            Policy::Computed(f) => Policy::Computed(f.clone()),
        }
    }
}

impl<T: fmt::Debug, A> fmt::Debug for Policy<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Policy::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Configuration files can only hold literals.
impl<'de, T: Deserialize<'de>, A> Deserialize<'de> for Policy<T, A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Policy::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(session: Option<serde_json::Value>) -> SessionArgs {
        SessionArgs {
            session: session.map(Session::new),
        }
    }

    #[tokio::test]
    async fn missing_policy_uses_default() {
        assert!(evaluate::<bool, _>(None, true, args(None)).await);
    }

    #[tokio::test]
    async fn literal_ignores_arguments() {
        let policy = SessionPolicy::literal(false);
        assert!(!evaluate(Some(&policy), true, args(Some(json!({})))).await);
    }

    #[tokio::test]
    async fn computed_policies_see_the_session() {
        let policy = SessionPolicy::from_fn(|SessionArgs { session }| session.is_some());
        assert!(evaluate(Some(&policy), false, args(Some(json!({})))).await);
        assert!(!evaluate(Some(&policy), true, args(None)).await);
    }

    #[tokio::test]
    async fn computed_policy_without_value_falls_back() {
        let policy: ItemPolicy<&'static str> = Policy::computed(|args: ItemArgs| async move {
            args.item.map(|_| "read")
        });
        let no_item = ItemArgs {
            session: None,
            item: None,
        };
        assert_eq!(evaluate(Some(&policy), "edit", no_item).await, "edit");
        let item = ItemArgs {
            session: None,
            item: Some(json!({ "id": "1" })),
        };
        assert_eq!(evaluate(Some(&policy), "edit", item).await, "read");
    }

    #[test]
    fn deserializes_literals() {
        let policy: SessionPolicy<bool> = serde_json::from_value(json!(true)).unwrap();
        assert!(matches!(policy, Policy::Literal(true)));
    }
}
