use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::Value;

type ResolverFn = dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync;

/// The function a field runs to produce its value. Cloning a resolver is cheap, so a schema and
/// every schema derived from it share their resolvers.
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    {
        Resolver(Arc::new(f))
    }

    /// Reads the property called `name` from a JSON parent value, yielding null when the parent is
    /// not an object, has no such property or holds null there. Fields loaded from SDL resolve
    /// this way.
    pub fn property(name: impl Into<String>) -> Self {
        let name = name.into();
        Resolver::new(move |ctx| FieldFuture::from_value(read_property(&ctx, &name)))
    }

    /// Like [`Resolver::property`], for fields of union or interface type: every object in the
    /// property names its concrete type in `__typename`.
    pub fn typed_property(name: impl Into<String>) -> Self {
        let name = name.into();
        Resolver::new(move |ctx| {
            let value = read_property(&ctx, &name);
            FieldFuture::new(async move { Ok(value.map(typed_value).transpose()?.flatten()) })
        })
    }

    /// Always resolves to the given value.
    pub fn constant(value: Value) -> Self {
        Resolver::new(move |_| FieldFuture::from_value(Some(value.clone())))
    }

    pub(crate) fn call<'a>(&self, ctx: ResolverContext<'a>) -> FieldFuture<'a> {
        (self.0)(ctx)
    }
}

fn read_property(ctx: &ResolverContext<'_>, name: &str) -> Option<Value> {
    match ctx.parent_value.as_value()? {
        Value::Object(properties) => properties
            .get(name)
            .filter(|value| !matches!(value, Value::Null))
            .cloned(),
        _ => None,
    }
}

fn typed_value<'a>(value: Value) -> async_graphql::Result<Option<FieldValue<'a>>> {
    match value {
        Value::Null => Ok(None),
        Value::List(items) => {
            let items = items
                .into_iter()
                .map(|item| Ok(typed_value(item)?.unwrap_or(FieldValue::NULL)))
                .collect::<async_graphql::Result<Vec<_>>>()?;
            Ok(Some(FieldValue::list(items)))
        }
        Value::Object(properties) => match properties.get("__typename") {
            Some(Value::String(type_name)) => {
                let type_name = type_name.clone();
                Ok(Some(
                    FieldValue::value(Value::Object(properties)).with_type(type_name),
                ))
            }
            _ => Err(async_graphql::Error::new(
                "object of an abstract type has no __typename",
            )),
        },
        other => Err(async_graphql::Error::new(format!(
            "expected an object of an abstract type, found {other}"
        ))),
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}
