use std::fmt::{self, Display};

use async_graphql::dynamic::TypeRef;

/// The name of a named GraphQL type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(pub String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scalars every GraphQL schema provides without declaring them.
    pub fn is_builtin_scalar(&self) -> bool {
        matches!(
            self.0.as_str(),
            "String" | "Int" | "Float" | "Boolean" | "ID"
        )
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    Named(TypeName),
    List(Box<FieldType>),
}

/// A (possibly wrapped) reference to a type, as it appears on fields and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub base: BaseType,
    pub nullable: bool,
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> Self {
        FieldType {
            base: BaseType::Named(TypeName::new(name)),
            nullable: true,
        }
    }

    pub fn named_non_null(name: impl Into<String>) -> Self {
        Self::named(name).non_null()
    }

    pub fn list(item: FieldType) -> Self {
        FieldType {
            base: BaseType::List(Box::new(item)),
            nullable: true,
        }
    }

    /// `[name!]!`, the shape of most lists in the admin meta schema.
    pub fn non_null_list_of_non_null(name: impl Into<String>) -> Self {
        Self::list(Self::named_non_null(name)).non_null()
    }

    pub fn non_null(self) -> Self {
        FieldType {
            nullable: false,
            ..self
        }
    }

    /// The named type at the bottom of any list wrappers.
    pub fn underlying_type(&self) -> &TypeName {
        match &self.base {
            BaseType::Named(name) => name,
            BaseType::List(item) => item.underlying_type(),
        }
    }

    pub(crate) fn to_type_ref(&self) -> TypeRef {
        let base = match &self.base {
            BaseType::Named(name) => TypeRef::Named(name.0.clone().into()),
            BaseType::List(item) => TypeRef::List(Box::new(item.to_type_ref())),
        };
        if self.nullable {
            base
        } else {
            TypeRef::NonNull(Box::new(base))
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            BaseType::Named(name) => write!(f, "{name}")?,
            BaseType::List(item) => write!(f, "[{item}]")?,
        }
        if !self.nullable {
            f.write_str("!")?;
        }
        Ok(())
    }
}

impl From<&async_graphql_parser::types::Type> for FieldType {
    fn from(ty: &async_graphql_parser::types::Type) -> Self {
        let base = match &ty.base {
            async_graphql_parser::types::BaseType::Named(name) => {
                BaseType::Named(TypeName::new(name.as_str()))
            }
            async_graphql_parser::types::BaseType::List(item) => {
                BaseType::List(Box::new(FieldType::from(item.as_ref())))
            }
        };
        FieldType {
            base,
            nullable: ty.nullable,
        }
    }
}
