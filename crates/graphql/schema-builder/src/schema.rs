use std::collections::BTreeMap;

use async_graphql::Value;
use indexmap::IndexMap;

use crate::ast::{FieldType, TypeName};
use crate::resolver::Resolver;

#[derive(Debug, Clone)]
pub struct Scalar {
    pub name: TypeName,
    pub description: Option<String>,
}

impl Scalar {
    pub fn new(name: impl Into<String>) -> Self {
        Scalar {
            name: TypeName::new(name),
            description: None,
        }
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        Scalar {
            description: Some(description.into()),
            ..self
        }
    }
}

/// `@deprecated`, with its reason when one is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub value: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: TypeName,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

impl Enum {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Enum {
            name: TypeName::new(name),
            description: None,
            values: values
                .into_iter()
                .map(|value| EnumValue {
                    value: value.into(),
                    description: None,
                    deprecation: None,
                })
                .collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.value == value)
    }
}

/// An argument of a field, or a field of an input object.
#[derive(Debug, Clone)]
pub struct InputField {
    pub name: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub default_value: Option<Value>,
    pub deprecation: Option<Deprecation>,
}

impl InputField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        InputField {
            name: name.into(),
            description: None,
            field_type,
            default_value: None,
            deprecation: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub arguments: IndexMap<String, InputField>,
    pub deprecation: Option<Deprecation>,
    pub resolver: Resolver,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, resolver: Resolver) -> Self {
        Field {
            name: name.into(),
            description: None,
            field_type,
            arguments: IndexMap::new(),
            deprecation: None,
            resolver,
        }
    }

    pub fn deprecated(self, reason: Option<String>) -> Self {
        Field {
            deprecation: Some(Deprecation { reason }),
            ..self
        }
    }

    pub fn argument(mut self, argument: InputField) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        Field {
            description: Some(description.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct Object {
    pub name: TypeName,
    pub description: Option<String>,
    pub implements: Vec<TypeName>,
    pub fields: IndexMap<String, Field>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Object {
            name: TypeName::new(name),
            description: None,
            implements: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(TypeName::new(interface));
        self
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        Object {
            description: Some(description.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputObject {
    pub name: TypeName,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputField>,
}

/// A field of an interface. Only the objects implementing the interface resolve it.
#[derive(Debug, Clone)]
pub struct InterfaceField {
    pub name: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub arguments: IndexMap<String, InputField>,
    pub deprecation: Option<Deprecation>,
}

#[derive(Debug, Clone)]
pub struct Interface {
    pub name: TypeName,
    pub description: Option<String>,
    pub implements: Vec<TypeName>,
    pub fields: IndexMap<String, InterfaceField>,
}

#[derive(Debug, Clone)]
pub struct Union {
    pub name: TypeName,
    pub description: Option<String>,
    pub members: Vec<TypeName>,
}

impl Union {
    pub fn new<I, M>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Union {
            name: TypeName::new(name),
            description: None,
            members: members.into_iter().map(TypeName::new).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TypeInfo {
    Scalar(Scalar),
    Enum(Enum),
    Object(Object),
    Interface(Interface),
    Union(Union),
    InputObject(InputObject),
}

impl TypeInfo {
    pub fn kind(&self) -> &'static str {
        match self {
            TypeInfo::Scalar(_) => "SCALAR",
            TypeInfo::Enum(_) => "ENUM",
            TypeInfo::Object(_) => "OBJECT",
            TypeInfo::Interface(_) => "INTERFACE",
            TypeInfo::Union(_) => "UNION",
            TypeInfo::InputObject(_) => "INPUT_OBJECT",
        }
    }

    pub fn name(&self) -> &TypeName {
        match self {
            TypeInfo::Scalar(scalar) => &scalar.name,
            TypeInfo::Enum(e) => &e.name,
            TypeInfo::Object(object) => &object.name,
            TypeInfo::Interface(interface) => &interface.name,
            TypeInfo::Union(union) => &union.name,
            TypeInfo::InputObject(input_object) => &input_object.name,
        }
    }

    /// Unions and interfaces, whose values must name their concrete object type.
    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeInfo::Interface(_) | TypeInfo::Union(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            TypeInfo::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Enum> {
        match self {
            TypeInfo::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            TypeInfo::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<Scalar> for TypeInfo {
    fn from(scalar: Scalar) -> Self {
        TypeInfo::Scalar(scalar)
    }
}

impl From<Enum> for TypeInfo {
    fn from(e: Enum) -> Self {
        TypeInfo::Enum(e)
    }
}

impl From<Object> for TypeInfo {
    fn from(object: Object) -> Self {
        TypeInfo::Object(object)
    }
}

impl From<Interface> for TypeInfo {
    fn from(interface: Interface) -> Self {
        TypeInfo::Interface(interface)
    }
}

impl From<Union> for TypeInfo {
    fn from(union: Union) -> Self {
        TypeInfo::Union(union)
    }
}

impl From<InputObject> for TypeInfo {
    fn from(input_object: InputObject) -> Self {
        TypeInfo::InputObject(input_object)
    }
}

/// A directive declared by the schema, e.g. `directive @auth(role: String) on FIELD_DEFINITION`.
/// Locations are kept by their SDL name.
#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: IndexMap<String, InputField>,
    pub repeatable: bool,
    pub locations: Vec<String>,
}

/// A complete schema. Types and directives are ordered by name so that everything derived from a
/// schema (SDL, registration order) is deterministic.
#[derive(Debug, Clone)]
pub struct Schema {
    pub types: BTreeMap<TypeName, TypeInfo>,
    pub directives: BTreeMap<String, DirectiveDefinition>,
    pub query_type: TypeName,
    pub mutation_type: Option<TypeName>,
}

impl Schema {
    /// A schema consisting only of the given query root.
    pub fn new(query: Object) -> Self {
        let query_type = query.name.clone();
        Schema {
            types: BTreeMap::from([(query_type.clone(), TypeInfo::Object(query))]),
            directives: BTreeMap::new(),
            query_type,
            mutation_type: None,
        }
    }

    pub fn get_type(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types.get(&TypeName::from(type_name))
    }

    pub fn query_root(&self) -> Option<&Object> {
        self.types.get(&self.query_type).and_then(TypeInfo::as_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_schema_registers_query_root() {
        let schema = Schema::new(Object::new("Query").field(Field::new(
            "hello",
            FieldType::named("String"),
            Resolver::constant(Value::from("world")),
        )));
        let query = schema.query_root().expect("query root");
        assert_eq!(query.name, TypeName::from("Query"));
        assert!(query.fields.contains_key("hello"));
        assert_eq!(schema.get_type("Query").map(TypeInfo::kind), Some("OBJECT"));
    }

    #[test]
    fn abstract_types_have_their_own_kind() {
        let union = TypeInfo::from(Union::new("SearchResult", ["Post", "User"]));
        assert_eq!(union.kind(), "UNION");
        assert!(union.is_abstract());
        assert_eq!(union.name(), &TypeName::from("SearchResult"));
        assert!(!TypeInfo::from(Object::new("Post").implements("Node")).is_abstract());
    }

    #[test]
    fn enum_contains_values() {
        let query_mode = Enum::new("QueryMode", ["default", "insensitive"]);
        assert!(query_mode.contains("insensitive"));
        assert!(!query_mode.contains("sensitive"));
    }
}
