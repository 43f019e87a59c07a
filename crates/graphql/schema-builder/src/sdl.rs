use std::collections::BTreeMap;
use std::fmt::Write;

use async_graphql::{Name, Value};
use async_graphql_parser::types::{
    ConstDirective, DirectiveLocation, FieldDefinition, InputValueDefinition, TypeDefinition,
    TypeKind, TypeSystemDefinition,
};
use async_graphql_parser::Positioned;
use indexmap::IndexMap;

use crate::ast::{FieldType, TypeName};
use crate::error::Error;
use crate::resolver::Resolver;
use crate::schema::{
    Deprecation, DirectiveDefinition, Enum, EnumValue, Field, InputField, InputObject, Interface,
    InterfaceField, Object, Scalar, Schema, TypeInfo, Union,
};

/// Directives every GraphQL server provides. Declaring them again in SDL is allowed and ignored.
const BUILTIN_DIRECTIVES: [&str; 5] = ["skip", "include", "deprecated", "specifiedBy", "oneOf"];

impl Schema {
    /// Load a schema from SDL. Object fields resolve by reading the property of the same name from
    /// a JSON parent (see [`Resolver::property`]); callers replace resolvers where they need more.
    /// Fields of union or interface type expect their objects to carry a `__typename`.
    pub fn from_sdl(sdl: &str) -> Result<Schema, Error> {
        let document = async_graphql_parser::parse_schema(sdl)
            .map_err(|error| Error::ParseFailure(error.to_string()))?;

        let mut types = BTreeMap::new();
        let mut directives = BTreeMap::new();
        let mut schema_definition = None;
        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(definition) => {
                    if schema_definition.replace(definition.node).is_some() {
                        return Err(Error::MultipleSchemaDefinitions);
                    }
                }
                TypeSystemDefinition::Type(definition) => {
                    let type_info = convert_type_definition(definition.node)?;
                    let type_name = type_info.name().clone();
                    if types.insert(type_name.clone(), type_info).is_some() {
                        return Err(Error::ConflictingGraphQlType(type_name));
                    }
                }
                TypeSystemDefinition::Directive(definition) => {
                    let definition = definition.node;
                    let name = definition.name.node.to_string();
                    if BUILTIN_DIRECTIVES.contains(&name.as_str()) {
                        continue;
                    }
                    let directive = DirectiveDefinition {
                        name: name.clone(),
                        description: definition.description.map(|d| d.node),
                        arguments: convert_input_values(definition.arguments),
                        repeatable: definition.is_repeatable,
                        locations: definition
                            .locations
                            .iter()
                            .map(|location| directive_location_name(location.node).to_string())
                            .collect(),
                    };
                    if directives.insert(name.clone(), directive).is_some() {
                        return Err(Error::ConflictingDirective(name));
                    }
                }
            }
        }
        resolve_abstract_fields(&mut types);

        let (query, mutation) = match schema_definition {
            Some(definition) => {
                if definition.subscription.is_some() {
                    return Err(Error::SubscriptionsNotSupported);
                }
                (
                    definition.query.map(|name| TypeName::new(name.node.as_str())),
                    definition
                        .mutation
                        .map(|name| TypeName::new(name.node.as_str())),
                )
            }
            None => (
                None,
                Some(TypeName::from("Mutation")).filter(|name| types.contains_key(name)),
            ),
        };

        let query_type = query.unwrap_or_else(|| TypeName::from("Query"));
        for root in std::iter::once(&query_type).chain(mutation.as_ref()) {
            match types.get(root) {
                Some(TypeInfo::Object(_)) => {}
                Some(_) => return Err(Error::ExpectedObjectDefinition(root.clone())),
                None => return Err(Error::TypeNotDefined(root.clone())),
            }
        }

        Ok(Schema {
            types,
            directives,
            query_type,
            mutation_type: mutation,
        })
    }

    /// Print the schema as SDL. Directives come first, then types in name order with their fields
    /// in declaration order, so two schemas with the same shape print identically regardless of
    /// their resolvers.
    pub fn generate_sdl(&self) -> String {
        let mut sdl = String::new();

        let default_roots = self.query_type.as_str() == "Query"
            && self
                .mutation_type
                .as_ref()
                .map_or(true, |mutation| mutation.as_str() == "Mutation");
        if !default_roots {
            sdl.push_str("schema {\n");
            let _ = writeln!(sdl, "  query: {}", self.query_type);
            if let Some(mutation) = &self.mutation_type {
                let _ = writeln!(sdl, "  mutation: {mutation}");
            }
            sdl.push_str("}\n\n");
        }

        for directive in self.directives.values() {
            write_directive(&mut sdl, directive);
            sdl.push('\n');
        }
        for type_info in self.types.values() {
            write_type(&mut sdl, type_info);
            sdl.push('\n');
        }
        sdl
    }
}

fn convert_type_definition(definition: TypeDefinition) -> Result<TypeInfo, Error> {
    let name = TypeName::new(definition.name.node.as_str());
    if definition.extend {
        return Err(Error::TypeExtensionNotSupported(name));
    }
    let description = definition.description.map(|d| d.node);
    Ok(match definition.kind {
        TypeKind::Scalar => TypeInfo::Scalar(Scalar { name, description }),
        TypeKind::Enum(enum_type) => TypeInfo::Enum(Enum {
            name,
            description,
            values: enum_type
                .values
                .into_iter()
                .map(|value| EnumValue {
                    value: value.node.value.node.to_string(),
                    description: value.node.description.map(|d| d.node),
                    deprecation: deprecation(&value.node.directives),
                })
                .collect(),
        }),
        TypeKind::Object(object_type) => TypeInfo::Object(Object {
            name,
            description,
            implements: type_names(&object_type.implements),
            fields: object_type
                .fields
                .into_iter()
                .map(|field| {
                    let field = convert_field(field.node);
                    let resolver = Resolver::property(field.name.clone());
                    let field = Field {
                        name: field.name,
                        description: field.description,
                        field_type: field.field_type,
                        arguments: field.arguments,
                        deprecation: field.deprecation,
                        resolver,
                    };
                    (field.name.clone(), field)
                })
                .collect(),
        }),
        TypeKind::Interface(interface_type) => TypeInfo::Interface(Interface {
            name,
            description,
            implements: type_names(&interface_type.implements),
            fields: interface_type
                .fields
                .into_iter()
                .map(|field| {
                    let field = convert_field(field.node);
                    (field.name.clone(), field)
                })
                .collect(),
        }),
        TypeKind::Union(union_type) => TypeInfo::Union(Union {
            name,
            description,
            members: type_names(&union_type.members),
        }),
        TypeKind::InputObject(input_object_type) => TypeInfo::InputObject(InputObject {
            name,
            description,
            fields: convert_input_values(input_object_type.fields),
        }),
    })
}

fn convert_field(field: FieldDefinition) -> InterfaceField {
    InterfaceField {
        name: field.name.node.to_string(),
        description: field.description.map(|d| d.node),
        field_type: FieldType::from(&field.ty.node),
        arguments: convert_input_values(field.arguments),
        deprecation: deprecation(&field.directives),
    }
}

fn type_names(names: &[Positioned<Name>]) -> Vec<TypeName> {
    names
        .iter()
        .map(|name| TypeName::new(name.node.as_str()))
        .collect()
}

fn convert_input_values(
    values: Vec<Positioned<InputValueDefinition>>,
) -> IndexMap<String, InputField> {
    values
        .into_iter()
        .map(|value| {
            let value = value.node;
            let name = value.name.node.to_string();
            (
                name.clone(),
                InputField {
                    name,
                    description: value.description.map(|d| d.node),
                    field_type: FieldType::from(&value.ty.node),
                    default_value: value.default_value.map(|v| v.node),
                    deprecation: deprecation(&value.directives),
                },
            )
        })
        .collect()
}

fn deprecation(directives: &[Positioned<ConstDirective>]) -> Option<Deprecation> {
    let directive = directives
        .iter()
        .find(|directive| directive.node.name.node.as_str() == "deprecated")?;
    let reason = match directive.node.get_argument("reason").map(|reason| &reason.node) {
        Some(Value::String(reason)) => Some(reason.clone()),
        _ => None,
    };
    Some(Deprecation { reason })
}

/// Fields returning a union or an interface must tell the executor which object they hold.
fn resolve_abstract_fields(types: &mut BTreeMap<TypeName, TypeInfo>) {
    let abstract_types: Vec<TypeName> = types
        .values()
        .filter(|type_info| type_info.is_abstract())
        .map(|type_info| type_info.name().clone())
        .collect();
    for type_info in types.values_mut() {
        if let TypeInfo::Object(object) = type_info {
            for field in object.fields.values_mut() {
                if abstract_types.contains(field.field_type.underlying_type()) {
                    field.resolver = Resolver::typed_property(field.name.clone());
                }
            }
        }
    }
}

fn directive_location_name(location: DirectiveLocation) -> &'static str {
    match location {
        DirectiveLocation::Query => "QUERY",
        DirectiveLocation::Mutation => "MUTATION",
        DirectiveLocation::Subscription => "SUBSCRIPTION",
        DirectiveLocation::Field => "FIELD",
        DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
        DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
        DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
        DirectiveLocation::Schema => "SCHEMA",
        DirectiveLocation::Scalar => "SCALAR",
        DirectiveLocation::Object => "OBJECT",
        DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
        DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
        DirectiveLocation::Interface => "INTERFACE",
        DirectiveLocation::Union => "UNION",
        DirectiveLocation::Enum => "ENUM",
        DirectiveLocation::EnumValue => "ENUM_VALUE",
        DirectiveLocation::InputObject => "INPUT_OBJECT",
        DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
    }
}

fn write_description(sdl: &mut String, description: Option<&String>, indent: &str) {
    if let Some(description) = description {
        let _ = writeln!(sdl, "{indent}\"\"\"{description}\"\"\"");
    }
}

fn write_deprecation(sdl: &mut String, deprecation: Option<&Deprecation>) {
    match deprecation {
        Some(Deprecation {
            reason: Some(reason),
        }) => {
            let _ = write!(sdl, " @deprecated(reason: {})", Value::String(reason.clone()));
        }
        Some(Deprecation { reason: None }) => sdl.push_str(" @deprecated"),
        None => {}
    }
}

fn write_input_field(sdl: &mut String, input_field: &InputField) {
    let _ = write!(sdl, "{}: {}", input_field.name, input_field.field_type);
    if let Some(default_value) = &input_field.default_value {
        let _ = write!(sdl, " = {default_value}");
    }
    write_deprecation(sdl, input_field.deprecation.as_ref());
}

fn write_arguments(sdl: &mut String, arguments: &IndexMap<String, InputField>) {
    if arguments.is_empty() {
        return;
    }
    sdl.push('(');
    for (i, argument) in arguments.values().enumerate() {
        if i > 0 {
            sdl.push_str(", ");
        }
        write_input_field(sdl, argument);
    }
    sdl.push(')');
}

fn write_field(
    sdl: &mut String,
    name: &str,
    description: Option<&String>,
    arguments: &IndexMap<String, InputField>,
    field_type: &FieldType,
    deprecation: Option<&Deprecation>,
) {
    write_description(sdl, description, "  ");
    let _ = write!(sdl, "  {name}");
    write_arguments(sdl, arguments);
    let _ = write!(sdl, ": {field_type}");
    write_deprecation(sdl, deprecation);
    sdl.push('\n');
}

fn write_implements(sdl: &mut String, implements: &[TypeName]) {
    for (i, interface) in implements.iter().enumerate() {
        let separator = if i == 0 { " implements " } else { " & " };
        let _ = write!(sdl, "{separator}{interface}");
    }
}

fn write_directive(sdl: &mut String, directive: &DirectiveDefinition) {
    write_description(sdl, directive.description.as_ref(), "");
    let _ = write!(sdl, "directive @{}", directive.name);
    write_arguments(sdl, &directive.arguments);
    if directive.repeatable {
        sdl.push_str(" repeatable");
    }
    let _ = writeln!(sdl, " on {}", directive.locations.join(" | "));
}

fn write_type(sdl: &mut String, type_info: &TypeInfo) {
    match type_info {
        TypeInfo::Scalar(scalar) => {
            write_description(sdl, scalar.description.as_ref(), "");
            let _ = writeln!(sdl, "scalar {}", scalar.name);
        }
        TypeInfo::Enum(e) => {
            write_description(sdl, e.description.as_ref(), "");
            let _ = writeln!(sdl, "enum {} {{", e.name);
            for value in &e.values {
                write_description(sdl, value.description.as_ref(), "  ");
                let _ = write!(sdl, "  {}", value.value);
                write_deprecation(sdl, value.deprecation.as_ref());
                sdl.push('\n');
            }
            sdl.push_str("}\n");
        }
        TypeInfo::Object(object) => {
            write_description(sdl, object.description.as_ref(), "");
            let _ = write!(sdl, "type {}", object.name);
            write_implements(sdl, &object.implements);
            sdl.push_str(" {\n");
            for field in object.fields.values() {
                write_field(
                    sdl,
                    &field.name,
                    field.description.as_ref(),
                    &field.arguments,
                    &field.field_type,
                    field.deprecation.as_ref(),
                );
            }
            sdl.push_str("}\n");
        }
        TypeInfo::Interface(interface) => {
            write_description(sdl, interface.description.as_ref(), "");
            let _ = write!(sdl, "interface {}", interface.name);
            write_implements(sdl, &interface.implements);
            sdl.push_str(" {\n");
            for field in interface.fields.values() {
                write_field(
                    sdl,
                    &field.name,
                    field.description.as_ref(),
                    &field.arguments,
                    &field.field_type,
                    field.deprecation.as_ref(),
                );
            }
            sdl.push_str("}\n");
        }
        TypeInfo::Union(union) => {
            write_description(sdl, union.description.as_ref(), "");
            let members: Vec<&str> = union.members.iter().map(TypeName::as_str).collect();
            let _ = writeln!(sdl, "union {} = {}", union.name, members.join(" | "));
        }
        TypeInfo::InputObject(input_object) => {
            write_description(sdl, input_object.description.as_ref(), "");
            let _ = writeln!(sdl, "input {} {{", input_object.name);
            for field in input_object.fields.values() {
                write_description(sdl, field.description.as_ref(), "  ");
                sdl.push_str("  ");
                write_input_field(sdl, field);
                sdl.push('\n');
            }
            sdl.push_str("}\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = r#"
        scalar JSON

        enum QueryMode {
          default
          insensitive
        }

        input UserWhereUniqueInput {
          id: ID
        }

        type User {
          id: ID!
          name: String
        }

        type Query {
          user(where: UserWhereUniqueInput!): User
          users(take: Int = 10): [User!]
        }
    "#;

    #[test]
    fn loads_types_from_sdl() {
        let schema = Schema::from_sdl(BASE).unwrap();
        assert_eq!(schema.query_type, TypeName::from("Query"));
        assert!(schema.mutation_type.is_none());
        assert_eq!(schema.get_type("JSON").map(TypeInfo::kind), Some("SCALAR"));
        assert!(schema
            .get_type("QueryMode")
            .and_then(TypeInfo::as_enum)
            .is_some_and(|e| e.contains("insensitive")));
        let query = schema.query_root().unwrap();
        assert_eq!(
            query.fields["users"].field_type.to_string(),
            "[User!]".to_string()
        );
    }

    #[test]
    fn prints_sdl_deterministically() {
        let schema = Schema::from_sdl(BASE).unwrap();
        let expected = "scalar JSON

type Query {
  user(where: UserWhereUniqueInput!): User
  users(take: Int = 10): [User!]
}

enum QueryMode {
  default
  insensitive
}

type User {
  id: ID!
  name: String
}

input UserWhereUniqueInput {
  id: ID
}

";
        assert_eq!(schema.generate_sdl(), expected);
        // printing a re-parsed schema yields the same document
        assert_eq!(
            Schema::from_sdl(&schema.generate_sdl())
                .unwrap()
                .generate_sdl(),
            expected
        );
    }

    #[test]
    fn honours_schema_definition() {
        let schema = Schema::from_sdl(
            "schema { query: RootQuery }
             type RootQuery { ok: Boolean }",
        )
        .unwrap();
        assert_eq!(schema.query_type, TypeName::from("RootQuery"));
        assert!(schema.generate_sdl().starts_with("schema {\n  query: RootQuery\n}\n"));
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(matches!(
            Schema::from_sdl("type Query {"),
            Err(Error::ParseFailure(_))
        ));
        assert_eq!(
            Schema::from_sdl("type Other { ok: Boolean }").unwrap_err(),
            Error::TypeNotDefined(TypeName::from("Query"))
        );
        assert_eq!(
            Schema::from_sdl("scalar Query").unwrap_err(),
            Error::ExpectedObjectDefinition(TypeName::from("Query"))
        );
        assert_eq!(
            Schema::from_sdl(
                "type Query { a: Int }
                 type Query { b: Int }"
            )
            .unwrap_err(),
            Error::ConflictingGraphQlType(TypeName::from("Query"))
        );
        assert_eq!(
            Schema::from_sdl(
                "directive @auth on FIELD_DEFINITION
                 directive @auth on OBJECT
                 type Query { a: Int }"
            )
            .unwrap_err(),
            Error::ConflictingDirective("auth".to_string())
        );
    }

    const ABSTRACT: &str = r#"
        """Restricts a field to a role."""
        directive @auth(role: String = "admin") repeatable on FIELD_DEFINITION | OBJECT

        directive @deprecated(reason: String) on FIELD_DEFINITION | ENUM_VALUE

        interface Node {
          id: ID!
        }

        type Post implements Node {
          id: ID!
          title: String @deprecated(reason: "Use \"heading\"")
          heading: String
        }

        type Query {
          node(id: ID!): Node
          search(text: String, fuzzy: Boolean @deprecated): [SearchResult!]
        }

        union SearchResult = Post | User

        enum Role {
          admin
          editor @deprecated
        }

        type User implements Node {
          id: ID!
        }
    "#;

    #[test]
    fn loads_abstract_types_directives_and_deprecations() {
        let schema = Schema::from_sdl(ABSTRACT).unwrap();

        let union = match schema.get_type("SearchResult") {
            Some(TypeInfo::Union(union)) => union,
            other => panic!("expected a union, got {other:?}"),
        };
        assert_eq!(
            union.members,
            vec![TypeName::from("Post"), TypeName::from("User")]
        );
        assert!(matches!(schema.get_type("Node"), Some(TypeInfo::Interface(_))));
        let post = schema.get_type("Post").and_then(TypeInfo::as_object).unwrap();
        assert_eq!(post.implements, vec![TypeName::from("Node")]);
        assert_eq!(
            post.fields["title"].deprecation,
            Some(Deprecation {
                reason: Some("Use \"heading\"".to_string())
            })
        );
        assert_eq!(post.fields["heading"].deprecation, None);

        // only the custom directive is kept
        assert_eq!(schema.directives.keys().collect::<Vec<_>>(), vec!["auth"]);
        let auth = &schema.directives["auth"];
        assert!(auth.repeatable);
        assert_eq!(auth.locations, vec!["FIELD_DEFINITION", "OBJECT"]);
        assert_eq!(auth.description.as_deref(), Some("Restricts a field to a role."));
    }

    #[test]
    fn prints_abstract_types_directives_and_deprecations() {
        let schema = Schema::from_sdl(ABSTRACT).unwrap();
        let expected = r#""""Restricts a field to a role."""
directive @auth(role: String = "admin") repeatable on FIELD_DEFINITION | OBJECT

interface Node {
  id: ID!
}

type Post implements Node {
  id: ID!
  title: String @deprecated(reason: "Use \"heading\"")
  heading: String
}

type Query {
  node(id: ID!): Node
  search(text: String, fuzzy: Boolean @deprecated): [SearchResult!]
}

enum Role {
  admin
  editor @deprecated
}

union SearchResult = Post | User

type User implements Node {
  id: ID!
}

"#;
        assert_eq!(schema.generate_sdl(), expected);
        assert_eq!(
            Schema::from_sdl(&schema.generate_sdl())
                .unwrap()
                .generate_sdl(),
            expected
        );
    }
}
