use async_graphql::dynamic;
use tracing_util::SpanVisibility;

use crate::error::Error;
use crate::schema::{Field, InputField, InterfaceField, Schema, TypeInfo};

impl Schema {
    /// Turn the schema into an executable `async-graphql` dynamic schema. Built-in scalars are
    /// provided by `async-graphql` and skipped here even when the schema declares them. Directive
    /// definitions only appear in the printed SDL.
    pub fn to_executable(&self) -> Result<dynamic::Schema, Error> {
        let tracer = tracing_util::global_tracer();
        tracer.in_span(
            "to_executable",
            "Build executable GraphQL schema",
            SpanVisibility::Internal,
            || {
                let mut builder = dynamic::Schema::build(
                    self.query_type.as_str(),
                    self.mutation_type.as_ref().map(|m| m.as_str()),
                    None,
                );
                for type_info in self.types.values() {
                    if let Some(registered) = to_dynamic_type(type_info) {
                        builder = builder.register(registered);
                    }
                }
                builder
                    .finish()
                    .map_err(|error| Error::UnableToBuildExecutableSchema(error.to_string()))
            },
        )
    }
}

fn to_dynamic_type(type_info: &TypeInfo) -> Option<dynamic::Type> {
    Some(match type_info {
        TypeInfo::Scalar(scalar) => {
            if scalar.name.is_builtin_scalar() {
                return None;
            }
            let mut registered = dynamic::Scalar::new(scalar.name.as_str());
            if let Some(description) = &scalar.description {
                registered = registered.description(description);
            }
            registered.into()
        }
        TypeInfo::Enum(e) => {
            let mut registered = dynamic::Enum::new(e.name.as_str());
            for value in &e.values {
                let mut item = dynamic::EnumItem::new(value.value.as_str());
                if let Some(description) = &value.description {
                    item = item.description(description);
                }
                if let Some(deprecation) = &value.deprecation {
                    item = item.deprecation(deprecation.reason.as_deref());
                }
                registered = registered.item(item);
            }
            if let Some(description) = &e.description {
                registered = registered.description(description);
            }
            registered.into()
        }
        TypeInfo::Object(object) => {
            let mut registered = dynamic::Object::new(object.name.as_str());
            for interface in &object.implements {
                registered = registered.implement(interface.as_str());
            }
            for field in object.fields.values() {
                registered = registered.field(to_field(field));
            }
            if let Some(description) = &object.description {
                registered = registered.description(description);
            }
            registered.into()
        }
        TypeInfo::Interface(interface) => {
            let mut registered = dynamic::Interface::new(interface.name.as_str());
            for implemented in &interface.implements {
                registered = registered.implement(implemented.as_str());
            }
            for field in interface.fields.values() {
                registered = registered.field(to_interface_field(field));
            }
            if let Some(description) = &interface.description {
                registered = registered.description(description);
            }
            registered.into()
        }
        TypeInfo::Union(union) => {
            let mut registered = dynamic::Union::new(union.name.as_str());
            for member in &union.members {
                registered = registered.possible_type(member.as_str());
            }
            if let Some(description) = &union.description {
                registered = registered.description(description);
            }
            registered.into()
        }
        TypeInfo::InputObject(input_object) => {
            let mut registered = dynamic::InputObject::new(input_object.name.as_str());
            for field in input_object.fields.values() {
                registered = registered.field(to_input_value(field));
            }
            if let Some(description) = &input_object.description {
                registered = registered.description(description);
            }
            registered.into()
        }
    })
}

fn to_field(field: &Field) -> dynamic::Field {
    let resolver = field.resolver.clone();
    let mut registered = dynamic::Field::new(
        field.name.as_str(),
        field.field_type.to_type_ref(),
        move |ctx| resolver.call(ctx),
    );
    for argument in field.arguments.values() {
        registered = registered.argument(to_input_value(argument));
    }
    if let Some(description) = &field.description {
        registered = registered.description(description);
    }
    if let Some(deprecation) = &field.deprecation {
        registered = registered.deprecation(deprecation.reason.as_deref());
    }
    registered
}

fn to_interface_field(field: &InterfaceField) -> dynamic::InterfaceField {
    let mut registered =
        dynamic::InterfaceField::new(field.name.as_str(), field.field_type.to_type_ref());
    for argument in field.arguments.values() {
        registered = registered.argument(to_input_value(argument));
    }
    if let Some(description) = &field.description {
        registered = registered.description(description);
    }
    if let Some(deprecation) = &field.deprecation {
        registered = registered.deprecation(deprecation.reason.as_deref());
    }
    registered
}

fn to_input_value(input_field: &InputField) -> dynamic::InputValue {
    let mut input_value =
        dynamic::InputValue::new(input_field.name.as_str(), input_field.field_type.to_type_ref());
    if let Some(default_value) = &input_field.default_value {
        input_value = input_value.default_value(default_value.clone());
    }
    if let Some(description) = &input_field.description {
        input_value = input_value.description(description);
    }
    if let Some(deprecation) = &input_field.deprecation {
        input_value = input_value.deprecation(deprecation.reason.as_deref());
    }
    input_value
}
