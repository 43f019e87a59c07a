use crate::ast::TypeName;
use crate::error::Error;
use crate::schema::{Field, Schema, TypeInfo};

/// A declarative change to a schema.
#[derive(Debug, Clone)]
pub enum SchemaPatch {
    /// Drop the type with the given name.
    RemoveType(TypeName),
    /// Add a type; it must not clash with an existing one.
    AddType(TypeInfo),
    /// Add a field to an existing object type.
    AddField { type_name: TypeName, field: Field },
}

impl Schema {
    /// Returns a new schema with `patches` applied in order. `self` is left untouched, and no
    /// schema is returned at all if any patch fails.
    pub fn apply_patches(
        &self,
        patches: impl IntoIterator<Item = SchemaPatch>,
    ) -> Result<Schema, Error> {
        let mut schema = self.clone();
        for patch in patches {
            schema.apply_patch(patch)?;
        }
        Ok(schema)
    }

    fn apply_patch(&mut self, patch: SchemaPatch) -> Result<(), Error> {
        match patch {
            SchemaPatch::RemoveType(type_name) => {
                if self.types.remove(&type_name).is_none() {
                    return Err(Error::TypeNotDefined(type_name));
                }
            }
            SchemaPatch::AddType(type_info) => {
                let type_name = type_info.name().clone();
                if self.types.contains_key(&type_name) {
                    return Err(Error::ConflictingGraphQlType(type_name));
                }
                self.types.insert(type_name, type_info);
            }
            SchemaPatch::AddField { type_name, field } => {
                let object = match self.types.get_mut(&type_name) {
                    Some(TypeInfo::Object(object)) => object,
                    Some(_) => return Err(Error::ExpectedObjectDefinition(type_name)),
                    None => return Err(Error::TypeNotDefined(type_name)),
                };
                if object.fields.contains_key(&field.name) {
                    return Err(Error::ConflictingField {
                        type_name,
                        field_name: field.name,
                    });
                }
                object.fields.insert(field.name.clone(), field);
            }
        }
        Ok(())
    }
}
