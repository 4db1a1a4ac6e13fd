use std::collections::HashMap;

use crate::dialect::Dialect;
use crate::guid::Guid;
use crate::provider::SchemaProvider;

use super::{EnumSchema, FieldSchema, TypeRef, TypeSchema};

/// Arena of type schemas addressed by [`TypeRef`].
///
/// A type is declared first (name and identifier) and defined later, so
/// field schemas can point at types whose own fields are not yet known,
/// including the type being defined.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    dialect: Dialect,
    types: Vec<TypeSchema>,
    defined: Vec<bool>,
    by_name: HashMap<String, TypeRef>,
    by_id: HashMap<Guid, TypeRef>,
}

impl SchemaRegistry {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Returns the slot for `full_name`, creating it on first use. A non-zero
    /// `type_id` makes the type resolvable from the stream.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        full_name: impl Into<String>,
        type_id: Guid,
    ) -> TypeRef {
        let full_name = full_name.into();
        if let Some(&existing) = self.by_name.get(&full_name) {
            let slot = &mut self.types[existing.index()];
            if slot.type_id.is_zero() && !type_id.is_zero() {
                slot.type_id = type_id;
                self.by_id.entry(type_id).or_insert(existing);
            }
            return existing;
        }
        let type_ref = TypeRef(self.types.len() as u32);
        self.types.push(TypeSchema::new(name, full_name.clone(), type_id));
        self.defined.push(false);
        self.by_name.insert(full_name, type_ref);
        if !type_id.is_zero() {
            self.by_id.entry(type_id).or_insert(type_ref);
        }
        type_ref
    }

    /// Sets the fields of a declared type, in wire order.
    pub fn define(&mut self, type_ref: TypeRef, fields: Vec<FieldSchema>) {
        if let Some(slot) = self.types.get_mut(type_ref.index()) {
            slot.fields = fields;
            self.defined[type_ref.index()] = true;
        }
    }

    pub fn define_enum(&mut self, type_ref: TypeRef, enum_def: EnumSchema) {
        if let Some(slot) = self.types.get_mut(type_ref.index()) {
            slot.enum_def = Some(enum_def);
            self.defined[type_ref.index()] = true;
        }
    }

    pub fn lookup(&self, full_name: &str) -> Option<TypeRef> {
        self.by_name.get(full_name).copied()
    }

    /// Identifier already claimed by another type, if any.
    pub(crate) fn owner_of(&self, type_id: Guid) -> Option<TypeRef> {
        self.by_id.get(&type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeRef, &TypeSchema)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeRef(i as u32), t))
    }
}

impl SchemaProvider for SchemaRegistry {
    fn resolve(&self, type_id: Guid) -> Option<&TypeSchema> {
        if type_id.is_zero() {
            return None;
        }
        self.by_id
            .get(&type_id)
            .and_then(|r| self.type_schema(*r))
    }

    /// Declared-but-undefined slots resolve to `None`.
    fn type_schema(&self, type_ref: TypeRef) -> Option<&TypeSchema> {
        match self.defined.get(type_ref.index()) {
            Some(true) => self.types.get(type_ref.index()),
            _ => None,
        }
    }

    fn declared_name(&self, type_ref: TypeRef) -> Option<&str> {
        self.types
            .get(type_ref.index())
            .map(|t| t.full_name.as_str())
    }

    fn declared_type(&self, type_id: Guid) -> Option<TypeRef> {
        if type_id.is_zero() {
            return None;
        }
        self.owner_of(type_id)
    }

    fn dialect(&self) -> &Dialect {
        &self.dialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValueSchema;

    fn id(n: u8) -> Guid {
        let mut bytes = [0u8; 16];
        bytes[15] = n;
        Guid::from_wire_bytes(bytes)
    }

    #[test]
    fn self_referential_type() {
        let mut reg = SchemaRegistry::new(Dialect::WRATH);
        let node = reg.declare("Node", "Game.Node", id(1));
        reg.define(
            node,
            vec![
                FieldSchema::new("Value", ValueSchema::Int32),
                FieldSchema::new("Next", ValueSchema::object(node, true, false)),
            ],
        );
        let schema = reg.resolve(id(1)).unwrap();
        assert_eq!(schema.full_name, "Game.Node");
        assert_eq!(
            schema.fields[1].value,
            ValueSchema::object(node, true, false)
        );
    }

    #[test]
    fn declare_is_memoized_by_full_name() {
        let mut reg = SchemaRegistry::default();
        let a = reg.declare("A", "Game.A", Guid::ZERO);
        let b = reg.declare("A", "Game.A", id(7));
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.owner_of(id(7)), Some(a));
    }

    #[test]
    fn undefined_slot_is_not_resolvable() {
        let mut reg = SchemaRegistry::default();
        let a = reg.declare("A", "Game.A", id(2));
        assert!(reg.type_schema(a).is_none());
        assert_eq!(reg.declared_name(a), Some("Game.A"));
        assert!(reg.resolve(id(2)).is_none());
        assert_eq!(reg.declared_type(id(2)), Some(a));
        assert_eq!(reg.declared_type(id(3)), None);
        assert_eq!(reg.declared_type(Guid::ZERO), None);
        reg.define(a, Vec::new());
        assert!(reg.resolve(id(2)).is_some());
        assert!(reg.resolve(Guid::ZERO).is_none());
    }
}
