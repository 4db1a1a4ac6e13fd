//! JSON interchange form of a schema set, as produced by an external schema
//! extractor.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::SchemaFileError;
use crate::guid::Guid;

use super::{EnumSchema, FieldSchema, SchemaRegistry, ValueSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub dialect: String,
    pub types: Vec<TypeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    pub name: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<Guid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_def: Option<EnumDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub value: ValueDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    #[serde(default)]
    pub flags: bool,
    pub constants: Vec<EnumConstantDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstantDef {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueDef {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Boolean,
    String,
    EnumInt32 {
        #[serde(rename = "type")]
        enum_type: String,
    },
    UnityObjectRef,
    BlueprintRef,
    BlueprintRefWrath,
    BlueprintGuid,
    WeakResourceLink,
    Color,
    Color32,
    Vector2,
    Vector3,
    Vector4,
    Vector2Int,
    Bounds,
    Gradient,
    AnimationCurve,
    ColorBlock,
    Array {
        element: Box<ValueDef>,
    },
    List {
        element: Box<ValueDef>,
    },
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(rename = "type")]
        object_type: String,
        #[serde(default)]
        identified: bool,
        #[serde(default)]
        force_needs_type: bool,
    },
}

impl SchemaDocument {
    pub fn from_json_str(text: &str) -> Result<Self, SchemaFileError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaFileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SchemaFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Builds a registry from a document. Every type is declared before any is
/// defined, so types may reference themselves and each other.
pub fn load_schema_document(doc: &SchemaDocument) -> Result<SchemaRegistry, SchemaFileError> {
    let dialect = Dialect::by_name(&doc.dialect)
        .ok_or_else(|| SchemaFileError::UnknownDialect(doc.dialect.clone()))?;
    let mut registry = SchemaRegistry::new(dialect.clone());

    let mut refs = Vec::with_capacity(doc.types.len());
    for def in &doc.types {
        if registry.lookup(&def.full_name).is_some() {
            return Err(SchemaFileError::DuplicateType(def.full_name.clone()));
        }
        let type_id = def.type_id.unwrap_or(Guid::ZERO);
        if let Some(owner) = registry.owner_of(type_id) {
            let first = registry
                .iter()
                .find(|(r, _)| *r == owner)
                .map(|(_, t)| t.full_name.clone())
                .unwrap_or_default();
            return Err(SchemaFileError::DuplicateTypeId {
                id: type_id,
                first,
                second: def.full_name.clone(),
            });
        }
        refs.push(registry.declare(def.name.clone(), def.full_name.clone(), type_id));
    }

    for (def, type_ref) in doc.types.iter().zip(refs) {
        let fields = def
            .fields
            .iter()
            .map(|f| -> Result<FieldSchema, SchemaFileError> {
                Ok(FieldSchema::new(f.name.clone(), value_schema(&registry, &f.value)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        registry.define(type_ref, fields);
        if let Some(e) = &def.enum_def {
            registry.define_enum(
                type_ref,
                EnumSchema::new(e.flags, e.constants.iter().map(|c| (c.name.clone(), c.value))),
            );
        }
    }

    tracing::debug!(dialect = dialect.name, types = registry.len(), "schema document loaded");
    Ok(registry)
}

fn value_schema(registry: &SchemaRegistry, def: &ValueDef) -> Result<ValueSchema, SchemaFileError> {
    let type_ref = |name: &str| {
        registry
            .lookup(name)
            .ok_or_else(|| SchemaFileError::UnknownType(name.to_owned()))
    };
    Ok(match def {
        ValueDef::Int32 => ValueSchema::Int32,
        ValueDef::UInt32 => ValueSchema::UInt32,
        ValueDef::Int64 => ValueSchema::Int64,
        ValueDef::UInt64 => ValueSchema::UInt64,
        ValueDef::Single => ValueSchema::Single,
        ValueDef::Double => ValueSchema::Double,
        ValueDef::Boolean => ValueSchema::Boolean,
        ValueDef::String => ValueSchema::String,
        ValueDef::EnumInt32 { enum_type } => ValueSchema::EnumInt32(type_ref(enum_type)?),
        ValueDef::UnityObjectRef => ValueSchema::UnityObjectRef,
        ValueDef::BlueprintRef => ValueSchema::BlueprintRef,
        ValueDef::BlueprintRefWrath => ValueSchema::BlueprintRefWrath,
        ValueDef::BlueprintGuid => ValueSchema::BlueprintGuid,
        ValueDef::WeakResourceLink => ValueSchema::WeakResourceLink,
        ValueDef::Color => ValueSchema::Color,
        ValueDef::Color32 => ValueSchema::Color32,
        ValueDef::Vector2 => ValueSchema::Vector2,
        ValueDef::Vector3 => ValueSchema::Vector3,
        ValueDef::Vector4 => ValueSchema::Vector4,
        ValueDef::Vector2Int => ValueSchema::Vector2Int,
        ValueDef::Bounds => ValueSchema::Bounds,
        ValueDef::Gradient => ValueSchema::Gradient,
        ValueDef::AnimationCurve => ValueSchema::AnimationCurve,
        ValueDef::ColorBlock => ValueSchema::ColorBlock,
        ValueDef::Array { element } => ValueSchema::array(value_schema(registry, element)?),
        ValueDef::List { element } => ValueSchema::list(value_schema(registry, element)?),
        ValueDef::Object {
            object_type,
            identified,
            force_needs_type,
        } => ValueSchema::object(type_ref(object_type)?, *identified, *force_needs_type),
    })
}
