//! Schema model: what a type's fields are and how each value is laid out.
//!
//! Schemas are plain immutable values. Types refer to each other through
//! [`TypeRef`] handles into a [`SchemaRegistry`] arena rather than owning
//! nested [`TypeSchema`]s, so a type may (directly or through a container)
//! reference itself.

mod file;
mod registry;

use std::fmt;

use crate::guid::Guid;

pub use file::{
    load_schema_document, EnumConstantDef, EnumDef, FieldDef, SchemaDocument, TypeDef, ValueDef,
};
pub use registry::SchemaRegistry;

/// Handle to a [`TypeSchema`] slot in a [`SchemaRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(pub(crate) u32);

impl TypeRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tag of a [`ValueSchema`] variant, used in diagnostics and dialect checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Boolean,
    String,
    EnumInt32,
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
    Array,
    List,
    Object,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int32 => "Int32",
            ValueKind::UInt32 => "UInt32",
            ValueKind::Int64 => "Int64",
            ValueKind::UInt64 => "UInt64",
            ValueKind::Single => "Single",
            ValueKind::Double => "Double",
            ValueKind::Boolean => "Boolean",
            ValueKind::String => "String",
            ValueKind::EnumInt32 => "EnumInt32",
            ValueKind::UnityObjectRef => "UnityObjectRef",
            ValueKind::BlueprintRef => "BlueprintRef",
            ValueKind::BlueprintRefWrath => "BlueprintRefWrath",
            ValueKind::BlueprintGuid => "BlueprintGuid",
            ValueKind::WeakResourceLink => "WeakResourceLink",
            ValueKind::Color => "Color",
            ValueKind::Color32 => "Color32",
            ValueKind::Vector2 => "Vector2",
            ValueKind::Vector3 => "Vector3",
            ValueKind::Vector4 => "Vector4",
            ValueKind::Vector2Int => "Vector2Int",
            ValueKind::Bounds => "Bounds",
            ValueKind::Gradient => "Gradient",
            ValueKind::AnimationCurve => "AnimationCurve",
            ValueKind::ColorBlock => "ColorBlock",
            ValueKind::Array => "Array",
            ValueKind::List => "List",
            ValueKind::Object => "Object",
        }
    }

    /// Kinds that only some dialects put on the wire.
    pub fn is_dialect_exclusive(self) -> bool {
        matches!(
            self,
            ValueKind::BlueprintRefWrath | ValueKind::BlueprintGuid | ValueKind::Bounds
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    /// Statically declared type of the field. For identified types this is
    /// only the declared base; the concrete schema comes from the stream.
    pub object_type: TypeRef,
    /// The stream carries a type identifier ahead of the body.
    pub is_identified_type: bool,
    /// The stream carries a type identifier even though the declared type is
    /// not identified (serialize-by-reference fields).
    pub force_needs_type: bool,
}

impl ObjectSchema {
    /// Whether a type identifier precedes the body on the wire.
    pub fn needs_type_id(&self) -> bool {
        self.is_identified_type || self.force_needs_type
    }
}

/// How one value is laid out in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSchema {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Boolean,
    String,
    /// Int32-backed enum; the handle names the enum type for display names.
    EnumInt32(TypeRef),
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
    Array(Box<ValueSchema>),
    List(Box<ValueSchema>),
    Object(ObjectSchema),
}

impl ValueSchema {
    pub fn array(element: ValueSchema) -> Self {
        ValueSchema::Array(Box::new(element))
    }

    pub fn list(element: ValueSchema) -> Self {
        ValueSchema::List(Box::new(element))
    }

    pub fn object(object_type: TypeRef, is_identified_type: bool, force_needs_type: bool) -> Self {
        ValueSchema::Object(ObjectSchema {
            object_type,
            is_identified_type,
            force_needs_type,
        })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ValueSchema::Int32 => ValueKind::Int32,
            ValueSchema::UInt32 => ValueKind::UInt32,
            ValueSchema::Int64 => ValueKind::Int64,
            ValueSchema::UInt64 => ValueKind::UInt64,
            ValueSchema::Single => ValueKind::Single,
            ValueSchema::Double => ValueKind::Double,
            ValueSchema::Boolean => ValueKind::Boolean,
            ValueSchema::String => ValueKind::String,
            ValueSchema::EnumInt32(_) => ValueKind::EnumInt32,
            ValueSchema::UnityObjectRef => ValueKind::UnityObjectRef,
            ValueSchema::BlueprintRef => ValueKind::BlueprintRef,
            ValueSchema::BlueprintRefWrath => ValueKind::BlueprintRefWrath,
            ValueSchema::BlueprintGuid => ValueKind::BlueprintGuid,
            ValueSchema::WeakResourceLink => ValueKind::WeakResourceLink,
            ValueSchema::Color => ValueKind::Color,
            ValueSchema::Color32 => ValueKind::Color32,
            ValueSchema::Vector2 => ValueKind::Vector2,
            ValueSchema::Vector3 => ValueKind::Vector3,
            ValueSchema::Vector4 => ValueKind::Vector4,
            ValueSchema::Vector2Int => ValueKind::Vector2Int,
            ValueSchema::Bounds => ValueKind::Bounds,
            ValueSchema::Gradient => ValueKind::Gradient,
            ValueSchema::AnimationCurve => ValueKind::AnimationCurve,
            ValueSchema::ColorBlock => ValueKind::ColorBlock,
            ValueSchema::Array(_) => ValueKind::Array,
            ValueSchema::List(_) => ValueKind::List,
            ValueSchema::Object(_) => ValueKind::Object,
        }
    }

    /// Number of bytes the value always occupies, for fixed-width kinds.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            ValueSchema::Boolean => Some(1),
            ValueSchema::Int32
            | ValueSchema::UInt32
            | ValueSchema::Single
            | ValueSchema::EnumInt32(_)
            | ValueSchema::UnityObjectRef
            | ValueSchema::Color32 => Some(4),
            ValueSchema::Int64
            | ValueSchema::UInt64
            | ValueSchema::Double
            | ValueSchema::Vector2
            | ValueSchema::Vector2Int => Some(8),
            ValueSchema::Vector3 => Some(12),
            ValueSchema::Color
            | ValueSchema::Vector4
            | ValueSchema::BlueprintRefWrath
            | ValueSchema::BlueprintGuid => Some(16),
            ValueSchema::Bounds => Some(24),
            ValueSchema::ColorBlock => Some(4 * 16 + 8),
            _ => None,
        }
    }
}

/// A named field of a [`TypeSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub value: ValueSchema,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, value: ValueSchema) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One named constant of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub value: i64,
}

/// Constants of an enum type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumSchema {
    pub flags: bool,
    pub constants: Vec<EnumConstant>,
}

impl EnumSchema {
    pub fn new<I, S>(flags: bool, constants: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            flags,
            constants: constants
                .into_iter()
                .map(|(name, value)| EnumConstant {
                    name: name.into(),
                    value,
                })
                .collect(),
        }
    }

    /// Display name for a raw value, or `None` when a plain enum has no
    /// constant equal to `raw`.
    ///
    /// Flags enums join every constant sharing a bit with `raw`, in
    /// declaration order.
    pub fn display_name(&self, raw: i32) -> Option<String> {
        let raw = raw as i64;
        if self.flags {
            let names: Vec<&str> = self
                .constants
                .iter()
                .filter(|c| c.value & raw != 0)
                .map(|c| c.name.as_str())
                .collect();
            return Some(names.join(" | "));
        }
        self.constants
            .iter()
            .find(|c| c.value == raw)
            .map(|c| c.name.clone())
    }
}

/// A decodable type: its identity and its fields in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    pub name: String,
    pub full_name: String,
    /// [`Guid::ZERO`] for types that never appear as identified objects.
    pub type_id: Guid,
    /// Wire order. Never reordered or deduplicated.
    pub fields: Vec<FieldSchema>,
    /// Present for enum types.
    pub enum_def: Option<EnumSchema>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>, type_id: Guid) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            type_id,
            fields: Vec::new(),
            enum_def: None,
        }
    }
}
