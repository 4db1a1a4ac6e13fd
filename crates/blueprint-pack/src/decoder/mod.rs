//! Schema-driven value decoder.
//!
//! The stream carries no tags at the leaves: every byte is interpreted by
//! the [`ValueSchema`] the caller passes in. A decoder consumes exactly the
//! bytes one value occupies and leaves the cursor at the next value.

mod refs;
mod structs;

pub use refs::BLUEPRINT_REF_PREFIX;

use blueprint_pack_buffers::Reader;

use crate::dialect::Dialect;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::guid::Guid;
use crate::provider::{AssetProvider, SchemaProvider};
use crate::schema::{FieldSchema, ObjectSchema, TypeRef, TypeSchema, ValueKind, ValueSchema};
use crate::value::Value;

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Collaborators shared by every decode of one archive.
#[derive(Clone, Copy)]
pub struct DecodeContext<'s> {
    pub schemas: &'s dyn SchemaProvider,
    pub assets: &'s dyn AssetProvider,
    pub dialect: &'s Dialect,
}

impl<'s> DecodeContext<'s> {
    /// Uses the dialect the schema provider was built for.
    pub fn new(schemas: &'s dyn SchemaProvider, assets: &'s dyn AssetProvider) -> Self {
        Self {
            schemas,
            assets,
            dialect: schemas.dialect(),
        }
    }
}

/// Cursor plus context for decoding values out of an archive.
pub struct ValueDecoder<'a, 's> {
    pub reader: Reader<'a>,
    ctx: DecodeContext<'s>,
    depth: usize,
    max_depth: usize,
}

impl<'a, 's> ValueDecoder<'a, 's> {
    pub fn new(data: &'a [u8], ctx: DecodeContext<'s>) -> Self {
        Self {
            reader: Reader::new(data),
            ctx,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Decoder positioned at an absolute offset.
    pub fn at(data: &'a [u8], offset: usize, ctx: DecodeContext<'s>) -> Result<Self, DecodeError> {
        Ok(Self {
            reader: Reader::at(data, offset)?,
            ctx,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn position(&self) -> usize {
        self.reader.x
    }

    pub fn context(&self) -> &DecodeContext<'s> {
        &self.ctx
    }

    /// Decodes one value laid out as `schema`.
    pub fn decode(&mut self, schema: &ValueSchema) -> Result<Value, DecodeError> {
        let kind = schema.kind();
        self.decode_kind(schema, kind)
            .map_err(|e| e.with_value_kind(kind))
    }

    fn decode_kind(&mut self, schema: &ValueSchema, kind: ValueKind) -> Result<Value, DecodeError> {
        if !self.ctx.dialect.supports(kind) {
            return Err(self.error(DecodeErrorKind::UnsupportedValueKind {
                kind,
                dialect: self.ctx.dialect.name,
            }));
        }
        let value = match schema {
            ValueSchema::Int32 => Value::Int(self.reader.i32()? as i64),
            ValueSchema::UInt32 => Value::UInt(self.reader.u32()? as u64),
            ValueSchema::Int64 => Value::Int(self.reader.i64()?),
            ValueSchema::UInt64 => Value::UInt(self.reader.u64()?),
            ValueSchema::Single => Value::F32(self.reader.f32()?),
            ValueSchema::Double => Value::F64(self.reader.f64()?),
            ValueSchema::Boolean => Value::Bool(self.reader.u8()? != 0),
            ValueSchema::String => Value::from(self.read_str()?),
            ValueSchema::EnumInt32(enum_type) => self.decode_enum(*enum_type)?,
            ValueSchema::UnityObjectRef => self.decode_object_ref()?,
            ValueSchema::BlueprintRef => self.decode_blueprint_ref()?,
            ValueSchema::BlueprintRefWrath => self.decode_blueprint_ref_guid()?,
            ValueSchema::BlueprintGuid => Value::Str(self.read_guid()?.to_string()),
            ValueSchema::WeakResourceLink => self.decode_weak_link()?,
            ValueSchema::Color => self.decode_color()?,
            ValueSchema::Color32 => self.decode_color32()?,
            ValueSchema::Vector2 => self.decode_vector::<2>()?,
            ValueSchema::Vector3 => self.decode_vector::<3>()?,
            ValueSchema::Vector4 => self.decode_vector::<4>()?,
            ValueSchema::Vector2Int => self.decode_vector2_int()?,
            ValueSchema::Bounds => self.decode_bounds()?,
            ValueSchema::Gradient => self.decode_gradient()?,
            ValueSchema::AnimationCurve => self.decode_animation_curve()?,
            ValueSchema::ColorBlock => self.decode_color_block()?,
            ValueSchema::Array(element) | ValueSchema::List(element) => {
                self.decode_sequence(element)?
            }
            ValueSchema::Object(object) => self.decode_object(object)?,
        };
        Ok(value)
    }

    // Display-name lookup never fails: the value bytes are already consumed,
    // so an unknown enum type only costs the name.
    fn decode_enum(&mut self, enum_type: TypeRef) -> Result<Value, DecodeError> {
        let raw = self.reader.i32()?;
        let schemas = self.ctx.schemas;
        let name = match schemas.type_schema(enum_type) {
            Some(schema) => schemas.enum_display_name(schema, raw),
            None => {
                tracing::debug!(
                    enum_type = schemas.declared_name(enum_type).unwrap_or("?"),
                    raw,
                    "enum type has no schema; using fallback name"
                );
                self.ctx.dialect.enum_fallback.to_owned()
            }
        };
        Ok(Value::Str(name))
    }

    fn decode_sequence(&mut self, element: &ValueSchema) -> Result<Value, DecodeError> {
        let count = self.read_count()?;
        self.enter()?;
        let items = self.decode_items(element, count);
        self.depth -= 1;
        items.map(Value::Array)
    }

    fn decode_items(&mut self, element: &ValueSchema, count: usize) -> Result<Vec<Value>, DecodeError> {
        // Never trust the count for the allocation size.
        let width = element.fixed_width().unwrap_or(1).max(1);
        let mut items = Vec::with_capacity(count.min(self.reader.size() / width));
        for i in 0..count {
            let item = self.decode(element).map_err(|e| e.at_index(i))?;
            items.push(item);
        }
        Ok(items)
    }

    /// Decodes an object-valued field: type identifier (when the schema says
    /// one is present) and body.
    pub fn decode_object(&mut self, object: &ObjectSchema) -> Result<Value, DecodeError> {
        if object.needs_type_id() {
            return self.decode_identified();
        }
        let start = self.reader.x;
        let schema = self.static_schema(object.object_type, start)?;
        self.decode_object_body(schema, None)
    }

    /// Reads a type identifier, then the body of the type it names. The zero
    /// identifier is a null value with no body.
    pub fn decode_identified(&mut self) -> Result<Value, DecodeError> {
        let start = self.reader.x;
        let type_id = self.read_guid()?;
        if type_id.is_zero() {
            return Ok(Value::Null);
        }
        let schemas = self.ctx.schemas;
        let Some(schema) = schemas.resolve(type_id) else {
            let kind = match schemas.declared_type(type_id) {
                Some(type_ref) => DecodeErrorKind::MissingSchema(self.type_name(type_ref)),
                None => DecodeErrorKind::UnknownTypeIdentifier(type_id),
            };
            return Err(DecodeError::new(kind, start));
        };
        self.decode_object_body(schema, Some(type_id))
    }

    /// Decodes the fields of `schema` in order. `type_id` is the identifier
    /// read from the stream, if any; it is echoed as `$type`.
    pub fn decode_object_body(
        &mut self,
        schema: &TypeSchema,
        type_id: Option<Guid>,
    ) -> Result<Value, DecodeError> {
        self.enter()?;
        let mut entries = Vec::with_capacity(schema.fields.len() + 1);
        if let Some(type_id) = type_id {
            entries.push(("$type".to_owned(), Value::Str(format!("{type_id}, {}", schema.name))));
        }
        let filled = self.decode_fields(schema, &mut entries);
        self.depth -= 1;
        filled.map(|()| Value::Object(entries))
    }

    fn decode_fields(
        &mut self,
        schema: &TypeSchema,
        entries: &mut Vec<(String, Value)>,
    ) -> Result<(), DecodeError> {
        for field in &schema.fields {
            let value = self
                .decode_field(field)
                .map_err(|e| e.in_field(&schema.full_name, &field.name, field.value.kind()))?;
            entries.push((field.name.clone(), value));
        }
        Ok(())
    }

    fn decode_field(&mut self, field: &FieldSchema) -> Result<Value, DecodeError> {
        if self.ctx.dialect.field_names_embedded {
            self.expect_field_name(&field.name)?;
        }
        self.decode(&field.value)
    }

    /// Reads an embedded field name and checks it against `expected`. A
    /// mismatch means the cursor has lost sync with the schema.
    pub fn expect_field_name(&mut self, expected: &str) -> Result<(), DecodeError> {
        let start = self.reader.x;
        let found = self.read_str()?;
        if found == Some(expected) {
            return Ok(());
        }
        Err(DecodeError::new(
            DecodeErrorKind::FieldNameMismatch {
                expected: expected.to_owned(),
                found: found.unwrap_or("<null>").to_owned(),
            },
            start,
        ))
    }

    /// Length-prefixed UTF-8 string; `None` for the null sentinel.
    pub fn read_str(&mut self) -> Result<Option<&'a str>, DecodeError> {
        let start = self.reader.x;
        let len = self.reader.i32()?;
        match len {
            -1 => Ok(None),
            n if n < 0 => Err(DecodeError::new(DecodeErrorKind::InvalidLength(n as i64), start)),
            n => Ok(Some(self.reader.utf8(n as usize)?)),
        }
    }

    pub fn read_guid(&mut self) -> Result<Guid, DecodeError> {
        Ok(Guid::from_wire_bytes(self.reader.array::<16>()?))
    }

    /// Element count of a collection; negative counts are rejected.
    pub fn read_count(&mut self) -> Result<usize, DecodeError> {
        let start = self.reader.x;
        let count = self.reader.i32()?;
        usize::try_from(count)
            .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidLength(count as i64), start))
    }

    fn static_schema(&self, type_ref: TypeRef, offset: usize) -> Result<&'s TypeSchema, DecodeError> {
        self.ctx.schemas.type_schema(type_ref).ok_or_else(|| {
            DecodeError::new(DecodeErrorKind::MissingSchema(self.type_name(type_ref)), offset)
        })
    }

    fn type_name(&self, type_ref: TypeRef) -> String {
        self.ctx
            .schemas
            .declared_name(type_ref)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{}", type_ref.index()))
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.max_depth {
            return Err(self.error(DecodeErrorKind::NestingTooDeep(self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.reader.x)
    }
}
