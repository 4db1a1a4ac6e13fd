//! Error types for pack decoding.

use std::fmt;
use std::path::PathBuf;

use blueprint_pack_buffers::BufferError;
use thiserror::Error;

use crate::guid::Guid;
use crate::schema::ValueKind;

/// What went wrong while decoding. Every kind is fatal for the record being
/// decoded: the cursor position can no longer be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("truncated input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },
    #[error("unknown type identifier {0}")]
    UnknownTypeIdentifier(Guid),
    #[error("no schema for type {0}")]
    MissingSchema(String),
    #[error("field name mismatch: expected `{expected}`, found `{found}`")]
    FieldNameMismatch { expected: String, found: String },
    #[error("value kind {kind} is not supported by dialect `{dialect}`")]
    UnsupportedValueKind {
        kind: ValueKind,
        dialect: &'static str,
    },
    #[error("invalid length {0}")]
    InvalidLength(i64),
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("asset index {index} out of range ({len} entries)")]
    AssetIndexOutOfRange { index: i32, len: usize },
    #[error("nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Field(String),
    Index(usize),
}

/// A decode failure with the position and context needed to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    offset: usize,
    record: Option<Guid>,
    type_name: Option<String>,
    field: Option<String>,
    value_kind: Option<ValueKind>,
    // Leaf first; reversed when rendered.
    path: Vec<PathSegment>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            record: None,
            type_name: None,
            field: None,
            value_kind: None,
            path: Vec::new(),
        }
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Absolute archive offset at which the failing read started.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn record(&self) -> Option<Guid> {
        self.record
    }

    /// Full name of the innermost type being decoded.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Innermost field being decoded.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn value_kind(&self) -> Option<ValueKind> {
        self.value_kind
    }

    /// Location from the record root, e.g. `Components[2].m_Condition`.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in self.path.iter().rev() {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    pub fn with_record(mut self, record: Guid) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_value_kind(mut self, kind: ValueKind) -> Self {
        self.value_kind.get_or_insert(kind);
        self
    }

    /// Records that the failure happened inside `field` of `type_name`.
    /// Called while unwinding, so the first call holds the innermost context.
    pub fn in_field(mut self, type_name: &str, field: &str, kind: ValueKind) -> Self {
        if self.field.is_none() {
            self.type_name = Some(type_name.to_owned());
            self.field = Some(field.to_owned());
        }
        self.value_kind.get_or_insert(kind);
        self.path.push(PathSegment::Field(field.to_owned()));
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => DecodeError::new(DecodeErrorKind::TruncatedInput { needed, available }, offset),
            BufferError::InvalidUtf8 { offset } => {
                DecodeError::new(DecodeErrorKind::InvalidUtf8, offset)
            }
            BufferError::OutOfRange { offset, .. } => DecodeError::new(
                DecodeErrorKind::TruncatedInput {
                    needed: 1,
                    available: 0,
                },
                offset,
            ),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset 0x{:X}", self.kind, self.offset)?;
        if let Some(record) = &self.record {
            write!(f, " (record: {record})")?;
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {type_name})")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        if let Some(kind) = self.value_kind {
            write!(f, " (kind: {kind})")?;
        }
        if !self.path.is_empty() {
            write!(f, " (path: {})", self.path())?;
        }
        Ok(())
    }
}

// Display already carries the kind, so it is not chained as a source.
impl std::error::Error for DecodeError {}

/// Failure to load a schema or asset interchange document.
#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown dialect `{0}`")]
    UnknownDialect(String),
    #[error("type `{0}` is referenced but never declared")]
    UnknownType(String),
    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),
    #[error("type identifier {id} is claimed by both `{first}` and `{second}`")]
    DuplicateTypeId {
        id: Guid,
        first: String,
        second: String,
    },
}

/// Top-level error of a pack decode.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Schema(#[from] SchemaFileError),
}
