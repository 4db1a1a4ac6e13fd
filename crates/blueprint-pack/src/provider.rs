//! Collaborator interfaces the decoder consumes.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::SchemaFileError;
use crate::guid::Guid;
use crate::schema::{TypeRef, TypeSchema};

/// Maps type identifiers and handles to schemas.
///
/// Implementations are read-only while decoding and may be shared by several
/// record workers at once.
pub trait SchemaProvider: Send + Sync {
    /// Schema of the concrete type named by an embedded identifier.
    fn resolve(&self, type_id: Guid) -> Option<&TypeSchema>;

    /// Schema behind a static handle held by a [`ValueSchema`].
    ///
    /// [`ValueSchema`]: crate::schema::ValueSchema
    fn type_schema(&self, type_ref: TypeRef) -> Option<&TypeSchema>;

    /// Name a handle was declared under, even when it has no schema.
    fn declared_name(&self, type_ref: TypeRef) -> Option<&str> {
        self.type_schema(type_ref).map(|t| t.full_name.as_str())
    }

    /// Handle registered for an embedded identifier, whether or not its
    /// schema is known. Lets a decoder tell an unknown identifier apart from
    /// a known type with no schema.
    fn declared_type(&self, _type_id: Guid) -> Option<TypeRef> {
        None
    }

    fn dialect(&self) -> &Dialect;

    /// Display name for a raw enum value. Never fails: values without a
    /// matching constant get the dialect's fallback name.
    fn enum_display_name(&self, enum_type: &TypeSchema, raw: i32) -> String {
        match enum_type.enum_def.as_ref().and_then(|e| e.display_name(raw)) {
            Some(name) => name,
            None => {
                tracing::debug!(
                    enum_type = %enum_type.full_name,
                    raw,
                    "no enum constant matches raw value"
                );
                self.dialect().enum_fallback.to_owned()
            }
        }
    }
}

/// One entry of the engine-object table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    #[serde(rename = "AssetId")]
    pub asset_id: String,
    #[serde(rename = "FileId")]
    pub file_id: i64,
}

/// Resolves numeric engine-object indices.
pub trait AssetProvider: Send + Sync {
    fn entry_at(&self, index: usize) -> Option<&AssetEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory asset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTable {
    entries: Vec<AssetEntry>,
}

impl AssetTable {
    pub fn new(entries: Vec<AssetEntry>) -> Self {
        Self { entries }
    }

    /// Parses `[{"AssetId": "...", "FileId": 1}, ...]`.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaFileError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SchemaFileError> {
        Ok(Self::new(serde_json::from_reader(reader)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaFileError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| SchemaFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn push(&mut self, asset_id: impl Into<String>, file_id: i64) {
        self.entries.push(AssetEntry {
            asset_id: asset_id.into(),
            file_id,
        });
    }
}

impl AssetProvider for AssetTable {
    fn entry_at(&self, index: usize) -> Option<&AssetEntry> {
        self.entries.get(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
