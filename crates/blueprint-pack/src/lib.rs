//! Decoder for binary blueprint pack archives.
//!
//! A pack is a header of record identifiers and offsets followed by records,
//! each a tree of values laid out by an external type schema. Decoding walks
//! the stream strictly in schema order and produces lossless JSON: floats
//! keep their width, non-finite floats are written as strings, and any
//! disagreement between schema and stream stops the record with an error
//! pointing at the byte offset where it was detected.
//!
//! ```no_run
//! use blueprint_pack::{decode_pack_file, load_schema_document, AssetTable, DecodeOptions, SchemaDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schemas = load_schema_document(&SchemaDocument::from_path("schema.json")?)?;
//! let assets = AssetTable::load("assets.json")?;
//! let summary = decode_pack_file(
//!     "blueprints.pack",
//!     &schemas,
//!     &assets,
//!     DecodeOptions::default(),
//!     std::io::stdout().lock(),
//! )?;
//! eprintln!("{} records", summary.records);
//! # Ok(())
//! # }
//! ```

mod error;
mod guid;
mod pack;
mod provider;
mod record;

pub mod decoder;
pub mod dialect;
pub mod json;
pub mod schema;
pub mod toc;
pub mod value;

pub use decoder::{DecodeContext, ValueDecoder};
pub use dialect::{AssetIdFormat, Dialect};
pub use error::{DecodeError, DecodeErrorKind, PackError, SchemaFileError};
pub use guid::Guid;
pub use json::JsonEncoder;
pub use pack::{
    decode_pack, decode_pack_file, DecodeOptions, ErrorPolicy, PackDecoder, PackSummary,
    DEFAULT_ROOT_KEY,
};
pub use provider::{AssetEntry, AssetProvider, AssetTable, SchemaProvider};
pub use record::decode_record;
pub use schema::{
    load_schema_document, EnumSchema, FieldSchema, ObjectSchema, SchemaDocument, SchemaRegistry,
    TypeRef, TypeSchema, ValueKind, ValueSchema,
};
pub use toc::TableOfContents;
pub use value::Value;
