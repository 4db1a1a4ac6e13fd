//! Whole-archive decoding.
//!
//! Records are independent: each header entry names an absolute offset, so
//! every record gets its own cursor. With more than one worker, records are
//! decoded a batch at a time on a rayon pool and emitted in header order.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use memmap2::Mmap;
use rayon::prelude::*;

use crate::decoder::{DecodeContext, ValueDecoder, DEFAULT_MAX_DEPTH};
use crate::error::{DecodeError, PackError};
use crate::guid::Guid;
use crate::json::JsonEncoder;
use crate::provider::{AssetProvider, SchemaProvider};
use crate::record::decode_record;
use crate::toc::TableOfContents;
use crate::value::Value;

/// Top-level key of the output document.
pub const DEFAULT_ROOT_KEY: &str = "blueprints";

/// What to do when one record fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop and return the error.
    #[default]
    Abort,
    /// Emit `{"$error": "..."}` for the record and carry on.
    Isolate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub error_policy: ErrorPolicy,
    /// Worker threads; `1` decodes on the calling thread.
    pub workers: usize,
    /// Records decoded per parallel batch.
    pub batch_size: usize,
    pub max_depth: usize,
    pub pretty: bool,
    pub root_key: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Abort,
            workers: 1,
            batch_size: 256,
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
            root_key: DEFAULT_ROOT_KEY.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Records emitted with decoded content (null roots included).
    pub records: usize,
    /// Header entries with offset `0`.
    pub tombstones: usize,
    /// Records emitted as `$error` entries.
    pub failed: usize,
}

pub struct PackDecoder<'s> {
    ctx: DecodeContext<'s>,
    options: DecodeOptions,
}

impl<'s> PackDecoder<'s> {
    pub fn new(schemas: &'s dyn SchemaProvider, assets: &'s dyn AssetProvider) -> Self {
        Self {
            ctx: DecodeContext::new(schemas, assets),
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes the record stored at `offset`. Errors carry the record id.
    pub fn decode_record_at(&self, archive: &[u8], id: Guid, offset: u32) -> Result<Value, DecodeError> {
        let start = offset as usize;
        let mut decoder = ValueDecoder::at(archive, start, self.ctx)
            .map_err(|e| e.with_record(id))?
            .with_max_depth(self.options.max_depth);
        let value = decode_record(&mut decoder).map_err(|e| e.with_record(id))?;
        tracing::debug!(record = %id, offset, bytes = decoder.position() - start, "record decoded");
        Ok(value)
    }

    /// Streams `{"<root_key>": {"<id>": entry, ...}}` to `sink`.
    pub fn decode_pack<W: Write>(&self, archive: &[u8], sink: W) -> Result<PackSummary, PackError> {
        let toc = TableOfContents::parse(archive)?;
        let mut out = if self.options.pretty {
            JsonEncoder::pretty(sink)
        } else {
            JsonEncoder::new(sink)
        };
        out.begin_object()?;
        out.key(&self.options.root_key)?;
        out.begin_object()?;
        let summary = self.each_record(archive, &toc, |id, value| {
            out.key(&id.to_string())?;
            out.write_value(&value)?;
            Ok(())
        })?;
        out.end_object()?;
        out.end_object()?;
        out.finish()?;
        Ok(summary)
    }

    /// Decodes the whole archive into memory.
    pub fn decode_pack_to_value(&self, archive: &[u8]) -> Result<Value, PackError> {
        let toc = TableOfContents::parse(archive)?;
        let mut entries = Vec::with_capacity(toc.len());
        self.each_record(archive, &toc, |id, value| {
            entries.push((id.to_string(), value));
            Ok(())
        })?;
        Ok(Value::Object(vec![(
            self.options.root_key.clone(),
            Value::Object(entries),
        )]))
    }

    fn each_record<F>(&self, archive: &[u8], toc: &TableOfContents, mut emit: F) -> Result<PackSummary, PackError>
    where
        F: FnMut(Guid, Value) -> Result<(), PackError>,
    {
        let mut summary = PackSummary {
            tombstones: toc.tombstones().count(),
            ..PackSummary::default()
        };
        let present: Vec<(Guid, u32)> = toc.present().collect();

        let mut handle = |id: Guid, result: Result<Value, DecodeError>| -> Result<(), PackError> {
            match result {
                Ok(value) => {
                    summary.records += 1;
                    emit(id, value)
                }
                Err(err) if self.options.error_policy == ErrorPolicy::Isolate => {
                    tracing::error!(record = %id, error = %err, "record failed");
                    summary.failed += 1;
                    emit(
                        id,
                        Value::Object(vec![("$error".to_owned(), Value::Str(err.to_string()))]),
                    )
                }
                Err(err) => Err(err.into()),
            }
        };

        if self.options.workers <= 1 {
            for &(id, offset) in &present {
                handle(id, self.decode_record_at(archive, id, offset))?;
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.workers)
                .build()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            for batch in present.chunks(self.options.batch_size.max(1)) {
                let results: Vec<Result<Value, DecodeError>> = pool.install(|| {
                    batch
                        .par_iter()
                        .map(|&(id, offset)| self.decode_record_at(archive, id, offset))
                        .collect()
                });
                for (&(id, _), result) in batch.iter().zip(results) {
                    handle(id, result)?;
                }
            }
        }

        tracing::info!(
            records = summary.records,
            tombstones = summary.tombstones,
            failed = summary.failed,
            "pack decoded"
        );
        Ok(summary)
    }
}

/// Decodes `archive` with default options, streaming JSON to `sink`.
pub fn decode_pack<W: Write>(
    archive: &[u8],
    schemas: &dyn SchemaProvider,
    assets: &dyn AssetProvider,
    sink: W,
) -> Result<PackSummary, PackError> {
    PackDecoder::new(schemas, assets).decode_pack(archive, sink)
}

/// Memory-maps the archive at `path` and decodes it.
pub fn decode_pack_file<W: Write>(
    path: impl AsRef<Path>,
    schemas: &dyn SchemaProvider,
    assets: &dyn AssetProvider,
    options: DecodeOptions,
    sink: W,
) -> Result<PackSummary, PackError> {
    let file = File::open(path.as_ref())?;
    let decoder = PackDecoder::new(schemas, assets).with_options(options);
    if file.metadata()?.len() == 0 {
        return decoder.decode_pack(&[], sink);
    }
    // SAFETY: the map is read-only and dropped before returning; the archive
    // must not be truncated by another process while it is decoded.
    let mmap = unsafe { Mmap::map(&file)? };
    decoder.decode_pack(&mmap, sink)
}
