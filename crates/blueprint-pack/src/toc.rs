//! Archive header: record identifier to byte offset.

use blueprint_pack_buffers::Reader;
use indexmap::IndexMap;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::guid::Guid;

/// Bytes per header entry: 16-byte identifier plus u32 offset.
pub const ENTRY_SIZE: usize = 20;

/// Records of an archive in header order.
///
/// An offset of `0` is a tombstone: the record is listed but absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    entries: IndexMap<Guid, u32>,
}

impl TableOfContents {
    /// Parses the header at the start of `archive`.
    pub fn parse(archive: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(archive);
        Self::read(&mut reader)
    }

    /// Reads the header at the reader's position.
    pub fn read(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let start = reader.x;
        let count = reader.i32()?;
        let count = usize::try_from(count)
            .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidLength(count as i64), start))?;
        let needed = count.saturating_mul(ENTRY_SIZE);
        if needed > reader.size() {
            return Err(DecodeError::new(
                DecodeErrorKind::TruncatedInput {
                    needed: needed.saturating_add(4),
                    available: reader.size() + 4,
                },
                start,
            ));
        }

        let mut entries = IndexMap::with_capacity(count);
        for _ in 0..count {
            let id = Guid::from_wire_bytes(reader.array::<16>()?);
            let offset = reader.u32()?;
            if let Some(previous) = entries.insert(id, offset) {
                tracing::debug!(record = %id, previous, offset, "duplicate header entry");
            }
        }
        Ok(Self { entries })
    }

    /// Number of distinct identifiers, tombstones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &Guid) -> Option<u32> {
        self.entries.get(id).copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Guid, u32)> + '_ {
        self.entries.iter().map(|(id, offset)| (*id, *offset))
    }

    /// Entries that point at a record.
    pub fn present(&self) -> impl Iterator<Item = (Guid, u32)> + '_ {
        self.iter().filter(|(_, offset)| *offset != 0)
    }

    /// Identifiers listed with offset `0`.
    pub fn tombstones(&self) -> impl Iterator<Item = Guid> + '_ {
        self.iter()
            .filter(|(_, offset)| *offset == 0)
            .map(|(id, _)| id)
    }
}

impl FromIterator<(Guid, u32)> for TableOfContents {
    fn from_iter<I: IntoIterator<Item = (Guid, u32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
