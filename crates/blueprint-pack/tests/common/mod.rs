//! Archive fixtures for integration tests.
#![allow(dead_code)]

use blueprint_pack::Guid;
use blueprint_pack_buffers::Writer;

/// Identifier whose 16 wire bytes are all `n`.
pub fn id(n: u8) -> Guid {
    Guid::from_wire_bytes([n; 16])
}

/// Wire encodings of the archive's composite scalars.
pub trait WireExt {
    fn string(&mut self, s: &str) -> &mut Self;
    fn null_string(&mut self) -> &mut Self;
    fn guid(&mut self, id: Guid) -> &mut Self;
}

impl WireExt for Writer {
    fn string(&mut self, s: &str) -> &mut Self {
        self.i32(s.len() as i32);
        self.utf8(s);
        self
    }

    fn null_string(&mut self) -> &mut Self {
        self.i32(-1);
        self
    }

    fn guid(&mut self, id: Guid) -> &mut Self {
        self.buf(&id.to_wire_bytes());
        self
    }
}

/// Assembles a pack: header first, record bodies after it in insertion
/// order, offsets patched once known.
#[derive(Default)]
pub struct PackBuilder {
    entries: Vec<(Guid, Option<Vec<u8>>)>,
}

impl PackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, id: Guid, body: Vec<u8>) -> Self {
        self.entries.push((id, Some(body)));
        self
    }

    pub fn tombstone(mut self, id: Guid) -> Self {
        self.entries.push((id, None));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut w = Writer::new();
        w.i32(self.entries.len() as i32);
        let mut slots = Vec::with_capacity(self.entries.len());
        for (id, _) in &self.entries {
            w.guid(*id);
            slots.push(w.x());
            w.u32(0);
        }
        for ((_, body), slot) in self.entries.iter().zip(slots) {
            if let Some(body) = body {
                let offset = w.x() as u32;
                w.patch_u32(slot, offset);
                w.buf(body);
            }
        }
        w.flush()
    }
}

/// Body of a record in a string-asset-id dialect.
pub fn string_record(type_id: Guid, fields: impl FnOnce(&mut Writer), name: &str, asset_id: &str) -> Vec<u8> {
    let mut w = Writer::new();
    w.guid(type_id);
    fields(&mut w);
    w.string(name).string(asset_id);
    w.flush()
}

/// Body of a record in a guid-asset-id dialect.
pub fn guid_record(type_id: Guid, fields: impl FnOnce(&mut Writer), name: &str, asset_id: Guid) -> Vec<u8> {
    let mut w = Writer::new();
    w.guid(type_id);
    fields(&mut w);
    w.string(name).guid(asset_id);
    w.flush()
}
