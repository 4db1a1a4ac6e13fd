//! One top-level record: identified root object plus its name and asset id.

use crate::decoder::ValueDecoder;
use crate::dialect::AssetIdFormat;
use crate::error::DecodeError;
use crate::schema::ValueKind;
use crate::value::Value;

/// Decodes the record at the decoder's position.
///
/// Yields `{Data, Name, AssetId}`, or `null` when the root type identifier
/// is zero. The trailing name and asset id are consumed either way.
pub fn decode_record(decoder: &mut ValueDecoder<'_, '_>) -> Result<Value, DecodeError> {
    let data = decoder
        .decode_identified()
        .map_err(|e| e.with_value_kind(ValueKind::Object))?;
    let name = decoder
        .read_str()
        .map_err(|e| e.with_value_kind(ValueKind::String))?;
    let asset_id = read_asset_id(decoder)?;

    if data.is_null() {
        return Ok(Value::Null);
    }
    Ok(Value::Object(vec![
        ("Data".to_owned(), data),
        ("Name".to_owned(), Value::from(name)),
        ("AssetId".to_owned(), asset_id),
    ]))
}

fn read_asset_id(decoder: &mut ValueDecoder<'_, '_>) -> Result<Value, DecodeError> {
    let format = decoder.context().dialect.asset_id;
    match format {
        AssetIdFormat::String => decoder
            .read_str()
            .map(Value::from)
            .map_err(|e| e.with_value_kind(ValueKind::String)),
        AssetIdFormat::Guid => {
            let id = decoder
                .read_guid()
                .map_err(|e| e.with_value_kind(ValueKind::BlueprintGuid))?;
            Ok(if id.is_zero() {
                Value::Null
            } else {
                Value::Str(id.to_string())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodeContext;
    use crate::guid::Guid;
    use crate::provider::AssetTable;
    use crate::schema::{FieldSchema, SchemaRegistry, ValueSchema};
    use crate::Dialect;
    use blueprint_pack_buffers::Writer;
    use serde_json::json;

    fn type_id() -> Guid {
        "11111111111111111111111111111111".parse().unwrap()
    }

    fn registry(dialect: Dialect) -> SchemaRegistry {
        let mut reg = SchemaRegistry::new(dialect);
        let t = reg.declare("Thing", "Game.Thing", type_id());
        reg.define(t, vec![FieldSchema::new("Level", ValueSchema::Int32)]);
        reg
    }

    fn string(w: &mut Writer, s: &str) {
        w.i32(s.len() as i32);
        w.utf8(s);
    }

    #[test]
    fn string_asset_id_record() {
        let reg = registry(Dialect::ROGUE_TRADER);
        let assets = AssetTable::default();
        let mut w = Writer::new();
        w.buf(&type_id().to_wire_bytes());
        w.i32(7);
        string(&mut w, "Sword");
        string(&mut w, "abc");
        let bytes = w.flush();
        let mut dec = ValueDecoder::new(&bytes, DecodeContext::new(&reg, &assets));
        let value = decode_record(&mut dec).unwrap();
        assert_eq!(
            value.to_json(),
            json!({
                "Data": {"$type": "11111111111111111111111111111111, Thing", "Level": 7},
                "Name": "Sword",
                "AssetId": "abc"
            })
        );
        assert_eq!(dec.position(), bytes.len());
    }

    #[test]
    fn null_root_still_consumes_trailer() {
        let reg = registry(Dialect::WRATH);
        let assets = AssetTable::default();
        let mut w = Writer::new();
        w.buf(&[0u8; 16]);
        string(&mut w, "Gone");
        w.buf(&type_id().to_wire_bytes());
        let bytes = w.flush();
        let mut dec = ValueDecoder::new(&bytes, DecodeContext::new(&reg, &assets));
        assert!(decode_record(&mut dec).unwrap().is_null());
        assert_eq!(dec.position(), 16 + 8 + 16);
    }

    #[test]
    fn guid_asset_id_zero_is_null() {
        let reg = registry(Dialect::WRATH);
        let assets = AssetTable::default();
        let mut w = Writer::new();
        w.buf(&type_id().to_wire_bytes());
        string(&mut w, "Level");
        w.i32(3);
        w.i32(-1);
        w.buf(&[0u8; 16]);
        let bytes = w.flush();
        let mut dec = ValueDecoder::new(&bytes, DecodeContext::new(&reg, &assets));
        let value = decode_record(&mut dec).unwrap();
        assert!(value.get("Name").unwrap().is_null());
        assert!(value.get("AssetId").unwrap().is_null());
    }
}
