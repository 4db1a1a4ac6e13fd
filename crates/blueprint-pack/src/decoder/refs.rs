//! Reference kinds: engine objects, blueprints and named resources.

use crate::error::{DecodeError, DecodeErrorKind};
use crate::value::Value;

use super::ValueDecoder;

/// Marks a string as a blueprint reference for schema-less consumers.
pub const BLUEPRINT_REF_PREFIX: &str = "!bp_";

/// Field name embedded ahead of a weak resource link's id.
const WEAK_LINK_FIELD: &str = "AssetId";

impl<'a, 's> ValueDecoder<'a, 's> {
    pub(super) fn decode_object_ref(&mut self) -> Result<Value, DecodeError> {
        let start = self.reader.x;
        let index = self.reader.i32()?;
        let Ok(slot) = usize::try_from(index) else {
            return Ok(Value::Null);
        };
        let assets = self.ctx.assets;
        let entry = assets.entry_at(slot).ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::AssetIndexOutOfRange {
                    index,
                    len: assets.len(),
                },
                start,
            )
        })?;
        Ok(Value::Object(vec![
            ("AssetId".to_owned(), Value::Str(entry.asset_id.clone())),
            ("FileId".to_owned(), Value::Int(entry.file_id)),
            ("Index".to_owned(), Value::Int(index as i64)),
        ]))
    }

    pub(super) fn decode_blueprint_ref(&mut self) -> Result<Value, DecodeError> {
        Ok(match self.read_str()? {
            None | Some("") => Value::Null,
            Some(guid) => Value::Str(format!("{BLUEPRINT_REF_PREFIX}{guid}")),
        })
    }

    pub(super) fn decode_blueprint_ref_guid(&mut self) -> Result<Value, DecodeError> {
        let guid = self.read_guid()?;
        if guid.is_zero() {
            return Ok(Value::Null);
        }
        Ok(Value::Str(format!("{BLUEPRINT_REF_PREFIX}{guid}")))
    }

    pub(super) fn decode_weak_link(&mut self) -> Result<Value, DecodeError> {
        if self.ctx.dialect.field_names_embedded {
            self.expect_field_name(WEAK_LINK_FIELD)?;
        }
        Ok(match self.read_str()? {
            Some(id) if !id.trim().is_empty() => Value::Object(vec![(
                WEAK_LINK_FIELD.to_owned(),
                Value::Str(id.to_owned()),
            )]),
            _ => Value::Null,
        })
    }
}
