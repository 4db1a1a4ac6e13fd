//! Fixed-layout engine structs.

use crate::error::DecodeError;
use crate::value::Value;

use super::ValueDecoder;

const AXES: [&str; 4] = ["x", "y", "z", "w"];

fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}

impl<'a, 's> ValueDecoder<'a, 's> {
    pub(super) fn decode_color(&mut self) -> Result<Value, DecodeError> {
        let r = self.reader.f32()?;
        let g = self.reader.f32()?;
        let b = self.reader.f32()?;
        let a = self.reader.f32()?;
        Ok(object([("r", r.into()), ("g", g.into()), ("b", b.into()), ("a", a.into())]))
    }

    /// One packed int32, byte 0 is red.
    pub(super) fn decode_color32(&mut self) -> Result<Value, DecodeError> {
        let packed = self.reader.i32()?;
        let channel = |shift: u32| Value::Int(((packed >> shift) & 0xff) as i64);
        Ok(object([
            ("r", channel(0)),
            ("g", channel(8)),
            ("b", channel(16)),
            ("a", channel(24)),
            ("packed", packed.into()),
        ]))
    }

    pub(super) fn decode_vector<const N: usize>(&mut self) -> Result<Value, DecodeError> {
        let mut entries = Vec::with_capacity(N);
        for axis in &AXES[..N] {
            entries.push(((*axis).to_owned(), Value::F32(self.reader.f32()?)));
        }
        Ok(Value::Object(entries))
    }

    pub(super) fn decode_vector2_int(&mut self) -> Result<Value, DecodeError> {
        let x = self.reader.i32()?;
        let y = self.reader.i32()?;
        Ok(object([("x", x.into()), ("y", y.into())]))
    }

    pub(super) fn decode_bounds(&mut self) -> Result<Value, DecodeError> {
        let center = self.decode_vector::<3>()?;
        let size = self.decode_vector::<3>()?;
        Ok(object([("center", center), ("size", size)]))
    }

    pub(super) fn decode_animation_curve(&mut self) -> Result<Value, DecodeError> {
        let count = self.read_count()?;
        // 25 bytes per key.
        let mut keys = Vec::with_capacity(count.min(self.reader.size() / 25));
        for _ in 0..count {
            let time = self.reader.f32()?;
            let value = self.reader.f32()?;
            let weighted_mode = self.reader.u8()?;
            let in_tangent = self.reader.f32()?;
            let in_weight = self.reader.f32()?;
            let out_tangent = self.reader.f32()?;
            let out_weight = self.reader.f32()?;
            keys.push(object([
                ("time", time.into()),
                ("value", value.into()),
                ("weightedMode", Value::Int(weighted_mode as i64)),
                ("inTangent", in_tangent.into()),
                ("inWeight", in_weight.into()),
                ("outTangent", out_tangent.into()),
                ("outWeight", out_weight.into()),
            ]));
        }
        Ok(object([("keys", Value::Array(keys))]))
    }

    pub(super) fn decode_gradient(&mut self) -> Result<Value, DecodeError> {
        let count = self.read_count()?;
        let mut color_keys = Vec::with_capacity(count.min(self.reader.size() / 16));
        for _ in 0..count {
            let time = self.reader.f32()?;
            let r = self.reader.f32()?;
            let g = self.reader.f32()?;
            let b = self.reader.f32()?;
            color_keys.push(object([
                ("time", time.into()),
                ("r", r.into()),
                ("g", g.into()),
                ("b", b.into()),
            ]));
        }
        let count = self.read_count()?;
        let mut alpha_keys = Vec::with_capacity(count.min(self.reader.size() / 8));
        for _ in 0..count {
            let time = self.reader.f32()?;
            let alpha = self.reader.f32()?;
            alpha_keys.push(object([("time", time.into()), ("alpha", alpha.into())]));
        }
        let mode = self.reader.u8()?;
        Ok(object([
            ("colorKeys", Value::Array(color_keys)),
            ("alphaKeys", Value::Array(alpha_keys)),
            ("mode", Value::Int(mode as i64)),
        ]))
    }

    pub(super) fn decode_color_block(&mut self) -> Result<Value, DecodeError> {
        let normal = self.decode_color()?;
        let pressed = self.decode_color()?;
        let highlighted = self.decode_color()?;
        let disabled = self.decode_color()?;
        let color_multiplier = self.reader.f32()?;
        let fade_duration = self.reader.f32()?;
        Ok(object([
            ("normalColor", normal),
            ("pressedColor", pressed),
            ("highlightedColor", highlighted),
            ("disabledColor", disabled),
            ("colorMultiplier", color_multiplier.into()),
            ("fadeDuration", fade_duration.into()),
        ]))
    }
}
