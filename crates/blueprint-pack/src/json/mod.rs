//! JSON output with exact number formatting.
//!
//! Integers are written as plain decimals. Floats are written with the
//! fewest digits that read back to the same 32- or 64-bit value, never in
//! exponent form. Non-finite floats become the strings `"NaN"`,
//! `"Infinity"` and `"-Infinity"`.

mod encoder;

pub use encoder::JsonEncoder;

/// Shortest round-trip text of an `f32`, or its non-finite name.
pub fn format_f32(value: f32) -> String {
    if let Some(name) = non_finite_name(value.is_nan(), value.is_infinite(), value < 0.0) {
        return name.to_owned();
    }
    value.to_string()
}

/// Shortest round-trip text of an `f64`, or its non-finite name.
pub fn format_f64(value: f64) -> String {
    if let Some(name) = non_finite_name(value.is_nan(), value.is_infinite(), value < 0.0) {
        return name.to_owned();
    }
    value.to_string()
}

fn non_finite_name(nan: bool, infinite: bool, negative: bool) -> Option<&'static str> {
    match (nan, infinite, negative) {
        (true, _, _) => Some("NaN"),
        (_, true, false) => Some("Infinity"),
        (_, true, true) => Some("-Infinity"),
        _ => None,
    }
}
