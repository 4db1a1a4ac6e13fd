use std::io::{self, Write};

use crate::value::Value;

use super::{format_f32, format_f64};

/// Streaming JSON writer.
///
/// Whole values go through [`write_value`](Self::write_value); an outer
/// object can be opened, filled key by key and closed without ever holding
/// all of its entries in memory.
pub struct JsonEncoder<W: Write> {
    out: W,
    pretty: bool,
    // One flag per open object: whether it already has an entry.
    open: Vec<bool>,
}

impl<W: Write> JsonEncoder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pretty: false,
            open: Vec::new(),
        }
    }

    /// Two-space indented output.
    pub fn pretty(out: W) -> Self {
        Self {
            out,
            pretty: true,
            open: Vec::new(),
        }
    }

    pub fn begin_object(&mut self) -> io::Result<()> {
        self.out.write_all(b"{")?;
        self.open.push(false);
        Ok(())
    }

    /// Starts an entry of the innermost open object. Must be followed by
    /// exactly one value.
    pub fn key(&mut self, key: &str) -> io::Result<()> {
        let depth = self.open.len();
        if let Some(has_entries) = self.open.last_mut() {
            if *has_entries {
                self.out.write_all(b",")?;
            }
            *has_entries = true;
        }
        self.newline(depth)?;
        self.string(key)?;
        self.colon()
    }

    pub fn end_object(&mut self) -> io::Result<()> {
        if let Some(had_entries) = self.open.pop() {
            if had_entries {
                self.newline(self.open.len())?;
            }
        }
        self.out.write_all(b"}")
    }

    pub fn write_value(&mut self, value: &Value) -> io::Result<()> {
        let depth = self.open.len();
        self.value(value, depth)
    }

    /// Flushes and returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.pretty {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn value(&mut self, value: &Value, depth: usize) -> io::Result<()> {
        match value {
            Value::Null => self.out.write_all(b"null"),
            Value::Bool(true) => self.out.write_all(b"true"),
            Value::Bool(false) => self.out.write_all(b"false"),
            Value::Int(i) => write!(self.out, "{i}"),
            Value::UInt(u) => write!(self.out, "{u}"),
            Value::F32(f) => self.float(f.is_finite(), format_f32(*f)),
            Value::F64(f) => self.float(f.is_finite(), format_f64(*f)),
            Value::Str(s) => self.string(s),
            Value::Array(items) => {
                if items.is_empty() {
                    return self.out.write_all(b"[]");
                }
                self.out.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.write_all(b",")?;
                    }
                    self.newline(depth + 1)?;
                    self.value(item, depth + 1)?;
                }
                self.newline(depth)?;
                self.out.write_all(b"]")
            }
            Value::Object(entries) => {
                if entries.is_empty() {
                    return self.out.write_all(b"{}");
                }
                self.out.write_all(b"{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.write_all(b",")?;
                    }
                    self.newline(depth + 1)?;
                    self.string(k)?;
                    self.colon()?;
                    self.value(v, depth + 1)?;
                }
                self.newline(depth)?;
                self.out.write_all(b"}")
            }
        }
    }

    fn float(&mut self, finite: bool, text: String) -> io::Result<()> {
        if finite {
            self.out.write_all(text.as_bytes())
        } else {
            self.string(&text)
        }
    }

    fn string(&mut self, s: &str) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, s).map_err(io::Error::from)
    }

    fn colon(&mut self) -> io::Result<()> {
        let sep: &[u8] = if self.pretty { b": " } else { b":" };
        self.out.write_all(sep)
    }

    fn newline(&mut self, depth: usize) -> io::Result<()> {
        if !self.pretty {
            return Ok(());
        }
        self.out.write_all(b"\n")?;
        for _ in 0..depth {
            self.out.write_all(b"  ")?;
        }
        Ok(())
    }
}
