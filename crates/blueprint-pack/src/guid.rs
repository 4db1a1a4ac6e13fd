//! 128-bit identifiers as stored in blueprint packs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A 128-bit identifier (record id, type id, asset id).
///
/// On the wire the 16 bytes use the .NET `Guid` layout: the first three
/// groups are little-endian. The text form is the 32 lower-case hex digits
/// without dashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Guid(Uuid);

impl Guid {
    /// The reserved "no type" / "no value" identifier.
    pub const ZERO: Guid = Guid(Uuid::nil());

    /// Builds an identifier from its 16 wire bytes.
    pub fn from_wire_bytes(bytes: [u8; 16]) -> Self {
        Guid(Uuid::from_bytes_le(bytes))
    }

    /// Returns the 16 wire bytes of this identifier.
    pub fn to_wire_bytes(&self) -> [u8; 16] {
        self.0.to_bytes_le()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Guid {
    fn from(value: Uuid) -> Self {
        Guid(value)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.simple(), f)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.0.simple())
    }
}

impl FromStr for Guid {
    type Err = uuid::Error;

    /// Accepts the dashed and the plain 32-digit forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Guid)
    }
}

impl From<Guid> for String {
    fn from(value: Guid) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Guid {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_use_dotnet_layout() {
        let bytes = [
            0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let guid = Guid::from_wire_bytes(bytes);
        assert_eq!(guid.to_string(), "00112233445566778899aabbccddeeff");
        assert_eq!(guid.to_wire_bytes(), bytes);
    }

    #[test]
    fn parses_dashed_and_plain_forms() {
        let plain: Guid = "00112233445566778899aabbccddeeff".parse().unwrap();
        let dashed: Guid = "00112233-4455-6677-8899-aabbccddeeff".parse().unwrap();
        assert_eq!(plain, dashed);
        assert!("not-a-guid".parse::<Guid>().is_err());
    }

    #[test]
    fn zero_is_nil() {
        assert!(Guid::ZERO.is_zero());
        assert!(Guid::from_wire_bytes([0; 16]).is_zero());
        assert_eq!(Guid::ZERO.to_string(), "0".repeat(32));
    }

    #[test]
    fn serde_uses_plain_text_form() {
        let guid: Guid = "00112233445566778899aabbccddeeff".parse().unwrap();
        let json = serde_json::to_string(&guid).unwrap();
        assert_eq!(json, "\"00112233445566778899aabbccddeeff\"");
        let back: Guid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, guid);
    }
}
