//! Wire-format parameters shared by one family of archives.
//!
//! All dialects run the same decoder; a dialect only switches the trailing
//! asset-id shape, the embedded field-name check, and which dialect-exclusive
//! value kinds may appear.

use crate::schema::ValueKind;

/// How a record's trailing asset id is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetIdFormat {
    /// Length-prefixed string.
    String,
    /// Raw 16-byte identifier.
    Guid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub name: &'static str,
    pub asset_id: AssetIdFormat,
    /// Each object field is preceded by its name as a length-prefixed string.
    pub field_names_embedded: bool,
    /// Dialect-exclusive kinds this dialect accepts.
    pub extra_kinds: &'static [ValueKind],
    /// Display name for an enum value with no matching constant.
    pub enum_fallback: &'static str,
}

impl Dialect {
    pub const ROGUE_TRADER: Dialect = Dialect {
        name: "rogue-trader",
        asset_id: AssetIdFormat::String,
        field_names_embedded: false,
        extra_kinds: &[],
        enum_fallback: "Unset",
    };

    pub const DARK_HERESY: Dialect = Dialect {
        name: "dark-heresy",
        asset_id: AssetIdFormat::String,
        field_names_embedded: false,
        extra_kinds: &[],
        enum_fallback: "Unset",
    };

    pub const WRATH: Dialect = Dialect {
        name: "wrath",
        asset_id: AssetIdFormat::Guid,
        field_names_embedded: true,
        extra_kinds: &[
            ValueKind::BlueprintGuid,
            ValueKind::Bounds,
            ValueKind::BlueprintRefWrath,
        ],
        enum_fallback: "Unset",
    };

    pub const ALL: [&'static Dialect; 3] =
        [&Dialect::ROGUE_TRADER, &Dialect::DARK_HERESY, &Dialect::WRATH];

    pub fn by_name(name: &str) -> Option<&'static Dialect> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn uses_string_asset_id(&self) -> bool {
        self.asset_id == AssetIdFormat::String
    }

    pub fn supports(&self, kind: ValueKind) -> bool {
        !kind.is_dialect_exclusive() || self.extra_kinds.contains(&kind)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::ROGUE_TRADER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(Dialect::by_name("wrath"), Some(&Dialect::WRATH));
        assert_eq!(Dialect::by_name(" Rogue-Trader "), Some(&Dialect::ROGUE_TRADER));
        assert_eq!(Dialect::by_name("pathfinder"), None);
    }

    #[test]
    fn exclusive_kinds_gate() {
        assert!(Dialect::WRATH.supports(ValueKind::Bounds));
        assert!(!Dialect::ROGUE_TRADER.supports(ValueKind::Bounds));
        assert!(!Dialect::DARK_HERESY.supports(ValueKind::BlueprintRefWrath));
        assert!(Dialect::DARK_HERESY.supports(ValueKind::BlueprintRef));
    }

    #[test]
    fn asset_id_shapes() {
        assert!(Dialect::ROGUE_TRADER.uses_string_asset_id());
        assert!(!Dialect::WRATH.uses_string_asset_id());
        assert!(Dialect::WRATH.field_names_embedded);
    }
}
