//! LICW challenge point tables.
//!
//! Primary points: only one entry may apply per QSO, the highest wins,
//! and a QSO matching nothing is worth [`DEFAULT_POINTS`]. Bonus points:
//! every matching entry adds.

/// Base points for a QSO that matches no primary entry.
pub const DEFAULT_POINTS: u32 = 1;

/// Key in the bonus table used for DX contacts.
pub const DX_KEY: &str = "DX";

/// Immutable point tables consulted by the QSO validator.
#[derive(Debug, Clone, Copy)]
pub struct ScoringTables {
    /// Callsigns, operator codes and bonus letters worth more than one point.
    pub primary: &'static [(&'static str, u32)],
    /// Additive bonus letters and identifiers.
    pub bonus: &'static [(&'static str, u32)],
}

/// The tables for the LICW challenge.
pub const LICW_TABLES: ScoringTables = ScoringTables {
    primary: &[
        ("W2LCW", 3),
        ("K2LCW", 5),
        ("K", 4),
        ("I", 2),
        ("M", 2),
        ("A", 2),
        ("F2F", 5),
        ("2XF2F", 10),
    ],
    bonus: &[("S", 3), (DX_KEY, 2), ("FIRST", 10)],
};

impl ScoringTables {
    /// Look up a primary-points entry. Keys are uppercase.
    pub fn primary(&self, key: &str) -> Option<u32> {
        lookup(self.primary, key)
    }

    /// Look up a bonus-points entry. Keys are uppercase.
    pub fn bonus(&self, key: &str) -> Option<u32> {
        lookup(self.bonus, key)
    }

    /// Bonus awarded to DX contacts.
    pub fn dx_bonus(&self) -> u32 {
        self.bonus(DX_KEY).unwrap_or(0)
    }
}

impl Default for ScoringTables {
    fn default() -> Self {
        LICW_TABLES
    }
}

fn lookup(table: &[(&str, u32)], key: &str) -> Option<u32> {
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| *v)
}
