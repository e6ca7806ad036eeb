//! The pattern table — finger-pattern keys to symbols.
//!
//! A table is built once (either the [standard vocabulary](PatternTable::standard)
//! or a validated custom set) and never mutated afterwards.

use std::collections::HashMap;

use thiserror::Error;

use crate::encoder::{PatternKey, FINGER_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// Standard vocabulary
// ════════════════════════════════════════════════════════════════════════════

/// Built-in vocabulary.  Single-hand keys spell letters (there is no `Q`);
/// two-hand keys are whole words, left hand first.
const STANDARD: &[(&str, &str)] = &[
    ("00000", "A"), ("00001", "B"), ("00010", "C"), ("00011", "D"),
    ("00100", "E"), ("00101", "F"), ("00110", "G"), ("00111", "H"),
    ("01000", "I"), ("01001", "J"), ("01010", "K"), ("01011", "L"),
    ("01100", "M"), ("01101", "N"), ("01110", "O"), ("01111", "P"),
    ("10001", "R"), ("10010", "S"), ("10011", "T"), ("10100", "U"),
    ("10101", "V"), ("10110", "W"), ("10111", "X"), ("11000", "Y"),
    ("11001", "Z"),

    ("00000 11111", "HELLO"),
    ("11111 00000", "BYE"),
    ("01000 11000", "OK"),
    ("00000 00000", "Hi"),
    ("11111 11111", "How are you"),
    ("10000 10000", "HAVI AT YOUR SERVICE"),
    ("00001 00001", "LOVE"),
    ("01100 01100", "PEACE"),
    ("01000 01000", "HELP"),
    ("11000 11000", "STOP"),
    ("00100 00100", "THANK YOU"),
];

// ════════════════════════════════════════════════════════════════════════════
// TableError
// ════════════════════════════════════════════════════════════════════════════

/// Reasons a custom table is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid pattern key {0:?}: expected one or two groups of five 0/1 digits")]
    InvalidKey(String),

    #[error("pattern {0:?} maps to an empty symbol")]
    EmptySymbol(String),

    #[error("pattern {0:?} is listed more than once")]
    DuplicateKey(String),
}

// ════════════════════════════════════════════════════════════════════════════
// PatternTable
// ════════════════════════════════════════════════════════════════════════════

/// Immutable mapping from [`PatternKey`] to symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternTable {
    entries: HashMap<String, String>,
}

impl PatternTable {
    /// The built-in vocabulary.
    pub fn standard() -> Self {
        let entries = STANDARD.iter()
            .map(|&(k, s)| (k.to_string(), s.to_string()))
            .collect();
        PatternTable { entries }
    }

    /// Build a table from `(key, symbol)` pairs, validating every key.
    pub fn from_entries<I, K, S>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (key, symbol) in entries {
            let key = key.as_ref().trim();
            if !is_valid_key(key) {
                return Err(TableError::InvalidKey(key.to_string()));
            }
            let symbol = symbol.as_ref().trim();
            if symbol.is_empty() {
                return Err(TableError::EmptySymbol(key.to_string()));
            }
            if map.insert(key.to_string(), symbol.to_string()).is_some() {
                return Err(TableError::DuplicateKey(key.to_string()));
            }
        }
        Ok(PatternTable { entries: map })
    }

    /// Symbol for `key`, if any.
    pub fn lookup(&self, key: &PatternKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// All entries sorted by key, for listings.
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut v: Vec<_> = self.entries.iter()
            .map(|(k, s)| (k.as_str(), s.as_str()))
            .collect();
        v.sort_unstable();
        v
    }
}

impl Default for PatternTable {
    fn default() -> Self { Self::standard() }
}

/// One group, or two groups joined by a single space, of five `0`/`1` digits.
fn is_valid_key(key: &str) -> bool {
    let groups: Vec<&str> = key.split(' ').collect();
    (1..=2).contains(&groups.len())
        && groups.iter().all(|g| {
            g.len() == FINGER_COUNT && g.bytes().all(|b| b == b'0' || b == b'1')
        })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
