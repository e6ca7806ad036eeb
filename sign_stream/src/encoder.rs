//! Pattern encoding — per-frame hand observations to a canonical key.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Fingers per hand, thumb first.
pub const FINGER_COUNT: usize = 5;

/// Shown by renderers when a frame has no key.
pub const KEY_PLACEHOLDER: &str = "-----";

// ════════════════════════════════════════════════════════════════════════════
// Fingers
// ════════════════════════════════════════════════════════════════════════════

/// Extension state of one hand's fingers, ordered thumb → pinky.
/// `true` = extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingers(pub [bool; FINGER_COUNT]);

impl Fingers {
    pub const fn new(state: [bool; FINGER_COUNT]) -> Self { Fingers(state) }

    /// Flip one finger.  Out-of-range indices are ignored.
    pub fn toggle(&mut self, finger: usize) {
        if let Some(f) = self.0.get_mut(finger) {
            *f = !*f;
        }
    }

    pub fn is_extended(&self, finger: usize) -> bool {
        self.0.get(finger).copied().unwrap_or(false)
    }

    pub fn extended_count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }
}

impl fmt::Display for Fingers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &ext in &self.0 {
            f.write_str(if ext { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("finger pattern {0:?} must be exactly five 0/1 digits")]
pub struct FingersParseError(pub String);

impl FromStr for Fingers {
    type Err = FingersParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != FINGER_COUNT {
            return Err(FingersParseError(s.to_string()));
        }
        let mut state = [false; FINGER_COUNT];
        for (slot, &b) in state.iter_mut().zip(bytes) {
            *slot = match b {
                b'0' => false,
                b'1' => true,
                _    => return Err(FingersParseError(s.to_string())),
            };
        }
        Ok(Fingers(state))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand in one frame.  `center` is only used to order two
/// hands left-to-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandObservation {
    pub fingers: Fingers,
    pub center:  (f32, f32),
}

impl HandObservation {
    pub fn new(fingers: Fingers, x: f32, y: f32) -> Self {
        HandObservation { fingers, center: (x, y) }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PatternKey
// ════════════════════════════════════════════════════════════════════════════

/// Canonical lookup key: `"01010"` for one hand, `"<left> <right>"` for two.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatternKey(String);

impl PatternKey {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode one frame's hands.
///
/// * 1 hand  → its pattern.
/// * 2 hands → left pattern, a space, right pattern, where "left" is the
///   smaller center x.  Ties fall back to the patterns themselves so the key
///   never depends on detector enumeration order.
/// * 0 or more than 2 hands → `None`.
pub fn encode(hands: &[HandObservation]) -> Option<PatternKey> {
    match hands {
        [one] => Some(PatternKey(one.fingers.to_string())),
        [a, b] => {
            let (left, right) = match left_to_right(a, b) {
                Ordering::Greater => (b, a),
                _                 => (a, b),
            };
            Some(PatternKey(format!("{} {}", left.fingers, right.fingers)))
        }
        _ => None,
    }
}

fn left_to_right(a: &HandObservation, b: &HandObservation) -> Ordering {
    a.center.0.total_cmp(&b.center.0)
        .then_with(|| a.fingers.cmp(&b.fingers))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
