//! Opaque response labels

use serde::{Deserialize, Serialize};

const PREFIX: &str = "Response ";

/// Opaque label standing in for a participant during peer review
///
/// Labels are positional ("Response A", "Response B", …, "Response Z",
/// "Response AA", …) and carry no information about the participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Label for the `index`-th slot (0 -> "Response A")
    pub fn from_index(index: usize) -> Self {
        Self(format!("{}{}", PREFIX, letters(index)))
    }

    /// Build a label from its letter suffix (`"c"` -> "Response C").
    /// Returns `None` unless the suffix is one to three ASCII letters.
    pub fn from_letters(suffix: &str) -> Option<Self> {
        if suffix.is_empty() || suffix.len() > 3 || !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self(format!("{}{}", PREFIX, suffix.to_ascii_uppercase())))
    }

    /// Letter suffix ("Response C" -> "C")
    pub fn letters(&self) -> &str {
        self.0.strip_prefix(PREFIX).unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bijective base-26 letters: 0 -> A, 25 -> Z, 26 -> AA
fn letters(mut index: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
