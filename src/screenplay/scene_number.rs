/*!
 * Structured scene numbers.
 *
 * A scene number is a positive base plus a sequence of revision levels.
 * Revision values are written as bijective base-26 letters (1 = A,
 * 26 = Z, 27 = AA). Ordering compares the base, then the revision levels
 * lexicographically with a shorter sequence sorting first, so
 * `10 < 10A < 10A-A < 10B < 11`.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app_config::{NumberingConfig, RevisionPlacement};

/// Scene number with optional revision levels
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneNumber {
    pub base: u32,
    pub revision: Vec<u32>,
}

impl SceneNumber {
    /// Plain number without revisions
    pub fn new(base: u32) -> Self {
        Self {
            base,
            revision: Vec::new(),
        }
    }

    pub fn with_revision(base: u32, revision: Vec<u32>) -> Self {
        Self { base, revision }
    }

    /// Following plain number: `10A` -> `11`
    pub fn next_base(&self) -> Self {
        Self::new(self.base.saturating_add(1))
    }

    /// Following revision at the deepest level: `10` -> `10A`, `10A` -> `10B`
    pub fn next_revision(&self) -> Self {
        let mut revision = self.revision.clone();
        match revision.last_mut() {
            Some(last) => *last = last.saturating_add(1),
            None => revision.push(1),
        }
        Self {
            base: self.base,
            revision,
        }
    }

    pub fn is_revision(&self) -> bool {
        !self.revision.is_empty()
    }

    /// Text form in the configured style
    pub fn format(&self, config: &NumberingConfig) -> String {
        let letters = self
            .revision
            .iter()
            .map(|value| revision_letters(*value))
            .collect::<Vec<_>>()
            .join(&config.revision_separator);

        if letters.is_empty() {
            return self.base.to_string();
        }
        match config.placement {
            RevisionPlacement::Suffix => format!("{}{}", self.base, letters),
            // A prefixed revision is written before the number it precedes
            RevisionPlacement::Prefix => format!("{}{}", letters, self.base.saturating_add(1)),
        }
    }

    /// Read a number written in the configured style
    pub fn parse(text: &str, config: &NumberingConfig) -> Option<Self> {
        let text = text.trim();
        let number = match config.placement {
            RevisionPlacement::Suffix => {
                let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                let base: u32 = text[..digits].parse().ok()?;
                let revision = parse_levels(&text[digits..], &config.revision_separator)?;
                Self { base, revision }
            }
            RevisionPlacement::Prefix => {
                let letters = text.trim_end_matches(|c: char| c.is_ascii_digit()).len();
                let following: u32 = text[letters..].parse().ok()?;
                let revision = parse_levels(&text[..letters], &config.revision_separator)?;
                let base = if revision.is_empty() {
                    following
                } else {
                    following.checked_sub(1)?
                };
                Self { base, revision }
            }
        };

        (number.base > 0).then_some(number)
    }
}

impl fmt::Display for SceneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(&NumberingConfig::default()))
    }
}

fn parse_levels(text: &str, separator: &str) -> Option<Vec<u32>> {
    if text.is_empty() {
        return Some(Vec::new());
    }
    let parts: Vec<&str> = if separator.is_empty() {
        vec![text]
    } else {
        text.split(separator).collect()
    };
    parts.into_iter().map(revision_value).collect()
}

/// Letters for a revision value: 1 -> A, 26 -> Z, 27 -> AA
pub fn revision_letters(value: u32) -> String {
    let mut letters = Vec::new();
    let mut remaining = value;
    while remaining > 0 {
        remaining -= 1;
        letters.push(char::from(b'A' + (remaining % 26) as u8));
        remaining /= 26;
    }
    letters.iter().rev().collect()
}

/// Value of revision letters, case-insensitive. `None` for empty text or
/// anything but ASCII letters.
pub fn revision_value(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |value, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        value.checked_mul(26)?.checked_add(digit)
    })
}
