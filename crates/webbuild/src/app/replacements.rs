//! Ordered literal substitutions shared by every file in a build.

use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::Replacement;

/// Which matches of a replacement's `from` string are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occurrences {
    /// Leftmost match only.
    #[default]
    First,
    All,
}

/// Replacements applied in registration order, each over the result of the
/// previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementSet {
    entries: Vec<Replacement>,
}

impl ReplacementSet {
    /// Common entries followed by the active mode's entries.
    pub fn build(common: &[Replacement], mode_specific: &[Replacement]) -> BuildResult<Self> {
        let entries: Vec<Replacement> = common.iter().chain(mode_specific).cloned().collect();
        Self::new(entries)
    }

    pub fn new(entries: Vec<Replacement>) -> BuildResult<Self> {
        if let Some(position) = entries.iter().position(|entry| entry.from.is_empty()) {
            return Err(BuildError::Config(format!(
                "replacement #{} has an empty 'from' string",
                position + 1
            )));
        }
        Ok(Self { entries })
    }

    /// Apply every replacement as a literal substitution, in order.
    pub fn apply(&self, text: &str, occurrences: Occurrences) -> String {
        apply_all(text, &self.entries, occurrences)
    }

    /// Apply this set and then `extra`.
    pub fn apply_with(
        &self,
        text: &str,
        extra: &[Replacement],
        occurrences: Occurrences,
    ) -> String {
        apply_all(&self.apply(text, occurrences), extra, occurrences)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn apply_all(text: &str, entries: &[Replacement], occurrences: Occurrences) -> String {
    entries
        .iter()
        .filter(|entry| !entry.from.is_empty())
        .fold(text.to_owned(), |acc, entry| {
            if !acc.contains(&entry.from) {
                return acc;
            }
            match occurrences {
                Occurrences::First => acc.replacen(&entry.from, &entry.to, 1),
                Occurrences::All => acc.replace(&entry.from, &entry.to),
            }
        })
}
