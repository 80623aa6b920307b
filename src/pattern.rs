//! Heuristic expansion extraction over free-text definitions.
//!
//! The pattern assumes an expansion literally begins with the candidate's
//! three letters in order, one word per letter, separated by a space, period
//! or hyphen. It is fuzzy by construction: definitions with irregular
//! formatting can and do produce noise, which downstream classification
//! partially absorbs via the length split.

use crate::keyspace::Candidate;
use regex::Regex;

/// Expansions of 5 characters or fewer are too short to be a confident
/// multi-word expansion and are filed as secondary evidence.
pub const SHORT_EXPANSION_MAX: usize = 5;

/// How an extracted expansion should be bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionClass {
    /// 6+ characters — treated as a real expansion.
    Exact,
    /// ≤ 5 characters — kept, but likely just the acronym token itself.
    Short,
}

/// Per-candidate extraction pattern.
pub struct ExpansionPattern {
    regex: Regex,
    candidate: Candidate,
}

impl ExpansionPattern {
    /// Compile the pattern for one candidate: three segments, each anchored
    /// on one of the candidate's letters followed by word characters,
    /// apostrophes or hyphens, with an optional single separator between
    /// segments.
    pub fn compile(candidate: Candidate) -> Self {
        let [a, b, c] = candidate.letters();
        let source = format!("[{a}][\\w'-]*[ .-]?[{b}][\\w'-]*[ .-]?[{c}][\\w'-]*");
        // The alphabet is fixed, so the pattern always compiles; the
        // fallback never fires for valid candidates.
        let regex = Regex::new(&source)
            .unwrap_or_else(|_| Regex::new("$^").expect("empty-match regex compiles"));
        Self { regex, candidate }
    }

    /// Normalize a raw definition for matching and storage: lowercase,
    /// line breaks collapsed to spaces.
    pub fn normalize(definition: &str) -> String {
        definition.to_lowercase().replace("\r\n", " ")
    }

    /// Try to extract an expansion from a normalized definition.
    ///
    /// Takes the first match; if that match is the candidate itself (the
    /// definition text led with the acronym token, e.g. "abs is short for
    /// anti-lock breaking system"), takes the second match instead. The
    /// result is title-cased. `None` means extraction failed for this
    /// definition text.
    pub fn extract(&self, normalized: &str) -> Option<String> {
        let mut matches = self.regex.find_iter(normalized);
        let first = matches.next()?;
        let hit = if first.as_str() == self.candidate.as_str() {
            matches.next()?
        } else {
            first
        };
        Some(title_case(hit.as_str()))
    }
}

/// Classify a title-cased expansion by length.
pub fn classify(expansion: &str) -> ExpansionClass {
    if expansion.chars().count() <= SHORT_EXPANSION_MAX {
        ExpansionClass::Short
    } else {
        ExpansionClass::Exact
    }
}

/// Title-case a string: every alphabetic character that follows a
/// non-alphabetic character (or the start of the string) is uppercased,
/// all other alphabetic characters are lowercased. Hyphens and apostrophes
/// both restart a word, so "anti-lock" becomes "Anti-Lock".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
