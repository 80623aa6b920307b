//! The fixed candidate keyspace: every 3-letter lowercase ASCII string.
//!
//! Candidates are enumerated exactly once per run, in lexicographic order
//! (`aaa`, `aab`, .., `zzz`). The enumeration is the run's unit of work; the
//! harvester never revisits a candidate.

use std::fmt;

/// Total number of candidates (26^3).
pub const KEYSPACE_SIZE: usize = 26 * 26 * 26;

/// One 3-letter lowercase candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate([u8; 3]);

impl Candidate {
    /// Build the candidate at a given keyspace index (base-26 digits,
    /// most significant letter first). Returns `None` out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= KEYSPACE_SIZE {
            return None;
        }
        let bytes = [
            b'a' + (index / 676) as u8,
            b'a' + (index / 26 % 26) as u8,
            b'a' + (index % 26) as u8,
        ];
        Some(Self(bytes))
    }

    /// Parse from a string; must be exactly three lowercase ASCII letters.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() == 3 && bytes.iter().all(|b| b.is_ascii_lowercase()) {
            Some(Self([bytes[0], bytes[1], bytes[2]]))
        } else {
            None
        }
    }

    /// The candidate's three letters, in order.
    pub fn letters(&self) -> [char; 3] {
        [self.0[0] as char, self.0[1] as char, self.0[2] as char]
    }

    pub fn as_str(&self) -> &str {
        // Always valid UTF-8: constructed from ASCII letters only.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iterate the full keyspace in lexicographic order.
pub fn all_candidates() -> impl Iterator<Item = Candidate> {
    (0..KEYSPACE_SIZE).filter_map(Candidate::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyspace_size_and_endpoints() {
        let all: Vec<Candidate> = all_candidates().collect();
        assert_eq!(all.len(), KEYSPACE_SIZE);
        assert_eq!(all.first().unwrap().as_str(), "aaa");
        assert_eq!(all.last().unwrap().as_str(), "zzz");
    }

    #[test]
    fn test_lexicographic_order() {
        let mut prev = None;
        for c in all_candidates().take(1000) {
            if let Some(p) = prev {
                assert!(p < c, "{p} should sort before {c}");
            }
            prev = Some(c);
        }
        assert_eq!(Candidate::from_index(1).unwrap().as_str(), "aab");
        assert_eq!(Candidate::from_index(26).unwrap().as_str(), "aba");
        assert_eq!(Candidate::from_index(676).unwrap().as_str(), "baa");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Candidate::parse("abc").is_some());
        assert!(Candidate::parse("ab").is_none());
        assert!(Candidate::parse("abcd").is_none());
        assert!(Candidate::parse("aB c").is_none());
        assert!(Candidate::parse("ab1").is_none());
    }

    #[test]
    fn test_letters() {
        let c = Candidate::parse("xyz").unwrap();
        assert_eq!(c.letters(), ['x', 'y', 'z']);
    }
}
