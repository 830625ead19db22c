use std::cmp;

use crate::common::Engine;

/// A set of Unicode scalar values stored as sorted, non-adjacent inclusive ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CharClass {
    ranges: Vec<(char, char)>,
}

impl CharClass {
    pub fn new() -> Self {
        CharClass::default()
    }

    /// Build a canonical class from arbitrary ranges.
    pub fn from_ranges<I: IntoIterator<Item = (char, char)>>(ranges: I) -> Self {
        let mut class = CharClass {
            ranges: ranges.into_iter().collect(),
        };
        class.canonicalize();
        class
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    /// Returns the only member of the class, if there is exactly one.
    pub fn single_char(&self) -> Option<char> {
        match self.ranges.as_slice() {
            [(lo, hi)] if lo == hi => Some(*lo),
            _ => None,
        }
    }

    /// Add a range; the class must be canonicalized before it is searched.
    pub fn push(&mut self, lo: char, hi: char) {
        self.ranges.push((lo, hi));
    }

    pub fn push_char(&mut self, c: char) {
        self.push(c, c);
    }

    pub fn union(&mut self, other: &CharClass) {
        self.ranges.extend_from_slice(&other.ranges);
    }

    pub fn canonicalize(&mut self) {
        self.ranges.sort_unstable();

        let mut merged: Vec<(char, char)> = Vec::with_capacity(self.ranges.len());

        for &(lo, hi) in &self.ranges {
            match merged.last_mut() {
                Some(last) if increment(last.1).map_or(true, |next| lo <= next) => {
                    last.1 = cmp::max(last.1, hi);
                }
                _ => merged.push((lo, hi)),
            }
        }

        self.ranges = merged;
    }

    /// Replace the class with its complement over all Unicode scalar values.
    pub fn negate(&mut self) {
        let mut negated = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = Some('\0');

        for &(lo, hi) in &self.ranges {
            if let (Some(n), Some(prev)) = (next, decrement(lo)) {
                if n <= prev {
                    negated.push((n, prev));
                }
            }
            next = increment(hi);
        }

        if let Some(n) = next {
            negated.push((n, char::MAX));
        }

        self.ranges = negated;
    }

    /// Extend the class with the simple case variants of every member.
    pub fn case_fold(&mut self, engine: &Engine) {
        let mut variants = vec![];

        for &(lo, hi) in &self.ranges {
            let hi = cmp::min(hi, engine.fold_max());

            if lo > hi {
                continue;
            }

            for c in lo..=hi {
                if let Some(orbit) = engine.case_orbit(c) {
                    variants.extend(orbit.iter().map(|&v| (v, v)));
                }
            }
        }

        self.ranges.extend(variants);
        self.canonicalize();
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < c {
                    cmp::Ordering::Less
                } else if lo > c {
                    cmp::Ordering::Greater
                } else {
                    cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

pub(crate) fn increment(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(c as u32 + 1),
    }
}

pub(crate) fn decrement(c: char) -> Option<char> {
    match c {
        '\u{E000}' => Some('\u{D7FF}'),
        '\0' => None,
        _ => char::from_u32(c as u32 - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        let class = CharClass::from_ranges(vec![('x', 'z'), ('a', 'c'), ('d', 'f'), ('b', 'b')]);

        assert_eq!(class.ranges(), &[('a', 'f'), ('x', 'z')]);
        assert!(class.contains('e'));
        assert!(!class.contains('g'));
        assert!(class.contains('z'));
    }

    #[test]
    fn test_negate() {
        let mut class = CharClass::from_ranges(vec![('\0', 'a'), ('c', 'c')]);

        class.negate();

        assert_eq!(class.ranges(), &[('b', 'b'), ('d', char::MAX)]);
        assert!(!class.contains('a'));
        assert!(class.contains('\u{10FFFF}'));

        class.negate();

        assert_eq!(class.ranges(), &[('\0', 'a'), ('c', 'c')]);

        let mut class = CharClass::new();
        class.negate();
        assert_eq!(class.ranges(), &[('\0', char::MAX)]);
    }

    #[test]
    fn test_surrogate_gap() {
        assert_eq!(increment('\u{D7FF}'), Some('\u{E000}'));
        assert_eq!(decrement('\u{E000}'), Some('\u{D7FF}'));
        assert_eq!(increment(char::MAX), None);

        let class = CharClass::from_ranges(vec![('\u{E000}', '\u{E000}'), ('a', '\u{D7FF}')]);

        assert_eq!(class.ranges(), &[('a', '\u{E000}')]);
    }

    #[test]
    fn test_case_fold() {
        let mut class = CharClass::from_ranges(vec![('a', 'c'), ('k', 'k')]);

        class.case_fold(crate::common::engine());

        assert!(class.contains('B'));
        assert!(class.contains('K'));
        assert!(class.contains('\u{212A}')); // KELVIN SIGN
        assert!(!class.contains('D'));
    }
}
