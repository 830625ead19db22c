use std::ops::Range;

use derive_more::{Deref, IntoIterator};

/// The span of one capture group within the subject, in byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capture {
    /// The start offset.
    pub from: usize,
    /// The end offset, exclusive.
    pub to: usize,
}

impl Capture {
    /// The length of the capture in bytes.
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Returns true if the capture is zero-length.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// The byte range of the capture.
    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// The outcome of one successful match: a span for every capture group.
///
/// Group `0` always participates and spans the whole match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatchResult {
    groups: Vec<Option<Capture>>,
}

impl MatchResult {
    /// Pair up `(start, end)` slots; a group participates only if both are set.
    pub(crate) fn from_slots(slots: &[Option<usize>]) -> Self {
        MatchResult {
            groups: slots
                .chunks(2)
                .map(|pair| match *pair {
                    [Some(from), Some(to)] => Some(Capture { from, to }),
                    _ => None,
                })
                .collect(),
        }
    }

    /// The span of group `index`, `None` if the group did not participate.
    pub fn get(&self, index: usize) -> Option<Capture> {
        self.groups.get(index).copied().flatten()
    }

    /// The number of groups, including group `0`.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// The start offset of the whole match.
    pub fn start(&self) -> usize {
        self.get(0).map_or(0, |m| m.from)
    }

    /// The end offset of the whole match.
    pub fn end(&self) -> usize {
        self.get(0).map_or(0, |m| m.to)
    }

    /// The byte range of the whole match.
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Returns true if the whole match is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// The `(start, length)` record of group `index`, `(-1, -1)` if it did not participate.
    pub fn span(&self, index: usize) -> (isize, isize) {
        match self.get(index) {
            Some(m) => (m.from as isize, m.len() as isize),
            None => (-1, -1),
        }
    }

    /// Iterate the spans of all groups in index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<Capture>> + '_ {
        self.groups.iter().copied()
    }
}

/// Why a scan stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
    /// No further match exists in the subject.
    Exhausted,
    /// The caller's match limit was reached.
    Capacity,
    /// The match callback asked to stop.
    Terminated,
}

/// All non-overlapping matches found by one global search, in order.
#[derive(Clone, Debug, PartialEq, Eq, Deref, IntoIterator)]
pub struct MatchSet {
    #[deref]
    #[into_iterator(owned, ref)]
    matches: Vec<MatchResult>,
    stop: Stop,
}

impl MatchSet {
    pub(crate) fn new(matches: Vec<MatchResult>, stop: Stop) -> Self {
        MatchSet { matches, stop }
    }

    /// Why the search stopped.
    pub fn stop(&self) -> Stop {
        self.stop
    }

    /// Returns the matches as a vector.
    pub fn into_vec(self) -> Vec<MatchResult> {
        self.matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result() {
        let m = MatchResult::from_slots(&[Some(2), Some(7), None, None, Some(4), Some(4)]);

        assert_eq!(m.num_groups(), 3);
        assert_eq!(m.range(), 2..7);
        assert!(!m.is_empty());
        assert_eq!(m.span(0), (2, 5));
        assert_eq!(m.span(1), (-1, -1));
        assert_eq!(m.span(2), (4, 0));
        assert_eq!(m.get(2), Some(Capture { from: 4, to: 4 }));
        assert_eq!(m.get(3), None);
        assert_eq!(m.iter().filter(Option::is_some).count(), 2);
    }

    #[test]
    fn test_half_set_group() {
        let m = MatchResult::from_slots(&[Some(0), Some(1), Some(0), None]);

        assert_eq!(m.get(1), None);
    }
}
