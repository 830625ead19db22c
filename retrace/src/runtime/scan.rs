use std::iter::FusedIterator;

use crate::{
    common::Database,
    runtime::{MatchResult, MatchSet, Scratch, Stop},
    Result,
};

/// Indicating whether or not matching should continue on the target data.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matching {
    /// The matching should continue
    Continue = 0,
    /// The matching should cease
    Terminate = 1,
}

impl Default for Matching {
    fn default() -> Self {
        Matching::Continue
    }
}

/// Where the next search of a global scan starts, `None` once the subject is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cursor(Option<usize>);

impl Default for Cursor {
    fn default() -> Self {
        Cursor(Some(0))
    }
}

impl Cursor {
    /// Find the next match and move past it.
    ///
    /// A failed search ends the scan: the matcher already tried every later start position. After a zero-length
    /// match the cursor moves one character forward, or past the end of the subject if the match ended there.
    pub fn next_match(&mut self, db: &Database, text: &str, scratch: &mut Scratch) -> Result<Option<MatchResult>> {
        let at = match self.0.take() {
            Some(at) if at <= text.len() => at,
            _ => return Ok(None),
        };

        let m = db.try_match(text, at, scratch)?;

        if let Some(ref m) = m {
            let end = m.end();

            self.0 = Some(if m.is_empty() {
                end + text[end..].chars().next().map_or(1, char::len_utf8)
            } else {
                end
            });

            trace!("matched {:?} at {}, next search from {:?}", m.range(), at, self.0);
        }

        Ok(m)
    }
}

/// A lazy iterator over all non-overlapping matches in a subject.
///
/// Each item is produced by one search; an error ends the iteration after it is yielded.
pub struct ScanIter<'d, 't> {
    db: &'d Database,
    text: &'t str,
    scratch: Scratch,
    cursor: Cursor,
}

impl<'d, 't> ScanIter<'d, 't> {
    /// Return the text being searched.
    pub fn text(&self) -> &'t str {
        self.text
    }
}

impl<'d, 't> Iterator for ScanIter<'d, 't> {
    type Item = Result<MatchResult>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor
            .next_match(self.db, self.text, &mut self.scratch)
            .transpose()
    }
}

impl<'d, 't> FusedIterator for ScanIter<'d, 't> {}

impl Database {
    /// Returns a lazy iterator over all non-overlapping matches in `text`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::prelude::*;
    /// let db: Database = r"\w+".parse().unwrap();
    /// let words = db
    ///     .scan_iter("hello world test")
    ///     .map(|m| m.map(|m| m.range()))
    ///     .collect::<Result<Vec<_>, _>>()
    ///     .unwrap();
    ///
    /// assert_eq!(words, vec![0..5, 6..11, 12..16]);
    /// ```
    pub fn scan_iter<'d, 't>(&'d self, text: &'t str) -> ScanIter<'d, 't> {
        ScanIter {
            db: self,
            text,
            scratch: Scratch::new(),
            cursor: Cursor::default(),
        }
    }

    /// Pattern matching over the whole subject, invoking `on_match` for every non-overlapping match in order.
    ///
    /// Returns `Stop::Terminated` if the callback returned `Matching::Terminate`, `Stop::Exhausted` otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::prelude::*;
    /// let db: Database = "a*".parse().unwrap();
    /// let mut s = db.alloc_scratch().unwrap();
    /// let mut spans = vec![];
    ///
    /// let stop = db.scan("baaa", &mut s, |m| {
    ///     spans.push(m.span(0));
    ///
    ///     Matching::Continue
    /// }).unwrap();
    ///
    /// assert_eq!(stop, Stop::Exhausted);
    /// assert_eq!(spans, vec![(0, 0), (1, 3), (4, 0)]);
    /// ```
    pub fn scan<F>(&self, text: &str, scratch: &mut Scratch, mut on_match: F) -> Result<Stop>
    where
        F: FnMut(&MatchResult) -> Matching,
    {
        let mut cursor = Cursor::default();

        while let Some(m) = cursor.next_match(self, text, scratch)? {
            if on_match(&m) == Matching::Terminate {
                return Ok(Stop::Terminated);
            }
        }

        Ok(Stop::Exhausted)
    }

    /// Collect up to `max_matches` non-overlapping matches in `text`.
    ///
    /// The search stops as soon as the limit is reached, reporting `Stop::Capacity`; a limit of `0` yields no
    /// matches.
    pub fn find_all(&self, text: &str, max_matches: usize) -> Result<MatchSet> {
        let mut scratch = self.alloc_scratch()?;

        self.find_all_with(text, &mut scratch, max_matches)
    }

    /// Like [`Database::find_all`], reusing the given scratch space.
    pub fn find_all_with(&self, text: &str, scratch: &mut Scratch, max_matches: usize) -> Result<MatchSet> {
        let mut matches = vec![];

        if max_matches == 0 {
            return Ok(MatchSet::new(matches, Stop::Capacity));
        }

        let mut cursor = Cursor::default();

        while let Some(m) = cursor.next_match(self, text, scratch)? {
            matches.push(m);

            if matches.len() >= max_matches {
                return Ok(MatchSet::new(matches, Stop::Capacity));
            }
        }

        Ok(MatchSet::new(matches, Stop::Exhausted))
    }
}

#[cfg(test)]
mod tests {
    use crate::compile::Config;
    use crate::prelude::*;
    use crate::Error;

    fn spans(pattern: &str, text: &str) -> Vec<Vec<(isize, isize)>> {
        let db: Database = pattern.parse().unwrap();

        db.find_all(text, usize::MAX)
            .unwrap()
            .iter()
            .map(|m| (0..m.num_groups()).map(|i| m.span(i)).collect())
            .collect()
    }

    fn whole(pattern: &str, text: &str) -> Vec<(isize, isize)> {
        spans(pattern, text).into_iter().map(|m| m[0]).collect()
    }

    #[test]
    fn test_find_all() {
        let _ = pretty_env_logger::try_init();

        assert_eq!(
            spans("(a)(b)?", "ab a"),
            vec![vec![(0, 2), (0, 1), (1, 1)], vec![(3, 1), (3, 1), (-1, -1)]]
        );
        assert_eq!(whole("a*", ""), vec![(0, 0)]);
        assert_eq!(whole("a*", "baaa"), vec![(0, 0), (1, 3), (4, 0)]);
        assert_eq!(whole(r"\d+", "a12b345"), vec![(1, 2), (4, 3)]);
        assert_eq!(whole("x", "abc"), vec![]);
        assert_eq!(whole("", "é"), vec![(0, 0), (2, 0)]);
        assert_eq!(whole("", "aé"), vec![(0, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_zero_length_matches() {
        assert_eq!(whole("(?=.)", "abc").len(), 3);
        assert_eq!(whole(r"\b", "hello world"), vec![(0, 0), (5, 0), (6, 0), (11, 0)]);
        assert_eq!(whole("^|$", "test\nline"), vec![(0, 0), (9, 0)]);
        assert_eq!(whole("(?m)^|$", "a\nb"), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(whole(r"\w+", "hello world test").len(), 3);
        assert_eq!(whole("a|", "ba"), vec![(0, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_non_overlapping() {
        let db: Database = "a*|b".parse().unwrap();
        let text = "abaabbé";
        let matches = db.find_all(text, 100).unwrap();

        for pair in matches.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);

            if prev.is_empty() {
                assert!(next.start() > prev.end());
            } else {
                assert!(next.start() >= prev.end());
            }
        }

        assert_eq!(matches.stop(), Stop::Exhausted);
    }

    #[test]
    fn test_capacity() {
        let db: Database = r"\w".parse().unwrap();

        let matches = db.find_all("abcdef", 2).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches.stop(), Stop::Capacity);
        assert_eq!(matches[1].range(), 1..2);

        let matches = db.find_all("abcdef", 0).unwrap();

        assert!(matches.is_empty());
        assert_eq!(matches.stop(), Stop::Capacity);

        let matches = db.find_all("ab", 2).unwrap();

        assert_eq!(matches.stop(), Stop::Capacity);
        assert_eq!(db.find_all("ab", 3).unwrap().stop(), Stop::Exhausted);
    }

    #[test]
    fn test_scan_terminate() {
        let db: Database = "o".parse().unwrap();
        let mut s = db.alloc_scratch().unwrap();
        let mut seen = 0;

        let stop = db
            .scan("foo boo", &mut s, |_| {
                seen += 1;

                if seen == 3 {
                    Matching::Terminate
                } else {
                    Matching::Continue
                }
            })
            .unwrap();

        assert_eq!(stop, Stop::Terminated);
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_scan_iter() {
        let db: Database = r"(\w)(\d)?".parse().unwrap();
        let mut it = db.scan_iter("a1 b");

        assert_eq!(it.text(), "a1 b");
        assert_eq!(it.next().unwrap().unwrap().span(2), (1, 1));
        assert_eq!(it.next().unwrap().unwrap().span(2), (-1, -1));
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn test_scan_iter_error() {
        let config = Config::new().visited_capacity(0).backtrack_limit(10_000);
        let db = pattern!("b|(?:a|aa)*c").with_config(&config).unwrap();
        let text = format!("b{}", "a".repeat(40));
        let mut it = db.scan_iter(&text);

        assert_eq!(it.next().unwrap().unwrap().range(), 0..1);
        assert_eq!(
            it.next().unwrap().unwrap_err(),
            Error::BacktrackLimit { limit: 10_000 }
        );
        assert!(it.next().is_none());
    }

    #[test]
    fn test_compile_twice() {
        let _ = pretty_env_logger::try_init();

        let text = "x1 y22 (z333) é4";

        for pattern in &[r"(\w)(\d+)", r"\((\w+)\)|(\d)", "(?i)(?<l>[a-z])", "a*|(.)"] {
            let first: Database = pattern.parse().unwrap();
            let second: Database = pattern.parse().unwrap();

            assert_eq!(first.num_groups(), second.num_groups());
            assert_eq!(
                first.find_all(text, 100).unwrap().to_vec(),
                second.find_all(text, 100).unwrap().to_vec()
            );
        }
    }

    #[test]
    fn test_match_count_bound() {
        let _ = pretty_env_logger::try_init();

        let patterns = ["", "a*", "(?=.)", r"\b", "^|$", "(?m)^", "x?", "é*", "(?:)", r"\B"];
        let texts = ["", "a", "aaa", "éé", "a é\nb", "日本語", "abc def"];

        for pattern in &patterns {
            for text in &texts {
                let n = whole(pattern, text).len();

                assert!(n <= text.len() + 1, "{:?} on {:?} gave {} matches", pattern, text, n);
            }
        }

        assert_eq!(whole("", "日本語").len(), 4);
    }

    #[test]
    fn test_optional_group_unset() {
        assert_eq!(spans("(a)(b)?", "a"), vec![vec![(0, 1), (0, 1), (-1, -1)]]);
    }

    #[test]
    fn test_find_all_under_capacity() {
        let db: Database = r"\d+".parse().unwrap();
        let matches = db.find_all("ab12cd34", 10).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].range(), 2..4);
        assert_eq!(matches[1].range(), 6..8);
        assert_eq!(matches.stop(), Stop::Exhausted);

        let matches = db.find_all("1 2 3", 1).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].range(), 0..1);
        assert_eq!(matches.stop(), Stop::Capacity);
    }
}
