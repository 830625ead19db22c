use std::fmt;
use std::ops::{Index, Range};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    common::Database,
    compile::{Config, Flags, Pattern},
    runtime::{MatchResult, ScanIter},
    Error, Result,
};

/// Match represents a single match of a regex in a haystack.
///
/// The lifetime parameter `'t` refers to the lifetime of the matched text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    /// Returns the starting byte offset of the match in the haystack.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the ending byte offset of the match in the haystack.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the range over the starting and ending byte offsets of the
    /// match in the haystack.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the matched text.
    #[inline]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    /// Creates a new match from the given haystack and byte offsets.
    #[inline]
    fn new(haystack: &'t str, start: usize, end: usize) -> Match<'t> {
        Match {
            text: haystack,
            start,
            end,
        }
    }
}

impl<'t> From<Match<'t>> for &'t str {
    fn from(m: Match<'t>) -> &'t str {
        m.as_str()
    }
}

impl<'t> From<Match<'t>> for Range<usize> {
    fn from(m: Match<'t>) -> Range<usize> {
        m.range()
    }
}

/// Captures represents a group of captured strings for a single match.
///
/// Groups are indexed by their number, `0` being the whole match, or by their name.
pub struct Captures<'t> {
    text: &'t str,
    db: Arc<Database>,
    result: MatchResult,
}

impl<'t> Captures<'t> {
    /// Returns the match associated with the capture group at index `i`.
    ///
    /// If `i` does not correspond to a capture group, or if the capture group did not participate in the match,
    /// then `None` is returned.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        self.result
            .get(i)
            .map(|capture| Match::new(self.text, capture.from, capture.to))
    }

    /// Returns the match for the capture group named `name`.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        self.db.captures().group_index(name).and_then(|i| self.get(i))
    }

    /// Returns the number of captured groups, including group `0`.
    pub fn len(&self) -> usize {
        self.result.num_groups()
    }

    /// Returns true if there are no groups, which never happens for a successful match.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An iterator over all capture groups in index order.
    pub fn iter<'c>(&'c self) -> impl Iterator<Item = Option<Match<'t>>> + 'c {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl<'t> fmt::Debug for Captures<'t> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|m| m.map(|m| m.as_str())))
            .finish()
    }
}

impl<'t> Index<usize> for Captures<'t> {
    type Output = str;

    /// Get a group by index.
    ///
    /// # Panics
    ///
    /// If there is no group at the given index.
    fn index(&self, i: usize) -> &str {
        match self.result.get(i) {
            Some(capture) => &self.text[capture.range()],
            None => panic!("no group at index '{}'", i),
        }
    }
}

impl<'t, 'i> Index<&'i str> for Captures<'t> {
    type Output = str;

    /// Get a group by name.
    ///
    /// # Panics
    ///
    /// If there is no group named by the given value.
    fn index(&self, name: &'i str) -> &str {
        match self.db.captures().group_index(name).and_then(|i| self.result.get(i)) {
            Some(capture) => &self.text[capture.range()],
            None => panic!("no group named '{}'", name),
        }
    }
}

/// An iterator over all non-overlapping matches for a particular string.
///
/// The iterator yields a `Match` value. The iterator stops when no more
/// matches can be found.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the
/// lifetime of the matched string.
pub struct Matches<'r, 't>(ScanIter<'r, 't>);

impl<'r, 't> Matches<'r, 't> {
    /// Return the text being searched.
    pub fn text(&self) -> &'t str {
        self.0.text()
    }
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.0.text();
        let m = ok_or_warn(self.0.next()?.map(Some))?;

        Some(Match::new(text, m.start(), m.end()))
    }
}

/// An iterator that yields all non-overlapping capture groups matching a particular regular expression.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the lifetime of the matched string.
pub struct CaptureMatches<'r, 't> {
    db: &'r Arc<Database>,
    it: ScanIter<'r, 't>,
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.it.text();
        let result = ok_or_warn(self.it.next()?.map(Some))?;

        Some(Captures {
            text,
            db: self.db.clone(),
            result,
        })
    }
}

/// An iterator over the names of all capture groups.
pub struct CaptureNames<'r>(Box<dyn Iterator<Item = Option<&'r str>> + 'r>);

impl<'r> Iterator for CaptureNames<'r> {
    type Item = Option<&'r str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// Log a failed search and treat it as finding nothing.
fn ok_or_warn<T>(res: Result<Option<T>>) -> Option<T> {
    res.unwrap_or_else(|err| {
        warn!("regex search failed: {}", err);

        None
    })
}

/// A compiled regular expression for matching Unicode strings.
#[derive(Clone)]
pub struct Regex(pub(crate) Arc<Database>);

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    fn from_str(s: &str) -> Result<Regex> {
        Regex::new(s)
    }
}

/// Core regular expression methods.
///
/// A search fails only when it runs past the
/// [backtrack limit](crate::regex::RegexBuilder::backtrack_limit), or when `find_at` is given an offset past the
/// end of the text. The search methods log such a failure and report no match; [`Regex::try_find_at`] and
/// [`Regex::try_captures`] return it instead.
impl Regex {
    /// Compiles a regular expression.
    /// Once compiled, it can be used repeatedly to search, split or replace text in a string.
    ///
    /// If an invalid expression is given, then an error is returned.
    pub fn new<S: Into<String>>(re: S) -> Result<Regex> {
        Self::with_config(re, Flags::empty(), &Config::default())
    }

    pub(crate) fn with_config<S: Into<String>>(re: S, flags: Flags, config: &Config) -> Result<Regex> {
        Database::with_config(Pattern::with_flags(re, flags), config).map(|db| Regex(Arc::new(db)))
    }

    /// Returns the original string of this regex.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the compiled database behind this regex.
    pub fn database(&self) -> &Database {
        &self.0
    }

    /// Returns true if and only if the regex matches the string given.
    ///
    /// # Examples
    ///
    /// Test if some text contains at least one word with exactly 13 Unicode word characters:
    ///
    /// ```rust
    /// # use retrace::regex::Regex;
    /// let text = "I categorically deny having triskaidekaphobia.";
    /// assert!(Regex::new(r"\b\w{13}\b").unwrap().is_match(text));
    /// ```
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Returns the start and end byte range of the leftmost-first match in text. If no match exists, then None is returned.
    ///
    /// # Examples
    ///
    /// Find the start and end location of the first word with exactly 13 Unicode word characters:
    ///
    /// ```rust
    /// # use retrace::regex::Regex;
    /// let text = "I categorically deny having triskaidekaphobia.";
    /// let mat = Regex::new(r"\b\w{13}\b").unwrap().find(text).unwrap();
    /// assert_eq!(mat.start(), 2);
    /// assert_eq!(mat.end(), 15);
    /// ```
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_at(text, 0)
    }

    /// Returns the same as `find`, but starts the search at the given offset.
    ///
    /// The significance of the starting point is that it takes the surrounding context into consideration.
    /// For example, the `\A` anchor can only match when `start == 0`.
    pub fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<Match<'t>> {
        ok_or_warn(self.try_find_at(text, start))
    }

    /// Returns the same as `find_at`, but reports a failed search.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::{regex::Regex, Error};
    /// let re = Regex::new("b").unwrap();
    ///
    /// assert_eq!(re.try_find_at("abc", 1).unwrap().map(|m| m.start()), Some(1));
    /// assert_eq!(re.try_find_at("abc", 4).unwrap_err(), Error::InvalidOffset { offset: 4, len: 3 });
    /// ```
    pub fn try_find_at<'t>(&self, text: &'t str, start: usize) -> Result<Option<Match<'t>>> {
        let mut s = self.0.alloc_scratch()?;

        Ok(self
            .0
            .try_match(text, start, &mut s)?
            .map(|m| Match::new(text, m.start(), m.end())))
    }

    /// Returns an iterator for each successive non-overlapping match in
    /// `text`, returning the start and end byte indices with respect to
    /// `text`.
    ///
    /// # Examples
    ///
    /// Find the start and end location of every word with exactly 13 Unicode
    /// word characters:
    ///
    /// ```rust
    /// # use retrace::regex::Regex;
    /// let text = "Retroactively relinquishing remunerations is reprehensible.";
    /// for mat in Regex::new(r"\b\w{13}\b").unwrap().find_iter(text) {
    ///     println!("{:?}", mat);
    /// }
    /// ```
    ///
    /// The iterator ends early if a search fails.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches(self.0.scan_iter(text))
    }

    /// Returns the capture groups corresponding to the leftmost-first match in `text`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::regex::Regex;
    /// let re = Regex::new(r"'(?P<title>[^']+)'\s+\((?P<year>\d{4})\)").unwrap();
    /// let text = "Not my favorite movie: 'Citizen Kane' (1941).";
    /// let caps = re.captures(text).unwrap();
    ///
    /// assert_eq!(&caps["title"], "Citizen Kane");
    /// assert_eq!(&caps["year"], "1941");
    /// assert_eq!(caps.get(0).unwrap().as_str(), "'Citizen Kane' (1941)");
    /// ```
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        ok_or_warn(self.try_captures(text))
    }

    /// Returns the same as `captures`, but reports a failed search.
    pub fn try_captures<'t>(&self, text: &'t str) -> Result<Option<Captures<'t>>> {
        let mut s = self.0.alloc_scratch()?;

        Ok(self.0.try_match(text, 0, &mut s)?.map(|result| Captures {
            text,
            db: self.0.clone(),
            result,
        }))
    }

    /// Returns an iterator over all the non-overlapping capture groups matched in `text`.
    ///
    /// The iterator ends early if a search fails.
    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches {
            db: &self.0,
            it: self.0.scan_iter(text),
        }
    }

    /// Returns an iterator of substrings of `text` delimited by a match of the
    /// regular expression. Namely, each element of the iterator corresponds to
    /// text that *isn't* matched by the regular expression.
    ///
    /// This method will *not* copy the text given.
    ///
    /// # Examples
    ///
    /// To split a string delimited by arbitrary amounts of spaces or tabs:
    ///
    /// ```rust
    /// # use retrace::regex::Regex;
    /// let re = Regex::new(r"[ \t]+").unwrap();
    /// let fields: Vec<&str> = re.split("a b \t  c\td    e").collect();
    /// assert_eq!(fields, vec!["a", "b", "c", "d", "e"]);
    /// ```
    pub fn split<'r, 't>(&'r self, text: &'t str) -> Split<'r, 't> {
        Split {
            finder: self.find_iter(text),
            last: 0,
        }
    }

    /// Returns an iterator of at most `limit` substrings of `text` delimited
    /// by a match of the regular expression. (A `limit` of `0` will return no
    /// substrings.) Namely, each element of the iterator corresponds to text
    /// that *isn't* matched by the regular expression. The remainder of the
    /// string that is not split will be the last element in the iterator.
    ///
    /// This method will *not* copy the text given.
    ///
    /// # Examples
    ///
    /// Get the first two words in some text:
    ///
    /// ```rust
    /// # use retrace::regex::Regex;
    /// let re = Regex::new(r"\W+").unwrap();
    /// let fields: Vec<&str> = re.splitn("Hey! How are you?", 3).collect();
    /// assert_eq!(fields, vec!("Hey", "How", "are you?"));
    /// ```
    pub fn splitn<'r, 't>(&'r self, text: &'t str, limit: usize) -> SplitN<'r, 't> {
        SplitN {
            splits: self.split(text),
            n: limit,
        }
    }

    /// Returns the number of capture groups in this regex, including group `0`.
    pub fn captures_len(&self) -> usize {
        self.0.num_groups()
    }

    /// Returns an iterator over the capture names, `None` for unnamed groups.
    pub fn capture_names(&self) -> CaptureNames<'_> {
        CaptureNames(Box::new(self.0.captures().names()))
    }
}

/// Yields all substrings delimited by a regular expression match.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the lifetime of the string being split.
pub struct Split<'r, 't> {
    finder: Matches<'r, 't>,
    last: usize,
}

impl<'r, 't> Iterator for Split<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let text = self.finder.text();
        match self.finder.next() {
            None => {
                if self.last > text.len() {
                    None
                } else {
                    let s = &text[self.last..];
                    self.last = text.len() + 1; // Next call will return None
                    Some(s)
                }
            }
            Some(m) => {
                let matched = &text[self.last..m.start()];
                self.last = m.end();
                Some(matched)
            }
        }
    }
}

/// Yields at most `N` substrings delimited by a regular expression match.
///
/// The last substring will be whatever remains after splitting.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the lifetime of the string being split.
pub struct SplitN<'r, 't> {
    splits: Split<'r, 't>,
    n: usize,
}

impl<'r, 't> Iterator for SplitN<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        if self.n == 0 {
            return None;
        }

        self.n -= 1;
        if self.n > 0 {
            return self.splits.next();
        }

        let text = self.splits.finder.text();
        if self.splits.last > text.len() {
            // We've already returned all substrings.
            None
        } else {
            // self.n == 0, so future calls will return None immediately
            Some(&text[self.splits.last..])
        }
    }
}
