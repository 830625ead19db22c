use crate::{
    common::{engine, Database, Engine},
    compile::{Assertion, Inst, LookKind},
    runtime::{
        scratch::{Frame, Visit},
        MatchResult, Scratch,
    },
    Error, Result,
};

impl Database {
    /// Search for the leftmost match starting at or after the byte offset `from`.
    ///
    /// Candidate start positions are tried left to right; the first one at which the pattern resolves wins, and
    /// alternatives are preferred in the order they are written. `from` is rounded up to the next character
    /// boundary, and `from == text.len()` is valid for patterns that can match the empty string there.
    ///
    /// Assertions such as `^` and `\b` look at the whole `text`, not just the part after `from`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidOffset` if `from` is past the end of `text`, and `Error::BacktrackLimit` if the visited set
    /// ran out of memory and the search then took more untracked steps than the configured backtrack limit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::prelude::*;
    /// let db: Database = r"\b(\w)(\d)?".parse().unwrap();
    /// let mut s = db.alloc_scratch().unwrap();
    ///
    /// let m = db.try_match("a1 b", 1, &mut s).unwrap().unwrap();
    ///
    /// assert_eq!(m.span(0), (3, 1));
    /// assert_eq!(m.span(2), (-1, -1));
    /// ```
    pub fn try_match(&self, text: &str, from: usize, scratch: &mut Scratch) -> Result<Option<MatchResult>> {
        let len = text.len();

        if from > len {
            return Err(Error::InvalidOffset { offset: from, len });
        }

        let program = self.program();
        let mut start = from;

        while !text.is_char_boundary(start) {
            start += 1;
        }

        let info = self.info();

        if info.anchored_start() && start > 0 {
            return Ok(None);
        }

        let config = self.config();

        scratch.prepare(
            program.num_slots(),
            program.len(),
            len,
            start,
            config.get_visited_capacity(),
        );

        let matcher = Matcher {
            insts: program.insts(),
            text,
            limit: config.get_backtrack_limit(),
            engine: engine(),
        };

        while len - start >= info.min_width() {
            scratch.advance(start);

            if matcher.run(scratch, 0, 0, start)?.is_some() {
                scratch.stack.clear();

                return Ok(Some(MatchResult::from_slots(&scratch.slots[..program.capture_slots()])));
            }

            match text[start..].chars().next() {
                Some(c) if !info.anchored_start() => start += c.len_utf8(),
                _ => break,
            }
        }

        Ok(None)
    }
}

/// Bounded backtracking over a program.
///
/// Every `(instruction, position)` pair the visited set covers is explored at most once per search, so a search
/// takes time proportional to the program length times the subject length. Pairs outside its memory budget are
/// explored without being remembered, and at most `limit` such steps are taken.
struct Matcher<'a> {
    insts: &'a [Inst],
    text: &'a str,
    limit: usize,
    engine: &'static Engine,
}

impl<'a> Matcher<'a> {
    /// Resolve the program from `pc` at `at`, returning the position where `Match` or `Succeed` was reached.
    ///
    /// On success the frames pushed by this run are left on the stack above where they started.
    fn run(&self, scratch: &mut Scratch, depth: usize, pc: usize, at: usize) -> Result<Option<usize>> {
        let base = scratch.stack.len();

        scratch.stack.push(Frame::Step { pc, at });

        while scratch.stack.len() > base {
            match scratch.stack.pop() {
                Some(Frame::Step { pc, at }) => {
                    if let Some(end) = self.step(scratch, depth, pc, at)? {
                        return Ok(Some(end));
                    }
                }
                Some(Frame::Restore { slot, offset }) => scratch.slots[slot] = offset,
                None => break,
            }
        }

        Ok(None)
    }

    /// Follow one thread until it matches or fails, pushing the alternatives it skips.
    fn step(&self, scratch: &mut Scratch, depth: usize, mut pc: usize, mut at: usize) -> Result<Option<usize>> {
        loop {
            match scratch.visit(depth, pc, at) {
                Visit::New => {}
                Visit::Seen => return Ok(None),
                Visit::Untracked => {
                    scratch.untracked += 1;

                    if scratch.untracked > self.limit {
                        debug!("search gave up after {} untracked steps", self.limit);

                        return Err(Error::BacktrackLimit { limit: self.limit });
                    }
                }
            }

            match &self.insts[pc] {
                Inst::Char(expected) => match self.char_at(at) {
                    Some(c) if c == *expected => {
                        pc += 1;
                        at += c.len_utf8();
                    }
                    _ => return Ok(None),
                },
                Inst::Class(class) => match self.char_at(at) {
                    Some(c) if class.contains(c) => {
                        pc += 1;
                        at += c.len_utf8();
                    }
                    _ => return Ok(None),
                },
                Inst::Any => match self.char_at(at) {
                    Some(c) => {
                        pc += 1;
                        at += c.len_utf8();
                    }
                    None => return Ok(None),
                },
                Inst::AnyNotNl => match self.char_at(at) {
                    Some(c) if c != '\n' => {
                        pc += 1;
                        at += c.len_utf8();
                    }
                    _ => return Ok(None),
                },
                Inst::Assert(assertion) => {
                    if !self.is_assert(*assertion, at) {
                        return Ok(None);
                    }
                    pc += 1;
                }
                Inst::Save(slot) => {
                    let slot = *slot;

                    scratch.stack.push(Frame::Restore {
                        slot,
                        offset: scratch.slots[slot],
                    });
                    scratch.slots[slot] = Some(at);
                    pc += 1;
                }
                Inst::Progress(slot) => {
                    if scratch.slots[*slot] == Some(at) {
                        return Ok(None);
                    }
                    pc += 1;
                }
                Inst::Split(first, second) => {
                    scratch.stack.push(Frame::Step { pc: *second, at });
                    pc = *first;
                }
                Inst::Jmp(next) => pc = *next,
                Inst::Look { kind, next } => {
                    let base = scratch.stack.len();

                    scratch.level(depth + 1, at);

                    match (kind, self.run(scratch, depth + 1, pc + 1, at)?) {
                        (LookKind::Ahead, Some(_)) => {
                            keep_restores(scratch, base);
                        }
                        (LookKind::Atomic, Some(end)) => {
                            keep_restores(scratch, base);
                            at = end;
                        }
                        (LookKind::NegativeAhead, Some(_)) => {
                            undo(scratch, base);
                            return Ok(None);
                        }
                        (LookKind::NegativeAhead, None) => {}
                        (LookKind::Ahead, None) | (LookKind::Atomic, None) => return Ok(None),
                    }

                    pc = *next;
                }
                Inst::Succeed | Inst::Match => return Ok(Some(at)),
            }
        }
    }

    fn char_at(&self, at: usize) -> Option<char> {
        self.text[at..].chars().next()
    }

    fn char_before(&self, at: usize) -> Option<char> {
        self.text[..at].chars().next_back()
    }

    fn is_word_at(&self, c: Option<char>) -> bool {
        c.map_or(false, |c| self.engine.is_word_char(c))
    }

    fn is_assert(&self, assertion: Assertion, at: usize) -> bool {
        let bytes = self.text.as_bytes();
        let len = bytes.len();

        match assertion {
            Assertion::StartText => at == 0,
            Assertion::EndText => at == len,
            Assertion::EndTextOptionalNewline => at == len || (at + 1 == len && bytes[at] == b'\n'),
            Assertion::StartLine => at == 0 || bytes[at - 1] == b'\n',
            Assertion::EndLine => at == len || bytes[at] == b'\n',
            Assertion::WordBoundary => self.is_word_at(self.char_before(at)) != self.is_word_at(self.char_at(at)),
            Assertion::NotWordBoundary => self.is_word_at(self.char_before(at)) == self.is_word_at(self.char_at(at)),
        }
    }
}

/// Drop the alternatives left by a successful nested search, keeping the capture restores so that backtracking
/// past it still undoes its captures.
fn keep_restores(scratch: &mut Scratch, base: usize) {
    let restores = scratch
        .stack
        .drain(base..)
        .filter(|frame| matches!(frame, Frame::Restore { .. }))
        .collect::<Vec<_>>();

    scratch.stack.extend(restores);
}

/// Undo the captures of a successful nested search and drop its frames.
fn undo(scratch: &mut Scratch, base: usize) {
    while scratch.stack.len() > base {
        if let Some(Frame::Restore { slot, offset }) = scratch.stack.pop() {
            scratch.slots[slot] = offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::compile::Config;
    use crate::prelude::*;
    use crate::Error;

    fn first(pattern: &str, text: &str) -> Option<Vec<(isize, isize)>> {
        let db: Database = pattern.parse().unwrap();
        let mut s = db.alloc_scratch().unwrap();

        db.try_match(text, 0, &mut s)
            .unwrap()
            .map(|m| (0..m.num_groups()).map(|i| m.span(i)).collect())
    }

    #[test]
    fn test_try_match() {
        let _ = pretty_env_logger::try_init();

        assert_eq!(first("abc", "xxabcxx"), Some(vec![(2, 3)]));
        assert_eq!(first("abc", "xxabxx"), None);
        assert_eq!(first("(a)|b", "b"), Some(vec![(0, 1), (-1, -1)]));
        assert_eq!(first("a*", ""), Some(vec![(0, 0)]));
        assert_eq!(first("(a+)(b)?", "aaac"), Some(vec![(0, 3), (0, 3), (-1, -1)]));
        assert_eq!(first("a+?", "aaa"), Some(vec![(0, 1)]));
        assert_eq!(first("a|ab", "ab"), Some(vec![(0, 1)]));
        assert_eq!(first("(?:ab|a)c", "ac"), Some(vec![(0, 2)]));
        assert_eq!(first("(a|b)*c", "abac"), Some(vec![(0, 4), (2, 1)]));
        assert_eq!(first("x{2,3}", "xxxx"), Some(vec![(0, 3)]));
        assert_eq!(first("x{2,3}?", "xxxx"), Some(vec![(0, 2)]));
        assert_eq!(first(".+", "ab\ncd"), Some(vec![(0, 2)]));
        assert_eq!(first("(?s).+", "ab\ncd"), Some(vec![(0, 5)]));
        assert_eq!(first("é+", "aéé"), Some(vec![(1, 4)]));
        assert_eq!(first("(?i)straße", "STRASSE STRAẞE"), Some(vec![(8, 8)]));
    }

    #[test]
    fn test_assertions() {
        assert_eq!(first("^b", "ab"), None);
        assert_eq!(first("(?m)^b", "a\nb"), Some(vec![(2, 1)]));
        assert_eq!(first("a$", "a\n"), None);
        assert_eq!(first(r"a\Z", "a\n"), Some(vec![(0, 1)]));
        assert_eq!(first("(?m)a$", "a\nb"), Some(vec![(0, 1)]));
        assert_eq!(first(r"\bfoo\b", "afoo foo"), Some(vec![(5, 3)]));
        assert_eq!(first(r"\Boo", "foo"), Some(vec![(1, 2)]));
        assert_eq!(first(r"\bé", "aé é"), Some(vec![(4, 2)]));
    }

    #[test]
    fn test_lookaround() {
        assert_eq!(first("a(?=b)", "acab"), Some(vec![(2, 1)]));
        assert_eq!(first("a(?!b)", "abac"), Some(vec![(2, 1)]));
        assert_eq!(first("(?=(ab))a", "ab"), Some(vec![(0, 1), (0, 2)]));
        assert_eq!(first("(?!(a))b", "b"), Some(vec![(0, 1), (-1, -1)]));
        assert_eq!(first("(?=(a))ab|(b)", "ac b"), Some(vec![(3, 1), (-1, -1), (3, 1)]));
        assert_eq!(first("(?>a+)ab", "aaab"), None);
        assert_eq!(first("(?>a+)b", "aaab"), Some(vec![(0, 4)]));
        assert_eq!(first("a*+a", "aaa"), None);
        assert_eq!(first("(?>(a)|ab)c", "abc ac"), Some(vec![(4, 2), (4, 1)]));
    }

    #[test]
    fn test_from_offset() {
        let db: Database = r"\bb|$".parse().unwrap();
        let mut s = db.alloc_scratch().unwrap();

        assert_eq!(db.try_match("ab b", 1, &mut s).unwrap().unwrap().range(), 3..4);
        assert_eq!(db.try_match("ab b", 4, &mut s).unwrap().unwrap().range(), 4..4);

        let db: Database = "^a".parse().unwrap();

        assert!(db.try_match("aa", 1, &mut s).unwrap().is_none());

        let db: Database = "".parse().unwrap();

        assert_eq!(db.try_match("é", 1, &mut s).unwrap().unwrap().range(), 2..2);
        assert_eq!(
            db.try_match("é", 3, &mut s).unwrap_err(),
            Error::InvalidOffset { offset: 3, len: 2 }
        );
    }

    #[test]
    fn test_long_subject() {
        let _ = pretty_env_logger::try_init();

        let text = "x".repeat(4 << 20);
        let db: Database = "abcdefghijklmnopqrstuvwxyz0123".parse().unwrap();
        let mut s = db.alloc_scratch().unwrap();

        assert!(db.try_match(&text, 0, &mut s).unwrap().is_none());

        let text = format!("{}abcdefghijklmnopqrstuvwxyz0123", text);

        assert_eq!(
            db.try_match(&text, 0, &mut s).unwrap().unwrap().range(),
            (4 << 20)..(4 << 20) + 30
        );
    }

    #[test]
    fn test_visited_budget_spent() {
        let _ = pretty_env_logger::try_init();

        // no memory for the visited set at all, every pair is untracked
        let db = pattern!(r"(a*)*b|\d+").with_config(&Config::new().visited_capacity(0)).unwrap();
        let mut s = db.alloc_scratch().unwrap();

        assert_eq!(db.try_match("aab", 0, &mut s).unwrap().unwrap().range(), 0..3);
        assert_eq!(db.try_match("xx 42", 0, &mut s).unwrap().unwrap().range(), 3..5);

        let db = pattern!("[a-z]{100}y")
            .with_config(&Config::new().visited_capacity(4 << 10))
            .unwrap();

        assert!(db.try_match(&"x".repeat(20_000), 0, &mut s).unwrap().is_none());
    }

    #[test]
    fn test_backtrack_limit() {
        let _ = pretty_env_logger::try_init();

        let text = "a".repeat(40);
        let config = Config::new().visited_capacity(0).backtrack_limit(10_000);
        let db = pattern!("(a|aa)*c").with_config(&config).unwrap();
        let mut s = db.alloc_scratch().unwrap();

        assert_eq!(
            db.try_match(&text, 0, &mut s).unwrap_err(),
            Error::BacktrackLimit { limit: 10_000 }
        );

        let db = pattern!("(a|aa)*c").with_config(&Config::new().backtrack_limit(0)).unwrap();

        assert!(db.try_match(&text, 0, &mut s).unwrap().is_none());
    }

    #[test]
    fn test_empty_iterations() {
        let _ = pretty_env_logger::try_init();

        assert_eq!(first("(a*)*", "b"), Some(vec![(0, 0), (-1, -1)]));
        assert_eq!(first("(a*)+", "b"), Some(vec![(0, 0), (0, 0)]));
        assert_eq!(first("(a|)*b", "aab"), Some(vec![(0, 3), (1, 1)]));
        assert_eq!(first("(?:^)*x", "x"), Some(vec![(0, 1)]));
    }

    #[test]
    fn test_pathological() {
        let text = "a".repeat(5000);
        let started = Instant::now();

        assert_eq!(first("(a*)*b", &text), None);
        assert_eq!(first("(a|aa)*c", &text), None);
        assert_eq!(first("(x+x+)+y", &"x".repeat(5000)), None);

        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
