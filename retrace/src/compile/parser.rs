use crate::common::{engine, Engine};
use crate::compile::{
    ast::{Assertion, Ast, LookKind},
    CaptureTable, CharClass, Config, Error, ErrorKind, Flags, REPEAT_MAX,
};

type Result<T> = std::result::Result<T, Error>;

/// Parse `pattern` into a syntax tree and the table of its capture groups.
pub(crate) fn parse(pattern: &str, flags: Flags, config: &Config) -> Result<(Ast, CaptureTable)> {
    Parser {
        pattern,
        pos: 0,
        flags,
        nest_limit: config.get_nest_limit(),
        engine: engine(),
        captures: CaptureTable::default(),
        groups: vec![0],
        depth: 0,
    }
    .parse()
}

enum Escape {
    Char(char),
    Class(CharClass),
    Assert(Assertion),
}

struct Parser<'p> {
    pattern: &'p str,
    pos: usize,
    flags: Flags,
    nest_limit: usize,
    engine: &'static Engine,
    captures: CaptureTable,
    groups: Vec<usize>,
    depth: usize,
}

impl<'p> Parser<'p> {
    fn parse(mut self) -> Result<(Ast, CaptureTable)> {
        let ast = self.parse_alternation()?;

        if self.peek().is_some() {
            return Err(Error::new(ErrorKind::UnopenedGroup, self.pos));
        }

        Ok((ast, self.captures))
    }

    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.pattern[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and `#` comments in extended mode.
    fn skip_trivia(&mut self) {
        if !self.flags.contains(Flags::EXTENDED) {
            return;
        }

        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_alternation(&mut self) -> Result<Ast> {
        let mut branches = vec![self.parse_concat()?];

        while self.eat('|') {
            branches.push(self.parse_concat()?);
        }

        Ok(if branches.len() == 1 {
            branches.swap_remove(0)
        } else {
            Ast::Alternate(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Ast> {
        let mut items = vec![];

        loop {
            self.skip_trivia();

            let start = self.pos;
            let grouped = self.peek() == Some('(');
            let atom = match self.peek() {
                None | Some('|') | Some(')') => break,
                Some('*') | Some('+') | Some('?') => {
                    return Err(Error::new(ErrorKind::MissingRepeatTarget, start));
                }
                Some('{') if self.counted_repeat().is_some() => {
                    return Err(Error::new(ErrorKind::MissingRepeatTarget, start));
                }
                Some(_) => match self.parse_atom()? {
                    Some(atom) => atom,
                    None => continue,
                },
            };

            items.push(self.parse_repeat(atom, grouped)?);
        }

        Ok(match items.len() {
            0 => Ast::Empty,
            1 => items.swap_remove(0),
            _ => Ast::Concat(items),
        })
    }

    /// Parse one atom; `None` for constructs that only change state, like `(?i)` or `(?#...)`.
    fn parse_atom(&mut self) -> Result<Option<Ast>> {
        let start = self.pos;
        let c = match self.bump() {
            Some(c) => c,
            None => return Ok(None),
        };

        let multi_line = self.flags.contains(Flags::MULTILINE);

        let ast = match c {
            '(' => return self.parse_group(start),
            '[' => {
                let class = self.parse_class(start)?;

                match class.single_char() {
                    Some(c) => Ast::Literal(c),
                    None => Ast::Class(class),
                }
            }
            '.' => Ast::Dot {
                dotall: self.flags.contains(Flags::DOTALL),
            },
            '^' if multi_line => Ast::Assert(Assertion::StartLine),
            '^' => Ast::Assert(Assertion::StartText),
            '$' if multi_line => Ast::Assert(Assertion::EndLine),
            '$' => Ast::Assert(Assertion::EndText),
            '\\' => match self.parse_escape(start)? {
                Escape::Char(c) => self.literal(c),
                Escape::Class(class) => Ast::Class(class),
                Escape::Assert(assertion) => Ast::Assert(assertion),
            },
            c => self.literal(c),
        };

        Ok(Some(ast))
    }

    fn literal(&self, c: char) -> Ast {
        match self.engine.case_orbit(c) {
            Some(orbit) if self.flags.contains(Flags::CASELESS) => {
                Ast::Class(CharClass::from_ranges(orbit.iter().map(|&c| (c, c))))
            }
            _ => Ast::Literal(c),
        }
    }

    /// Parse the quantifier after `atom`, if any; a bare assertion cannot be repeated, a group holding one can.
    fn parse_repeat(&mut self, atom: Ast, grouped: bool) -> Result<Ast> {
        self.skip_trivia();

        let start = self.pos;
        let (min, max) = match self.peek() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') => match self.parse_counted()? {
                Some((min, max)) => (min, max),
                None => return Ok(atom),
            },
            _ => return Ok(atom),
        };

        if start == self.pos {
            self.bump();
        }

        if let (Ast::Assert(_), false) = (&atom, grouped) {
            return Err(Error::new(ErrorKind::MissingRepeatTarget, start));
        }

        let mut greedy = true;
        let mut possessive = false;

        if self.eat('?') {
            greedy = false;
        } else if self.eat('+') {
            possessive = true;
        }

        let mut ast = Ast::Repeat {
            ast: Box::new(atom),
            min,
            max,
            greedy,
        };

        if possessive {
            ast = Ast::Look {
                kind: LookKind::Atomic,
                ast: Box::new(ast),
            };
        }

        self.skip_trivia();

        match self.peek() {
            Some('*') | Some('+') | Some('?') => Err(Error::new(ErrorKind::NestedRepeat, self.pos)),
            Some('{') if self.counted_repeat().is_some() => Err(Error::new(ErrorKind::NestedRepeat, self.pos)),
            _ => Ok(ast),
        }
    }

    /// Scan a `{m}`, `{m,}`, `{m,n}` or `{,n}` quantifier without consuming it.
    ///
    /// Returns the length of the quantifier, the lower bound, whether there is a comma and the upper bound.
    fn counted_repeat(&self) -> Option<(usize, Option<u32>, bool, Option<u32>)> {
        let rest = self.pattern[self.pos..].strip_prefix('{')?;
        let close = rest.find('}')?;
        let body = &rest[..close];

        let (lo, comma, hi) = match body.find(',') {
            Some(off) => (&body[..off], true, &body[off + 1..]),
            None => (body, false, ""),
        };

        let is_number = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

        if !is_number(lo) || !is_number(hi) || (lo.is_empty() && hi.is_empty()) {
            return None;
        }

        let number = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.parse::<u32>().unwrap_or(u32::MAX))
            }
        };

        Some((close + 2, number(lo), comma, number(hi)))
    }

    fn parse_counted(&mut self) -> Result<Option<(u32, Option<u32>)>> {
        let start = self.pos;
        let (len, lo, comma, hi) = match self.counted_repeat() {
            Some(repeat) => repeat,
            None => return Ok(None),
        };

        let min = lo.unwrap_or(0);
        let max = if comma { hi } else { Some(min) };

        if min > REPEAT_MAX || max.map_or(false, |max| max > REPEAT_MAX) {
            return Err(Error::new(ErrorKind::RepeatTooLarge(REPEAT_MAX), start));
        }
        if max.map_or(false, |max| max < min) {
            return Err(Error::new(ErrorKind::InvalidRepeatRange, start));
        }

        self.pos += len;

        Ok(Some((min, max)))
    }

    fn parse_group(&mut self, start: usize) -> Result<Option<Ast>> {
        if self.depth >= self.nest_limit {
            return Err(Error::new(ErrorKind::NestTooDeep(self.nest_limit), start));
        }

        if !self.eat('?') {
            return self.parse_capture(start, None).map(Some);
        }

        let look = |kind, ast| Ast::Look {
            kind,
            ast: Box::new(ast),
        };

        match self.bump() {
            None => Err(Error::new(ErrorKind::UnterminatedGroupHeader, start)),
            Some(':') => self.parse_group_body(start).map(Some),
            Some('=') => Ok(Some(look(LookKind::Ahead, self.parse_group_body(start)?))),
            Some('!') => Ok(Some(look(LookKind::NegativeAhead, self.parse_group_body(start)?))),
            Some('>') => Ok(Some(look(LookKind::Atomic, self.parse_group_body(start)?))),
            Some('#') => loop {
                match self.bump() {
                    None => return Err(Error::new(ErrorKind::UnclosedGroup, start)),
                    Some(')') => return Ok(None),
                    Some(_) => {}
                }
            },
            Some('<') if matches!(self.peek(), Some('=') | Some('!')) => {
                Err(Error::new(ErrorKind::Lookbehind, start))
            }
            Some('<') => {
                let name = self.parse_group_name('>', start)?;
                self.parse_capture(start, Some(name)).map(Some)
            }
            Some('\'') => {
                let name = self.parse_group_name('\'', start)?;
                self.parse_capture(start, Some(name)).map(Some)
            }
            Some('P') => match self.bump() {
                Some('<') => {
                    let name = self.parse_group_name('>', start)?;
                    self.parse_capture(start, Some(name)).map(Some)
                }
                None => Err(Error::new(ErrorKind::UnterminatedGroupHeader, start)),
                Some(_) => Err(Error::new(ErrorKind::UnknownGroupSyntax, start)),
            },
            Some(c) if matches!(c, 'i' | 'm' | 's' | 'x' | '-' | ')' | ':') => {
                self.pos -= c.len_utf8();
                self.parse_flags(start)
            }
            Some(_) => Err(Error::new(ErrorKind::UnknownGroupSyntax, start)),
        }
    }

    fn parse_flags(&mut self, start: usize) -> Result<Option<Ast>> {
        let mut flags = self.flags;
        let mut negate = false;

        loop {
            let at = self.pos;
            let flag = match self.bump() {
                None => return Err(Error::new(ErrorKind::UnterminatedGroupHeader, start)),
                Some('-') if !negate => {
                    negate = true;
                    continue;
                }
                Some(')') => {
                    // applies up to the end of the enclosing group
                    self.flags = flags;
                    return Ok(None);
                }
                Some(':') => {
                    let saved = self.flags;
                    self.flags = flags;
                    let ast = self.parse_group_body(start);
                    self.flags = saved;
                    return ast.map(Some);
                }
                Some('i') => Flags::CASELESS,
                Some('m') => Flags::MULTILINE,
                Some('s') => Flags::DOTALL,
                Some('x') => Flags::EXTENDED,
                Some(c) => return Err(Error::new(ErrorKind::UnknownFlag(c), at)),
            };

            flags.set(flag, !negate);
        }
    }

    fn parse_group_name(&mut self, close: char, start: usize) -> Result<String> {
        let name_start = self.pos;

        loop {
            match self.bump() {
                None => return Err(Error::new(ErrorKind::UnterminatedGroupHeader, start)),
                Some(c) if c == close => break,
                Some(_) => {}
            }
        }

        let name = &self.pattern[name_start..self.pos - close.len_utf8()];
        let mut chars = name.chars();

        match chars.next() {
            None => Err(Error::new(ErrorKind::EmptyGroupName, name_start)),
            Some(c) if (c == '_' || c.is_alphabetic()) && chars.all(|c| c == '_' || c.is_alphanumeric()) => {
                if self.captures.group_index(name).is_some() {
                    Err(Error::new(ErrorKind::DuplicateGroupName(name.into()), name_start))
                } else {
                    Ok(name.into())
                }
            }
            Some(_) => Err(Error::new(ErrorKind::InvalidGroupName(name.into()), name_start)),
        }
    }

    fn parse_capture(&mut self, start: usize, name: Option<String>) -> Result<Ast> {
        let parent = self.groups.last().copied().unwrap_or(0);
        let index = self.captures.push(name, parent);

        self.groups.push(index);
        let ast = self.parse_group_body(start)?;
        self.groups.pop();

        Ok(Ast::Capture {
            index,
            ast: Box::new(ast),
        })
    }

    /// Parse up to and including the `)` closing the group opened at `start`.
    fn parse_group_body(&mut self, start: usize) -> Result<Ast> {
        let saved = self.flags;

        self.depth += 1;
        let ast = self.parse_alternation()?;
        self.depth -= 1;

        self.flags = saved;

        if self.eat(')') {
            Ok(ast)
        } else {
            Err(Error::new(ErrorKind::UnclosedGroup, start))
        }
    }

    /// Parse the escape sequence whose `\` is at `start` and has been consumed.
    fn parse_escape(&mut self, start: usize) -> Result<Escape> {
        let c = self
            .bump()
            .ok_or_else(|| Error::new(ErrorKind::DanglingEscape, start))?;

        let perl = |class: &CharClass, negated: bool| {
            let mut class = class.clone();
            if negated {
                class.negate();
            }
            Escape::Class(class)
        };

        Ok(match c {
            't' => Escape::Char('\t'),
            'n' => Escape::Char('\n'),
            'r' => Escape::Char('\r'),
            'f' => Escape::Char('\x0C'),
            'v' => Escape::Char('\x0B'),
            'a' => Escape::Char('\x07'),
            'e' => Escape::Char('\x1B'),
            '0' => Escape::Char('\0'),
            'x' => Escape::Char(self.parse_hex(start)?),
            'u' => Escape::Char(self.parse_hex_digits(4, 4, start)?),
            'd' => perl(self.engine.digit(), false),
            'D' => perl(self.engine.digit(), true),
            'w' => perl(self.engine.word(), false),
            'W' => perl(self.engine.word(), true),
            's' => perl(self.engine.space(), false),
            'S' => perl(self.engine.space(), true),
            'b' => Escape::Assert(Assertion::WordBoundary),
            'B' => Escape::Assert(Assertion::NotWordBoundary),
            'A' => Escape::Assert(Assertion::StartText),
            'z' => Escape::Assert(Assertion::EndText),
            'Z' => Escape::Assert(Assertion::EndTextOptionalNewline),
            '1'..='9' => return Err(Error::new(ErrorKind::Backreference, start)),
            c if c.is_ascii_alphanumeric() => return Err(Error::new(ErrorKind::UnknownEscape(c), start)),
            c => Escape::Char(c),
        })
    }

    /// `\xHH` or `\x{H...}`
    fn parse_hex(&mut self, start: usize) -> Result<char> {
        if !self.eat('{') {
            return self.parse_hex_digits(2, 2, start);
        }

        let c = self.parse_hex_digits(1, 6, start)?;

        if self.eat('}') {
            Ok(c)
        } else {
            Err(Error::new(ErrorKind::InvalidCodePoint, start))
        }
    }

    fn parse_hex_digits(&mut self, min: usize, max: usize, start: usize) -> Result<char> {
        let digits = self.pattern[self.pos..]
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_hexdigit)
            .count();

        if digits < min {
            return Err(Error::new(ErrorKind::InvalidCodePoint, start));
        }

        let hex = &self.pattern[self.pos..self.pos + digits];
        self.pos += digits;

        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::new(ErrorKind::InvalidCodePoint, start))
    }

    /// Parse a bracketed class whose `[` is at `start` and has been consumed.
    fn parse_class(&mut self, start: usize) -> Result<CharClass> {
        let negated = self.eat('^');
        let mut class = CharClass::new();
        let mut first = true;

        loop {
            let item = self.pos;
            let c = self
                .bump()
                .ok_or_else(|| Error::new(ErrorKind::UnclosedClass, start))?;

            if c == ']' && !first {
                break;
            }
            first = false;

            let lo = match c {
                '[' if self.peek() == Some(':') => match self.parse_posix_class(item)? {
                    Some(posix) => {
                        class.union(&posix);
                        continue;
                    }
                    None => '[',
                },
                '\\' => match self.parse_class_escape(item)? {
                    Escape::Char(c) => c,
                    Escape::Class(perl) => {
                        class.union(&perl);
                        continue;
                    }
                    Escape::Assert(_) => return Err(Error::new(ErrorKind::InvalidClassRange, item)),
                },
                c => c,
            };

            if self.peek() == Some('-') && self.peek_nth(1).map_or(false, |c| c != ']') {
                self.bump();

                let hi_start = self.pos;
                let hi = match self.bump() {
                    None => return Err(Error::new(ErrorKind::UnclosedClass, start)),
                    Some('\\') => match self.parse_class_escape(hi_start)? {
                        Escape::Char(c) => c,
                        Escape::Class(_) | Escape::Assert(_) => {
                            return Err(Error::new(ErrorKind::InvalidClassRange, item));
                        }
                    },
                    Some(c) => c,
                };

                if hi < lo {
                    return Err(Error::new(ErrorKind::EmptyClassRange, item));
                }

                class.push(lo, hi);
            } else {
                class.push_char(lo);
            }
        }

        class.canonicalize();

        if self.flags.contains(Flags::CASELESS) {
            class.case_fold(self.engine);
        }
        if negated {
            class.negate();
        }

        Ok(class)
    }

    /// Escapes inside a class, where `\b` is a backspace and other assertions are invalid.
    fn parse_class_escape(&mut self, start: usize) -> Result<Escape> {
        match self.peek() {
            Some('b') => {
                self.bump();
                Ok(Escape::Char('\x08'))
            }
            Some(c) => match self.parse_escape(start)? {
                Escape::Assert(_) => Err(Error::new(ErrorKind::UnknownEscape(c), start)),
                escape => Ok(escape),
            },
            None => Err(Error::new(ErrorKind::DanglingEscape, start)),
        }
    }

    /// `[:name:]` or `[:^name:]`, with the leading `[` at `start` already consumed.
    ///
    /// Returns `None` when the text is not shaped like a POSIX class, in which case `[` is a literal.
    fn parse_posix_class(&mut self, start: usize) -> Result<Option<CharClass>> {
        let rest = &self.pattern[self.pos + 1..];
        let end = match rest.find(":]") {
            Some(end) => end,
            None => return Ok(None),
        };

        let (negated, name) = match rest[..end].strip_prefix('^') {
            Some(name) => (true, name),
            None => (false, &rest[..end]),
        };

        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_lowercase()) {
            return Ok(None);
        }

        let mut class = self
            .engine
            .posix(name)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::UnknownPosixClass(name.into()), start))?;

        if negated {
            class.negate();
        }

        self.pos += 1 + end + 2;

        Ok(Some(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(pattern: &str) -> (Ast, CaptureTable) {
        parse(pattern, Flags::empty(), &Config::default()).unwrap()
    }

    fn parse_err(pattern: &str) -> Error {
        parse(pattern, Flags::empty(), &Config::default()).unwrap_err()
    }

    #[test]
    fn test_parse_literals() {
        let (ast, captures) = parse_ok("ab");

        assert_eq!(ast, Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b')]));
        assert_eq!(captures.num_groups(), 1);

        assert_eq!(parse_ok("").0, Ast::Empty);
        assert_eq!(parse_ok(r"\.").0, Ast::Literal('.'));
        assert_eq!(parse_ok(r"\x41").0, Ast::Literal('A'));
        assert_eq!(parse_ok(r"\x{1F600}").0, Ast::Literal('😀'));
        assert_eq!(parse_ok(r"é").0, Ast::Literal('é'));
        assert_eq!(parse_ok("a{").0, Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('{')]));
    }

    #[test]
    fn test_parse_groups() {
        let (ast, captures) = parse_ok(r"(?<year>\d{4})-(?:(\d\d)|(?P<day>x))");

        assert_eq!(captures.num_groups(), 4);
        assert_eq!(captures.group_name(1), Some("year"));
        assert_eq!(captures.group_name(2), None);
        assert_eq!(captures.group_name(3), Some("day"));
        assert!(matches!(ast, Ast::Concat(_)));

        let (_, captures) = parse_ok("(a(b)(c(d)))");

        assert_eq!(captures.num_groups(), 5);
        assert_eq!(captures.parent(1), Some(0));
        assert_eq!(captures.parent(2), Some(1));
        assert_eq!(captures.parent(4), Some(3));

        assert_eq!(parse_ok("(?'n'a)").1.group_index("n"), Some(1));
        assert_eq!(parse_ok("a(?#comment)b").0, parse_ok("ab").0);
    }

    #[test]
    fn test_parse_repeats() {
        let repeat = |min, max, greedy| Ast::Repeat {
            ast: Box::new(Ast::Literal('a')),
            min,
            max,
            greedy,
        };

        assert_eq!(parse_ok("a*").0, repeat(0, None, true));
        assert_eq!(parse_ok("a+?").0, repeat(1, None, false));
        assert_eq!(parse_ok("a??").0, repeat(0, Some(1), false));
        assert_eq!(parse_ok("a{3}").0, repeat(3, Some(3), true));
        assert_eq!(parse_ok("a{2,}").0, repeat(2, None, true));
        assert_eq!(parse_ok("a{,5}").0, repeat(0, Some(5), true));
        assert_eq!(parse_ok("a{2,5}?").0, repeat(2, Some(5), false));
        assert_eq!(
            parse_ok("a*+").0,
            Ast::Look {
                kind: LookKind::Atomic,
                ast: Box::new(repeat(0, None, true))
            }
        );
    }

    #[test]
    fn test_parse_grouped_assertion_repeats() {
        let _ = pretty_env_logger::try_init();

        assert_eq!(
            parse_ok("(?:^)*").0,
            Ast::Repeat {
                ast: Box::new(Ast::Assert(Assertion::StartText)),
                min: 0,
                max: None,
                greedy: true,
            }
        );
        assert_eq!(
            parse_ok(r"(?:\b)?x").0,
            Ast::Concat(vec![
                Ast::Repeat {
                    ast: Box::new(Ast::Assert(Assertion::WordBoundary)),
                    min: 0,
                    max: Some(1),
                    greedy: true,
                },
                Ast::Literal('x'),
            ])
        );

        assert_eq!(parse_err("^*").kind(), &ErrorKind::MissingRepeatTarget);
        assert_eq!(parse_err(r"x\b+").offset(), Some(3));
    }

    #[test]
    fn test_parse_flags() {
        let (ast, _) = parse("a", Flags::CASELESS, &Config::default()).unwrap();

        match ast {
            Ast::Class(class) => {
                assert!(class.contains('a'));
                assert!(class.contains('A'));
            }
            ast => panic!("unexpected {:?}", ast),
        }

        assert_eq!(
            parse_ok("(?i:k)x").0,
            Ast::Concat(vec![
                Ast::Class(CharClass::from_ranges(vec![('K', 'K'), ('k', 'k'), ('\u{212A}', '\u{212A}')])),
                Ast::Literal('x')
            ])
        );
        assert_eq!(parse_ok("(?s).").0, Ast::Dot { dotall: true });
        assert_eq!(parse_ok("(?m)^").0, Ast::Assert(Assertion::StartLine));
        assert_eq!(parse_ok("(?m-m)^").0, Ast::Assert(Assertion::StartText));
        assert_eq!(parse_ok("(?x) a b # comment\n c").0, parse_ok("abc").0);
        assert_eq!(parse_ok("((?s))."), parse_ok("()."));
    }

    #[test]
    fn test_parse_classes() {
        let class = |pattern: &str| match parse_ok(pattern).0 {
            Ast::Class(class) => class,
            ast => panic!("unexpected {:?}", ast),
        };

        assert_eq!(class("[a-cx]").ranges(), &[('a', 'c'), ('x', 'x')]);
        assert_eq!(class("[]a]").ranges(), &[(']', ']'), ('a', 'a')]);
        assert_eq!(class("[a-]").ranges(), &[('-', '-'), ('a', 'a')]);
        assert_eq!(class("[[:digit:]x]").ranges(), &[('0', '9'), ('x', 'x')]);
        assert_eq!(class(r"[\d\-]").ranges(), &[('-', '-'), ('0', '9')]);
        assert!(!class("[^a]").contains('a'));
        assert!(class("[^a]").contains('b'));
        assert!(!class("[[:^alpha:]]").contains('q'));
        assert_eq!(parse_ok("[a]").0, Ast::Literal('a'));
        assert_eq!(parse_ok(r"[\b]").0, Ast::Literal('\x08'));
    }

    #[test]
    fn test_parse_errors() {
        let _ = pretty_env_logger::try_init();

        let cases = vec![
            ("(", ErrorKind::UnclosedGroup, Some(0)),
            ("a(b", ErrorKind::UnclosedGroup, Some(1)),
            ("a)", ErrorKind::UnopenedGroup, Some(1)),
            ("(?", ErrorKind::UnterminatedGroupHeader, Some(0)),
            ("(?Q)", ErrorKind::UnknownGroupSyntax, Some(0)),
            ("(?iq)", ErrorKind::UnknownFlag('q'), Some(3)),
            ("(?P<>)", ErrorKind::EmptyGroupName, Some(4)),
            ("(?<1a>x)", ErrorKind::InvalidGroupName("1a".into()), Some(3)),
            ("(?<a>x)(?<a>y)", ErrorKind::DuplicateGroupName("a".into()), Some(10)),
            ("[", ErrorKind::UnclosedClass, Some(0)),
            ("[a", ErrorKind::UnclosedClass, Some(0)),
            ("[z-a]", ErrorKind::EmptyClassRange, Some(1)),
            (r"[a-\d]", ErrorKind::InvalidClassRange, Some(1)),
            ("[[:bogus:]]", ErrorKind::UnknownPosixClass("bogus".into()), Some(1)),
            ("*", ErrorKind::MissingRepeatTarget, Some(0)),
            ("a|+", ErrorKind::MissingRepeatTarget, Some(2)),
            ("(*)", ErrorKind::MissingRepeatTarget, Some(1)),
            ("^*", ErrorKind::MissingRepeatTarget, Some(1)),
            ("{2}", ErrorKind::MissingRepeatTarget, Some(0)),
            ("a**", ErrorKind::NestedRepeat, Some(2)),
            ("a{2}{3}", ErrorKind::NestedRepeat, Some(4)),
            ("a{3,2}", ErrorKind::InvalidRepeatRange, Some(1)),
            ("a{1001}", ErrorKind::RepeatTooLarge(REPEAT_MAX), Some(1)),
            ("a\\", ErrorKind::DanglingEscape, Some(1)),
            (r"\q", ErrorKind::UnknownEscape('q'), Some(0)),
            (r"\xZ", ErrorKind::InvalidCodePoint, Some(0)),
            (r"\x{110000}", ErrorKind::InvalidCodePoint, Some(0)),
            (r"(a)\1", ErrorKind::Backreference, Some(3)),
            ("(?<=a)b", ErrorKind::Lookbehind, Some(0)),
            ("(?<!a)b", ErrorKind::Lookbehind, Some(0)),
            ("(?#open", ErrorKind::UnclosedGroup, Some(0)),
        ];

        for (pattern, kind, offset) in cases {
            let err = parse_err(pattern);

            assert_eq!(err.kind(), &kind, "pattern `{}`", pattern);
            assert_eq!(err.offset(), offset, "pattern `{}`", pattern);
        }
    }

    #[test]
    fn test_nest_limit() {
        let config = Config::default().nest_limit(3);

        assert!(parse("((()))", Flags::empty(), &config).is_ok());
        assert_eq!(
            parse("(((())))", Flags::empty(), &config).unwrap_err().kind(),
            &ErrorKind::NestTooDeep(3)
        );
    }
}
