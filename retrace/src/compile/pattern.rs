use std::fmt;
use std::iter::FromIterator;
use std::str::FromStr;

use bitflags::bitflags;
use derive_more::{Deref, DerefMut, From, Index, IndexMut, Into, IntoIterator};

use crate::Error;

bitflags! {
    /// Pattern flags
    ///
    /// The bit values are part of the C ABI.
    #[derive(Default)]
    pub struct Flags: u32 {
        /// Set case-insensitive matching.
        const CASELESS = 1;
        /// Ignore whitespace and `#` comments in the pattern.
        const EXTENDED = 2;
        /// Set multi-line anchoring.
        const MULTILINE = 4;
        /// Matching a `.` will not exclude newlines.
        const DOTALL = 8;
    }
}

impl FromStr for Flags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::empty();

        for c in s.chars() {
            match c {
                'i' => flags |= Flags::CASELESS,
                'm' => flags |= Flags::MULTILINE,
                's' => flags |= Flags::DOTALL,
                'x' => flags |= Flags::EXTENDED,
                _ => {
                    return Err(Error::InvalidFlag(c));
                }
            }
        }

        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Flags::CASELESS) {
            write!(f, "i")?
        }
        if self.contains(Flags::MULTILINE) {
            write!(f, "m")?
        }
        if self.contains(Flags::DOTALL) {
            write!(f, "s")?
        }
        if self.contains(Flags::EXTENDED) {
            write!(f, "x")?
        }
        Ok(())
    }
}

/// The pattern with basic regular expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// The expression to parse.
    pub expression: String,
    /// Flags which modify the behaviour of the expression.
    pub flags: Flags,
}

impl Pattern {
    /// Construct a pattern with expression.
    pub fn new<S: Into<String>>(expr: S) -> Pattern {
        Pattern {
            expression: expr.into(),
            flags: Flags::empty(),
        }
    }

    /// Construct a pattern with expression and flags.
    pub fn with_flags<S: Into<String>>(expr: S, flags: Flags) -> Pattern {
        Pattern {
            expression: expr.into(),
            flags,
        }
    }

    /// Set case-insensitive matching.
    pub fn caseless(mut self) -> Self {
        self.flags |= Flags::CASELESS;
        self
    }

    /// Matching a `.` will not exclude newlines.
    pub fn dot_all(mut self) -> Self {
        self.flags |= Flags::DOTALL;
        self
    }

    /// Set multi-line anchoring.
    pub fn multi_line(mut self) -> Self {
        self.flags |= Flags::MULTILINE;
        self
    }

    /// Ignore whitespace and comments.
    pub fn extended(mut self) -> Self {
        self.flags |= Flags::EXTENDED;
        self
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flags.is_empty() {
            write!(f, "{}", self.expression)
        } else {
            write!(f, "/{}/{}", self.expression, self.flags)
        }
    }
}

impl FromStr for Pattern {
    type Err = Error;

    /// Parse a pattern either as a bare expression or in `/expression/flags` notation.
    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let pattern = match (expr.starts_with('/'), expr.rfind('/')) {
            (true, Some(end)) if end > 0 => Pattern {
                expression: expr[1..end].into(),
                flags: expr[end + 1..].parse()?,
            },

            _ => Pattern {
                expression: expr.into(),
                flags: Flags::empty(),
            },
        };

        debug!("pattern `{}` parsed to `{}`", expr, pattern);

        Ok(pattern)
    }
}

/// Vec of `Pattern`
#[repr(transparent)]
#[derive(Clone, Debug, Default, Deref, DerefMut, From, Index, IndexMut, Into, IntoIterator)]
#[deref(forward)]
#[deref_mut(forward)]
pub struct Patterns(Vec<Pattern>);

impl FromIterator<Pattern> for Patterns {
    fn from_iter<T: IntoIterator<Item = Pattern>>(iter: T) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl FromStr for Patterns {
    type Err = Error;

    /// Parse one pattern per line, skipping blank lines and `#` comments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.lines()
            .flat_map(|line| {
                let line = line.trim();

                if line.is_empty() || line.starts_with('#') {
                    None
                } else {
                    Some(line.parse())
                }
            })
            .collect::<Result<Vec<_>, Error>>()
            .map(Self)
    }
}

/// Define `Pattern` with flags
///
/// # Examples
///
/// ```rust
/// # #[macro_use] extern crate retrace;
/// # use retrace::prelude::*;
/// let p = pattern! { r"\d+"; CASELESS | MULTILINE };
///
/// assert_eq!(p.expression, r"\d+");
/// assert_eq!(p.flags, PatternFlags::CASELESS | PatternFlags::MULTILINE);
/// ```
#[macro_export]
macro_rules! pattern {
    ( $expr:expr ) => {{
        $crate::Pattern::new($expr)
    }};
    ( $expr:expr ; $( $flag:ident )|* ) => {{
        $crate::Pattern::with_flags($expr, $( $crate::PatternFlags:: $flag )|*)
    }};
}

/// Define multi `Pattern` with flags
#[macro_export]
macro_rules! patterns {
    ( [ $( $expr:expr ),* ] ) => {{
        $crate::Patterns::from(vec![ $( $crate::Pattern::new($expr) ),* ])
    }};
    ( [ $( $expr:expr ),* ]; $( $flag:ident )|* ) => {{
        let flags = $( $crate::PatternFlags:: $flag )|*;

        $crate::Patterns::from(vec![ $( $crate::Pattern::with_flags($expr, flags) ),* ])
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_flags() {
        let _ = pretty_env_logger::try_init();

        let flags = Flags::CASELESS | Flags::DOTALL;

        assert_eq!(flags.to_string(), "is");

        assert_eq!("ism".parse::<Flags>().unwrap(), flags | Flags::MULTILINE);
        assert_eq!("x".parse::<Flags>().unwrap(), Flags::EXTENDED);
        assert_eq!("test".parse::<Flags>(), Err(Error::InvalidFlag('t')));
    }

    #[test]
    fn test_pattern() {
        let _ = pretty_env_logger::try_init();

        let p: Pattern = "test".parse().unwrap();

        assert_eq!(p.expression, "test");
        assert!(p.flags.is_empty());

        let p: Pattern = "/test/".parse().unwrap();

        assert_eq!(p.expression, "test");
        assert!(p.flags.is_empty());

        let p: Pattern = "/test/i".parse().unwrap();

        assert_eq!(p.expression, "test");
        assert_eq!(p.flags, Flags::CASELESS);
        assert_eq!(p.to_string(), "/test/i");

        let p: Pattern = "test/i".parse().unwrap();

        assert_eq!(p.expression, "test/i");
        assert!(p.flags.is_empty());

        let p: Pattern = "/t/e/s/t/i".parse().unwrap();

        assert_eq!(p.expression, "t/e/s/t");
        assert_eq!(p.flags, Flags::CASELESS);
    }

    #[test]
    fn test_patterns() {
        let _ = pretty_env_logger::try_init();

        let patterns: Patterns = "# dates\n/\\d{4}/\n\n/foo|bar/i\n".parse().unwrap();

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].expression, r"\d{4}");
        assert_eq!(patterns[1].flags, Flags::CASELESS);

        let patterns = patterns!(["a", "b"]; CASELESS | DOTALL);

        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().all(|p| p.flags == Flags::CASELESS | Flags::DOTALL));

        let patterns = patterns!(["^a$"]; MULTILINE);

        assert_eq!(patterns[0].flags, Flags::MULTILINE);
    }
}
