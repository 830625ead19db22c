#[macro_use]
mod pattern;
mod ast;
mod builder;
mod captures;
pub(crate) mod class;
mod config;
mod error;
mod info;
mod parser;
mod program;

pub(crate) use self::ast::{Assertion, LookKind};
pub use self::builder::Builder;
pub use self::captures::CaptureTable;
pub(crate) use self::class::CharClass;
pub use self::config::{Config, REPEAT_MAX};
pub use self::error::{Error, ErrorKind};
pub use self::info::ExprInfo;
pub(crate) use self::parser::parse;
pub use self::pattern::{Flags, Pattern, Patterns};
pub(crate) use self::program::{Inst, Program};

/// Escape all regex metacharacters in `text` so that it matches literally.
///
/// # Examples
///
/// ```rust
/// # use retrace::prelude::*;
/// let db = Database::compile(retrace::escape("1+1=2?"), PatternFlags::empty()).unwrap();
///
/// assert_eq!(db.find_all("is 1+1=2?", 10).unwrap()[0].span(0), (3, 6));
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        let meta = matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '#' | '-'
        );

        if meta || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a.b*c"), r"a\.b\*c");
        assert_eq!(escape("(x|y)"), r"\(x\|y\)");
        assert_eq!(escape("é"), "é");

        let text = r"^[a-z]{2}$ # \";
        let (ast, _) = parse(&escape(text), Flags::EXTENDED, &Config::default()).unwrap();

        assert_eq!(ast.min_width(), text.len());
    }
}
