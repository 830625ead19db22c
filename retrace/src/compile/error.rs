use std::fmt;

use thiserror::Error as ThisError;

/// The reason a pattern failed to compile.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum ErrorKind {
    /// A group was opened but never closed.
    #[error("end pattern with unmatched parenthesis")]
    UnclosedGroup,

    /// A `)` without a matching `(`.
    #[error("unmatched close parenthesis")]
    UnopenedGroup,

    /// The pattern ended inside a `(?...` group header.
    #[error("end pattern in group")]
    UnterminatedGroupHeader,

    /// An unrecognized `(?...)` construct.
    #[error("undefined group option")]
    UnknownGroupSyntax,

    /// An unrecognized inline flag.
    #[error("invalid inline flag: {0}")]
    UnknownFlag(char),

    /// A named group with an empty name.
    #[error("group name is empty")]
    EmptyGroupName,

    /// A group name that is not a word.
    #[error("invalid group name <{0}>")]
    InvalidGroupName(String),

    /// The same group name used twice.
    #[error("multiplex defined name <{0}>")]
    DuplicateGroupName(String),

    /// A character class without a closing `]`.
    #[error("premature end of char-class")]
    UnclosedClass,

    /// A class range whose end is before its start.
    #[error("empty range in char class")]
    EmptyClassRange,

    /// A class range with a class (like `\d`) as an endpoint.
    #[error("invalid character class range")]
    InvalidClassRange,

    /// An unrecognized `[:name:]` class.
    #[error("invalid POSIX bracket type [:{0}:]")]
    UnknownPosixClass(String),

    /// A quantifier with nothing to repeat.
    #[error("target of repeat operator is not specified")]
    MissingRepeatTarget,

    /// A quantifier applied to a quantifier.
    #[error("nested repeat operator")]
    NestedRepeat,

    /// A `{m,n}` range with `n < m`.
    #[error("upper bound must be greater than lower bound in repeat range")]
    InvalidRepeatRange,

    /// A repeat count above the supported maximum.
    #[error("too big number for repeat range (max {0})")]
    RepeatTooLarge(u32),

    /// The pattern ended with a lone `\`.
    #[error("end pattern at escape")]
    DanglingEscape,

    /// An unrecognized escape sequence.
    #[error("invalid escape sequence \\{0}")]
    UnknownEscape(char),

    /// A malformed or out-of-range `\x`/`\u` escape.
    #[error("invalid code point value")]
    InvalidCodePoint,

    /// A backreference such as `\1`.
    #[error("backreferences are not supported")]
    Backreference,

    /// A lookbehind assertion.
    #[error("lookbehind is not supported")]
    Lookbehind,

    /// Groups or repetitions nested deeper than the configured limit.
    #[error("nesting of groups exceeds the limit of {0}")]
    NestTooDeep(usize),

    /// The compiled program exceeds the configured size limit.
    #[error("compiled program exceeds the size limit of {0} instructions")]
    TooBig(usize),
}

/// Providing details of the compile error condition.
#[derive(Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    offset: Option<usize>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Error {
            kind,
            offset: Some(offset),
        }
    }

    pub(crate) fn without_offset(kind: ErrorKind) -> Self {
        Error { kind, offset: None }
    }

    /// The reason of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// A human-readable error message describing the error.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// The byte offset into the pattern text at which the error was detected (if this can be determined).
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} at offset {}", self.kind, offset),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message())
            .field("offset", &self.offset)
            .finish()
    }
}

impl std::error::Error for Error {}
