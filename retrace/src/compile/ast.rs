use crate::compile::CharClass;

/// Zero-width assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Assertion {
    /// `\A`, or `^` without multi-line.
    StartText,
    /// `\z`, or `$` without multi-line.
    EndText,
    /// `\Z`
    EndTextOptionalNewline,
    /// `^` in multi-line mode.
    StartLine,
    /// `$` in multi-line mode.
    EndLine,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

/// Sub-expressions that are resolved by a nested search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LookKind {
    /// `(?=...)`
    Ahead,
    /// `(?!...)`
    NegativeAhead,
    /// `(?>...)`, and possessive quantifiers.
    Atomic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Ast {
    Empty,
    Literal(char),
    Class(CharClass),
    Dot { dotall: bool },
    Assert(Assertion),
    Capture { index: usize, ast: Box<Ast> },
    Look { kind: LookKind, ast: Box<Ast> },
    Repeat {
        ast: Box<Ast>,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    },
    Concat(Vec<Ast>),
    Alternate(Vec<Ast>),
}

impl Ast {
    /// The shortest match in bytes.
    pub fn min_width(&self) -> usize {
        match self {
            Ast::Empty | Ast::Assert(_) => 0,
            Ast::Literal(c) => c.len_utf8(),
            Ast::Class(class) => class.ranges().first().map_or(0, |&(lo, _)| lo.len_utf8()),
            Ast::Dot { .. } => 1,
            Ast::Capture { ast, .. } => ast.min_width(),
            Ast::Look { kind, ast } => match kind {
                LookKind::Atomic => ast.min_width(),
                LookKind::Ahead | LookKind::NegativeAhead => 0,
            },
            Ast::Repeat { ast, min, .. } => ast.min_width().saturating_mul(*min as usize),
            Ast::Concat(asts) => asts.iter().fold(0, |n, ast| n.saturating_add(ast.min_width())),
            Ast::Alternate(asts) => asts.iter().map(Ast::min_width).min().unwrap_or(0),
        }
    }

    /// The longest match in bytes, or `None` if it is unbounded.
    pub fn max_width(&self) -> Option<usize> {
        match self {
            Ast::Empty | Ast::Assert(_) => Some(0),
            Ast::Literal(c) => Some(c.len_utf8()),
            Ast::Class(class) => Some(class.ranges().last().map_or(0, |&(_, hi)| hi.len_utf8())),
            Ast::Dot { .. } => Some(4),
            Ast::Capture { ast, .. } => ast.max_width(),
            Ast::Look { kind, ast } => match kind {
                LookKind::Atomic => ast.max_width(),
                LookKind::Ahead | LookKind::NegativeAhead => Some(0),
            },
            Ast::Repeat { ast, max, .. } => match (ast.max_width(), max) {
                (Some(0), _) => Some(0),
                (Some(width), Some(max)) => width.checked_mul(*max as usize),
                _ => None,
            },
            Ast::Concat(asts) => asts
                .iter()
                .try_fold(0usize, |n, ast| ast.max_width().and_then(|w| n.checked_add(w))),
            Ast::Alternate(asts) => asts
                .iter()
                .try_fold(0usize, |n, ast| ast.max_width().map(|w| n.max(w))),
        }
    }

    /// Whether every match must start at the beginning of the subject.
    pub fn is_anchored_start(&self) -> bool {
        match self {
            Ast::Assert(Assertion::StartText) => true,
            Ast::Capture { ast, .. } => ast.is_anchored_start(),
            Ast::Look {
                kind: LookKind::Atomic,
                ast,
            } => ast.is_anchored_start(),
            Ast::Repeat { ast, min, .. } => *min > 0 && ast.is_anchored_start(),
            Ast::Concat(asts) => asts
                .iter()
                .find(|ast| !matches!(ast, Ast::Empty))
                .map_or(false, Ast::is_anchored_start),
            Ast::Alternate(asts) => !asts.is_empty() && asts.iter().all(Ast::is_anchored_start),
            _ => false,
        }
    }
}
