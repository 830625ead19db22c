use std::fmt;

use crate::compile::{ast::Ast, parser::parse, Config, Pattern};
use crate::Result;

/// A type containing information related to an expression
///
/// # Examples
///
/// ```rust
/// # use retrace::prelude::*;
/// let pattern: Pattern = r"(\d{4})-(\d{2})-(\d{2,4})".parse().unwrap();
/// let info = pattern.info().unwrap();
///
/// assert_eq!(info.min_width(), 10);
/// assert_eq!(info.max_width(), Some(12));
/// assert!(!info.anchored_start());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprInfo {
    min_width: usize,
    max_width: Option<usize>,
    anchored_start: bool,
}

impl fmt::Debug for ExprInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprInfo")
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("anchored_start", &self.anchored_start)
            .finish()
    }
}

impl ExprInfo {
    pub(crate) fn new(ast: &Ast) -> Self {
        ExprInfo {
            min_width: ast.min_width(),
            max_width: ast.max_width(),
            anchored_start: ast.is_anchored_start(),
        }
    }

    /// The minimum length in bytes of a match for the pattern.
    pub fn min_width(&self) -> usize {
        self.min_width
    }

    /// The maximum length in bytes of a match for the pattern, `None` if it is unbounded.
    pub fn max_width(&self) -> Option<usize> {
        self.max_width
    }

    /// Whether this expression can only match at the start of the subject.
    pub fn anchored_start(&self) -> bool {
        self.anchored_start
    }
}

impl Pattern {
    ///
    /// Utility function providing information about a regular expression.
    ///
    /// The information provided in ExprInfo
    /// includes the minimum and maximum width of a pattern match.
    ///
    pub fn info(&self) -> Result<ExprInfo> {
        let (ast, _) = parse(&self.expression, self.flags, &Config::default())?;

        Ok(ExprInfo::new(&ast))
    }
}
