use std::fmt;
use std::mem;
use std::str::FromStr;

use crate::{
    compile::{parse, CaptureTable, Config, ExprInfo, Flags, Inst, Pattern, Program},
    Error, Result,
};

/// A compiled pattern that can then be used to scan data.
///
/// A database is immutable once compiled and may be shared between threads; every concurrent caller brings its
/// own [`Scratch`](crate::Scratch).
#[derive(Clone)]
pub struct Database {
    pattern: Pattern,
    program: Program,
    captures: CaptureTable,
    info: ExprInfo,
    config: Config,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("pattern", &self.pattern.to_string())
            .field("groups", &self.captures.num_groups())
            .field("insts", &self.program.len())
            .field("info", &self.info)
            .finish()
    }
}

impl FromStr for Database {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Database::with_config(s.parse()?, &Config::default())
    }
}

impl Database {
    /// Compile an expression with the given flags and the default limits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::prelude::*;
    /// let db = Database::compile(r"(\w+)@(\w+)", PatternFlags::empty()).unwrap();
    ///
    /// assert_eq!(db.num_groups(), 3);
    /// assert_eq!(db.record_len(), 6);
    /// ```
    pub fn compile<S: Into<String>>(expression: S, flags: Flags) -> Result<Database> {
        Database::with_config(Pattern::with_flags(expression, flags), &Config::default())
    }

    /// Compile a pattern with the given compile and search limits.
    pub fn with_config(pattern: Pattern, config: &Config) -> Result<Database> {
        let (ast, captures) = parse(&pattern.expression, pattern.flags, config)?;
        let program = Program::compile(&ast, captures.num_groups(), config)?;
        let info = ExprInfo::new(&ast);

        debug!(
            "compiled pattern {} to {} instructions, {} groups, {:?}",
            pattern,
            program.len(),
            captures.num_groups(),
            info
        );
        trace!("{:?}", program);

        Ok(Database {
            pattern,
            program,
            captures,
            info,
            config: *config,
        })
    }

    /// The source pattern of this database.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The source expression, verbatim.
    pub fn as_str(&self) -> &str {
        &self.pattern.expression
    }

    /// The flags the pattern was compiled with.
    pub fn flags(&self) -> Flags {
        self.pattern.flags
    }

    /// The number of capture groups, including the whole-match group `0`.
    pub fn num_groups(&self) -> usize {
        self.captures.num_groups()
    }

    /// The name of the group at `index`, if it is a named group.
    pub fn group_name(&self, index: usize) -> Option<&str> {
        self.captures.group_name(index)
    }

    /// The capture table of the pattern.
    pub fn captures(&self) -> &CaptureTable {
        &self.captures
    }

    /// Width and anchoring information computed at compile time.
    pub fn info(&self) -> ExprInfo {
        self.info
    }

    /// The limits the pattern was compiled with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of integers in one flat match record: a `(start, length)` pair per group.
    pub fn record_len(&self) -> usize {
        self.num_groups() * 2
    }

    /// Provides the approximate size of the compiled program in bytes.
    pub fn size(&self) -> usize {
        let classes: usize = self
            .program
            .insts()
            .iter()
            .map(|inst| match inst {
                Inst::Class(class) => class.ranges().len() * mem::size_of::<(char, char)>(),
                _ => 0,
            })
            .sum();

        mem::size_of::<Self>() + self.program.len() * mem::size_of::<Inst>() + classes
    }

    pub(crate) fn program(&self) -> &Program {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use crate::compile::ErrorKind;
    use crate::prelude::*;
    use crate::Error;

    #[test]
    fn test_database() {
        let _ = pretty_env_logger::try_init();

        let db: Database = "/te(?<last>st)/i".parse().unwrap();

        assert!(db.size() > 0);
        assert_eq!(db.as_str(), "te(?<last>st)");
        assert_eq!(db.flags(), PatternFlags::CASELESS);
        assert_eq!(db.num_groups(), 2);
        assert_eq!(db.group_name(0), None);
        assert_eq!(db.group_name(1), Some("last"));
        assert_eq!(db.captures().group_index("last"), Some(1));
        assert_eq!(db.record_len(), 4);
        assert_eq!(db.info().min_width(), 4);
    }

    #[test]
    fn test_database_error() {
        let err = "a)".parse::<Database>().unwrap_err();

        match err {
            Error::Compile(ref err) => {
                assert_eq!(err.kind(), &ErrorKind::UnopenedGroup);
                assert_eq!(err.offset(), Some(1));
            }
            err => panic!("unexpected {:?}", err),
        }

        assert_eq!(err.to_string(), "unmatched close parenthesis at offset 1");
    }

    #[test]
    fn test_database_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Database>();
    }
}
