use crate::common::Database;
use crate::compile::{Config, Pattern, Patterns};
use crate::Result;

/// The regular expression pattern database builder.
pub trait Builder {
    /// The type of the compiled result.
    type Output;

    /// Build an expression into a database which can be passed to the runtime functions.
    fn build(&self) -> Result<Self::Output> {
        self.with_config(&Config::default())
    }

    /// Build an expression into a database, applying the given compile and search limits.
    fn with_config(&self, config: &Config) -> Result<Self::Output>;
}

impl Builder for Pattern {
    type Output = Database;

    ///
    /// The basic regular expression compiler.
    ///
    /// This is the function call with which an expression is compiled
    /// into a database which can be passed to the runtime functions.
    ///
    fn with_config(&self, config: &Config) -> Result<Database> {
        Database::with_config(self.clone(), config)
    }
}

impl Builder for Patterns {
    type Output = Vec<Database>;

    ///
    /// The multiple regular expression compiler.
    ///
    /// Each expression is compiled into its own database; the first failure aborts the build.
    ///
    fn with_config(&self, config: &Config) -> Result<Vec<Database>> {
        self.iter().map(|pattern| pattern.with_config(config)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::compile::ErrorKind;
    use crate::prelude::*;
    use crate::Error;

    #[test]
    fn test_build_pattern() {
        let _ = pretty_env_logger::try_init();

        let db = pattern! {"(?<word>te(s)t)"; CASELESS}.build().unwrap();

        assert_eq!(db.num_groups(), 3);
        assert_eq!(db.group_name(1), Some("word"));
        assert_eq!(db.as_str(), "(?<word>te(s)t)");
    }

    #[test]
    fn test_build_patterns() {
        let dbs = patterns!(["foo", "bar+", r"\d"]).build().unwrap();

        assert_eq!(dbs.len(), 3);

        match patterns!(["foo", "bar+", "*"]).build() {
            Err(Error::Compile(err)) => assert_eq!(err.kind(), &ErrorKind::MissingRepeatTarget),
            res => panic!("unexpected {:?}", res),
        }
    }

    #[test]
    fn test_build_with_config() {
        let config = Config::new().size_limit(8);

        assert!(pattern!("abc").with_config(&config).is_ok());
        assert!(pattern!("abcdefgh").with_config(&config).is_err());
    }
}
