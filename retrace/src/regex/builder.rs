use crate::{
    compile::{Config, Flags},
    regex::Regex,
    Result,
};

/// A configurable builder for a regular expression.
///
/// A builder can be used to configure how the regex is built,
/// for example, by setting the default flags
/// (which can be overridden in the expression itself).
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    expr: String,
    flags: Flags,
    config: Config,
}

impl RegexBuilder {
    /// Create a new regular expression builder with the given pattern.
    ///
    /// If the pattern is invalid, then an error will be returned when build is called.
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        RegexBuilder {
            expr: pattern.into(),
            flags: Flags::empty(),
            config: Config::default(),
        }
    }

    /// Consume the builder and compile the regular expression.
    ///
    /// Note that calling `as_str` on the resulting Regex will produce the pattern given to new verbatim.
    /// Notably, it will not incorporate any of the flags set on this builder.
    pub fn build(&self) -> Result<Regex> {
        Regex::with_config(self.expr.as_str(), self.flags, &self.config)
    }

    fn toggle(&mut self, flag: Flags, yes: bool) -> &mut Self {
        self.flags.set(flag, yes);
        self
    }

    /// Set the value for the case insensitive (`i`) flag.
    ///
    /// When enabled, letters in the pattern will match both upper case and lower case variants.
    pub fn case_insensitive(&mut self, yes: bool) -> &mut Self {
        self.toggle(Flags::CASELESS, yes)
    }

    /// Set the value for the multi-line matching (`m`) flag.
    ///
    /// When enabled, ^ matches the beginning of lines and $ matches the end of lines.
    ///
    /// By default, they match beginning/end of the input.
    pub fn multi_line(&mut self, yes: bool) -> &mut Self {
        self.toggle(Flags::MULTILINE, yes)
    }

    /// Set the value for the any character (`s`) flag,
    /// where in . matches anything when s is set and matches anything
    /// except for new line when it is not set (the default).
    pub fn dot_matches_new_line(&mut self, yes: bool) -> &mut Self {
        self.toggle(Flags::DOTALL, yes)
    }

    /// Set the value for the ignore whitespace (`x`) flag.
    ///
    /// When enabled, whitespace such as new lines and spaces will be ignored between expressions in the pattern,
    /// and `#` can be used to start a comment until the next new line.
    pub fn ignore_whitespace(&mut self, yes: bool) -> &mut Self {
        self.toggle(Flags::EXTENDED, yes)
    }

    /// Set the approximate size limit, in instructions, of the compiled program.
    pub fn size_limit(&mut self, limit: usize) -> &mut Self {
        self.config = self.config.size_limit(limit);
        self
    }

    /// Set the nesting limit for groups and repetitions.
    pub fn nest_limit(&mut self, limit: usize) -> &mut Self {
        self.config = self.config.nest_limit(limit);
        self
    }

    /// Set the memory, in bytes, the matcher may use to track visited states at each lookaround depth.
    ///
    /// Haystacks of any length can be searched; states beyond this budget are explored without being tracked.
    pub fn visited_capacity(&mut self, bytes: usize) -> &mut Self {
        self.config = self.config.visited_capacity(bytes);
        self
    }

    /// Set the number of untracked steps a search may take before it fails.
    pub fn backtrack_limit(&mut self, steps: usize) -> &mut Self {
        self.config = self.config.backtrack_limit(steps);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_builder() {
        let _ = pretty_env_logger::try_init();

        let re = RegexBuilder::new("hello.world$")
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .unwrap();

        assert_eq!(re.as_str(), "hello.world$");
        assert!(re.is_match("HELLO\nWorld"));
        assert!(!re.is_match("HELLO\nWorld\n"));

        let re = RegexBuilder::new("^b$").multi_line(true).build().unwrap();

        assert_eq!(re.find("a\nb\nc").map(|m| m.range()), Some(2..3));
    }

    #[test]
    fn test_regex_builder_extended() {
        let re = RegexBuilder::new(r"\d+ # digits")
            .ignore_whitespace(true)
            .build()
            .unwrap();

        assert_eq!(re.find("ab 42").map(|m| m.as_str()), Some("42"));
        assert!(RegexBuilder::new("a{3}").size_limit(2).build().is_err());
        assert!(RegexBuilder::new("((a))").nest_limit(1).build().is_err());
    }
}
