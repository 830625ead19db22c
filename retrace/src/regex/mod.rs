//! Regex compatible interface
mod builder;
mod re;

pub use builder::RegexBuilder;
pub use re::{CaptureMatches, CaptureNames, Captures, Match, Matches, Regex, Split, SplitN};
