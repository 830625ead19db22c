//! Retrace is a backtracking regular expression engine with capture groups and global matching.
//!
//! Patterns are compiled into a small instruction program and resolved by a bounded backtracking matcher, which
//! explores every `(instruction, position)` pair at most once, so no pattern can take exponential time.
//!
//! # Usage
//!
//! This crate can be used by adding `retrace` to your dependencies in your project's Cargo.toml.
//!
//! ```toml
//! [dependencies]
//! retrace = "0.1"
//! ```
//!
//! # Examples
//!
//! ```
//! #[macro_use]
//! extern crate retrace;
//!
//! use retrace::prelude::*;
//!
//! fn main() {
//!     let pattern = pattern! {r"(\w+)@(\w+)"; CASELESS};
//!     let db: Database = pattern.build().unwrap();
//!     let mut scratch = db.alloc_scratch().unwrap();
//!
//!     db.scan("mail admin@example now", &mut scratch, |m| {
//!         assert_eq!(m.range(), 5..18);
//!         assert_eq!(m.span(2), (11, 7));
//!
//!         println!("found pattern {} @ {:?}", pattern.expression, m.range());
//!
//!         Matching::Continue
//!     }).unwrap();
//! }
//! ```
#![deny(missing_docs, rust_2018_compatibility, rust_2018_idioms)]

#[macro_use]
extern crate log;

mod common;
mod error;
#[macro_use]
mod compile;
pub mod regex;
mod runtime;

pub use crate::common::{init, init_count, version, version_str, Database};
pub use crate::compile::{
    escape, Builder as DatabaseBuilder, Builder, CaptureTable, Config, Error as CompileError, ErrorKind, ExprInfo,
    Flags as PatternFlags, Pattern, Patterns, REPEAT_MAX,
};
pub use crate::error::{Error, Result};
pub use crate::runtime::{Capture, MatchResult, MatchSet, Matching, RecordWriter, ScanIter, Scanned, Scratch, Stop};

/// The `retrace` Prelude
pub mod prelude {
    pub use crate::{
        pattern, patterns, Builder, Config, Database, MatchResult, MatchSet, Matching, Pattern, PatternFlags, Patterns,
        Scratch, Stop,
    };
}
