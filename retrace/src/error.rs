use std::result::Result as StdResult;

use thiserror::Error;

/// The type returned by retrace methods.
pub type Result<T> = StdResult<T, Error>;

/// Retrace Error
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] crate::compile::Error),

    /// The search offset is past the end of the subject.
    #[error("search offset {offset} is out of bounds for subject of {len} bytes")]
    InvalidOffset {
        /// The requested offset.
        offset: usize,
        /// The subject length in bytes.
        len: usize,
    },

    /// The search ran out of visited set memory and then out of backtracking steps.
    #[error("search exceeded the backtrack limit of {limit} untracked steps")]
    BacktrackLimit {
        /// The configured limit.
        limit: usize,
    },

    /// Match offsets cannot be represented in a 32-bit record.
    #[error("subject of {0} bytes is too long for 32-bit match records")]
    OffsetOverflow(usize),

    /// Invalid flag
    #[error("invalid pattern flag: {0}")]
    InvalidFlag(char),
}
