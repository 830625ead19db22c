mod backtrack;
mod matches;
mod record;
mod scan;
mod scratch;

pub use self::matches::{Capture, MatchResult, MatchSet, Stop};
pub use self::record::{RecordWriter, Scanned};
pub use self::scan::{Matching, ScanIter};
pub use self::scratch::Scratch;
