use std::convert::TryFrom;

use crate::{
    common::Database,
    runtime::{scan::Cursor, MatchResult, Stop},
    Error, Result,
};

/// Writes matches into a flat integer buffer, one fixed-size record per match.
///
/// A record holds a `(start, length)` pair for every group, `(-1, -1)` for groups that did not participate.
/// Records are written whole or not at all.
#[derive(Debug)]
pub struct RecordWriter<'b> {
    buf: &'b mut [i32],
    record_len: usize,
    count: usize,
}

impl<'b> RecordWriter<'b> {
    /// Create a writer for matches with `num_groups` groups.
    pub fn new(buf: &'b mut [i32], num_groups: usize) -> Self {
        RecordWriter {
            buf,
            record_len: num_groups * 2,
            count: 0,
        }
    }

    /// The number of whole records that fit in the buffer.
    pub fn capacity(&self) -> usize {
        if self.record_len == 0 {
            0
        } else {
            self.buf.len() / self.record_len
        }
    }

    /// The number of records written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns true if no further record fits.
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity()
    }

    /// Append the record of `m`, returning `false` if it does not fit.
    ///
    /// Fails with `Error::OffsetOverflow` if an offset does not fit in an `i32`; nothing is written then.
    pub fn push(&mut self, m: &MatchResult) -> Result<bool> {
        if self.is_full() {
            return Ok(false);
        }

        for capture in m.iter().take(self.record_len / 2).flatten() {
            i32::try_from(capture.to).map_err(|_| Error::OffsetOverflow(capture.to))?;
        }

        let offset = self.count * self.record_len;
        let record = &mut self.buf[offset..offset + self.record_len];

        for (group, pair) in record.chunks_mut(2).enumerate() {
            let (start, len) = match m.get(group) {
                Some(capture) => (capture.from as i32, capture.len() as i32),
                None => (-1, -1),
            };

            pair[0] = start;
            pair[1] = len;
        }

        self.count += 1;

        Ok(true)
    }
}

/// The outcome of [`Database::scan_into`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scanned {
    /// The number of records written.
    pub count: usize,
    /// Why the scan stopped.
    pub stop: Stop,
}

impl Database {
    /// Write up to `max_matches` non-overlapping matches in `text` into `buf` as flat records.
    ///
    /// Every record is [`Database::record_len`] integers long. The scan stops at `max_matches` or when the next
    /// record would not fit, whichever comes first. If the search fails, the records already written stay intact.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use retrace::prelude::*;
    /// let db: Database = r"(\w)(\d)?".parse().unwrap();
    /// let mut buf = [0; 12];
    ///
    /// let scanned = db.scan_into("a1 b", &mut buf, 10).unwrap();
    ///
    /// assert_eq!(scanned.count, 2);
    /// assert_eq!(buf, [0, 2, 0, 1, 1, 1, 3, 1, 3, 1, -1, -1]);
    /// ```
    pub fn scan_into(&self, text: &str, buf: &mut [i32], max_matches: usize) -> Result<Scanned> {
        if i32::try_from(text.len()).is_err() {
            return Err(Error::OffsetOverflow(text.len()));
        }

        let mut writer = RecordWriter::new(buf, self.num_groups());
        let limit = max_matches.min(writer.capacity());

        if limit == 0 {
            return Ok(Scanned {
                count: 0,
                stop: Stop::Capacity,
            });
        }

        let mut scratch = self.alloc_scratch()?;
        let mut cursor = Cursor::default();

        while let Some(m) = cursor.next_match(self, text, &mut scratch)? {
            if !writer.push(&m)? || writer.count() >= limit {
                return Ok(Scanned {
                    count: writer.count(),
                    stop: Stop::Capacity,
                });
            }
        }

        Ok(Scanned {
            count: writer.count(),
            stop: Stop::Exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    use super::*;

    #[test]
    fn test_record_writer() {
        let _ = pretty_env_logger::try_init();

        let mut buf = [7; 9];
        let mut writer = RecordWriter::new(&mut buf, 2);

        assert_eq!(writer.capacity(), 2);

        let m = MatchResult::from_slots(&[Some(1), Some(4), None, None]);

        assert!(writer.push(&m).unwrap());
        assert!(writer.push(&m).unwrap());
        assert!(writer.is_full());
        assert!(!writer.push(&m).unwrap());
        assert_eq!(writer.count(), 2);

        assert_eq!(buf, [1, 3, -1, -1, 1, 3, -1, -1, 7]);
    }

    #[test]
    fn test_record_overflow() {
        let mut buf = [7; 4];
        let mut writer = RecordWriter::new(&mut buf, 2);
        let big = i32::MAX as usize + 1;
        let m = MatchResult::from_slots(&[Some(0), Some(1), Some(1), Some(big)]);

        assert_eq!(writer.push(&m).unwrap_err(), Error::OffsetOverflow(big));
        assert_eq!(writer.count(), 0);
        assert_eq!(buf, [7; 4]);
    }

    #[test]
    fn test_scan_into() {
        let db: Database = r"\d+".parse().unwrap();
        let mut buf = [0; 4];

        let scanned = db.scan_into("1 22 333", &mut buf, 10).unwrap();

        assert_eq!(
            scanned,
            Scanned {
                count: 2,
                stop: Stop::Capacity
            }
        );
        assert_eq!(buf, [0, 1, 2, 2]);

        let mut buf = [0; 10];

        let scanned = db.scan_into("1 22 333", &mut buf, 10).unwrap();

        assert_eq!(scanned.stop, Stop::Exhausted);
        assert_eq!(scanned.count, 3);
        assert_eq!(&buf[..6], &[0, 1, 2, 2, 5, 3]);

        assert_eq!(db.scan_into("1 22", &mut buf, 1).unwrap().count, 1);
        assert_eq!(db.scan_into("1 22", &mut buf, 0).unwrap().count, 0);
        assert_eq!(db.scan_into("1 22", &mut buf[..1], 5).unwrap().stop, Stop::Capacity);
    }

    #[test]
    fn test_scan_into_error_keeps_written_records() {
        let config = Config::new().visited_capacity(0).backtrack_limit(10_000);
        let db = pattern!("b|(?:a|aa)*c").with_config(&config).unwrap();
        let text = format!("b{}", "a".repeat(40));
        let mut buf = [9; 6];

        assert_eq!(
            db.scan_into(&text, &mut buf, 3).unwrap_err(),
            Error::BacktrackLimit { limit: 10_000 }
        );
        assert_eq!(buf, [0, 1, 9, 9, 9, 9]);
    }
}
