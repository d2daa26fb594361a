//! A single byte range of the target resource and its transfer state.

use std::fmt;

/// Transfer state of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Planned, not dispatched yet.
    Pending,
    /// A worker owns the segment and a request is outstanding.
    InFlight,
    /// Every byte of the range has been written.
    Done,
    /// The retry budget ran out.
    Failed,
}

/// A contiguous byte range `[start, end)` of the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position of the segment in the plan.
    pub index: usize,
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
    /// Failed attempts so far.
    pub attempts: u32,
    /// Bytes of the range already written to disk.
    pub written: u64,
    /// Current state.
    pub state: SegmentState,
}

impl Segment {
    pub fn new(index: usize, start: u64, end: u64) -> Self {
        Self {
            index,
            start,
            end,
            attempts: 0,
            written: 0,
            state: SegmentState::Pending,
        }
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes still missing from the range.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.written)
    }

    /// File offset where the next byte of this segment goes.
    pub fn cursor(&self) -> u64 {
        self.start + self.written
    }

    /// `Range` header for the bytes still missing (inclusive end).
    ///
    /// A retry after a partial transfer only asks for the tail of the range.
    pub fn range_header_value(&self) -> String {
        format!("bytes={}-{}", self.cursor(), self.end.saturating_sub(1))
    }

    /// Display name used in logs and progress bars.
    pub fn name(&self) -> String {
        format!("segment {:02}", self.index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}-{}", self.start, self.end.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_header_covers_whole_segment() {
        let s = Segment::new(0, 0, 100);
        assert_eq!(s.range_header_value(), "bytes=0-99");
        assert_eq!(s.len(), 100);
        assert_eq!(s.state, SegmentState::Pending);
    }

    #[test]
    fn range_header_resumes_after_partial_write() {
        let mut s = Segment::new(1, 250, 500);
        s.written = 50;
        assert_eq!(s.range_header_value(), "bytes=300-499");
        assert_eq!(s.remaining(), 200);
        assert_eq!(s.cursor(), 300);
    }

    #[test]
    fn single_byte_segment() {
        let s = Segment::new(3, 42, 43);
        assert_eq!(s.range_header_value(), "bytes=42-42");
        assert_eq!(s.to_string(), "bytes 42-42");
    }
}
