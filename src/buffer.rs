//! Bounded write buffer for pending log rows.
//!
//! Producers on the measurement path enqueue fully formatted rows here;
//! nothing in this module touches storage. The buffer is a fixed-capacity
//! FIFO with a drop-newest overflow policy: once full, new rows are rejected
//! and counted rather than evicting queued data. The oldest rows usually
//! belong to the measurement in progress and must not be sacrificed for a
//! stat that arrives a moment later.

use std::collections::VecDeque;

use tracing::trace;

/// Which backing file a row is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `laps.csv` — one row per completed lap.
    Lap,
    /// `reaction.csv` — one row per reaction-time capture.
    Reaction,
    /// `all_events.csv` — superset stream carrying both event kinds.
    All,
}

impl Category {
    /// All categories, in routing-table order.
    pub const ALL: [Category; 3] = [Category::Lap, Category::Reaction, Category::All];

    /// Stable index for per-category tables (file handles, paths).
    pub(crate) fn index(self) -> usize {
        match self {
            Category::Lap => 0,
            Category::Reaction => 1,
            Category::All => 2,
        }
    }
}

/// A single row, truncated to a byte budget exactly once, at construction.
///
/// Truncation lands on a UTF-8 char boundary at or below the budget, so a
/// `LogLine` is always valid UTF-8 and never exceeds `max_len` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine(String);

impl LogLine {
    pub fn new(line: impl Into<String>, max_len: usize) -> Self {
        let mut line = line.into();
        if line.len() > max_len {
            let mut cut = max_len;
            while cut > 0 && !line.is_char_boundary(cut) {
                cut -= 1;
            }
            line.truncate(cut);
        }
        Self(line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One queued row tagged with its destination category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub category: Category,
    pub line: LogLine,
}

/// Fixed-capacity FIFO of pending rows.
#[derive(Debug)]
pub struct WriteBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    line_max: usize,
    dropped: u32,
}

impl WriteBuffer {
    pub fn new(capacity: usize, line_max: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            line_max,
            dropped: 0,
        }
    }

    /// Queue a row for the next drain pass. O(1), no I/O.
    ///
    /// Returns `false` when the buffer is full; the row is dropped and the
    /// drop counter incremented, queued rows are untouched.
    pub fn enqueue(&mut self, category: Category, line: &str) -> bool {
        if self.entries.len() >= self.capacity {
            self.dropped = self.dropped.saturating_add(1);
            trace!(dropped = self.dropped, "write buffer full, row dropped");
            return false;
        }
        self.entries.push_back(LogEntry { category, line: LogLine::new(line, self.line_max) });
        true
    }

    /// The oldest queued row, without dequeuing it.
    pub fn peek_front(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Dequeue the oldest row. Called only after it was durably written.
    pub fn pop_front(&mut self) -> Option<LogEntry> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows rejected because the buffer was full, since the last reset.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Discard all queued rows and zero the drop counter. Session start only.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn enqueue_is_fifo() {
        let mut buffer = WriteBuffer::new(8, 200);
        assert!(buffer.enqueue(Category::Lap, "a"));
        assert!(buffer.enqueue(Category::All, "b"));
        assert!(buffer.enqueue(Category::Reaction, "c"));

        assert_eq!(buffer.peek_front().unwrap().line.as_str(), "a");
        assert_eq!(buffer.pop_front().unwrap().line.as_str(), "a");
        assert_eq!(buffer.pop_front().unwrap().line.as_str(), "b");
        assert_eq!(buffer.pop_front().unwrap().line.as_str(), "c");
        assert!(buffer.pop_front().is_none());
    }

    #[test]
    fn full_buffer_drops_newest_and_counts() {
        let mut buffer = WriteBuffer::new(3, 200);
        for i in 0..3 {
            assert!(buffer.enqueue(Category::Lap, &format!("row{}", i)));
        }
        assert!(!buffer.enqueue(Category::Lap, "late1"));
        assert!(!buffer.enqueue(Category::Reaction, "late2"));
        assert_eq!(buffer.dropped(), 2);
        assert_eq!(buffer.len(), 3);

        // The queue still holds the first three rows, untouched.
        for i in 0..3 {
            assert_eq!(buffer.pop_front().unwrap().line.as_str(), format!("row{}", i));
        }
    }

    #[test]
    fn reset_clears_rows_and_drop_counter() {
        let mut buffer = WriteBuffer::new(1, 200);
        buffer.enqueue(Category::Lap, "a");
        buffer.enqueue(Category::Lap, "b");
        assert_eq!(buffer.dropped(), 1);

        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.dropped(), 0);
    }

    #[test]
    fn long_lines_truncate_on_char_boundary() {
        // 3-byte codepoints; a 200-byte budget is not a multiple of 3 past
        // the first 198 bytes, so the cut must back up to a boundary.
        let wide = "日".repeat(100);
        let line = LogLine::new(wide, 200);
        assert!(line.as_str().len() <= 200);
        assert_eq!(line.as_str().chars().count(), 66);

        let short = LogLine::new("short", 200);
        assert_eq!(short.as_str(), "short");
    }

    proptest! {
        #[test]
        fn count_never_exceeds_capacity(
            capacity in 1usize..64,
            lines in prop::collection::vec(".{0,40}", 0..200)
        ) {
            let mut buffer = WriteBuffer::new(capacity, 200);
            let mut accepted = 0u32;
            let mut rejected = 0u32;
            for line in &lines {
                if buffer.enqueue(Category::All, line) {
                    accepted += 1;
                } else {
                    rejected += 1;
                }
                prop_assert!(buffer.len() <= capacity);
            }
            prop_assert_eq!(buffer.dropped(), rejected);
            prop_assert_eq!(accepted as usize + rejected as usize, lines.len());
            // Drop-newest: the survivors are exactly the first `capacity` rows.
            prop_assert_eq!(buffer.len(), lines.len().min(capacity));
        }

        #[test]
        fn survivors_are_the_earliest_rows(
            lines in prop::collection::vec("[a-z]{1,10}", 1..30)
        ) {
            let capacity = 8usize;
            let mut buffer = WriteBuffer::new(capacity, 200);
            for line in &lines {
                buffer.enqueue(Category::Lap, line);
            }
            let mut drained = Vec::new();
            while let Some(entry) = buffer.pop_front() {
                drained.push(entry.line.as_str().to_string());
            }
            let expected: Vec<_> = lines.iter().take(capacity).cloned().collect();
            prop_assert_eq!(drained, expected);
        }

        #[test]
        fn truncation_respects_budget_and_utf8(
            line in "\\PC{0,120}",
            max_len in 1usize..60
        ) {
            let bounded = LogLine::new(line.clone(), max_len);
            prop_assert!(bounded.as_str().len() <= max_len);
            prop_assert!(line.starts_with(bounded.as_str()));
        }
    }
}
