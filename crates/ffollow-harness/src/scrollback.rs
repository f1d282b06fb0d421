#![forbid(unsafe_code)]

//! Bounded line storage for the live demo.
//!
//! Rows keep their absolute index for the whole run, so the viewport's row
//! anchors stay valid after eviction. Once more than `capacity` lines have
//! been pushed, the oldest are dropped and [`Scrollback::get`] returns `None`
//! for them.

use std::collections::VecDeque;

/// Default number of retained lines.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Ring of the most recent lines, addressed by absolute row index.
#[derive(Debug, Clone)]
pub struct Scrollback {
    lines: VecDeque<String>,
    capacity: usize,
    /// Lines dropped from the front so far.
    evicted: u64,
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Scrollback {
    /// Keep at most `capacity` lines (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            evicted: 0,
        }
    }

    /// Append a line, evicting the oldest when full.
    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.evicted += 1;
        }
        self.lines.push_back(line);
    }

    /// Line at absolute `row`, if still retained.
    #[must_use]
    pub fn get(&self, row: u64) -> Option<&str> {
        let idx = row.checked_sub(self.evicted)?;
        let idx = usize::try_from(idx).ok()?;
        self.lines.get(idx).map(String::as_str)
    }

    /// Lines ever pushed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.evicted + self.lines.len() as u64
    }

    /// Lines currently retained.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.lines.len()
    }

    /// Lines dropped so far.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, n: u64) -> Scrollback {
        let mut sb = Scrollback::new(capacity);
        for i in 0..n {
            sb.push(format!("line {i}"));
        }
        sb
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let sb = filled(8, 5);
        assert_eq!(sb.total(), 5);
        assert_eq!(sb.retained(), 5);
        assert_eq!(sb.get(0), Some("line 0"));
        assert_eq!(sb.get(4), Some("line 4"));
        assert_eq!(sb.get(5), None);
    }

    #[test]
    fn retained_lines_never_exceed_capacity() {
        let sb = filled(4, 1000);
        assert_eq!(sb.retained(), 4);
        assert_eq!(sb.total(), 1000);
        assert_eq!(sb.evicted(), 996);
    }

    #[test]
    fn rows_keep_absolute_indices_after_eviction() {
        let sb = filled(3, 10);
        assert_eq!(sb.get(6), None);
        assert_eq!(sb.get(7), Some("line 7"));
        assert_eq!(sb.get(9), Some("line 9"));
        assert_eq!(sb.get(10), None);
    }

    #[test]
    fn zero_capacity_keeps_one_line() {
        let sb = filled(0, 3);
        assert_eq!(sb.retained(), 1);
        assert_eq!(sb.get(2), Some("line 2"));
    }
}
