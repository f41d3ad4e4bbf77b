//! Per-finger coordinate history: a fixed-capacity ring of timestamped samples.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::event::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CoordinateHistory {
    samples: Vec<Sample>,
    head: usize,
    len: usize,
    filter: bool,
}

impl CoordinateHistory {
    /// Allocate storage for `capacity` samples. With `filter` set, every sample
    /// after the first moves at most one unit per axis from its predecessor.
    pub fn new(capacity: usize, filter: bool) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidSettings(
                "coordinate buffer size must be at least 1".into(),
            ));
        }

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory { capacity })?;
        samples.resize(capacity, Sample::default());

        Ok(Self {
            samples,
            head: 0,
            len: 0,
            filter,
        })
    }

    pub fn push(&mut self, x: i32, y: i32, timestamp: Timestamp) {
        let (x, y) = match (self.filter, self.last()) {
            (true, Some(prev)) => (step_toward(prev.x, x), step_toward(prev.y, y)),
            _ => (x, y),
        };

        let capacity = self.capacity();
        let tail = (self.head + self.len) % capacity;
        self.samples[tail] = Sample { x, y, timestamp };

        if self.len < capacity {
            self.len += 1;
        } else {
            // Full: the slot just written held the oldest sample.
            self.head = (self.head + 1) % capacity;
        }
    }

    pub fn last(&self) -> Option<Sample> {
        if self.len == 0 {
            return None;
        }
        Some(self.samples[(self.head + self.len - 1) % self.capacity()])
    }

    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        (0..self.len).map(move |i| &self.samples[(self.head + i) % self.capacity()])
    }
}

fn step_toward(prev: i32, new: i32) -> i32 {
    match new.cmp(&prev) {
        Ordering::Greater => prev.saturating_add(1),
        Ordering::Less => prev.saturating_sub(1),
        Ordering::Equal => prev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn test_empty_history() {
        let history = CoordinateHistory::new(6, false).unwrap();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
        assert_eq!(history.capacity(), 6);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            CoordinateHistory::new(0, false),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_overwrites_oldest_when_full() {
        let mut history = CoordinateHistory::new(3, false).unwrap();
        for i in 1..=5 {
            history.push(i * 10, i, ts(i as u64));
        }
        assert_eq!(history.len(), 3);
        let xs: Vec<i32> = history.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![30, 40, 50]);
        assert_eq!(history.last().unwrap(), Sample { x: 50, y: 5, timestamp: ts(5) });
    }

    #[test]
    fn test_filter_moves_one_unit() {
        let mut history = CoordinateHistory::new(6, true).unwrap();
        history.push(100, 100, ts(0));
        assert_eq!(history.last().unwrap().x, 100);

        history.push(105, 90, ts(1));
        let last = history.last().unwrap();
        assert_eq!((last.x, last.y), (101, 99));

        history.push(101, 99, ts(2));
        let last = history.last().unwrap();
        assert_eq!((last.x, last.y), (101, 99));
    }

    #[test]
    fn test_filter_delta_bounded() {
        let mut history = CoordinateHistory::new(4, true).unwrap();
        let raw = [(500, 10), (0, 900), (250, 250), (1000, -40), (-3, 7), (8, 8)];
        for (i, &(x, y)) in raw.iter().enumerate() {
            history.push(x, y, ts(i as u64));
        }
        let stored: Vec<&Sample> = history.iter().collect();
        for pair in stored.windows(2) {
            assert!((pair[1].x - pair[0].x).abs() <= 1);
            assert!((pair[1].y - pair[0].y).abs() <= 1);
        }
    }

    #[test]
    fn test_first_sample_after_reset_is_verbatim() {
        let mut history = CoordinateHistory::new(6, true).unwrap();
        history.push(10, 10, ts(0));
        history.reset();
        assert!(history.is_empty());
        history.push(300, 400, ts(1));
        let last = history.last().unwrap();
        assert_eq!((last.x, last.y), (300, 400));
    }
}
