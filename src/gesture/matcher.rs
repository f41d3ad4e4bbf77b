//! Frame-to-frame correspondence between raw samples and tracked fingers.
//!
//! Matching is greedy and order dependent: samples are visited in input
//! order and each one claims the nearest active finger whose best distance
//! so far is worse, so a later sample can take a finger away from an
//! earlier one. This is not a globally optimal assignment.

use std::time::Duration;

use super::pool::{FingerHandle, FingerPool};
use super::state::FingerState;
use crate::event::Timestamp;

/// Spacing between the initial timestamps of fingers spawned in one frame.
const SPAWN_STAGGER: Duration = Duration::from_millis(1);

/// One hardware contact reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub x: i32,
    pub y: i32,
    pub weight: i32,
}

impl RawSample {
    pub fn new(x: i32, y: i32, weight: i32) -> Self {
        Self { x, y, weight }
    }

    /// `(0, 0)` doubles as "no touch", so a genuine touch at the origin is lost.
    pub fn is_absent(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    fn consume(&mut self) {
        self.x = 0;
        self.y = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleMatch {
    /// Squared distance to the finger's last coordinate.
    pub distance: i64,
    pub sample: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Correspondence {
    #[default]
    Unmatched,
    Sample(SampleMatch),
    /// Created from an unclaimed sample this frame.
    Spawned,
}

/// Per-frame scratch: what each pool slot was matched to. Built fresh every frame.
#[derive(Debug, Clone)]
pub struct MatchTable {
    slots: Vec<(Option<FingerHandle>, Correspondence)>,
}

impl MatchTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![(None, Correspondence::Unmatched); capacity],
        }
    }

    pub fn get(&self, handle: FingerHandle) -> Correspondence {
        match self.slots.get(handle.index()) {
            Some(&(Some(h), c)) if h == handle => c,
            _ => Correspondence::Unmatched,
        }
    }

    pub fn is_matched(&self, handle: FingerHandle) -> bool {
        self.get(handle) != Correspondence::Unmatched
    }

    fn distance(&self, handle: FingerHandle) -> Option<i64> {
        match self.get(handle) {
            Correspondence::Sample(m) => Some(m.distance),
            _ => None,
        }
    }

    fn set(&mut self, handle: FingerHandle, correspondence: Correspondence) {
        if let Some(slot) = self.slots.get_mut(handle.index()) {
            *slot = (Some(handle), correspondence);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorrespondenceMatcher {
    finger_down_threshold: i32,
}

impl CorrespondenceMatcher {
    pub fn new(finger_down_threshold: i32) -> Self {
        Self {
            finger_down_threshold,
        }
    }

    /// Run one frame of matching: assign, apply, then spawn fingers for what is left.
    /// Consumed samples have their coordinates zeroed.
    pub fn correlate(
        &self,
        pool: &mut FingerPool,
        samples: &mut [RawSample],
        timestamp: Timestamp,
        next_id: &mut u32,
    ) -> MatchTable {
        let mut table = self.assign(pool, samples);
        self.apply(pool, &table, samples, timestamp);
        self.spawn(pool, &mut table, samples, timestamp, next_id);
        table
    }

    /// Record, for each active finger, the sample it corresponds to this frame.
    pub fn assign(&self, pool: &FingerPool, samples: &[RawSample]) -> MatchTable {
        let mut table = MatchTable::new(pool.capacity());
        let active = pool.active_handles();

        for (j, sample) in samples.iter().enumerate() {
            let mut best: Option<(FingerHandle, i64)> = None;

            for &handle in &active {
                let Some(last) = pool.get(handle).and_then(|f| f.history.last()) else {
                    continue;
                };
                let dx = i64::from(sample.x) - i64::from(last.x);
                let dy = i64::from(sample.y) - i64::from(last.y);
                let distance = dx * dx + dy * dy;

                // An earlier sample is already at least as close to this finger.
                if table.distance(handle).is_some_and(|recorded| distance >= recorded) {
                    continue;
                }
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((handle, distance));
                }
            }

            if let Some((handle, distance)) = best {
                table.set(handle, Correspondence::Sample(SampleMatch { distance, sample: j }));
            }
        }

        table
    }

    /// Move matched fingers to their samples, skipping readings whose weight
    /// collapsed below half the last accepted weight (typical while lifting).
    pub fn apply(
        &self,
        pool: &mut FingerPool,
        table: &MatchTable,
        samples: &mut [RawSample],
        timestamp: Timestamp,
    ) {
        for handle in pool.active_handles() {
            let Correspondence::Sample(m) = table.get(handle) else {
                continue;
            };
            let (Some(finger), Some(&sample)) = (pool.get_mut(handle), samples.get(m.sample)) else {
                continue;
            };

            log::debug!(
                "New coord (at: {}), {},{} weight: {}, distance: {}",
                m.sample,
                sample.x,
                sample.y,
                sample.weight,
                m.distance
            );

            if sample.weight >= finger.last_weight / 2 {
                finger.history.push(sample.x, sample.y, timestamp);
                finger.last_weight = sample.weight;
            } else {
                log::debug!(
                    "Ignoring coordinate for finger {} (weight {} < {}/2)",
                    finger.id,
                    sample.weight,
                    finger.last_weight
                );
            }

            samples[m.sample].consume();
        }
    }

    /// Spawn a finger for every unclaimed sample heavy enough to count as a touch.
    /// Returns how many fingers were created.
    pub fn spawn(
        &self,
        pool: &mut FingerPool,
        table: &mut MatchTable,
        samples: &[RawSample],
        timestamp: Timestamp,
        next_id: &mut u32,
    ) -> usize {
        let mut attempts: u32 = 0;
        let mut spawned = 0;

        for (j, sample) in samples.iter().enumerate() {
            if sample.is_absent() {
                continue;
            }
            if sample.weight < self.finger_down_threshold {
                log::debug!("Discarding finger with too low weight ({})", sample.weight);
                continue;
            }

            let ts = timestamp.offset(SPAWN_STAGGER * attempts);
            attempts += 1;

            let Some(handle) = pool.acquire() else {
                log::info!("No available finger slots, rejecting finger {} at {},{}", j, sample.x, sample.y);
                continue;
            };
            let Some(finger) = pool.get_mut(handle) else {
                continue;
            };

            finger.id = *next_id;
            *next_id = next_id.wrapping_add(1);
            finger.state = FingerState::Start;
            finger.last_weight = sample.weight;
            finger.history.push(sample.x, sample.y, ts);
            table.set(handle, Correspondence::Spawned);
            spawned += 1;

            log::info!("Finger {} down at {},{}", finger.id, sample.x, sample.y);
        }

        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureSettings;

    fn pool(max_fingers: usize) -> FingerPool {
        FingerPool::new(&GestureSettings {
            max_fingers,
            ..GestureSettings::default()
        })
        .unwrap()
    }

    fn place(pool: &mut FingerPool, x: i32, y: i32, weight: i32, id: u32) -> FingerHandle {
        let handle = pool.acquire().unwrap();
        let finger = pool.get_mut(handle).unwrap();
        finger.id = id;
        finger.state = FingerState::Down;
        finger.last_weight = weight;
        finger.history.push(x, y, Timestamp::default());
        handle
    }

    #[test]
    fn test_each_sample_claims_nearest_finger() {
        let mut pool = pool(2);
        let a = place(&mut pool, 100, 100, 50, 0);
        let b = place(&mut pool, 500, 500, 50, 1);
        let samples = [RawSample::new(490, 505, 50), RawSample::new(103, 96, 50)];

        let table = CorrespondenceMatcher::new(0).assign(&pool, &samples);
        assert_eq!(
            table.get(a),
            Correspondence::Sample(SampleMatch { distance: 25, sample: 1 })
        );
        assert_eq!(
            table.get(b),
            Correspondence::Sample(SampleMatch { distance: 125, sample: 0 })
        );
    }

    #[test]
    fn test_later_sample_steals_finger() {
        let mut pool = pool(1);
        let a = place(&mut pool, 100, 100, 50, 0);
        let samples = [RawSample::new(120, 100, 50), RawSample::new(101, 100, 50)];

        let table = CorrespondenceMatcher::new(0).assign(&pool, &samples);
        assert_eq!(
            table.get(a),
            Correspondence::Sample(SampleMatch { distance: 1, sample: 1 })
        );
    }

    #[test]
    fn test_equal_distance_keeps_earlier_sample_and_finger() {
        let mut pool = pool(2);
        let a = place(&mut pool, 100, 100, 50, 0);
        let b = place(&mut pool, 110, 100, 50, 1);
        // Both samples are 5 away from both fingers.
        let samples = [RawSample::new(105, 100, 50), RawSample::new(105, 100, 50)];

        let table = CorrespondenceMatcher::new(0).assign(&pool, &samples);
        // Sample 0 goes to the first finger in iteration order; sample 1 cannot
        // beat that distance on `a`, so it lands on `b`.
        assert_eq!(
            table.get(a),
            Correspondence::Sample(SampleMatch { distance: 25, sample: 0 })
        );
        assert_eq!(
            table.get(b),
            Correspondence::Sample(SampleMatch { distance: 25, sample: 1 })
        );
    }

    #[test]
    fn test_apply_gates_on_weight() {
        let mut pool = pool(1);
        let a = place(&mut pool, 100, 100, 50, 0);
        let matcher = CorrespondenceMatcher::new(0);

        let mut samples = [RawSample::new(110, 100, 24)];
        let table = matcher.assign(&pool, &samples);
        matcher.apply(&mut pool, &table, &mut samples, Timestamp::from_millis(1));

        let finger = pool.get(a).unwrap();
        assert_eq!(finger.history.len(), 1);
        assert_eq!(finger.last_weight, 50);
        assert!(samples[0].is_absent());

        let mut samples = [RawSample::new(110, 100, 25)];
        let table = matcher.assign(&pool, &samples);
        matcher.apply(&mut pool, &table, &mut samples, Timestamp::from_millis(2));

        let finger = pool.get(a).unwrap();
        assert_eq!(finger.history.last().unwrap().x, 110);
        assert_eq!(finger.last_weight, 25);
    }

    #[test]
    fn test_spawn_skips_absent_and_light_samples() {
        let mut pool = pool(2);
        let mut table = MatchTable::new(pool.capacity());
        let mut next_id = 5;
        let samples = [
            RawSample::new(0, 0, 90),
            RawSample::new(40, 40, 3),
            RawSample::new(60, 0, 20),
            RawSample::new(70, 70, 20),
        ];

        let spawned = CorrespondenceMatcher::new(10).spawn(
            &mut pool,
            &mut table,
            &samples,
            Timestamp::from_millis(100),
            &mut next_id,
        );
        assert_eq!(spawned, 2);
        assert_eq!(next_id, 7);

        let handles = pool.active_handles();
        let first = pool.get(handles[0]).unwrap();
        let second = pool.get(handles[1]).unwrap();
        assert_eq!((first.id, first.history.last().unwrap().x), (5, 60));
        assert_eq!((second.id, second.history.last().unwrap().x), (6, 70));
        assert_eq!(first.history.last().unwrap().timestamp, Timestamp::from_millis(100));
        assert_eq!(second.history.last().unwrap().timestamp, Timestamp::from_millis(101));
        assert_eq!(table.get(handles[0]), Correspondence::Spawned);
    }

    #[test]
    fn test_spawn_drops_when_pool_exhausted() {
        let mut pool = pool(1);
        let mut table = MatchTable::new(pool.capacity());
        let mut next_id = 0;
        let samples = [
            RawSample::new(10, 10, 1),
            RawSample::new(20, 20, 1),
            RawSample::new(30, 30, 1),
        ];

        let spawned = CorrespondenceMatcher::new(0).spawn(
            &mut pool,
            &mut table,
            &samples,
            Timestamp::default(),
            &mut next_id,
        );
        assert_eq!(spawned, 2);
        assert_eq!(pool.active_len(), pool.capacity());
    }

    #[test]
    fn test_stale_handle_reads_unmatched() {
        let mut pool = pool(1);
        let a = place(&mut pool, 1, 1, 1, 0);
        let samples = [RawSample::new(1, 2, 1)];
        let table = CorrespondenceMatcher::new(0).assign(&pool, &samples);
        assert!(table.is_matched(a));

        pool.release(a);
        pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_eq!(b.index(), a.index());
        assert!(!table.is_matched(b));
    }
}
