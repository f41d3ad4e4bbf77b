//! Fixed arena of finger slots, split into an available queue and an ordered active set.

use std::collections::VecDeque;

use super::history::CoordinateHistory;
use super::state::FingerState;
use super::GestureSettings;
use crate::error::Result;

/// One tracked contact.
#[derive(Debug, Clone)]
pub struct Finger {
    pub id: u32,
    pub history: CoordinateHistory,
    pub state: FingerState,
    /// Last accepted contact weight.
    pub last_weight: i32,
}

/// Stable reference to a pool slot. Goes stale once the slot is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FingerHandle {
    index: usize,
    generation: u32,
}

impl FingerHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
struct Slot {
    finger: Finger,
    generation: u32,
    active: bool,
}

#[derive(Debug)]
pub struct FingerPool {
    slots: Vec<Slot>,
    available: VecDeque<usize>,
    active: Vec<usize>,
}

impl FingerPool {
    /// Pre-allocate twice `max_fingers` slots, each with its own history.
    pub fn new(settings: &GestureSettings) -> Result<Self> {
        let capacity = settings.pool_capacity();
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(Slot {
                finger: Finger {
                    id: 0,
                    history: CoordinateHistory::new(
                        settings.coord_buffer_size,
                        settings.position_filter_enabled,
                    )?,
                    state: FingerState::Unused,
                    last_weight: 0,
                },
                generation: 0,
                active: false,
            });
        }

        Ok(Self {
            slots,
            available: (0..capacity).collect(),
            active: Vec::with_capacity(capacity),
        })
    }

    /// Take a slot from the available queue and append it to the active set.
    /// Returns `None` when every slot is in use.
    pub fn acquire(&mut self) -> Option<FingerHandle> {
        let index = self.available.pop_front()?;
        let slot = &mut self.slots[index];

        slot.generation = slot.generation.wrapping_add(1);
        slot.active = true;
        slot.finger.history.reset();
        slot.finger.state = FingerState::Start;
        slot.finger.last_weight = 0;
        self.active.push(index);

        Some(FingerHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Return a finger to the available queue. Stale handles are ignored.
    pub fn release(&mut self, handle: FingerHandle) -> bool {
        if !self.is_live(handle) {
            log::warn!("Ignoring release of stale finger handle {:?}", handle);
            return false;
        }

        let slot = &mut self.slots[handle.index];
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.finger.history.reset();
        slot.finger.state = FingerState::Unused;

        self.active.retain(|&i| i != handle.index);
        self.available.push_back(handle.index);
        true
    }

    /// Release every active finger.
    pub fn clear(&mut self) {
        for handle in self.active_handles() {
            self.release(handle);
        }
    }

    pub fn get(&self, handle: FingerHandle) -> Option<&Finger> {
        self.is_live(handle).then(|| &self.slots[handle.index].finger)
    }

    pub fn get_mut(&mut self, handle: FingerHandle) -> Option<&mut Finger> {
        if !self.is_live(handle) {
            return None;
        }
        Some(&mut self.slots[handle.index].finger)
    }

    /// Active fingers in iteration order (oldest spawn first).
    pub fn active_handles(&self) -> Vec<FingerHandle> {
        self.active
            .iter()
            .map(|&index| FingerHandle {
                index,
                generation: self.slots[index].generation,
            })
            .collect()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn available_len(&self) -> usize {
        self.available.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_live(&self, handle: FingerHandle) -> bool {
        self.slots
            .get(handle.index)
            .is_some_and(|slot| slot.active && slot.generation == handle.generation)
    }
}
