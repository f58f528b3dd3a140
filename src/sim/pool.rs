//! Fixed-capacity object pools
//!
//! Every slot is built once when the pool is created. Acquiring flips the
//! first inactive slot to active; releasing resets it and parks it again.
//! Nothing is allocated after construction.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Objects that can live in an [`EntityPool`]
pub trait Poolable {
    /// Clear transient state so the slot is safe to hand out again
    fn reset(&mut self);
}

/// Stable identity of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    active: bool,
    item: T,
}

#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    name: &'static str,
    slots: Vec<Slot<T>>,
    active: usize,
}

impl<T: Poolable> EntityPool<T> {
    /// Build a pool of `capacity` inactive slots, one `make(index)` call each
    pub fn new(name: &'static str, capacity: usize, mut make: impl FnMut(usize) -> T) -> Self {
        let slots = (0..capacity)
            .map(|i| Slot {
                active: false,
                item: make(i),
            })
            .collect();
        Self {
            name,
            slots,
            active: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.active)
    }

    /// Hand out the first inactive slot
    pub fn acquire(&mut self) -> SimResult<(SlotId, &mut T)> {
        let capacity = self.slots.len();
        let name = self.name;
        match self.slots.iter_mut().enumerate().find(|(_, s)| !s.active) {
            Some((index, slot)) => {
                slot.active = true;
                self.active += 1;
                Ok((SlotId(index), &mut slot.item))
            }
            None => Err(SimError::PoolExhausted {
                pool: name,
                capacity,
            }),
        }
    }

    /// Return a slot to the pool. Releasing an inactive slot changes nothing.
    pub fn release(&mut self, id: SlotId) -> SimResult<()> {
        match self.slots.get_mut(id.0) {
            Some(slot) if slot.active => {
                slot.active = false;
                slot.item.reset();
                self.active -= 1;
                Ok(())
            }
            _ => Err(SimError::AlreadyReleased { slot: id.0 }),
        }
    }

    /// Release every active slot, returning how many were released
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            slot.active = false;
            slot.item.reset();
            released += 1;
        }
        self.active = 0;
        released
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.0)
            .filter(|s| s.active)
            .map(|s| &s.item)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.0)
            .filter(|s| s.active)
            .map(|s| &mut s.item)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotId(i), &s.item))
    }

    pub fn for_each_active(&mut self, mut f: impl FnMut(SlotId, &mut T)) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.active {
                f(SlotId(i), &mut slot.item);
            }
        }
    }

    /// Every slot with its active flag, parked ones included
    pub fn iter_slots(&self) -> impl Iterator<Item = (SlotId, bool, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (SlotId(i), s.active, &s.item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Dummy {
        timer: f32,
    }

    impl Poolable for Dummy {
        fn reset(&mut self) {
            self.timer = 0.0;
        }
    }

    fn pool(capacity: usize) -> EntityPool<Dummy> {
        EntityPool::new("dummy", capacity, |_| Dummy::default())
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = pool(3);
        for expected in 0..3 {
            let (id, _) = pool.acquire().expect("free slot");
            assert_eq!(id, SlotId(expected));
        }
        assert_eq!(pool.active_count(), 3);
        assert_eq!(
            pool.acquire().unwrap_err(),
            SimError::PoolExhausted {
                pool: "dummy",
                capacity: 3
            }
        );
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_acquire_reuses_first_free_slot() {
        let mut pool = pool(4);
        for _ in 0..4 {
            pool.acquire().unwrap();
        }
        pool.release(SlotId(2)).unwrap();
        pool.release(SlotId(1)).unwrap();
        let (id, _) = pool.acquire().unwrap();
        assert_eq!(id, SlotId(1));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = pool(2);
        let (id, _) = pool.acquire().unwrap();
        assert!(pool.release(id).is_ok());
        assert_eq!(
            pool.release(id).unwrap_err(),
            SimError::AlreadyReleased { slot: 0 }
        );
        assert_eq!(pool.active_count(), 0);
        assert!(pool.release(SlotId(99)).is_err());
    }

    #[test]
    fn test_release_resets_transient_state() {
        let mut pool = pool(1);
        let (id, item) = pool.acquire().unwrap();
        item.timer = 3.5;
        pool.release(id).unwrap();
        let (_, item) = pool.acquire().unwrap();
        assert_eq!(item.timer, 0.0);
    }

    #[test]
    fn test_many_cycles_never_leak() {
        let mut pool = pool(5);
        for _ in 0..(pool.capacity() * 20) {
            let (id, _) = pool.acquire().expect("cycle acquire");
            pool.release(id).unwrap();
        }
        assert_eq!(pool.active_count(), 0);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn test_iteration_sees_only_active() {
        let mut pool = pool(4);
        let (a, _) = pool.acquire().unwrap();
        let (b, _) = pool.acquire().unwrap();
        pool.release(a).unwrap();

        let ids: Vec<_> = pool.iter_active().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b]);

        let mut visited = 0;
        pool.for_each_active(|_, item| {
            item.timer += 1.0;
            visited += 1;
        });
        assert_eq!(visited, 1);
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(b).map(|d| d.timer), Some(1.0));

        assert_eq!(pool.release_all(), 1);
        assert_eq!(pool.iter_active().count(), 0);
        assert_eq!(pool.iter_slots().count(), 4);
    }
}
