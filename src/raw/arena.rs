use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use super::handle::{Handle, SlotRef, Stamp};
use crate::error::Error;

/// Slot storage with a free list.
///
/// Every slot carries a [`Stamp`] that is bumped when its element is released, so a
/// [`SlotRef`] taken earlier can tell whether it still names the same element. A slot whose
/// stamp is spent is retired and never handed out again.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    // Capacity is kept at least `slots.len()`, so releasing never allocates.
    free: Vec<Handle>,
    retired: usize,
}

#[derive(Clone)]
struct Slot<T> {
    stamp: Stamp,
    element: Option<T>,
}

impl<T: Clone> Clone for Arena<T> {
    fn clone(&self) -> Self {
        let mut free = Vec::with_capacity(self.slots.len());
        free.extend_from_slice(&self.free);
        Self {
            slots: self.slots.clone(),
            free,
            retired: self.retired,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            retired: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            retired: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len() + self.retired)
    }

    /// Reserves room for `additional` more live elements.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let wanted = self.growth_for(additional);
        self.slots.reserve(wanted);
        self.free.reserve(self.slots.len() + wanted - self.free.len());
    }

    /// Fallible version of [`Arena::reserve`]. On error nothing is changed except capacity.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let wanted = self.growth_for(additional);
        self.slots.try_reserve(wanted)?;
        self.free.try_reserve(self.slots.len() + wanted - self.free.len())
    }

    // Free slots are reused first, only the remainder needs new slots.
    fn growth_for(&self, additional: usize) -> usize {
        additional.saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()].element = Some(element);
            return h;
        }

        // Use strict less-than to ensure the element count never exceeds `Handle::MAX`.
        assert!(
            self.slots.len() < Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX
        );
        self.free.reserve(self.slots.len() + 1 - self.free.len());
        self.slots.push(Slot {
            stamp: Stamp::default(),
            element: Some(element),
        });
        Handle::from_index(self.slots.len() - 1)
    }

    /// Makes room so the next [`Arena::alloc`] neither panics nor reallocates.
    ///
    /// # Panics
    ///
    /// Panics if the arena is at maximum capacity.
    pub(crate) fn reserve_slot(&mut self) {
        if self.free.is_empty() {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::reserve_slot()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
        }
        self.reserve(1);
    }

    /// Like [`Arena::alloc`], but reports exhaustion instead of panicking.
    ///
    /// All allocation happens before the element is stored, so on error the arena is
    /// untouched and `element` is dropped.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle, Error> {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()].element = Some(element);
            return Ok(h);
        }

        if self.slots.len() >= Handle::MAX {
            return Err(Error::CapacityExceeded {
                max: Handle::MAX,
            });
        }
        self.slots.try_reserve(1)?;
        self.free.try_reserve(self.slots.len() + 1 - self.free.len())?;
        self.slots.push(Slot {
            stamp: Stamp::default(),
            element: Some(element),
        });
        Ok(Handle::from_index(self.slots.len() - 1))
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].element.as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].element.as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Pairs `handle` with its current stamp.
    #[inline]
    pub(crate) fn slot_ref(&self, handle: Handle) -> SlotRef {
        SlotRef {
            handle,
            stamp: self.slots[handle.to_index()].stamp,
        }
    }

    /// Returns true if the slot is occupied and has not been released since `slot` was taken.
    pub(crate) fn is_live(&self, slot: SlotRef) -> bool {
        self.slots.get(slot.handle.to_index()).is_some_and(|s| s.stamp == slot.stamp && s.element.is_some())
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        let element = slot.element.take().expect("`Arena::take()` - `handle` is invalid!");
        match slot.stamp.next() {
            Some(stamp) => {
                slot.stamp = stamp;
                self.free.push(handle);
            }
            // A spent slot stays empty for good, so its last stamp never matches again.
            None => self.retired += 1,
        }
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.retired = 0;
    }

    /// Moves a slot's stamp to its last value, as if it had been released `u32::MAX` times.
    #[cfg(test)]
    pub(crate) fn spend_stamp(&mut self, handle: Handle) {
        self.slots[handle.to_index()].stamp = Stamp::LAST;
    }
}
