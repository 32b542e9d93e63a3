use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in the arena, stored off by one so `Option<Handle>` keeps its niche.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` is non-zero and fits in `RawHandle` after the assertion above.
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Release counter of an arena slot.
///
/// Bumped every time the slot's element is released. A slot whose counter cannot be bumped
/// any further is retired instead of being reused, so a stamp never repeats for its slot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) struct Stamp(u32);

impl Stamp {
    /// The stamp after one more release, or `None` once the counter is spent.
    #[inline]
    pub(crate) const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    #[cfg(test)]
    pub(crate) const LAST: Self = Self(u32::MAX);
}

/// A slot together with the stamp it had when the element was handed out.
///
/// The pair keeps naming that element for as long as it stays in the arena, and no other
/// element afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct SlotRef {
    pub(crate) handle: Handle,
    pub(crate) stamp: Stamp,
}
