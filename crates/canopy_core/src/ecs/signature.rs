//! # Signatures
//!
//! A fixed-width bitmask of component kinds. Bit *k* set means
//! "has (or requires) the component with id *k*".

use std::fmt;
use std::ops::BitOr;

/// Number of component kinds a signature can describe.
pub const MAX_COMPONENTS: usize = 32;

/// Set of component kinds, one bit per [`ComponentId`](super::ComponentId).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u32);

impl Signature {
    /// The empty signature.
    pub const EMPTY: Self = Self(0);

    /// Creates a signature from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Sets bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MAX_COMPONENTS`.
    #[inline]
    pub fn set(&mut self, index: u8) {
        assert!((index as usize) < MAX_COMPONENTS, "signature bit {index} out of range");
        self.0 |= 1 << index;
    }

    /// Clears bit `index`.
    #[inline]
    pub fn clear(&mut self, index: u8) {
        if (index as usize) < MAX_COMPONENTS {
            self.0 &= !(1 << index);
        }
    }

    /// Tests bit `index`.
    #[inline]
    #[must_use]
    pub const fn test(self, index: u8) -> bool {
        (index as usize) < MAX_COMPONENTS && (self.0 >> index) & 1 == 1
    }

    /// Returns `true` if every bit of `required` is also set in `self`.
    ///
    /// This is the membership test between an entity signature and a
    /// system's required signature.
    #[inline]
    #[must_use]
    pub const fn contains(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Clears every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}
