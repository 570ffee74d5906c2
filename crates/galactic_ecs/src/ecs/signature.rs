//! # Signatures
//!
//! A signature is a fixed-width bitset over component kinds. Entities carry
//! one describing what they have, systems carry one describing what they need.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use super::component::ComponentKind;

/// Maximum number of distinct component kinds (width of a [`Signature`]).
pub const MAX_COMPONENTS: usize = 64;

/// Bitset of component kinds.
///
/// Bit `k` is set when the entity has (or the system requires) component
/// kind `k`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// The empty signature.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a signature from a raw mask.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw mask.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Sets the bit for `kind`.
    #[inline]
    pub fn set(&mut self, kind: ComponentKind) {
        self.0 |= 1 << kind.index();
    }

    /// Clears the bit for `kind`.
    #[inline]
    pub fn clear(&mut self, kind: ComponentKind) {
        self.0 &= !(1 << kind.index());
    }

    /// Tests the bit for `kind`.
    #[inline]
    #[must_use]
    pub const fn test(self, kind: ComponentKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    /// Clears every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// True when every bit of `required` is also set here.
    ///
    /// This is the system interest test: `(self & required) == required`.
    #[inline]
    #[must_use]
    pub const fn contains(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// True when no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the kind indices that are set, lowest first.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_COMPONENTS).filter(move |bit| self.0 & (1 << bit) != 0)
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
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
        write!(f, "Signature({:#066b})", self.0)
    }
}
