//! # Component Pools
//!
//! Dense, entity-id-indexed storage for a single component kind.
//!
//! The pool uses a dense array strategy:
//! - One slot per entity id, whether or not that entity has the component
//! - Access is O(1) via entity index
//! - Presence is decided by the entity's signature, never by the pool

use std::any::{type_name, Any};

/// Storage for a single component type.
///
/// Slots for entities that do not (or no longer) carry the component hold
/// whatever was last written there, or `T::default()`. Callers check the
/// signature before trusting a slot.
///
/// # Example
///
/// ```rust
/// use galactic_ecs::Pool;
///
/// let mut pool: Pool<u32> = Pool::new();
/// pool.set(4, 7);
/// assert_eq!(pool.len(), 5);
/// assert_eq!(pool.get(4), Some(&7));
/// ```
pub struct Pool<T> {
    data: Vec<T>,
}

impl<T: Default> Pool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates a pool with room for `capacity` slots before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the pool has no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grows the pool to at least `len` slots. Never shrinks.
    pub fn resize(&mut self, len: usize) {
        if len > self.data.len() {
            self.data.resize_with(len, T::default);
        }
    }

    /// Overwrites slot `index`, growing the pool if needed.
    pub fn set(&mut self, index: usize, value: T) {
        self.resize(index + 1);
        self.data[index] = value;
    }

    /// Reference to slot `index`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Mutable reference to slot `index`, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Drops every slot.
    ///
    /// Only used when the whole registry is torn down.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind-agnostic view of a [`Pool`].
///
/// The registry keeps one boxed `AnyPool` per component kind and downcasts
/// through [`AnyPool::as_any`] when it knows the concrete type.
pub trait AnyPool {
    /// Number of slots.
    fn len(&self) -> usize;

    /// True when the pool has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows the pool to at least `len` slots.
    fn resize(&mut self, len: usize);

    /// Drops every slot.
    fn clear(&mut self);

    /// Type name of the stored component.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to `Pool<T>`.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to `Pool<T>`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Default + 'static> AnyPool for Pool<T> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn resize(&mut self, len: usize) {
        Pool::resize(self, len);
    }

    fn clear(&mut self) {
        Pool::clear(self);
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
