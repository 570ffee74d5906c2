//! # Component System
//!
//! Components are plain data records. Each concrete component type is a
//! *kind*; kinds receive a small integer id the first time they are
//! referenced, and that id indexes both entity signatures and the
//! registry's pool vector.

use std::any::{type_name, TypeId};
use std::fmt;

use parking_lot::{const_mutex, Mutex};

use super::signature::MAX_COMPONENTS;
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Default`: pool slots for entities without the component hold a default value
/// - `'static`: the kind table is keyed by [`TypeId`]
///
/// # Example
///
/// ```rust
/// use galactic_ecs::Component;
///
/// #[derive(Default)]
/// struct Health {
///     hit_points: u32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Default + 'static {}

/// Id of a component kind, in `0..MAX_COMPONENTS`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentKind(u8);

/// Process-wide kind table. Ids are never released.
static GLOBAL_KINDS: Mutex<ComponentKinds> = const_mutex(ComponentKinds::new());

impl ComponentKind {
    /// Returns the kind id of `T`, assigning the next free id on first use.
    ///
    /// # Panics
    ///
    /// Panics if `T` would be kind number `MAX_COMPONENTS + 1`. That is a
    /// configuration error and there is nothing sensible to continue with.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        match Self::try_of::<T>() {
            Ok(kind) => kind,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`ComponentKind::of`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TooManyComponentKinds`] when the table is full.
    pub fn try_of<T: Component>() -> EcsResult<Self> {
        GLOBAL_KINDS.lock().kind_of::<T>()
    }

    /// Type name of the component registered under this id.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        GLOBAL_KINDS.lock().name(self)
    }

    /// Number of kinds assigned so far in this process.
    #[must_use]
    pub fn registered_count() -> usize {
        GLOBAL_KINDS.lock().len()
    }

    /// Wraps a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_COMPONENTS`].
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        assert!((index as usize) < MAX_COMPONENTS, "component kind out of range");
        Self(index)
    }

    /// The raw index, usable as a bit position or pool slot.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.0)
    }
}

/// Append-only table mapping component types to kind ids in first-use order.
///
/// The registry uses a single process-wide instance through
/// [`ComponentKind::of`]; standalone tables exist so the allocation rule can
/// be exercised in isolation.
pub struct ComponentKinds {
    kinds: Vec<(TypeId, &'static str)>,
    limit: usize,
}

impl ComponentKinds {
    /// Creates an empty table bounded by [`MAX_COMPONENTS`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kinds: Vec::new(),
            limit: MAX_COMPONENTS,
        }
    }

    #[cfg(test)]
    const fn with_limit(limit: usize) -> Self {
        Self {
            kinds: Vec::new(),
            limit,
        }
    }

    /// Looks up `T`, assigning the next id if it has not been seen.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TooManyComponentKinds`] when `T` is new and the
    /// table is full.
    pub fn kind_of<T: 'static>(&mut self) -> EcsResult<ComponentKind> {
        let type_id = TypeId::of::<T>();
        if let Some(index) = self.kinds.iter().position(|(id, _)| *id == type_id) {
            return Ok(ComponentKind(Self::narrow(index)));
        }

        if self.kinds.len() >= self.limit {
            return Err(EcsError::TooManyComponentKinds { limit: self.limit });
        }

        let index = self.kinds.len();
        self.kinds.push((type_id, type_name::<T>()));
        tracing::debug!(kind = index, component = type_name::<T>(), "component kind assigned");
        Ok(ComponentKind(Self::narrow(index)))
    }

    /// Looks up `T` without assigning.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<ComponentKind> {
        let type_id = TypeId::of::<T>();
        self.kinds
            .iter()
            .position(|(id, _)| *id == type_id)
            .map(|index| ComponentKind(Self::narrow(index)))
    }

    /// Type name stored for `kind`.
    #[must_use]
    pub fn name(&self, kind: ComponentKind) -> Option<&'static str> {
        self.kinds.get(kind.index()).map(|(_, name)| *name)
    }

    /// Number of kinds assigned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// True when no kind has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    // `limit <= MAX_COMPONENTS <= u8::MAX`, so every stored index fits.
    #[allow(clippy::cast_possible_truncation)]
    const fn narrow(index: usize) -> u8 {
        index as u8
    }
}

impl Default for ComponentKinds {
    fn default() -> Self {
        Self::new()
    }
}
