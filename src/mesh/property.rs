//! Per-element property storage.
//!
//! A [`PropertyMap`] is a dense array of values indexed by one kind of element
//! handle. Algorithms create the maps they need, fill them, and drop them when
//! they are done; the mesh itself never owns them.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use super::index::ElementId;

/// Dense values keyed by an element handle `H`.
#[derive(Clone)]
pub struct PropertyMap<H: ElementId, T> {
    values: Vec<T>,
    _handle: PhantomData<H>,
}

impl<H: ElementId, T: Clone> PropertyMap<H, T> {
    /// Create a map for `len` elements, all set to `default`.
    pub fn new(len: usize, default: T) -> Self {
        Self {
            values: vec![default; len],
            _handle: PhantomData,
        }
    }
}

impl<H: ElementId, T> PropertyMap<H, T> {
    /// Build a map by evaluating `f` for every handle `0..len`.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
        Self {
            values: (0..len).map(f).collect(),
            _handle: PhantomData,
        }
    }

    /// Number of elements covered by the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map covers no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `handle`, or `None` if the handle is newer than the map.
    #[inline]
    pub fn get(&self, handle: H) -> Option<&T> {
        self.values.get(handle.index())
    }

    /// Iterate over the stored values in handle order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }
}

impl<H: ElementId, T> Index<H> for PropertyMap<H, T> {
    type Output = T;

    #[inline]
    fn index(&self, handle: H) -> &T {
        &self.values[handle.index()]
    }
}

impl<H: ElementId, T> IndexMut<H> for PropertyMap<H, T> {
    #[inline]
    fn index_mut(&mut self, handle: H) -> &mut T {
        &mut self.values[handle.index()]
    }
}

impl<H: ElementId, T: fmt::Debug> fmt::Debug for PropertyMap<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}
