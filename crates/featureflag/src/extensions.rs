//! Typed storage for evaluator data attached to a [`Context`](crate::Context).

use fxhash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;

type AnyMap = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// A type map holding at most one value per type.
///
/// The map is only allocated on the first insert, so contexts that no
/// evaluator writes to stay allocation free.
#[derive(Default)]
pub struct Extensions {
    map: Option<AnyMap>,
}

impl Extensions {
    pub const fn new() -> Self {
        Self { map: None }
    }

    pub fn has<T: Send + Sync + 'static>(&self) -> bool {
        self.map.as_ref().is_some_and(|map| map.contains_key(&TypeId::of::<T>()))
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map.as_ref()?.get(&TypeId::of::<T>())?.downcast_ref()
    }

    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map.as_mut()?.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }

    /// Stores `value`, returning the value of the same type it replaced.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .get_or_insert_with(AnyMap::default)
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|previous| previous.downcast().ok())
            .map(|boxed| *boxed)
    }

    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .as_mut()?
            .remove(&TypeId::of::<T>())
            .and_then(|previous| previous.downcast().ok())
            .map(|boxed| *boxed)
    }

    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, FxHashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions").field("len", &self.len()).finish_non_exhaustive()
    }
}
