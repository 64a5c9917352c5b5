//! Identifiers for render objects and renderers
//!
//! Ids come from an [`IdAllocator`] owned by whoever composes the application.
//! Clones of an allocator share its counters, so every object built from the
//! same allocator gets a distinct id; two independent allocators may hand out
//! the same values.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Identity of a render object, stable for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Raw numeric value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Identity of a renderer, used as the back-reference stored on attached objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(u64);

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "renderer#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Counters {
    objects: Cell<u64>,
    creation_order: Cell<u64>,
    renderers: Cell<u64>,
}

/// Shared id source for one application
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counters: Rc<Counters>,
}

impl IdAllocator {
    /// Create an allocator with fresh counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Next object id
    pub fn next_object(&self) -> ObjectId {
        ObjectId(bump(&self.counters.objects))
    }

    /// Next value of the creation-order counter
    pub fn next_creation_order(&self) -> u64 {
        bump(&self.counters.creation_order)
    }

    /// Next renderer id
    pub fn next_renderer(&self) -> RendererId {
        RendererId(bump(&self.counters.renderers))
    }
}

fn bump(counter: &Cell<u64>) -> u64 {
    let next = counter.get() + 1;
    counter.set(next);
    next
}
