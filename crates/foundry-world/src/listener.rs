use std::cell::Cell;

use foundry_geom::BlockPos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Receives a callback for every cell change inside a subscribed region.
///
/// Called while the world is mid-mutation: implementations record the change
/// and return, they must not try to re-read the world.
pub trait ChangeListener {
    fn on_change(&self, pos: BlockPos);
}

/// Listener that only remembers that something changed.
#[derive(Debug, Default)]
pub struct DirtyFlag(Cell<bool>);

impl DirtyFlag {
    pub fn new(dirty: bool) -> Self {
        Self(Cell::new(dirty))
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    #[inline]
    pub fn set(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn clear(&self) {
        self.0.set(false);
    }
}

impl ChangeListener for DirtyFlag {
    fn on_change(&self, _pos: BlockPos) {
        self.set();
    }
}
