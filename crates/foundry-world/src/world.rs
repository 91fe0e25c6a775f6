use std::rc::Rc;
use std::sync::Arc;

use foundry_blocks::{Block, BlockRegistry};
use foundry_geom::{BlockBox, BlockPos};
use hashbrown::HashMap;

use crate::hatch::{Hatch, HatchId};
use crate::listener::{ChangeListener, ListenerId};

struct Subscription {
    region: BlockBox,
    listener: Rc<dyn ChangeListener>,
}

/// Sparse cell grid. Unset cells read as air.
///
/// Placing a block whose registry entry declares a hatch creates the hatch
/// record; replacing or removing that block drops it.
pub struct World {
    reg: Arc<BlockRegistry>,
    cells: HashMap<BlockPos, Block>,
    hatches: HashMap<BlockPos, Hatch>,
    listeners: HashMap<ListenerId, Subscription>,
    next_listener: u64,
    next_hatch: u64,
    // Bumped on every effective cell change
    rev: u64,
}

impl World {
    pub fn new(reg: Arc<BlockRegistry>) -> Self {
        Self {
            reg,
            cells: HashMap::new(),
            hatches: HashMap::new(),
            listeners: HashMap::new(),
            next_listener: 0,
            next_hatch: 0,
            rev: 0,
        }
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    #[inline]
    pub fn get(&self, pos: BlockPos) -> Block {
        self.cells.get(&pos).copied().unwrap_or(Block::AIR)
    }

    /// Writes a cell and notifies every listener whose region contains it.
    /// Writing the block already present is a no-op and returns `false`.
    pub fn set(&mut self, pos: BlockPos, block: Block) -> bool {
        if self.get(pos) == block {
            return false;
        }
        if block.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, block);
        }
        if let Some(old) = self.hatches.remove(&pos) {
            if let Some(owner) = old.claimed_by() {
                log::debug!(
                    target: "world",
                    "hatch {:?} at {:?} removed while claimed by {:?}",
                    old.id(),
                    pos,
                    owner
                );
            }
        }
        if let Some(spec) = self.reg.hatch_spec(block.id) {
            self.next_hatch += 1;
            self.hatches
                .insert(pos, Hatch::new(HatchId(self.next_hatch), spec));
        }
        self.rev = self.rev.wrapping_add(1).max(1);
        self.notify(pos);
        true
    }

    /// Convenience for [`World::set`] with a registry name. Returns `false`
    /// if the name is unknown or the cell already held that block.
    pub fn set_by_name(&mut self, pos: BlockPos, name: &str) -> bool {
        match self.reg.block_by_name(name) {
            Some(b) => self.set(pos, b),
            None => {
                log::warn!(target: "world", "unknown block {:?}", name);
                false
            }
        }
    }

    #[inline]
    pub fn remove(&mut self, pos: BlockPos) -> bool {
        self.set(pos, Block::AIR)
    }

    fn notify(&self, pos: BlockPos) {
        for sub in self.listeners.values() {
            if sub.region.contains(pos) {
                sub.listener.on_change(pos);
            }
        }
    }

    #[inline]
    pub fn hatch(&self, pos: BlockPos) -> Option<&Hatch> {
        self.hatches.get(&pos)
    }

    #[inline]
    pub fn hatch_mut(&mut self, pos: BlockPos) -> Option<&mut Hatch> {
        self.hatches.get_mut(&pos)
    }

    pub fn hatch_count(&self) -> usize {
        self.hatches.len()
    }

    pub fn subscribe(&mut self, region: BlockBox, listener: Rc<dyn ChangeListener>) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, Subscription { region, listener });
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Monotonic change stamp; 0 until the first effective write.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.rev
    }
}
