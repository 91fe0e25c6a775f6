use foundry_blocks::HatchKind;
use foundry_multiblock::{BoundHatch, ShapeMatcher};
use foundry_world::{Inventory, ItemStack, World};

/// Slot-indexed view of the hatches bound by the last successful match.
///
/// Slot `k` is the `k`-th slot cell of the template, so recipe logic can
/// address the same hatch across rebuilds while it stays in place. Only
/// valid after a successful match in the same tick; a hatch that was
/// replaced since then reads as missing.
#[derive(Debug, Default)]
pub struct MultiblockInventoryComponent {
    slots: Vec<Option<BoundHatch>>,
}

impl MultiblockInventoryComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the view wholesale from `matcher`'s bound hatches. Returns how
    /// many slots changed occupant compared to the previous view.
    pub fn rebuild(&mut self, matcher: &ShapeMatcher) -> usize {
        debug_assert!(matcher.is_match_successful());
        let mut slots = vec![None; matcher.template().slot_count()];
        for part in matcher.bound_hatches() {
            if let Some(slot) = slots.get_mut(part.slot) {
                *slot = Some(*part);
            }
        }
        let changed = (0..slots.len().max(self.slots.len()))
            .filter(|&i| {
                let old = self.slots.get(i).copied().flatten().map(|p| p.id);
                let new = slots.get(i).copied().flatten().map(|p| p.id);
                old != new
            })
            .count();
        if changed > 0 {
            log::debug!(target: "inventory", "rebuilt: {} slot(s) changed occupant", changed);
        }
        self.slots = slots;
        changed
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slot(&self, k: usize) -> Option<&BoundHatch> {
        self.slots.get(k).and_then(|s| s.as_ref())
    }

    pub fn bound(&self) -> impl Iterator<Item = &BoundHatch> {
        self.slots.iter().flatten()
    }

    pub fn view<'w>(&'w self, world: &'w World) -> MultiblockInventory<'w> {
        MultiblockInventory {
            slots: &self.slots,
            world,
        }
    }

    pub fn view_mut<'w>(&'w self, world: &'w mut World) -> MultiblockInventoryMut<'w> {
        MultiblockInventoryMut {
            slots: &self.slots,
            world,
        }
    }
}

fn live<'w>(world: &'w World, part: &BoundHatch) -> Option<&'w Inventory> {
    world
        .hatch(part.pos)
        .filter(|h| h.id() == part.id)
        .map(|h| &h.inventory)
}

fn has_all(inventories: &[&Inventory], stacks: &[ItemStack]) -> bool {
    stacks.iter().all(|want| {
        let have: u64 = inventories.iter().map(|inv| inv.count(&want.item)).sum();
        // Count every stack naming the same item together.
        let need: u64 = stacks
            .iter()
            .filter(|s| s.item == want.item)
            .map(|s| u64::from(s.count))
            .sum();
        have >= need
    })
}

// Inserts into scratch copies; true if every stack fits completely.
fn fits_all(inventories: &[&Inventory], stacks: &[ItemStack]) -> bool {
    let mut scratch: Vec<Inventory> = inventories.iter().map(|inv| (*inv).clone()).collect();
    for stack in stacks {
        let mut left = stack.count;
        for inv in scratch.iter_mut() {
            if left == 0 {
                break;
            }
            left -= inv.insert(&stack.item, left, false);
        }
        if left > 0 {
            return false;
        }
    }
    true
}

/// Read-only view over the aggregated hatch inventories.
pub struct MultiblockInventory<'w> {
    slots: &'w [Option<BoundHatch>],
    world: &'w World,
}

impl<'w> MultiblockInventory<'w> {
    pub fn slot(&self, k: usize) -> Option<&'w Inventory> {
        let part = self.slots.get(k)?.as_ref()?;
        live(self.world, part)
    }

    pub fn inventories_where(&self, pred: impl Fn(HatchKind) -> bool) -> Vec<&'w Inventory> {
        let world = self.world;
        self.slots
            .iter()
            .flatten()
            .filter(|p| pred(p.kind))
            .filter_map(|p| live(world, p))
            .collect()
    }

    /// Item input hatches. Fluid and energy hatches never hold recipe items.
    pub fn inputs(&self) -> Vec<&'w Inventory> {
        self.inventories_where(HatchKind::is_item_input)
    }

    pub fn outputs(&self) -> Vec<&'w Inventory> {
        self.inventories_where(HatchKind::is_item_output)
    }

    pub fn count_input(&self, item: &str) -> u64 {
        self.inputs().iter().map(|inv| inv.count(item)).sum()
    }

    pub fn count_output(&self, item: &str) -> u64 {
        self.outputs().iter().map(|inv| inv.count(item)).sum()
    }

    pub fn has_inputs(&self, stacks: &[ItemStack]) -> bool {
        has_all(&self.inputs(), stacks)
    }

    pub fn fits_outputs(&self, stacks: &[ItemStack]) -> bool {
        fits_all(&self.outputs(), stacks)
    }
}

/// Mutable view; moves items in and out of the bound hatches.
pub struct MultiblockInventoryMut<'w> {
    slots: &'w [Option<BoundHatch>],
    world: &'w mut World,
}

impl<'w> MultiblockInventoryMut<'w> {
    pub fn as_view(&self) -> MultiblockInventory<'_> {
        MultiblockInventory {
            slots: self.slots,
            world: &*self.world,
        }
    }

    fn for_each_where(
        &mut self,
        pred: impl Fn(HatchKind) -> bool,
        mut f: impl FnMut(&mut Inventory) -> bool,
    ) {
        let slots = self.slots;
        for part in slots.iter().flatten().filter(|p| pred(p.kind)) {
            let Some(h) = self.world.hatch_mut(part.pos) else {
                continue;
            };
            if h.id() != part.id {
                continue;
            }
            if !f(&mut h.inventory) {
                break;
            }
        }
    }

    /// Removes every input stack, or nothing if any is short.
    pub fn take_inputs(&mut self, stacks: &[ItemStack]) -> bool {
        if !self.as_view().has_inputs(stacks) {
            return false;
        }
        for stack in stacks {
            let mut left = stack.count;
            self.for_each_where(HatchKind::is_item_input, |inv| {
                left -= inv.extract(&stack.item, left, false);
                left > 0
            });
        }
        true
    }

    /// Inserts every output stack, or nothing if any would not fit.
    pub fn put_outputs(&mut self, stacks: &[ItemStack]) -> bool {
        if !self.as_view().fits_outputs(stacks) {
            return false;
        }
        for stack in stacks {
            let mut left = stack.count;
            self.for_each_where(HatchKind::is_item_output, |inv| {
                left -= inv.insert(&stack.item, left, false);
                left > 0
            });
        }
        true
    }
}
