use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

/// Fixed number of slots, each holding one item type up to `slot_capacity`.
///
/// `insert` and `extract` take a `simulate` flag; a simulated call reports
/// what would move without touching the slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    slot_capacity: u32,
}

impl Inventory {
    pub fn new(slots: usize, slot_capacity: u32) -> Self {
        Self {
            slots: vec![None; slots],
            slot_capacity,
        }
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slot_capacity(&self) -> u32 {
        self.slot_capacity
    }

    pub fn slot(&self, i: usize) -> Option<&ItemStack> {
        self.slots.get(i).and_then(|s| s.as_ref())
    }

    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    pub fn count(&self, item: &str) -> u64 {
        self.stacks()
            .filter(|s| s.item == item)
            .map(|s| u64::from(s.count))
            .sum()
    }

    /// Inserts up to `amount` of `item`, topping up matching stacks before
    /// opening empty slots. Returns how many were (or would be) accepted.
    pub fn insert(&mut self, item: &str, amount: u32, simulate: bool) -> u32 {
        let cap = self.slot_capacity;
        let mut left = amount;
        for slot in self.slots.iter_mut() {
            if left == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item == item && stack.count < cap {
                    let moved = left.min(cap - stack.count);
                    if !simulate {
                        stack.count += moved;
                    }
                    left -= moved;
                }
            }
        }
        for slot in self.slots.iter_mut() {
            if left == 0 {
                break;
            }
            if slot.is_none() {
                let moved = left.min(cap);
                if moved == 0 {
                    break;
                }
                if !simulate {
                    *slot = Some(ItemStack::new(item, moved));
                }
                left -= moved;
            }
        }
        amount - left
    }

    /// Removes up to `amount` of `item`. Returns how many were (or would be) removed.
    pub fn extract(&mut self, item: &str, amount: u32, simulate: bool) -> u32 {
        let mut left = amount;
        for slot in self.slots.iter_mut() {
            if left == 0 {
                break;
            }
            let Some(stack) = slot else { continue };
            if stack.item != item {
                continue;
            }
            let moved = left.min(stack.count);
            left -= moved;
            if !simulate {
                stack.count -= moved;
                if stack.count == 0 {
                    *slot = None;
                }
            }
        }
        amount - left
    }
}
