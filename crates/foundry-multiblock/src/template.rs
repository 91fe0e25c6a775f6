use std::collections::HashMap;

use foundry_blocks::BlockId;
use foundry_geom::{BlockBox, BlockPos, Facing};

use crate::hatch_flags::HatchFlags;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellPredicate {
    /// Nothing may occupy the cell.
    Empty,
    /// Exactly this block.
    Block(BlockId),
    /// A hatch whose kind `flags` allows, or `casing` when given.
    Slot {
        flags: HatchFlags,
        casing: Option<BlockId>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpec {
    /// Offset from the anchor, authored for [`Facing::North`].
    pub offset: BlockPos,
    pub predicate: CellPredicate,
    /// Position among the template's slot cells, for slot cells only.
    pub slot: Option<usize>,
}

/// Immutable description of one multiblock layout. Share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ShapeTemplate {
    name: String,
    cells: Vec<CellSpec>,
    slot_count: usize,
    bounds: BlockBox,
}

impl ShapeTemplate {
    pub fn builder(name: impl Into<String>) -> ShapeTemplateBuilder {
        ShapeTemplateBuilder {
            name: name.into(),
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn cells(&self) -> &[CellSpec] {
        &self.cells
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn slot_flags(&self, slot: usize) -> Option<HatchFlags> {
        self.cells
            .iter()
            .filter(|c| c.slot == Some(slot))
            .find_map(|c| match c.predicate {
                CellPredicate::Slot { flags, .. } => Some(flags),
                _ => None,
            })
    }

    /// Template-space bounds of every cell.
    #[inline]
    pub fn bounds(&self) -> BlockBox {
        self.bounds
    }

    /// World-space box covering every cell the template can touch.
    pub fn world_bounds(&self, anchor: BlockPos, facing: Facing) -> BlockBox {
        BlockBox::from_corners(
            facing.offset_to_world(self.bounds.min),
            facing.offset_to_world(self.bounds.max),
        )
        .translated(anchor)
    }
}

pub struct ShapeTemplateBuilder {
    name: String,
    cells: Vec<(BlockPos, CellPredicate)>,
    index: HashMap<BlockPos, usize>,
}

impl ShapeTemplateBuilder {
    /// Sets the predicate for one cell. A later call for the same offset
    /// replaces the earlier predicate but keeps its position in the order.
    pub fn cell(mut self, offset: BlockPos, predicate: CellPredicate) -> Self {
        match self.index.get(&offset) {
            Some(&i) => self.cells[i].1 = predicate,
            None => {
                self.index.insert(offset, self.cells.len());
                self.cells.push((offset, predicate));
            }
        }
        self
    }

    pub fn empty(self, offset: BlockPos) -> Self {
        self.cell(offset, CellPredicate::Empty)
    }

    pub fn block(self, offset: BlockPos, block: BlockId) -> Self {
        self.cell(offset, CellPredicate::Block(block))
    }

    pub fn slot(self, offset: BlockPos, flags: HatchFlags) -> Self {
        self.cell(
            offset,
            CellPredicate::Slot {
                flags,
                casing: None,
            },
        )
    }

    pub fn slot_or_casing(self, offset: BlockPos, casing: BlockId, flags: HatchFlags) -> Self {
        self.cell(
            offset,
            CellPredicate::Slot {
                flags,
                casing: Some(casing),
            },
        )
    }

    /// Fills the inclusive box between `a` and `b` with one predicate.
    pub fn fill(self, a: BlockPos, b: BlockPos, predicate: CellPredicate) -> Self {
        BlockBox::from_corners(a, b)
            .iter()
            .fold(self, |t, p| t.cell(p, predicate))
    }

    pub fn build(self) -> ShapeTemplate {
        let mut slot_count = 0;
        let cells: Vec<CellSpec> = self
            .cells
            .into_iter()
            .map(|(offset, predicate)| {
                let slot = match predicate {
                    CellPredicate::Slot { .. } => {
                        slot_count += 1;
                        Some(slot_count - 1)
                    }
                    _ => None,
                };
                CellSpec {
                    offset,
                    predicate,
                    slot,
                }
            })
            .collect();
        let bounds = BlockBox::from_points(cells.iter().map(|c| c.offset))
            .unwrap_or(BlockBox::single(BlockPos::ORIGIN));
        ShapeTemplate {
            name: self.name,
            cells,
            slot_count,
            bounds,
        }
    }
}
