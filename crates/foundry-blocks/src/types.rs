use serde::{Deserialize, Serialize};

// Compact cell representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn of(id: BlockId) -> Self {
        Block { id, state: 0 }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Block::AIR.id
    }
}

/// Closed set of interchangeable structural part kinds.
///
/// The discriminant is the stable bit index used by hatch flag sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatchKind {
    ItemInput = 0,
    ItemOutput = 1,
    FluidInput = 2,
    FluidOutput = 3,
    EnergyInput = 4,
    EnergyOutput = 5,
}

impl HatchKind {
    pub const ALL: [HatchKind; 6] = [
        HatchKind::ItemInput,
        HatchKind::ItemOutput,
        HatchKind::FluidInput,
        HatchKind::FluidOutput,
        HatchKind::EnergyInput,
        HatchKind::EnergyOutput,
    ];

    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<HatchKind> {
        HatchKind::ALL.get(id as usize).copied()
    }

    /// Item stacks only move through item hatches.
    #[inline]
    pub fn is_item_input(self) -> bool {
        self == HatchKind::ItemInput
    }

    #[inline]
    pub fn is_item_output(self) -> bool {
        self == HatchKind::ItemOutput
    }
}
