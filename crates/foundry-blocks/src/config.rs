use serde::Deserialize;

use crate::types::HatchKind;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,

    // Present only for blocks that act as interchangeable structural parts
    #[serde(default)]
    pub hatch: Option<HatchDef>,
}

// hatch = { kind = "item_input", slots = 4, slot_capacity = 64 }
#[derive(Deserialize, Debug, Clone)]
pub struct HatchDef {
    pub kind: HatchKind,
    #[serde(default = "default_slots")]
    pub slots: usize,
    #[serde(default = "default_slot_capacity")]
    pub slot_capacity: u32,
}

fn default_slots() -> usize {
    1
}
fn default_slot_capacity() -> u32 {
    64
}
