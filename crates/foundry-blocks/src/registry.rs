use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::config::{BlockDef, BlocksConfig};
use super::types::{Block, BlockId, HatchKind};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid blocks config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("block name {0:?} defined twice")]
    DuplicateName(String),
    #[error("block id {id} used by both {first:?} and {second:?}")]
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    #[error("`air` must be defined with id 0")]
    AirNotZero,
    #[error("hatch block {0:?} must have at least one slot")]
    EmptyHatch(String),
}

/// Inventory layout a hatch block gets when placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HatchSpec {
    pub kind: HatchKind,
    pub slots: usize,
    pub slot_capacity: u32,
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub hatch: Option<HatchSpec>,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            hatch: None,
        }
    }

    #[inline]
    pub fn is_hatch(&self) -> bool {
        self.hatch.is_some()
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::of)
    }

    pub fn hatch_spec(&self, id: BlockId) -> Option<HatchSpec> {
        self.get(id).and_then(|ty| ty.hatch)
    }

    pub fn name_of(&self, id: BlockId) -> &str {
        self.get(id).map(|ty| ty.name.as_str()).unwrap_or("?")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        // Ids that were assigned explicitly, so implicit ids can skip them.
        let taken: Vec<BlockId> = cfg.blocks.iter().filter_map(|d| d.id).collect();
        let mut next_free: BlockId = 0;
        let mut assigned: Vec<Option<String>> = Vec::new();

        for def in cfg.blocks.into_iter() {
            let id = match def.id {
                Some(id) => id,
                None => {
                    while taken.contains(&next_free)
                        || assigned
                            .get(next_free as usize)
                            .is_some_and(|slot| slot.is_some())
                    {
                        next_free += 1;
                    }
                    next_free
                }
            };
            if reg.by_name.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            if assigned.len() <= id as usize {
                assigned.resize(id as usize + 1, None);
                reg.blocks.resize(id as usize + 1, BlockType::placeholder(0));
            }
            if let Some(first) = &assigned[id as usize] {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: first.clone(),
                    second: def.name,
                });
            }
            let ty = compile_block(id, def)?;
            assigned[id as usize] = Some(ty.name.clone());
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }

        for (i, slot) in assigned.iter().enumerate() {
            if slot.is_none() {
                reg.blocks[i] = BlockType::placeholder(i as BlockId);
            }
        }
        if reg.id_by_name("air") != Some(Block::AIR.id) {
            return Err(RegistryError::AirNotZero);
        }
        log::debug!(
            target: "blocks",
            "registry loaded: {} block(s), {} hatch type(s)",
            reg.by_name.len(),
            reg.blocks.iter().filter(|b| b.is_hatch()).count()
        );
        Ok(reg)
    }
}

fn compile_block(id: BlockId, def: BlockDef) -> Result<BlockType, RegistryError> {
    let hatch = match def.hatch {
        Some(h) if h.slots == 0 => return Err(RegistryError::EmptyHatch(def.name)),
        Some(h) => Some(HatchSpec {
            kind: h.kind,
            slots: h.slots,
            slot_capacity: h.slot_capacity,
        }),
        None => None,
    };
    let solid = def.solid.unwrap_or(def.name != "air");
    Ok(BlockType {
        id,
        name: def.name,
        solid,
        hatch,
    })
}
