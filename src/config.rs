use std::path::{Path, PathBuf};

use foundry_blocks::{BlockRegistry, HatchKind};
use foundry_geom::{BlockPos, Facing};
use foundry_multiblock::{HatchFlags, ShapeTemplate};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("no shapes configured")]
    NoShapes,
    #[error("shape {shape:?}: unknown block {name:?}")]
    UnknownBlock { shape: String, name: String },
    #[error("shape {shape:?}: cell {offset:?} must set exactly one of block, slot, empty")]
    BadCell { shape: String, offset: [i32; 3] },
    #[error("shape {shape:?}: slot at {offset:?} allows no hatch kinds")]
    EmptySlot { shape: String, offset: [i32; 3] },
}

// Top-level sim config file
#[derive(Deserialize, Debug, Clone)]
pub struct SimConfig {
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Idle ticks before the machine reports inactive.
    #[serde(default = "default_off_delay")]
    pub off_delay: u32,
    #[serde(default)]
    pub selector_tool: String,
    #[serde(default)]
    pub machine: MachineConfig,
    pub shapes: Vec<ShapeConfig>,
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

fn default_ticks() -> u32 {
    100
}
fn default_off_delay() -> u32 {
    1
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct MachineConfig {
    #[serde(default)]
    pub anchor: [i32; 3],
    #[serde(default)]
    pub facing: Facing,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeConfig {
    pub name: String,
    pub cells: Vec<CellConfig>,
}

// { offset = [0, 0, 1], slot = ["item_input"], casing = "casing", place = "input_hatch" }
#[derive(Deserialize, Debug, Clone)]
pub struct CellConfig {
    pub offset: [i32; 3],
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub slot: Option<Vec<HatchKind>>,
    #[serde(default)]
    pub casing: Option<String>,
    #[serde(default)]
    pub empty: bool,
    // Block put here when the demo structure is built; defaults to `block`
    #[serde(default)]
    pub place: Option<String>,
}

impl CellConfig {
    pub fn pos(&self) -> BlockPos {
        self.offset.into()
    }

    /// What to build at this cell, if anything.
    pub fn placed_block(&self) -> Option<&str> {
        self.place.as_deref().or(self.block.as_deref())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct EventConfig {
    pub tick: u32,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Clears the cell at a template offset.
    Break { offset: [i32; 3] },
    Place { offset: [i32; 3], block: String },
    /// Uses the controller while holding `item`.
    Use { item: String },
    Insert { offset: [i32; 3], item: String, count: u32 },
}

impl SimConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = toml::from_str(toml_str)?;
        if cfg.shapes.is_empty() {
            return Err(ConfigError::NoShapes);
        }
        Ok(cfg)
    }

    pub fn anchor(&self) -> BlockPos {
        self.machine.anchor.into()
    }
}

impl ShapeConfig {
    pub fn to_template(&self, reg: &BlockRegistry) -> Result<ShapeTemplate, ConfigError> {
        let lookup = |name: &str| {
            reg.id_by_name(name).ok_or_else(|| ConfigError::UnknownBlock {
                shape: self.name.clone(),
                name: name.to_string(),
            })
        };
        let mut b = ShapeTemplate::builder(&self.name);
        for cell in &self.cells {
            let set = [cell.block.is_some(), cell.slot.is_some(), cell.empty];
            if set.iter().filter(|&&x| x).count() != 1 {
                return Err(ConfigError::BadCell {
                    shape: self.name.clone(),
                    offset: cell.offset,
                });
            }
            if let Some(place) = &cell.place {
                lookup(place)?;
            }
            b = match (&cell.block, &cell.slot) {
                (Some(name), _) => b.block(cell.pos(), lookup(name)?),
                (_, Some(kinds)) => {
                    let flags: HatchFlags = kinds.iter().copied().collect();
                    if flags.is_empty() {
                        return Err(ConfigError::EmptySlot {
                            shape: self.name.clone(),
                            offset: cell.offset,
                        });
                    }
                    match &cell.casing {
                        Some(casing) => b.slot_or_casing(cell.pos(), lookup(casing)?, flags),
                        None => b.slot(cell.pos(), flags),
                    }
                }
                _ => b.empty(cell.pos()),
            };
        }
        Ok(b.build())
    }
}
