//! Block ids, hatch kinds, and the block registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType, HatchSpec, RegistryError};
pub use types::{Block, BlockId, BlockState, HatchKind};
