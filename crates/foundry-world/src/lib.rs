//! Cell grid with structural parts and region change notifications.
#![forbid(unsafe_code)]

pub mod hatch;
pub mod inventory;
pub mod listener;
pub mod world;

pub use hatch::{ClaimToken, Hatch, HatchId};
pub use inventory::{Inventory, ItemStack};
pub use listener::{ChangeListener, DirtyFlag, ListenerId};
pub use world::World;
