//! Crafting multiblocks: hatch inventories, recipe progress, and the per-tick driver.
#![forbid(unsafe_code)]

pub mod active;
pub mod active_shape;
pub mod crafter;
pub mod inventory;
pub mod machine;
pub mod recipe;

pub use active::{ActivityListener, IsActiveComponent};
pub use active_shape::ActiveShapeComponent;
pub use crafter::{ActiveRecipe, CrafterComponent, CrafterState, RecipeBehavior};
pub use inventory::{MultiblockInventory, MultiblockInventoryComponent, MultiblockInventoryMut};
pub use machine::CraftingMultiblock;
pub use recipe::{Recipe, RecipeError, RecipeList};
