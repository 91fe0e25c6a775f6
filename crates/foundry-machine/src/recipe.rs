use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use foundry_world::ItemStack;
use serde::Deserialize;
use thiserror::Error;

use crate::crafter::RecipeBehavior;
use crate::inventory::{MultiblockInventory, MultiblockInventoryMut};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub inputs: Vec<ItemStack>,
    #[serde(default)]
    pub outputs: Vec<ItemStack>,
    pub work: u32,
    #[serde(default = "one")]
    pub work_per_tick: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RecipesFile {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("duplicate recipe id {0:?}")]
    DuplicateId(String),
    #[error("recipe {0:?} needs positive work")]
    ZeroWork(String),
    #[error("recipe {0:?} produces nothing")]
    NoOutputs(String),
}

/// Data-driven behavior: the first recipe, in file order, whose inputs are
/// present and whose outputs fit is started.
///
/// Inputs are taken when the recipe completes, so a recipe whose inputs are
/// pulled out mid-way stalls instead of finishing from nothing.
#[derive(Clone, Debug, Default)]
pub struct RecipeList {
    recipes: Vec<Arc<Recipe>>,
}

impl RecipeList {
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, RecipeError> {
        let mut seen = HashSet::new();
        for r in &recipes {
            if !seen.insert(r.id.as_str()) {
                return Err(RecipeError::DuplicateId(r.id.clone()));
            }
            if r.work == 0 {
                return Err(RecipeError::ZeroWork(r.id.clone()));
            }
            if r.outputs.is_empty() {
                return Err(RecipeError::NoOutputs(r.id.clone()));
            }
        }
        Ok(Self {
            recipes: recipes.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| RecipeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::from_toml_str(&s)?;
        log::debug!(target: "recipes", "loaded {} recipe(s) from {:?}", list.len(), path);
        Ok(list)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RecipeError> {
        let file: RecipesFile = toml::from_str(toml_str)?;
        Self::new(file.recipes)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

impl RecipeBehavior for RecipeList {
    type Recipe = Arc<Recipe>;

    fn try_select(&mut self, inventory: &MultiblockInventory<'_>) -> Option<Arc<Recipe>> {
        self.recipes
            .iter()
            .find(|r| inventory.has_inputs(&r.inputs) && inventory.fits_outputs(&r.outputs))
            .cloned()
    }

    fn work_required(&self, recipe: &Arc<Recipe>) -> u32 {
        recipe.work
    }

    fn work_per_tick(&self, recipe: &Arc<Recipe>) -> u32 {
        recipe.work_per_tick
    }

    fn can_progress(&self, recipe: &Arc<Recipe>, inventory: &MultiblockInventory<'_>) -> bool {
        inventory.has_inputs(&recipe.inputs)
    }

    fn outputs_fit(&self, recipe: &Arc<Recipe>, inventory: &MultiblockInventory<'_>) -> bool {
        inventory.fits_outputs(&recipe.outputs)
    }

    fn apply_completion(
        &mut self,
        recipe: &Arc<Recipe>,
        inventory: &mut MultiblockInventoryMut<'_>,
    ) -> bool {
        {
            let view = inventory.as_view();
            if !view.has_inputs(&recipe.inputs) || !view.fits_outputs(&recipe.outputs) {
                return false;
            }
        }
        inventory.take_inputs(&recipe.inputs) && inventory.put_outputs(&recipe.outputs)
    }
}
