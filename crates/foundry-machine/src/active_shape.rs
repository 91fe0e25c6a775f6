use std::sync::Arc;

use foundry_multiblock::ShapeTemplate;
use foundry_world::ItemStack;

/// The templates a machine can be built as, and which one is selected.
#[derive(Clone, Debug)]
pub struct ActiveShapeComponent {
    templates: Vec<Arc<ShapeTemplate>>,
    active: usize,
    selector_tool: String,
}

impl ActiveShapeComponent {
    /// Panics if `templates` is empty.
    pub fn new(templates: Vec<Arc<ShapeTemplate>>, selector_tool: impl Into<String>) -> Self {
        assert!(!templates.is_empty(), "a machine needs at least one shape");
        Self {
            templates,
            active: 0,
            selector_tool: selector_tool.into(),
        }
    }

    pub fn single(template: Arc<ShapeTemplate>) -> Self {
        Self::new(vec![template], String::new())
    }

    #[inline]
    pub fn active_shape(&self) -> &Arc<ShapeTemplate> {
        &self.templates[self.active]
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn templates(&self) -> &[Arc<ShapeTemplate>] {
        &self.templates
    }

    #[inline]
    pub fn selector_tool(&self) -> &str {
        &self.selector_tool
    }

    /// Selects `index` directly, e.g. when restoring a saved machine.
    /// Returns `false` if out of range or already selected.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.templates.len() || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    /// Cycles to the next template when the selector tool is used.
    /// Returns `true` if the selection changed.
    pub fn on_use(&mut self, held: Option<&ItemStack>) -> bool {
        let Some(stack) = held else {
            return false;
        };
        if self.templates.len() < 2 || self.selector_tool.is_empty() || stack.item != self.selector_tool {
            return false;
        }
        self.active = (self.active + 1) % self.templates.len();
        log::info!(
            target: "machine",
            "shape switched to {:?} ({}/{})",
            self.active_shape().name(),
            self.active + 1,
            self.templates.len()
        );
        true
    }
}
