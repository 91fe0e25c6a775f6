use foundry_geom::{BlockPos, Facing};
use foundry_multiblock::ShapeMatcher;
use foundry_world::{ItemStack, World};

use crate::active::{ActivityListener, IsActiveComponent};
use crate::active_shape::ActiveShapeComponent;
use crate::crafter::{CrafterComponent, RecipeBehavior};
use crate::inventory::MultiblockInventoryComponent;

/// Controller block of a crafting multiblock, ticked once per world tick.
///
/// Each tick first re-validates the structure if anything inside its bounds
/// changed, then advances the recipe only while the structure is valid.
/// A recipe interrupted by a broken structure is suspended, not lost.
pub struct CraftingMultiblock<B: RecipeBehavior> {
    anchor: BlockPos,
    facing: Facing,
    shapes: ActiveShapeComponent,
    matcher: Option<ShapeMatcher>,
    shape_valid: bool,
    allow_normal_operation: bool,
    // Set when a recipe was cancelled on rematch; ticking resumes one tick later.
    resume_next_tick: bool,
    inventory: MultiblockInventoryComponent,
    // Slots whose hatch changed in the last successful match.
    parts_changed: usize,
    crafter: CrafterComponent<B>,
    active: IsActiveComponent,
}

impl<B: RecipeBehavior> CraftingMultiblock<B> {
    pub fn new(anchor: BlockPos, facing: Facing, shapes: ActiveShapeComponent, behavior: B) -> Self {
        Self {
            anchor,
            facing,
            shapes,
            matcher: None,
            shape_valid: false,
            allow_normal_operation: false,
            resume_next_tick: false,
            inventory: MultiblockInventoryComponent::new(),
            parts_changed: 0,
            crafter: CrafterComponent::new(behavior),
            active: IsActiveComponent::default(),
        }
    }

    pub fn with_off_delay(mut self, ticks: u32) -> Self {
        self.active = IsActiveComponent::new(ticks);
        self
    }

    #[inline]
    pub fn anchor(&self) -> BlockPos {
        self.anchor
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn is_shape_valid(&self) -> bool {
        self.shape_valid
    }

    #[inline]
    pub fn allows_operation(&self) -> bool {
        self.allow_normal_operation
    }

    #[inline]
    pub fn shapes(&self) -> &ActiveShapeComponent {
        &self.shapes
    }

    #[inline]
    pub fn matcher(&self) -> Option<&ShapeMatcher> {
        self.matcher.as_ref()
    }

    #[inline]
    pub fn inventory(&self) -> &MultiblockInventoryComponent {
        &self.inventory
    }

    /// How many inventory slots got a different hatch in the last successful
    /// match. Zero when a rematch found the same parts again.
    #[inline]
    pub fn parts_changed(&self) -> usize {
        self.parts_changed
    }

    #[inline]
    pub fn crafter(&self) -> &CrafterComponent<B> {
        &self.crafter
    }

    #[inline]
    pub fn crafter_mut(&mut self) -> &mut CrafterComponent<B> {
        &mut self.crafter
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_active()
    }

    /// Creates the matcher on first use and rematches when it is stale.
    pub fn link(&mut self, world: &mut World) {
        let matcher = self.matcher.get_or_insert_with(|| {
            ShapeMatcher::new(self.anchor, self.facing, self.shapes.active_shape().clone())
        });
        matcher.register_listeners(world);
        if !matcher.needs_rematch() {
            return;
        }

        let was_valid = self.shape_valid;
        self.allow_normal_operation = false;
        self.resume_next_tick = false;
        self.shape_valid = false;
        self.crafter.suspend();

        matcher.rematch(world);
        if !matcher.is_match_successful() {
            if was_valid {
                log::info!(
                    target: "machine",
                    "{:?} at {:?} broken at {:?}",
                    self.shapes.active_shape().name(),
                    self.anchor,
                    matcher.first_violation()
                );
            }
            return;
        }

        self.parts_changed = self.inventory.rebuild(matcher);
        self.shape_valid = true;
        let view = self.inventory.view(world);
        self.crafter.behavior_mut().on_structure_matched(&view);
        if self.crafter.try_continue_recipe(&view) {
            self.allow_normal_operation = true;
        } else {
            self.resume_next_tick = true;
        }
        if !was_valid {
            log::info!(
                target: "machine",
                "{:?} at {:?} formed ({} part(s) changed)",
                self.shapes.active_shape().name(),
                self.anchor,
                self.parts_changed
            );
        }
    }

    /// One world tick. Returns whether the crafter did work.
    pub fn tick(&mut self, world: &mut World, owner: &mut dyn ActivityListener) -> bool {
        self.crafter.begin_tick();
        self.link(world);
        let mut worked = false;
        if self.allow_normal_operation {
            let mut view = self.inventory.view_mut(world);
            worked = self.crafter.tick_recipe(&mut view);
        }
        if self.resume_next_tick {
            self.resume_next_tick = false;
            self.allow_normal_operation = true;
        }
        self.active.update_active(worked, owner);
        worked
    }

    /// Releases every hatch and stops listening. The next tick starts over
    /// with a fresh match.
    pub fn unlink(&mut self, world: &mut World) {
        if let Some(mut matcher) = self.matcher.take() {
            matcher.unlink_hatches(world);
            matcher.unregister_listeners(world);
        }
        self.inventory.clear();
        self.shape_valid = false;
        self.allow_normal_operation = false;
        self.resume_next_tick = false;
        self.crafter.suspend();
    }

    /// Player interaction with the controller. Switching shape drops the
    /// current match. Returns `true` if the interaction was consumed.
    pub fn on_use(&mut self, world: &mut World, held: Option<&ItemStack>) -> bool {
        if !self.shapes.on_use(held) {
            return false;
        }
        self.unlink(world);
        true
    }

    /// The controller block is being removed from the world.
    pub fn remove(&mut self, world: &mut World) {
        self.unlink(world);
        log::debug!(target: "machine", "controller at {:?} removed", self.anchor);
    }
}
