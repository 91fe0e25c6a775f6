use std::sync::Arc;

use foundry_blocks::BlockRegistry;
use foundry_geom::{BlockPos, Facing};
use foundry_machine::{ActiveShapeComponent, CraftingMultiblock, RecipeList};
use foundry_world::{ItemStack, World};

use crate::config::{Action, ConfigError, EventConfig, SimConfig};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub ticks: u32,
    pub completed: u64,
    pub valid_ticks: u32,
    pub working_ticks: u32,
    pub activity_changes: u32,
    pub final_progress: f32,
    pub shape: String,
}

/// One controller in a fresh world, driven by scripted events.
pub struct Sim {
    world: World,
    machine: CraftingMultiblock<RecipeList>,
    anchor: BlockPos,
    facing: Facing,
    events: Vec<EventConfig>,
    next_event: usize,
    tick: u32,
    summary: Summary,
}

impl Sim {
    /// Builds the first configured shape around the anchor and places the controller.
    pub fn new(
        reg: Arc<BlockRegistry>,
        recipes: RecipeList,
        cfg: &SimConfig,
    ) -> Result<Self, ConfigError> {
        let templates = cfg
            .shapes
            .iter()
            .map(|s| s.to_template(&reg).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let anchor = cfg.anchor();
        let facing = cfg.machine.facing;

        let mut world = World::new(reg);
        for cell in &cfg.shapes[0].cells {
            if let Some(name) = cell.placed_block() {
                world.set_by_name(anchor + facing.offset_to_world(cell.pos()), name);
            }
        }
        log::info!(
            target: "sim",
            "built {:?} at {:?} facing {:?} ({} hatch(es))",
            cfg.shapes[0].name,
            anchor,
            facing,
            world.hatch_count()
        );

        let shapes = ActiveShapeComponent::new(templates, cfg.selector_tool.clone());
        let machine =
            CraftingMultiblock::new(anchor, facing, shapes, recipes).with_off_delay(cfg.off_delay);
        let mut events = cfg.events.clone();
        events.sort_by_key(|e| e.tick);
        Ok(Self {
            world,
            machine,
            anchor,
            facing,
            events,
            next_event: 0,
            tick: 0,
            summary: Summary::default(),
        })
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn machine(&self) -> &CraftingMultiblock<RecipeList> {
        &self.machine
    }

    fn world_pos(&self, offset: [i32; 3]) -> BlockPos {
        self.anchor + self.facing.offset_to_world(offset.into())
    }

    fn apply(&mut self, action: &Action) {
        let tick = self.tick;
        match action {
            Action::Break { offset } => {
                let pos = self.world_pos(*offset);
                if self.world.remove(pos) {
                    log::info!(target: "sim", "[tick {}] broke {:?}", tick, pos);
                }
            }
            Action::Place { offset, block } => {
                let pos = self.world_pos(*offset);
                if self.world.set_by_name(pos, block) {
                    log::info!(target: "sim", "[tick {}] placed {} at {:?}", tick, block, pos);
                }
            }
            Action::Use { item } => {
                let held = ItemStack::new(item.as_str(), 1);
                if self.machine.on_use(&mut self.world, Some(&held)) {
                    log::info!(target: "sim", "[tick {}] used {} on controller", tick, item);
                }
            }
            Action::Insert {
                offset,
                item,
                count,
            } => {
                let pos = self.world_pos(*offset);
                let Some(hatch) = self.world.hatch_mut(pos) else {
                    log::warn!(target: "sim", "[tick {}] no hatch at {:?}", tick, pos);
                    return;
                };
                let moved = hatch.inventory.insert(item, *count, false);
                if moved < *count {
                    log::warn!(target: "sim", "[tick {}] only {}/{} {} fit", tick, moved, count, item);
                }
            }
        }
    }

    /// Applies this tick's events, then ticks the machine once.
    pub fn step(&mut self) -> bool {
        while let Some(event) = self.events.get(self.next_event) {
            if event.tick > self.tick {
                break;
            }
            let action = event.action.clone();
            self.next_event += 1;
            self.apply(&action);
        }

        let tick = self.tick;
        let mut changes = 0u32;
        let mut lamp = |on: bool| {
            changes += 1;
            log::info!(target: "sim", "[tick {}] machine {}", tick, if on { "started" } else { "stopped" });
        };
        let worked = self.machine.tick(&mut self.world, &mut lamp);

        let crafter = self.machine.crafter();
        if crafter.completed_this_tick() {
            log::info!(target: "sim", "[tick {}] completed recipe #{}", tick, crafter.completed_count());
        }
        log::trace!(
            target: "sim",
            "[tick {}] valid={} state={:?} progress={:.2}",
            tick,
            self.machine.is_shape_valid(),
            crafter.state(),
            crafter.progress()
        );

        self.summary.ticks += 1;
        self.summary.activity_changes += changes;
        self.summary.valid_ticks += u32::from(self.machine.is_shape_valid());
        self.summary.working_ticks += u32::from(worked);
        self.tick += 1;
        worked
    }

    /// Runs `ticks` steps, tears the machine down and reports.
    pub fn run(mut self, ticks: u32) -> Summary {
        for _ in 0..ticks {
            self.step();
        }
        self.machine.remove(&mut self.world);
        let crafter = self.machine.crafter();
        self.summary.completed = crafter.completed_count();
        self.summary.final_progress = crafter.progress();
        self.summary.shape = self.machine.shapes().active_shape().name().to_string();
        self.summary
    }
}
