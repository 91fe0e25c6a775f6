use std::sync::Arc;

use foundry_blocks::{BlockId, BlockRegistry, HatchKind};
use foundry_geom::{BlockPos, Facing};
use foundry_multiblock::{CellPredicate, HatchFlags, ShapeMatcher, ShapeTemplate};
use foundry_world::World;

const BLOCKS: &str = r#"
[[blocks]]
name = "air"
[[blocks]]
name = "controller"
[[blocks]]
name = "casing"
[[blocks]]
name = "input_hatch"
hatch = { kind = "item_input", slots = 2 }
[[blocks]]
name = "output_hatch"
hatch = { kind = "item_output", slots = 2 }
[[blocks]]
name = "fluid_input_hatch"
hatch = { kind = "fluid_input" }
"#;

struct Fixture {
    world: World,
    casing: BlockId,
}

fn fixture() -> Fixture {
    let reg = Arc::new(BlockRegistry::from_toml_str(BLOCKS).unwrap());
    let casing = reg.id_by_name("casing").unwrap();
    Fixture {
        world: World::new(reg),
        casing,
    }
}

fn input_flags() -> HatchFlags {
    HatchFlags::builder()
        .with(HatchKind::ItemInput)
        .with(HatchKind::FluidInput)
        .build()
}

// Controller at the anchor, a 3-wide casing row behind it, one slot in the middle
// of the row and a cell above the slot that must stay clear.
fn small_template(casing: BlockId) -> Arc<ShapeTemplate> {
    Arc::new(
        ShapeTemplate::builder("small")
            .block(BlockPos::new(-1, 0, 1), casing)
            .slot(BlockPos::new(0, 0, 1), input_flags())
            .block(BlockPos::new(1, 0, 1), casing)
            .empty(BlockPos::new(0, 1, 1))
            .build(),
    )
}

fn build_small(world: &mut World, anchor: BlockPos, facing: Facing, slot_block: &str) {
    let at = |x, y, z| anchor + facing.offset_to_world(BlockPos::new(x, y, z));
    world.set_by_name(anchor, "controller");
    world.set_by_name(at(-1, 0, 1), "casing");
    world.set_by_name(at(0, 0, 1), slot_block);
    world.set_by_name(at(1, 0, 1), "casing");
}

#[test]
fn slot_rejects_disallowed_kind_then_accepts_allowed() {
    let Fixture { mut world, casing } = fixture();
    let anchor = BlockPos::new(0, 64, 0);
    build_small(&mut world, anchor, Facing::North, "output_hatch");

    let mut m = ShapeMatcher::new(anchor, Facing::North, small_template(casing));
    m.register_listeners(&mut world);
    m.rematch(&mut world);
    assert!(!m.is_match_successful());
    assert_eq!(m.first_violation(), Some(BlockPos::new(0, 64, 1)));
    assert!(m.bound_hatches().is_empty());

    world.set_by_name(BlockPos::new(0, 64, 1), "input_hatch");
    assert!(m.needs_rematch());
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    let bound = m.bound_hatches();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].pos, BlockPos::new(0, 64, 1));
    assert_eq!(bound[0].kind, HatchKind::ItemInput);
    assert_eq!(bound[0].slot, 0);
    let hatch = world.hatch(BlockPos::new(0, 64, 1)).unwrap();
    assert_eq!(hatch.id(), bound[0].id);
    assert_eq!(hatch.claimed_by(), Some(m.token()));

    m.unlink_hatches(&mut world);
    m.unregister_listeners(&mut world);
}

#[test]
fn rematch_is_deterministic() {
    let Fixture { mut world, casing } = fixture();
    let anchor = BlockPos::new(5, 0, -5);
    build_small(&mut world, anchor, Facing::West, "input_hatch");
    let mut m = ShapeMatcher::new(anchor, Facing::West, small_template(casing));
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    let first = m.bound_hatches().to_vec();
    for _ in 0..5 {
        m.rematch(&mut world);
        assert!(m.is_match_successful());
        assert_eq!(m.bound_hatches(), first.as_slice());
    }
    m.unlink_hatches(&mut world);
}

#[test]
fn needs_rematch_only_for_changes_in_bounds() {
    let Fixture { mut world, casing } = fixture();
    let anchor = BlockPos::new(0, 0, 0);
    build_small(&mut world, anchor, Facing::North, "input_hatch");
    let mut m = ShapeMatcher::new(anchor, Facing::North, small_template(casing));
    assert!(m.needs_rematch());
    m.register_listeners(&mut world);
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    assert!(!m.needs_rematch());

    // Outside the bounding box.
    world.set_by_name(BlockPos::new(2, 0, 1), "casing");
    world.set_by_name(BlockPos::new(0, 2, 1), "casing");
    assert!(!m.needs_rematch());

    // Inside the box but not a template cell still counts.
    world.set_by_name(BlockPos::new(-1, 1, 1), "casing");
    assert!(m.needs_rematch());
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    assert!(!m.needs_rematch());

    // Hatch inventory traffic is not a structural change.
    world
        .hatch_mut(BlockPos::new(0, 0, 1))
        .unwrap()
        .inventory
        .insert("ore", 3, false);
    assert!(!m.needs_rematch());

    m.unregister_listeners(&mut world);
    world.remove(BlockPos::new(1, 0, 1));
    assert!(!m.needs_rematch());
    m.unlink_hatches(&mut world);
}

#[test]
fn empty_cell_must_stay_clear() {
    let Fixture { mut world, casing } = fixture();
    let anchor = BlockPos::ORIGIN;
    build_small(&mut world, anchor, Facing::South, "input_hatch");
    let blocker = anchor + Facing::South.offset_to_world(BlockPos::new(0, 1, 1));
    world.set_by_name(blocker, "casing");
    let mut m = ShapeMatcher::new(anchor, Facing::South, small_template(casing));
    m.rematch(&mut world);
    assert!(!m.is_match_successful());
    assert_eq!(m.first_violation(), Some(blocker));
    world.remove(blocker);
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    m.unlink_hatches(&mut world);
}

#[test]
fn hatch_is_never_shared_between_matchers() {
    let Fixture { mut world, casing } = fixture();
    // Two controllers facing each other share the slot cell between them.
    let a = BlockPos::new(0, 0, 0);
    let b = BlockPos::new(0, 0, 2);
    build_small(&mut world, a, Facing::North, "input_hatch");
    world.set_by_name(b, "controller");
    let template = small_template(casing);

    let mut ma = ShapeMatcher::new(a, Facing::North, template.clone());
    let mut mb = ShapeMatcher::new(b, Facing::South, template);
    ma.rematch(&mut world);
    mb.rematch(&mut world);
    assert!(ma.is_match_successful());
    assert!(!mb.is_match_successful());
    assert_eq!(mb.first_violation(), Some(BlockPos::new(0, 0, 1)));

    ma.unlink_hatches(&mut world);
    ma.unlink_hatches(&mut world);
    assert!(!ma.is_match_successful());
    assert!(!world.hatch(BlockPos::new(0, 0, 1)).unwrap().is_claimed());

    mb.rematch(&mut world);
    assert!(mb.is_match_successful());
    ma.rematch(&mut world);
    assert!(!ma.is_match_successful());
    mb.unlink_hatches(&mut world);
}

#[test]
fn replaced_hatch_keeps_new_claim_free() {
    let Fixture { mut world, casing } = fixture();
    let anchor = BlockPos::ORIGIN;
    build_small(&mut world, anchor, Facing::North, "input_hatch");
    let slot = BlockPos::new(0, 0, 1);
    let mut m = ShapeMatcher::new(anchor, Facing::North, small_template(casing));
    m.register_listeners(&mut world);
    m.rematch(&mut world);
    let old = m.bound_hatches()[0].id;

    world.set_by_name(slot, "fluid_input_hatch");
    assert!(m.needs_rematch());
    assert!(!world.hatch(slot).unwrap().is_claimed());
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    let bound = m.bound_hatches()[0];
    assert_ne!(bound.id, old);
    assert_eq!(bound.kind, HatchKind::FluidInput);

    m.unlink_hatches(&mut world);
    assert!(m.is_registered());
    m.unregister_listeners(&mut world);
    m.unregister_listeners(&mut world);
    assert!(!m.is_registered());
    assert_eq!(world.listener_count(), 0);
}

#[test]
fn casing_may_fill_an_optional_slot() {
    let Fixture { mut world, casing } = fixture();
    let template = Arc::new(
        ShapeTemplate::builder("optional")
            .slot_or_casing(BlockPos::new(0, 0, 1), casing, input_flags())
            .fill(
                BlockPos::new(-1, -1, 1),
                BlockPos::new(1, -1, 1),
                CellPredicate::Block(casing),
            )
            .build(),
    );
    for x in -1..=1 {
        world.set_by_name(BlockPos::new(x, -1, 1), "casing");
    }
    world.set_by_name(BlockPos::new(0, 0, 1), "casing");
    let mut m = ShapeMatcher::new(BlockPos::ORIGIN, Facing::North, template);
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    assert!(m.bound_hatches().is_empty());

    world.set_by_name(BlockPos::new(0, 0, 1), "output_hatch");
    m.rematch(&mut world);
    assert!(!m.is_match_successful());

    world.set_by_name(BlockPos::new(0, 0, 1), "input_hatch");
    m.rematch(&mut world);
    assert!(m.is_match_successful());
    assert_eq!(m.bound_hatches().len(), 1);
    m.unlink_hatches(&mut world);
}
