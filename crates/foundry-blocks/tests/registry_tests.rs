use foundry_blocks::{Block, BlockRegistry, HatchKind, RegistryError};

const BLOCKS: &str = r#"
[[blocks]]
name = "air"
id = 0

[[blocks]]
name = "steel_casing"

[[blocks]]
name = "item_input_hatch"
hatch = { kind = "item_input", slots = 4, slot_capacity = 16 }

[[blocks]]
name = "item_output_hatch"
id = 9
hatch = { kind = "item_output" }
"#;

#[test]
fn loads_ids_and_hatch_specs() {
    let reg = BlockRegistry::from_toml_str(BLOCKS).expect("registry");
    assert_eq!(reg.id_by_name("air"), Some(0));
    assert_eq!(reg.id_by_name("steel_casing"), Some(1));
    assert_eq!(reg.id_by_name("item_input_hatch"), Some(2));
    assert_eq!(reg.id_by_name("item_output_hatch"), Some(9));

    let input = reg.hatch_spec(2).expect("input hatch");
    assert_eq!(input.kind, HatchKind::ItemInput);
    assert_eq!(input.slots, 4);
    assert_eq!(input.slot_capacity, 16);

    let output = reg.hatch_spec(9).expect("output hatch");
    assert_eq!(output.kind, HatchKind::ItemOutput);
    assert_eq!(output.slots, 1);
    assert_eq!(output.slot_capacity, 64);

    assert!(reg.hatch_spec(1).is_none());
    assert!(!reg.get(0).unwrap().solid);
    assert!(reg.get(1).unwrap().solid);
    // Gaps between explicit ids are placeholders, not real blocks.
    assert_eq!(reg.name_of(5), "");
    assert_eq!(reg.block_by_name("steel_casing"), Some(Block::of(1)));
}

#[test]
fn rejects_duplicate_names() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "air"
        [[blocks]]
        name = "air"
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName(n) if n == "air"));
}

#[test]
fn rejects_duplicate_ids() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "air"
        id = 0
        [[blocks]]
        name = "casing"
        id = 3
        [[blocks]]
        name = "glass"
        id = 3
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateId { id: 3, .. }));
}

#[test]
fn requires_air_at_zero() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "casing"
        [[blocks]]
        name = "air"
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::AirNotZero));
}

#[test]
fn rejects_hatch_without_slots() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "air"
        [[blocks]]
        name = "bad_hatch"
        hatch = { kind = "fluid_input", slots = 0 }
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::EmptyHatch(_)));
}

#[test]
fn rejects_unknown_hatch_kind() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "air"
        [[blocks]]
        name = "odd"
        hatch = { kind = "steam_input" }
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}
