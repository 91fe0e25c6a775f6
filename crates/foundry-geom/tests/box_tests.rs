use foundry_geom::{BlockBox, BlockPos, Facing};

#[test]
fn from_corners_orders_axes() {
    let bb = BlockBox::from_corners(BlockPos::new(3, -1, 2), BlockPos::new(-2, 4, 0));
    assert_eq!(bb.min, BlockPos::new(-2, -1, 0));
    assert_eq!(bb.max, BlockPos::new(3, 4, 2));
    assert_eq!(bb.size(), (6, 6, 3));
}

#[test]
fn contains_is_inclusive() {
    let bb = BlockBox::from_corners(BlockPos::new(0, 0, 0), BlockPos::new(2, 2, 2));
    assert!(bb.contains(BlockPos::new(0, 0, 0)));
    assert!(bb.contains(BlockPos::new(2, 2, 2)));
    assert!(!bb.contains(BlockPos::new(3, 0, 0)));
    assert!(!bb.contains(BlockPos::new(0, -1, 0)));
}

#[test]
fn from_points_empty_is_none() {
    assert!(BlockBox::from_points(std::iter::empty()).is_none());
}

#[test]
fn translated_moves_both_corners() {
    let bb = BlockBox::single(BlockPos::ORIGIN).translated(BlockPos::new(5, 6, 7));
    assert_eq!(bb.min, BlockPos::new(5, 6, 7));
    assert_eq!(bb.max, BlockPos::new(5, 6, 7));
    assert_eq!(bb.volume(), 1);
}

#[test]
fn facing_depth_axis() {
    // Depth (+Z in template space) points away from the front face.
    let depth = BlockPos::new(0, 0, 1);
    assert_eq!(Facing::North.offset_to_world(depth), BlockPos::new(0, 0, 1));
    assert_eq!(Facing::South.offset_to_world(depth), BlockPos::new(0, 0, -1));
    assert_eq!(Facing::East.offset_to_world(depth), BlockPos::new(-1, 0, 0));
    assert_eq!(Facing::West.offset_to_world(depth), BlockPos::new(1, 0, 0));
    assert_eq!(Facing::North.opposite(), Facing::South);
}

#[test]
fn tuple_and_array_conversions_agree() {
    let a: BlockPos = (1, -2, 3).into();
    let b: BlockPos = [1, -2, 3].into();
    assert_eq!(a, b);
    assert_eq!(<(i32, i32, i32)>::from(a), (1, -2, 3));
}
