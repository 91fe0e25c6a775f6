//! Integer cell positions, horizontal facings, and inclusive cell boxes.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn manhattan(self) -> i64 {
        i64::from(self.x).abs() + i64::from(self.y).abs() + i64::from(self.z).abs()
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for BlockPos {
    #[inline]
    fn add_assign(&mut self, rhs: BlockPos) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for BlockPos {
    #[inline]
    fn sub_assign(&mut self, rhs: BlockPos) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn neg(self) -> BlockPos {
        BlockPos::new(-self.x, -self.y, -self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from(value: [i32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    fn from(value: BlockPos) -> Self {
        (value.x, value.y, value.z)
    }
}

/// Horizontal direction the front of a controller faces.
///
/// Template offsets are authored for `North`: +X is the controller's right,
/// +Y is up and +Z runs from the front face into the structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    #[default]
    North,
    East,
    South,
    West,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Quarter turn clockwise when seen from above.
    #[inline]
    pub fn rotate_cw(self) -> Facing {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
        }
    }

    #[inline]
    pub fn opposite(self) -> Facing {
        self.rotate_cw().rotate_cw()
    }

    /// Maps a template-relative offset into the world frame for this facing.
    #[inline]
    pub fn offset_to_world(self, rel: BlockPos) -> BlockPos {
        let BlockPos { x, y, z } = rel;
        match self {
            Facing::North => BlockPos::new(x, y, z),
            Facing::East => BlockPos::new(-z, y, x),
            Facing::South => BlockPos::new(-x, y, -z),
            Facing::West => BlockPos::new(z, y, -x),
        }
    }

    /// Inverse of [`Facing::offset_to_world`].
    #[inline]
    pub fn offset_to_template(self, world: BlockPos) -> BlockPos {
        let BlockPos { x, y, z } = world;
        match self {
            Facing::North => BlockPos::new(x, y, z),
            Facing::East => BlockPos::new(z, y, -x),
            Facing::South => BlockPos::new(-x, y, -z),
            Facing::West => BlockPos::new(-z, y, x),
        }
    }
}

/// Inclusive axis-aligned box of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BlockBox {
    #[inline]
    pub const fn single(p: BlockPos) -> Self {
        Self { min: p, max: p }
    }

    /// Box spanning two corners given in any order.
    #[inline]
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = BlockPos>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut out = BlockBox::single(first);
        for p in it {
            out.include(p);
        }
        Some(out)
    }

    #[inline]
    pub fn include(&mut self, p: BlockPos) {
        self.min = BlockPos::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = BlockPos::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn translated(self, by: BlockPos) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    #[inline]
    pub fn size(&self) -> (usize, usize, usize) {
        (
            (self.max.x - self.min.x + 1) as usize,
            (self.max.y - self.min.y + 1) as usize,
            (self.max.z - self.min.z + 1) as usize,
        )
    }

    #[inline]
    pub fn volume(&self) -> usize {
        let (sx, sy, sz) = self.size();
        sx * sy * sz
    }

    /// Iterates cells in y, z, x order.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| BlockPos::new(x, y, z)))
        })
    }
}
