//! Multiblock templates, hatch filters, and the incremental shape matcher.
#![forbid(unsafe_code)]

pub mod hatch_flags;
pub mod matcher;
pub mod template;

pub use hatch_flags::{HatchFlags, HatchFlagsBuilder};
pub use matcher::{BoundHatch, ShapeMatcher};
pub use template::{CellPredicate, CellSpec, ShapeTemplate, ShapeTemplateBuilder};
