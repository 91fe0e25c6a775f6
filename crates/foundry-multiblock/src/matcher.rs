use std::rc::Rc;
use std::sync::Arc;

use foundry_blocks::HatchKind;
use foundry_geom::{BlockBox, BlockPos, Facing};
use foundry_world::{ClaimToken, DirtyFlag, HatchId, ListenerId, World};

use crate::template::{CellPredicate, ShapeTemplate};

/// A hatch bound into a template slot by the last successful match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundHatch {
    pub slot: usize,
    pub pos: BlockPos,
    pub id: HatchId,
    pub kind: HatchKind,
}

#[derive(Debug)]
enum MatchState {
    Unmatched,
    Matched(Vec<BoundHatch>),
}

/// Validates one template around an anchor and tracks when that answer may be stale.
///
/// The matcher never rescans on its own. A change notification inside the
/// template's world bounds only raises a flag; the owner checks
/// [`ShapeMatcher::needs_rematch`] on its next tick and calls
/// [`ShapeMatcher::rematch`].
#[derive(Debug)]
pub struct ShapeMatcher {
    anchor: BlockPos,
    facing: Facing,
    template: Arc<ShapeTemplate>,
    token: ClaimToken,
    dirty: Rc<DirtyFlag>,
    listener: Option<ListenerId>,
    state: MatchState,
    matched_once: bool,
    first_violation: Option<BlockPos>,
}

impl ShapeMatcher {
    pub fn new(anchor: BlockPos, facing: Facing, template: Arc<ShapeTemplate>) -> Self {
        Self {
            anchor,
            facing,
            template,
            token: ClaimToken::next(),
            dirty: Rc::new(DirtyFlag::new(true)),
            listener: None,
            state: MatchState::Unmatched,
            matched_once: false,
            first_violation: None,
        }
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
    pub fn template(&self) -> &Arc<ShapeTemplate> {
        &self.template
    }

    #[inline]
    pub fn token(&self) -> ClaimToken {
        self.token
    }

    #[inline]
    pub fn world_bounds(&self) -> BlockBox {
        self.template.world_bounds(self.anchor, self.facing)
    }

    #[inline]
    fn world_pos(&self, offset: BlockPos) -> BlockPos {
        self.anchor + self.facing.offset_to_world(offset)
    }

    pub fn needs_rematch(&self) -> bool {
        self.dirty.is_set() || !self.matched_once
    }

    #[inline]
    pub fn is_match_successful(&self) -> bool {
        matches!(self.state, MatchState::Matched(_))
    }

    /// Hatches bound by the last successful match, in template order.
    pub fn bound_hatches(&self) -> &[BoundHatch] {
        match &self.state {
            MatchState::Matched(parts) => parts,
            MatchState::Unmatched => &[],
        }
    }

    /// First offending cell (world position) of the last failed match.
    #[inline]
    pub fn first_violation(&self) -> Option<BlockPos> {
        self.first_violation
    }

    /// Re-evaluates every cell against the world.
    ///
    /// Claims held from the previous match are dropped first so the same
    /// hatches can be bound again. Every cell is checked; any violation fails
    /// the whole match and nothing is bound.
    pub fn rematch(&mut self, world: &mut World) {
        self.release_claims(world);
        self.dirty.clear();
        self.first_violation = None;

        let template = Arc::clone(&self.template);
        let mut bound = Vec::new();
        let mut violations = 0usize;
        for cell in template.cells() {
            let pos = self.world_pos(cell.offset);
            let block = world.get(pos);
            let ok = match cell.predicate {
                CellPredicate::Empty => block.is_air(),
                CellPredicate::Block(id) => block.id == id,
                CellPredicate::Slot { flags, casing } => {
                    if casing == Some(block.id) {
                        true
                    } else {
                        match world.hatch(pos) {
                            Some(h) if flags.allows(h.kind()) && h.is_available_to(self.token) => {
                                bound.push(BoundHatch {
                                    slot: cell.slot.unwrap_or(0),
                                    pos,
                                    id: h.id(),
                                    kind: h.kind(),
                                });
                                true
                            }
                            _ => false,
                        }
                    }
                }
            };
            if !ok {
                violations += 1;
                if self.first_violation.is_none() {
                    self.first_violation = Some(pos);
                }
            }
        }

        if violations > 0 {
            log::debug!(
                target: "matcher",
                "{:?} at {:?}: {} violation(s), first at {:?}",
                self.template.name(),
                self.anchor,
                violations,
                self.first_violation
            );
            self.state = MatchState::Unmatched;
            return;
        }

        for part in &bound {
            if let Some(h) = world.hatch_mut(part.pos) {
                h.claim(self.token);
            }
        }
        log::debug!(
            target: "matcher",
            "{:?} at {:?}: matched, {} hatch(es) bound",
            self.template.name(),
            self.anchor,
            bound.len()
        );
        self.matched_once = true;
        self.state = MatchState::Matched(bound);
    }

    // Releases only hatches that are still the same part we bound.
    fn release_claims(&mut self, world: &mut World) {
        let state = std::mem::replace(&mut self.state, MatchState::Unmatched);
        if let MatchState::Matched(parts) = state {
            for part in parts {
                if let Some(h) = world.hatch_mut(part.pos) {
                    if h.id() == part.id {
                        h.release(self.token);
                    }
                }
            }
        }
    }

    /// Releases every claim so other structures may bind these hatches.
    /// Leaves the matcher unmatched and dirty. Safe to call repeatedly.
    pub fn unlink_hatches(&mut self, world: &mut World) {
        self.release_claims(world);
        self.dirty.set();
    }

    /// Subscribes to changes inside the template's world bounds. No-op if already registered.
    pub fn register_listeners(&mut self, world: &mut World) {
        if self.listener.is_none() {
            let bounds = self.world_bounds();
            self.listener = Some(world.subscribe(bounds, self.dirty.clone()));
        }
    }

    /// No-op if not registered.
    pub fn unregister_listeners(&mut self, world: &mut World) {
        if let Some(id) = self.listener.take() {
            world.unsubscribe(id);
        }
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        self.listener.is_some()
    }
}

impl Drop for ShapeMatcher {
    fn drop(&mut self) {
        if self.listener.is_some() || self.is_match_successful() {
            log::warn!(
                target: "matcher",
                "matcher for {:?} at {:?} dropped without unlinking",
                self.template.name(),
                self.anchor
            );
        }
    }
}
