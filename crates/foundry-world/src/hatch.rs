use std::sync::atomic::{AtomicU64, Ordering};

use foundry_blocks::{HatchKind, HatchSpec};

use crate::inventory::Inventory;

/// Unique per placed hatch; a hatch broken and placed again gets a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HatchId(pub u64);

/// Identity of whoever holds an exclusive claim on a hatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClaimToken(u64);

static NEXT_CLAIM_TOKEN: AtomicU64 = AtomicU64::new(1);

impl ClaimToken {
    pub fn next() -> Self {
        ClaimToken(NEXT_CLAIM_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Structural part placed in the world: a kind, an inventory, and at most one claim.
#[derive(Debug)]
pub struct Hatch {
    id: HatchId,
    kind: HatchKind,
    pub inventory: Inventory,
    claimed_by: Option<ClaimToken>,
}

impl Hatch {
    pub fn new(id: HatchId, spec: HatchSpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            inventory: Inventory::new(spec.slots, spec.slot_capacity),
            claimed_by: None,
        }
    }

    #[inline]
    pub fn id(&self) -> HatchId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> HatchKind {
        self.kind
    }

    #[inline]
    pub fn claimed_by(&self) -> Option<ClaimToken> {
        self.claimed_by
    }

    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }

    /// True when the hatch is free or already held by `token`.
    #[inline]
    pub fn is_available_to(&self, token: ClaimToken) -> bool {
        self.claimed_by.is_none_or(|owner| owner == token)
    }

    /// Takes the exclusive claim. Claiming a hatch someone else holds is a caller bug.
    pub fn claim(&mut self, token: ClaimToken) {
        if let Some(owner) = self.claimed_by {
            assert_eq!(
                owner, token,
                "hatch {:?} claimed by {:?} while held by {:?}",
                self.id, token, owner
            );
        }
        self.claimed_by = Some(token);
    }

    /// Drops the claim if `token` holds it. Returns whether anything was released.
    pub fn release(&mut self, token: ClaimToken) -> bool {
        if self.claimed_by == Some(token) {
            self.claimed_by = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> HatchSpec {
        HatchSpec {
            kind: HatchKind::ItemInput,
            slots: 1,
            slot_capacity: 64,
        }
    }

    #[test]
    fn claim_release_is_idempotent() {
        let token = ClaimToken::next();
        let mut h = Hatch::new(HatchId(1), spec());
        h.claim(token);
        h.claim(token);
        assert_eq!(h.claimed_by(), Some(token));
        assert!(h.release(token));
        assert!(!h.release(token));
        assert!(!h.is_claimed());
    }

    #[test]
    fn foreign_release_is_ignored() {
        let a = ClaimToken::next();
        let b = ClaimToken::next();
        let mut h = Hatch::new(HatchId(2), spec());
        h.claim(a);
        assert!(!h.is_available_to(b));
        assert!(!h.release(b));
        assert_eq!(h.claimed_by(), Some(a));
    }

    #[test]
    #[should_panic(expected = "claimed by")]
    fn double_claim_panics() {
        let mut h = Hatch::new(HatchId(3), spec());
        h.claim(ClaimToken::next());
        h.claim(ClaimToken::next());
    }
}
