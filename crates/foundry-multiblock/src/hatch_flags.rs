use foundry_blocks::HatchKind;

bitflags::bitflags! {
    /// Set of hatch kinds a template slot accepts. Bit `i` is the kind with id `i`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HatchFlags: u32 {
        const ITEM_INPUT = 1 << HatchKind::ItemInput.id();
        const ITEM_OUTPUT = 1 << HatchKind::ItemOutput.id();
        const FLUID_INPUT = 1 << HatchKind::FluidInput.id();
        const FLUID_OUTPUT = 1 << HatchKind::FluidOutput.id();
        const ENERGY_INPUT = 1 << HatchKind::EnergyInput.id();
        const ENERGY_OUTPUT = 1 << HatchKind::EnergyOutput.id();
    }
}

impl HatchFlags {
    #[inline]
    pub fn of(kind: HatchKind) -> Self {
        Self::from_bits_retain(1 << kind.id())
    }

    #[inline]
    pub fn builder() -> HatchFlagsBuilder {
        HatchFlagsBuilder::default()
    }

    #[inline]
    pub fn allows(self, kind: HatchKind) -> bool {
        self.contains(Self::of(kind))
    }

    pub fn kinds(self) -> impl Iterator<Item = HatchKind> {
        HatchKind::ALL.into_iter().filter(move |k| self.allows(*k))
    }
}

impl FromIterator<HatchKind> for HatchFlags {
    fn from_iter<I: IntoIterator<Item = HatchKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(HatchFlagsBuilder::default(), HatchFlagsBuilder::with)
            .build()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HatchFlagsBuilder {
    flags: HatchFlags,
}

impl Default for HatchFlagsBuilder {
    fn default() -> Self {
        Self {
            flags: HatchFlags::empty(),
        }
    }
}

impl HatchFlagsBuilder {
    pub fn with(mut self, kind: HatchKind) -> Self {
        self.flags |= HatchFlags::of(kind);
        self
    }

    pub fn with_all(self, kinds: &[HatchKind]) -> Self {
        kinds.iter().fold(self, |b, k| b.with(*k))
    }

    pub fn build(self) -> HatchFlags {
        self.flags
    }
}
