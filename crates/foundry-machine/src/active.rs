/// Receives the machine's on/off transitions, e.g. to swap a lit texture.
pub trait ActivityListener {
    fn on_active_changed(&mut self, active: bool);
}

impl<F: FnMut(bool)> ActivityListener for F {
    fn on_active_changed(&mut self, active: bool) {
        self(active)
    }
}

/// Debounced "machine is working" flag.
///
/// Turns on the first tick work happens and off only after `off_after`
/// consecutive idle ticks, so a machine that pauses between recipes does
/// not flicker.
#[derive(Clone, Debug)]
pub struct IsActiveComponent {
    active: bool,
    idle_ticks: u32,
    off_after: u32,
}

impl Default for IsActiveComponent {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IsActiveComponent {
    /// `off_after` below 1 is treated as 1.
    pub fn new(off_after: u32) -> Self {
        Self {
            active: false,
            idle_ticks: 0,
            off_after: off_after.max(1),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn off_after(&self) -> u32 {
        self.off_after
    }

    /// Feeds this tick's activity. `owner` hears only actual transitions.
    pub fn update_active(&mut self, worked: bool, owner: &mut dyn ActivityListener) {
        if worked {
            self.idle_ticks = 0;
            if !self.active {
                self.active = true;
                owner.on_active_changed(true);
            }
        } else if self.active {
            self.idle_ticks += 1;
            if self.idle_ticks >= self.off_after {
                self.active = false;
                self.idle_ticks = 0;
                owner.on_active_changed(false);
            }
        }
    }
}
