//! Common components shared by combatants.

/// Integer health for anything that can receive damage. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage, clamping at zero. Returns the health left.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    /// Set health directly, clamped to `[0, max]`.
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

}
