//! Movement state flags for the first-person controller

use bitflags::bitflags;

bitflags! {
    /// Independent movement states; several may be set at once
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementState: u8 {
        /// Moving via the player's own input
        const MOVING = 1 << 0;
        const JUMPING = 1 << 1;
        const FALLING = 1 << 2;
        /// Cannot move by input at all
        const IMMOBILIZED = 1 << 3;
        /// Pushed by an external force
        const KNOCKBACK = 1 << 4;
        /// Keeps momentum instead of responding instantly to input
        const SLIDING = 1 << 5;
    }
}

impl MovementState {
    /// States that rule out starting a jump
    pub const NO_JUMP: Self = Self::JUMPING
        .union(Self::FALLING)
        .union(Self::KNOCKBACK)
        .union(Self::IMMOBILIZED);
}
