#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod damage;
pub mod dimension;
pub mod effect;
pub mod element;
pub mod host;
pub mod item;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use damage::DamageCause;
pub use dimension::DimensionId;
pub use effect::{StatusEffect, StatusEffectType};
pub use element::Element;
pub use host::{
    DamageSource, DeferredTask, EntityId, EntitySnapshot, GameHost, HostError, HostResult,
    ItemUseEvent, Knockback, PlayerState,
};
pub use item::{element_of_scroll, element_of_staff, scroll_id, staff_id, ItemStack};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Helper to derive a reproducible RNG seeded by session + player + tick domains.
pub fn scoped_rng(session_seed: u64, player: EntityId, tick: SimTick) -> StdRng {
    let seed = session_seed ^ player.0.rotate_left(32) ^ tick.0;
    StdRng::seed_from_u64(seed)
}
