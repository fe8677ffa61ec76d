//! Damage causes the add-on reports to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named cause attached to every damage request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DamageCause {
    /// Generic magic damage.
    Magic,
    /// Direct melee-style hit.
    EntityAttack,
    /// Burst of flame.
    Fire,
    /// Lingering burn.
    FireTick,
    /// Frost damage.
    Freezing,
}

impl DamageCause {
    /// Host-facing cause identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            DamageCause::Magic => "magic",
            DamageCause::EntityAttack => "entityAttack",
            DamageCause::Fire => "fire",
            DamageCause::FireTick => "fireTick",
            DamageCause::Freezing => "freezing",
        }
    }
}

impl fmt::Display for DamageCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
