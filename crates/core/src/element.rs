//! The five staff elements and their fixed succession order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element bound to a staff or scroll.
///
/// Declaration order is the switching order: sneak-using a staff without a
/// scroll advances one step and wraps from `Hail` back to `Water`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Water (tide warden).
    Water = 0,
    /// Fire (banished sun).
    Fire = 1,
    /// Wind (gale sigil).
    Wind = 2,
    /// Sand (dune aegis).
    Sand = 3,
    /// Hail (hail requiem).
    Hail = 4,
}

impl Element {
    /// All elements in switching order.
    pub const ALL: [Element; 5] = [
        Element::Water,
        Element::Fire,
        Element::Wind,
        Element::Sand,
        Element::Hail,
    ];

    /// Position in [`Element::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The element that follows this one in the switching cycle.
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Lowercase key used in item ids and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Element::Water => "water",
            Element::Fire => "fire",
            Element::Wind => "wind",
            Element::Sand => "sand",
            Element::Hail => "hail",
        }
    }

    /// Upper-cased name shown on the action bar.
    pub const fn label(self) -> &'static str {
        match self {
            Element::Water => "WATER",
            Element::Fire => "FIRE",
            Element::Wind => "WIND",
            Element::Sand => "SAND",
            Element::Hail => "HAIL",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
