//! Item identities for staves and scrolls, and the identity resolver.
//!
//! Identifiers are opaque strings compared exactly: no trimming, no case
//! folding, no namespace defaulting. Anything that is not one of the ten
//! known ids resolves to `None`.

use crate::element::Element;
use serde::{Deserialize, Serialize};

/// Namespace shared by every item the add-on defines.
pub const ADDON_NAMESPACE: &str = "wizardiuz";

/// Entity type id the host uses for dropped item stacks.
pub const DROPPED_ITEM_ENTITY: &str = "minecraft:item";

/// Entity type id the host uses for players.
pub const PLAYER_ENTITY: &str = "minecraft:player";

// Indexed by `Element::index()`.
const STAFF_IDS: [&str; 5] = [
    "wizardiuz:staff_water",
    "wizardiuz:staff_fire",
    "wizardiuz:staff_wind",
    "wizardiuz:staff_sand",
    "wizardiuz:staff_hail",
];

const SCROLL_IDS: [&str; 5] = [
    "wizardiuz:scroll_tide_warden",
    "wizardiuz:scroll_banished_sun",
    "wizardiuz:scroll_gale_sigil",
    "wizardiuz:scroll_dune_aegis",
    "wizardiuz:scroll_hail_requiem",
];

/// Item id of the staff bound to `element`.
pub const fn staff_id(element: Element) -> &'static str {
    STAFF_IDS[element.index()]
}

/// Item id of the scroll bound to `element`.
pub const fn scroll_id(element: Element) -> &'static str {
    SCROLL_IDS[element.index()]
}

/// Element of a staff item, or `None` if `item_id` is not a staff.
pub fn element_of_staff(item_id: &str) -> Option<Element> {
    Element::ALL
        .into_iter()
        .find(|element| staff_id(*element) == item_id)
}

/// Element of a scroll item, or `None` if `item_id` is not a scroll.
pub fn element_of_scroll(item_id: &str) -> Option<Element> {
    Element::ALL
        .into_iter()
        .find(|element| scroll_id(*element) == item_id)
}

/// An item stack as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier (e.g. `wizardiuz:staff_fire`).
    pub type_id: String,
    /// Quantity in stack.
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(type_id: impl Into<String>, count: u32) -> Self {
        Self {
            type_id: type_id.into(),
            count,
        }
    }

    /// A single staff of `element`.
    pub fn staff(element: Element) -> Self {
        Self::new(staff_id(element), 1)
    }

    /// A single scroll of `element`.
    pub fn scroll(element: Element) -> Self {
        Self::new(scroll_id(element), 1)
    }

    /// Element of this stack if it is a staff.
    pub fn staff_element(&self) -> Option<Element> {
        element_of_staff(&self.type_id)
    }

    /// Element of this stack if it is a scroll.
    pub fn scroll_element(&self) -> Option<Element> {
        element_of_scroll(&self.type_id)
    }
}
