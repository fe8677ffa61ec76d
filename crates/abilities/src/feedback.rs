//! Action-bar text shown after each staff use.

use crate::table::AbilityDefinition;
use serde::{Deserialize, Serialize};
use wizardiuz_core::Element;

/// Prefix of a formatting code pair (`§` + one code character).
pub const FORMAT_MARKER: char = '§';

const HINT: &str = "Offhand a Wizardiuz Scroll to cast abilities.";

/// How action-bar text is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStyle {
    /// With `§` color codes, as a live client expects.
    #[default]
    Formatted,
    /// Bare text.
    Plain,
}

/// A message for the player's action bar.
#[derive(Debug, Clone, Copy)]
pub enum ActionBar<'a> {
    /// The staff moved to a new element.
    Switched(Element),
    /// No scroll in the off-hand.
    ScrollHint,
    /// An ability was cast.
    Cast {
        /// Element cast with.
        element: Element,
        /// Ability that ran.
        ability: &'a AbilityDefinition,
    },
}

impl ActionBar<'_> {
    /// Render the message in `style`.
    pub fn render(&self, style: FeedbackStyle) -> String {
        let formatted = match self {
            ActionBar::Switched(element) => {
                format!("§dElement switched: §f{}", element.label())
            }
            ActionBar::ScrollHint => format!("§7{HINT}"),
            ActionBar::Cast { element, ability } => format!(
                "§b{} §7| §e{} §8({})",
                element.label(),
                ability.name,
                ability.category
            ),
        };
        match style {
            FeedbackStyle::Formatted => formatted,
            FeedbackStyle::Plain => strip_formatting(&formatted),
        }
    }
}

/// Remove `§x` formatting pairs.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == FORMAT_MARKER {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}
