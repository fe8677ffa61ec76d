#![warn(missing_docs)]
//! Staff abilities: the ability table, the cast controller that reacts to
//! item-use events, and the world helpers abilities are built from.

pub mod dispatcher;
pub mod feedback;
pub mod helpers;
pub mod table;

pub use dispatcher::{CastController, CastReport, UseOutcome};
pub use feedback::{strip_formatting, ActionBar, FeedbackStyle};
pub use helpers::{damage_ring, effect_self, nearby_entities, push_burst};
pub use table::{abilities, ability_subset, AbilityCategory, AbilityDefinition, AbilityFn};
