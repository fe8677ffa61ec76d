//! Capability surface the host game engine exposes to the add-on.
//!
//! The add-on never owns players, inventories or entities. Everything it
//! reads or changes goes through [`GameHost`], and every handle it receives
//! is only good for the current call. Deferred tasks get a fresh host
//! reference and must look the player up again before touching it.

use crate::damage::DamageCause;
use crate::dimension::DimensionId;
use crate::effect::StatusEffect;
use crate::item::ItemStack;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque handle to a host entity (players included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure reported by a single host call.
///
/// These are always recoverable: callers inspect and discard them so the rest
/// of an ability still runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The handle no longer refers to a live entity.
    #[error("entity {0} is not valid")]
    InvalidEntity(EntityId),
    /// The host refused the request.
    #[error("request rejected: {reason}")]
    Rejected {
        /// Host-provided explanation.
        reason: String,
    },
    /// The request uses something the current platform lacks.
    #[error("unsupported on this platform: {0}")]
    Unsupported(String),
}

/// Result of a fallible host call.
pub type HostResult<T = ()> = Result<T, HostError>;

/// Work the host runs on a later tick.
pub type DeferredTask = Box<dyn FnOnce(&mut dyn GameHost)>;

/// Live view of a player, read at the moment of the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Player handle.
    pub id: EntityId,
    /// Dimension the player stands in.
    pub dimension: DimensionId,
    /// Feet position.
    pub location: DVec3,
    /// Whether the player is crouching.
    pub sneaking: bool,
}

/// An entity returned by a neighbor query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity handle.
    pub id: EntityId,
    /// Entity type id (e.g. `minecraft:zombie`).
    pub type_id: String,
    /// Position.
    pub location: DVec3,
}

/// Who and what caused a damage request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    /// Damage cause.
    pub cause: DamageCause,
    /// Entity credited with the damage.
    pub damaging_entity: Option<EntityId>,
}

/// A knockback request: unit horizontal direction plus strengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    /// Horizontal direction, X component.
    pub dir_x: f64,
    /// Horizontal direction, Z component.
    pub dir_z: f64,
    /// Horizontal strength.
    pub horizontal: f64,
    /// Vertical strength.
    pub vertical: f64,
}

/// Inbound "item used" event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUseEvent {
    /// Player who used the item.
    pub source: EntityId,
    /// The stack that was used.
    pub item: Option<ItemStack>,
}

/// Everything the add-on asks of the host engine.
pub trait GameHost {
    /// Current state of `player`, or `None` if the handle is stale or not a player.
    fn player(&self, player: EntityId) -> Option<PlayerState>;

    /// Item equipped in the player's off-hand slot.
    fn offhand_item(&self, player: EntityId) -> Option<ItemStack>;

    /// Replace the stack in the player's selected hotbar slot.
    fn set_selected_item(&mut self, player: EntityId, stack: ItemStack) -> HostResult;

    /// All entities within `max_distance` of `center` in `dimension`.
    fn entities_near(
        &self,
        dimension: DimensionId,
        center: DVec3,
        max_distance: f64,
    ) -> Vec<EntitySnapshot>;

    /// Apply damage to one entity.
    fn apply_damage(&mut self, target: EntityId, amount: f32, source: DamageSource) -> HostResult;

    /// Apply knockback to one entity.
    fn apply_knockback(&mut self, target: EntityId, knockback: Knockback) -> HostResult;

    /// Add a status effect to one entity.
    fn add_effect(&mut self, target: EntityId, effect: StatusEffect) -> HostResult;

    /// Queue a world command. Fire-and-forget: the outcome is never reported.
    fn run_command(&mut self, dimension: DimensionId, command: &str);

    /// Run `task` after `delay_ticks` ticks.
    fn run_timeout(&mut self, delay_ticks: u32, task: DeferredTask);

    /// Overwrite the player's action-bar text.
    fn set_action_bar(&mut self, player: EntityId, text: &str);
}
