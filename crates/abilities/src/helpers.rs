//! World helpers shared by ability effects.
//!
//! Each helper issues one host request per target and inspects the result.
//! A rejected request is logged at trace level and skipped; it never stops
//! the remaining targets or the rest of the ability.

use tracing::trace;
use wizardiuz_core::item::DROPPED_ITEM_ENTITY;
use wizardiuz_core::{
    DamageCause, DamageSource, EntityId, EntitySnapshot, GameHost, Knockback, PlayerState,
    StatusEffect,
};

/// Horizontal distance floor for push directions.
pub const MIN_PUSH_DISTANCE: f64 = 0.1;

/// Vertical component of every push.
pub const PUSH_VERTICAL: f64 = 0.2;

/// Entities within `radius` of the player, excluding the player and dropped items.
///
/// Returns an empty list when the player handle is stale.
pub fn nearby_entities(host: &dyn GameHost, player: EntityId, radius: f64) -> Vec<EntitySnapshot> {
    match host.player(player) {
        Some(state) => neighbors_of(host, &state, radius),
        None => Vec::new(),
    }
}

fn neighbors_of(host: &dyn GameHost, state: &PlayerState, radius: f64) -> Vec<EntitySnapshot> {
    host.entities_near(state.dimension, state.location, radius)
        .into_iter()
        .filter(|entity| entity.id != state.id && entity.type_id != DROPPED_ITEM_ENTITY)
        .collect()
}

/// Damage every entity around the player. Returns how many hits landed.
pub fn damage_ring(
    host: &mut dyn GameHost,
    player: EntityId,
    radius: f64,
    amount: f32,
    cause: DamageCause,
) -> usize {
    let source = DamageSource {
        cause,
        damaging_entity: Some(player),
    };
    let mut landed = 0;
    for target in nearby_entities(host, player, radius) {
        match host.apply_damage(target.id, amount, source) {
            Ok(()) => landed += 1,
            Err(err) => trace!(target = %target.id, %cause, %err, "damage rejected"),
        }
    }
    landed
}

/// Knock every entity around the player away from it. Returns how many were pushed.
pub fn push_burst(host: &mut dyn GameHost, player: EntityId, strength: f64, radius: f64) -> usize {
    let Some(state) = host.player(player) else {
        return 0;
    };
    let mut pushed = 0;
    for target in neighbors_of(host, &state, radius) {
        let dx = target.location.x - state.location.x;
        let dz = target.location.z - state.location.z;
        let mag = dx.hypot(dz).max(MIN_PUSH_DISTANCE);
        let knockback = Knockback {
            dir_x: dx / mag,
            dir_z: dz / mag,
            horizontal: strength,
            vertical: PUSH_VERTICAL,
        };
        match host.apply_knockback(target.id, knockback) {
            Ok(()) => pushed += 1,
            Err(err) => trace!(target = %target.id, %err, "knockback rejected"),
        }
    }
    pushed
}

/// Apply a status effect to the player. Returns whether the host accepted it.
pub fn effect_self(host: &mut dyn GameHost, player: EntityId, effect: StatusEffect) -> bool {
    match host.add_effect(player, effect) {
        Ok(()) => true,
        Err(err) => {
            trace!(%player, effect = %effect.effect_type, %err, "effect rejected");
            false
        }
    }
}
