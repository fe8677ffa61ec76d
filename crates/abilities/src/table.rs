//! The ability table: six abilities per element.
//!
//! Indices 0..3 are cast while standing, 3..6 while sneaking. Each entry is
//! plain data plus a stateless effect function, so the whole table lives in
//! `static` storage and is never mutated.

use crate::helpers::{damage_ring, effect_self, push_burst};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use wizardiuz_core::{
    DamageCause, Element, EntityId, GameHost, StatusEffect, StatusEffectType,
};

/// Abilities defined per element.
pub const ABILITY_COUNT: usize = 6;

/// Abilities eligible for one sneak state.
pub const SUBSET_SIZE: usize = 3;

/// Fireballs fired by Blazing Volley.
pub const VOLLEY_SHOTS: u32 = 3;

/// Ticks between Blazing Volley fireballs.
pub const VOLLEY_INTERVAL_TICKS: u32 = 6;

const FIREBALL_COMMAND: &str = "execute at @s run summon minecraft:small_fireball ^ ^1 ^2";
const QUICKSAND_COMMAND: &str =
    "execute as @e[r=5,type=!player] at @s run effect @s slowness 3 4 true";
const PERMAFROST_COMMAND: &str =
    "execute as @e[r=5,type=!player] at @s run effect @s slowness 4 4 true";

/// Effect routine run against the host on behalf of the casting player.
pub type AbilityFn = fn(&mut dyn GameHost, EntityId);

/// Broad role of an ability, shown next to its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityCategory {
    /// Hurts or displaces nearby entities.
    Attack,
    /// Buffs the caster.
    Support,
    /// Protects the caster.
    Defense,
}

impl AbilityCategory {
    /// Display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            AbilityCategory::Attack => "Attack",
            AbilityCategory::Support => "Support",
            AbilityCategory::Defense => "Defense",
        }
    }
}

impl fmt::Display for AbilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One castable ability.
#[derive(Clone, Copy)]
pub struct AbilityDefinition {
    /// Name shown on the action bar.
    pub name: &'static str,
    /// Role shown next to the name.
    pub category: AbilityCategory,
    /// Effect routine.
    pub run: AbilityFn,
}

impl fmt::Debug for AbilityDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

const fn ability(name: &'static str, category: AbilityCategory, run: AbilityFn) -> AbilityDefinition {
    AbilityDefinition {
        name,
        category,
        run,
    }
}

use AbilityCategory::{Attack, Defense, Support};

static WATER: [AbilityDefinition; ABILITY_COUNT] = [
    ability("Tidal Lance", Attack, tidal_lance),
    ability("Mending Rain", Support, mending_rain),
    ability("Foam Guard", Defense, foam_guard),
    ability("Riptide Burst", Attack, riptide_burst),
    ability("Mist Veil", Defense, mist_veil),
    ability("Spring of Focus", Support, spring_of_focus),
];

static FIRE: [AbilityDefinition; ABILITY_COUNT] = [
    ability("Coffin of the Banished Sun", Attack, coffin_of_the_banished_sun),
    ability("Solar Bulwark", Defense, solar_bulwark),
    ability("Ember Rush", Support, ember_rush),
    ability("Blazing Volley", Attack, blazing_volley),
    ability("Scorch Field", Attack, scorch_field),
    ability("Phoenix Pulse", Support, phoenix_pulse),
];

static WIND: [AbilityDefinition; ABILITY_COUNT] = [
    ability("Cyclone Jab", Attack, cyclone_jab),
    ability("Tailwind", Support, tailwind),
    ability("Aerial Skin", Defense, aerial_skin),
    ability("Vacuum Spike", Attack, vacuum_spike),
    ability("Pressure Step", Support, pressure_step),
    ability("Skyguard", Defense, skyguard),
];

static SAND: [AbilityDefinition; ABILITY_COUNT] = [
    ability("Dune Spear", Attack, dune_spear),
    ability("Granite Stance", Defense, granite_stance),
    ability("Nomad's Gift", Support, nomads_gift),
    ability("Quicksand Ring", Attack, quicksand_ring),
    ability("Dust Veil", Defense, dust_veil),
    ability("Caravan Step", Support, caravan_step),
];

static HAIL: [AbilityDefinition; ABILITY_COUNT] = [
    ability("Shard Barrage", Attack, shard_barrage),
    ability("Frostwall", Defense, frostwall),
    ability("Winter Mercy", Support, winter_mercy),
    ability("Permafrost Nova", Attack, permafrost_nova),
    ability("Iceblink", Support, iceblink),
    ability("Crystal Shell", Defense, crystal_shell),
];

/// All six abilities of `element`, in table order.
pub fn abilities(element: Element) -> &'static [AbilityDefinition; ABILITY_COUNT] {
    match element {
        Element::Water => &WATER,
        Element::Fire => &FIRE,
        Element::Wind => &WIND,
        Element::Sand => &SAND,
        Element::Hail => &HAIL,
    }
}

/// First table index of the subset for a sneak state.
pub const fn subset_start(sneaking: bool) -> usize {
    if sneaking {
        SUBSET_SIZE
    } else {
        0
    }
}

/// The three abilities eligible for the given sneak state.
pub fn ability_subset(element: Element, sneaking: bool) -> &'static [AbilityDefinition] {
    let start = subset_start(sneaking);
    &abilities(element)[start..start + SUBSET_SIZE]
}

fn fx(host: &mut dyn GameHost, player: EntityId, effect: StatusEffectType, ticks: u32, amp: u8) {
    effect_self(host, player, StatusEffect::new(effect, ticks, amp));
}

fn fx_hidden(host: &mut dyn GameHost, player: EntityId, effect: StatusEffectType, ticks: u32, amp: u8) {
    effect_self(host, player, StatusEffect::new(effect, ticks, amp).hidden());
}

fn command_at_player(host: &mut dyn GameHost, player: EntityId, command: &str) {
    match host.player(player) {
        Some(state) => host.run_command(state.dimension, command),
        None => trace!(%player, command, "caster gone, command dropped"),
    }
}

// Water

fn tidal_lance(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 7.0, 6.0, DamageCause::Magic);
    if let Some(state) = host.player(player) {
        let at = state.location;
        let command = format!(
            "particle minecraft:splash_particle {} {} {}",
            at.x,
            at.y + 1.0,
            at.z
        );
        host.run_command(state.dimension, &command);
    }
}

fn mending_rain(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Regeneration, 120, 1);
    fx(host, player, StatusEffectType::Resistance, 100, 0);
}

fn foam_guard(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Absorption, 200, 1);
    fx(host, player, StatusEffectType::WaterBreathing, 400, 0);
}

fn riptide_burst(host: &mut dyn GameHost, player: EntityId) {
    push_burst(host, player, 1.6, 8.0);
    damage_ring(host, player, 5.0, 4.0, DamageCause::EntityAttack);
}

fn mist_veil(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Invisibility, 80, 0);
    fx(host, player, StatusEffectType::SlowFalling, 120, 0);
}

fn spring_of_focus(host: &mut dyn GameHost, player: EntityId) {
    fx_hidden(host, player, StatusEffectType::Saturation, 1, 0);
    fx(host, player, StatusEffectType::Speed, 120, 0);
}

// Fire

fn coffin_of_the_banished_sun(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 9.0, 8.0, DamageCause::Fire);
    command_at_player(host, player, FIREBALL_COMMAND);
}

fn solar_bulwark(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::FireResistance, 300, 0);
    fx(host, player, StatusEffectType::Resistance, 120, 1);
}

fn ember_rush(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Speed, 160, 1);
    fx(host, player, StatusEffectType::Strength, 100, 0);
}

fn blazing_volley(host: &mut dyn GameHost, player: EntityId) {
    for shot in 0..VOLLEY_SHOTS {
        // Each shot re-resolves the caster; it may have left or changed dimension.
        host.run_timeout(
            shot * VOLLEY_INTERVAL_TICKS,
            Box::new(move |host: &mut dyn GameHost| {
                command_at_player(host, player, FIREBALL_COMMAND)
            }),
        );
    }
}

fn scorch_field(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 6.0, 7.0, DamageCause::FireTick);
}

fn phoenix_pulse(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Regeneration, 100, 1);
    fx(host, player, StatusEffectType::HealthBoost, 200, 1);
}

// Wind

fn cyclone_jab(host: &mut dyn GameHost, player: EntityId) {
    push_burst(host, player, 2.0, 9.0);
    damage_ring(host, player, 6.0, 5.0, DamageCause::Magic);
}

fn tailwind(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Speed, 220, 2);
    fx(host, player, StatusEffectType::JumpBoost, 220, 1);
}

fn aerial_skin(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::SlowFalling, 220, 0);
    fx(host, player, StatusEffectType::Resistance, 100, 0);
}

fn vacuum_spike(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 5.0, 9.0, DamageCause::Magic);
}

fn pressure_step(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Haste, 180, 1);
    fx(host, player, StatusEffectType::NightVision, 300, 0);
}

fn skyguard(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Absorption, 140, 2);
}

// Sand

fn dune_spear(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 7.0, 7.0, DamageCause::EntityAttack);
}

fn granite_stance(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Resistance, 220, 1);
    fx(host, player, StatusEffectType::Slowness, 60, 0);
}

fn nomads_gift(host: &mut dyn GameHost, player: EntityId) {
    fx_hidden(host, player, StatusEffectType::Saturation, 1, 0);
    fx(host, player, StatusEffectType::Regeneration, 80, 0);
}

fn quicksand_ring(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 5.0, 5.0, DamageCause::Magic);
    command_at_player(host, player, QUICKSAND_COMMAND);
}

fn dust_veil(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Invisibility, 60, 0);
}

fn caravan_step(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Speed, 180, 0);
}

// Hail

fn shard_barrage(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 8.0, 8.0, DamageCause::Freezing);
}

fn frostwall(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Resistance, 120, 1);
    fx(host, player, StatusEffectType::Absorption, 120, 1);
}

fn winter_mercy(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Regeneration, 120, 1);
}

fn permafrost_nova(host: &mut dyn GameHost, player: EntityId) {
    damage_ring(host, player, 5.0, 10.0, DamageCause::Freezing);
    command_at_player(host, player, PERMAFROST_COMMAND);
}

fn iceblink(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::Speed, 80, 2);
}

fn crystal_shell(host: &mut dyn GameHost, player: EntityId) {
    fx(host, player, StatusEffectType::HealthBoost, 160, 1);
}
