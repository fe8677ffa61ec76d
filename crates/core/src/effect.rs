//! Status effects the add-on can request on the caster.
//!
//! The host owns the actual effect simulation; this module only names the
//! effects and carries the parameters of a single request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status effect types used by the ability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffectType {
    // Positive effects
    /// Increases movement speed
    Speed,
    /// Increases mining speed
    Haste,
    /// Increases attack damage
    Strength,
    /// Increases jump height
    JumpBoost,
    /// Restores health over time
    Regeneration,
    /// Reduces damage taken
    Resistance,
    /// Prevents fire damage
    FireResistance,
    /// Allows breathing underwater
    WaterBreathing,
    /// Makes entity invisible
    Invisibility,
    /// Allows seeing in the dark
    NightVision,
    /// Adds extra temporary health
    Absorption,
    /// Raises maximum health
    HealthBoost,
    /// Restores hunger
    Saturation,
    /// Slows falling speed
    SlowFalling,

    // Negative effects
    /// Decreases movement speed
    Slowness,
}

impl StatusEffectType {
    /// Host-facing effect identifier (as used in `effect` commands).
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusEffectType::Speed => "speed",
            StatusEffectType::Haste => "haste",
            StatusEffectType::Strength => "strength",
            StatusEffectType::JumpBoost => "jump_boost",
            StatusEffectType::Regeneration => "regeneration",
            StatusEffectType::Resistance => "resistance",
            StatusEffectType::FireResistance => "fire_resistance",
            StatusEffectType::WaterBreathing => "water_breathing",
            StatusEffectType::Invisibility => "invisibility",
            StatusEffectType::NightVision => "night_vision",
            StatusEffectType::Absorption => "absorption",
            StatusEffectType::HealthBoost => "health_boost",
            StatusEffectType::Saturation => "saturation",
            StatusEffectType::SlowFalling => "slow_falling",
            StatusEffectType::Slowness => "slowness",
        }
    }

    /// Check if this effect is instant (applied once, not over time).
    pub fn is_instant(&self) -> bool {
        matches!(self, StatusEffectType::Saturation)
    }
}

impl fmt::Display for StatusEffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single status effect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// The type of effect.
    pub effect_type: StatusEffectType,
    /// The amplifier (level - 1). 0 = Level I, 1 = Level II, etc.
    pub amplifier: u8,
    /// Duration in game ticks (20 ticks = 1 second).
    pub duration_ticks: u32,
    /// Whether particles should be shown.
    pub show_particles: bool,
}

impl StatusEffect {
    /// Create a new status effect with visible particles.
    pub fn new(effect_type: StatusEffectType, duration_ticks: u32, amplifier: u8) -> Self {
        Self {
            effect_type,
            amplifier,
            duration_ticks,
            show_particles: true,
        }
    }

    /// Same effect with particles hidden.
    pub fn hidden(self) -> Self {
        Self {
            show_particles: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_effects_show_particles() {
        let effect = StatusEffect::new(StatusEffectType::Regeneration, 120, 1);
        assert!(effect.show_particles);
        assert_eq!(effect.amplifier, 1);
        assert_eq!(effect.duration_ticks, 120);
        assert!(!effect.hidden().show_particles);
    }

    #[test]
    fn only_saturation_is_instant() {
        assert!(StatusEffectType::Saturation.is_instant());
        assert!(!StatusEffectType::Regeneration.is_instant());
        assert_eq!(StatusEffectType::JumpBoost.to_string(), "jump_boost");
    }
}
