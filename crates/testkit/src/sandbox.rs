//! In-memory host world for tests and headless sessions.
//!
//! `SandboxWorld` implements [`GameHost`] with just enough simulation to
//! observe what abilities do: health and knockback on entities, hotbar and
//! off-hand slots on players, stacked status effects, a command log and a
//! tick-driven deferred task queue. Individual requests can be made to fail
//! so best-effort paths are testable.

use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;
use wizardiuz_core::item::{DROPPED_ITEM_ENTITY, PLAYER_ENTITY};
use wizardiuz_core::{
    DamageSource, DeferredTask, DimensionId, EntityId, EntitySnapshot, GameHost, HostError,
    HostResult, ItemStack, ItemUseEvent, Knockback, PlayerState, SimTick, StatusEffect,
    StatusEffectType,
};

/// Number of hotbar slots per player.
pub const HOTBAR_SIZE: usize = 9;

/// Starting health of sandbox players.
pub const PLAYER_MAX_HEALTH: f32 = 20.0;

/// One accepted damage request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRecord {
    /// Amount requested.
    pub amount: f32,
    /// Cause and credited entity.
    pub source: DamageSource,
}

/// A non-player body in the sandbox (mobs, dropped items, player bodies).
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxEntity {
    /// Handle.
    pub id: EntityId,
    /// Entity type id.
    pub type_id: String,
    /// Dimension the entity is in.
    pub dimension: DimensionId,
    /// Position.
    pub location: DVec3,
    /// Velocity set by the most recent knockback.
    pub velocity: DVec3,
    /// Current health.
    pub health: f32,
    /// Whether health has dropped to zero.
    pub dead: bool,
    /// Every damage request accepted, in order.
    pub damage_taken: Vec<DamageRecord>,
    /// Most recent knockback accepted.
    pub last_knockback: Option<Knockback>,
}

impl SandboxEntity {
    fn new(id: EntityId, type_id: &str, dimension: DimensionId, location: DVec3, health: f32) -> Self {
        Self {
            id,
            type_id: type_id.to_string(),
            dimension,
            location,
            velocity: DVec3::ZERO,
            health,
            dead: false,
            damage_taken: Vec::new(),
            last_knockback: None,
        }
    }

    /// Take damage and return true if the entity died.
    pub fn damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        if self.health <= 0.0 {
            self.dead = true;
        }
        self.dead
    }

    /// Apply knockback as a velocity change.
    pub fn apply_knockback(&mut self, knockback: Knockback) {
        self.velocity = DVec3::new(
            knockback.dir_x * knockback.horizontal,
            knockback.vertical,
            knockback.dir_z * knockback.horizontal,
        );
        self.last_knockback = Some(knockback);
    }

    /// Distance to a point.
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.location.distance(point)
    }
}

/// Collection of active status effects on a player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusEffects {
    // Only one of each type.
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Add or upgrade a status effect.
    ///
    /// A higher amplifier replaces the existing effect; an equal amplifier
    /// only extends the duration; anything weaker is ignored.
    pub fn add(&mut self, effect: StatusEffect) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.effect_type == effect.effect_type)
        {
            if effect.amplifier > existing.amplifier {
                *existing = effect;
            } else if effect.amplifier == existing.amplifier
                && effect.duration_ticks > existing.duration_ticks
            {
                existing.duration_ticks = effect.duration_ticks;
            }
        } else {
            self.effects.push(effect);
        }
    }

    /// Check if an effect is active.
    pub fn has(&self, effect_type: StatusEffectType) -> bool {
        self.effects.iter().any(|e| e.effect_type == effect_type)
    }

    /// Get an effect by type.
    pub fn get(&self, effect_type: StatusEffectType) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.effect_type == effect_type)
    }

    /// Get the amplifier of an effect (None if not active).
    pub fn amplifier(&self, effect_type: StatusEffectType) -> Option<u8> {
        self.get(effect_type).map(|e| e.amplifier)
    }

    /// Count down every effect by `ticks`, dropping expired ones.
    pub fn elapse(&mut self, ticks: u64) {
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.effects.retain_mut(|effect| {
            if effect.effect_type.is_instant() {
                return false;
            }
            effect.duration_ticks = effect.duration_ticks.saturating_sub(ticks);
            effect.duration_ticks > 0
        });
    }

    /// Check if any effects are active.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Player-only state layered on top of a [`SandboxEntity`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SandboxPlayer {
    /// Hotbar slots.
    pub hotbar: [Option<ItemStack>; HOTBAR_SIZE],
    /// Selected hotbar slot.
    pub selected_slot: usize,
    /// Off-hand slot.
    pub offhand: Option<ItemStack>,
    /// Crouching flag.
    pub sneaking: bool,
    /// Active status effects.
    pub effects: StatusEffects,
    /// Last action-bar text shown.
    pub action_bar: Option<String>,
    /// Number of times the selected slot was replaced through the host API.
    pub selected_writes: usize,
}

impl SandboxPlayer {
    /// Stack in the selected hotbar slot.
    pub fn selected_item(&self) -> Option<&ItemStack> {
        self.hotbar.get(self.selected_slot).and_then(Option::as_ref)
    }
}

/// A world command the host was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    /// Tick the command was issued on.
    pub tick: SimTick,
    /// Dimension context.
    pub dimension: DimensionId,
    /// Command text.
    pub command: String,
}

/// In-memory [`GameHost`].
pub struct SandboxWorld {
    tick: SimTick,
    next_id: u64,
    next_task: u64,
    entities: BTreeMap<EntityId, SandboxEntity>,
    players: BTreeMap<EntityId, SandboxPlayer>,
    tasks: BTreeMap<(SimTick, u64), DeferredTask>,
    commands: Vec<CommandRecord>,
    reject_damage: BTreeSet<EntityId>,
    reject_knockback: BTreeSet<EntityId>,
    unsupported_effects: BTreeSet<StatusEffectType>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    /// Empty world at tick zero.
    pub fn new() -> Self {
        Self {
            tick: SimTick::ZERO,
            next_id: 1,
            next_task: 0,
            entities: BTreeMap::new(),
            players: BTreeMap::new(),
            tasks: BTreeMap::new(),
            commands: Vec::new(),
            reject_damage: BTreeSet::new(),
            reject_knockback: BTreeSet::new(),
            unsupported_effects: BTreeSet::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current tick.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Spawn a player with an empty hotbar.
    pub fn spawn_player(&mut self, dimension: DimensionId, location: DVec3) -> EntityId {
        let id = self.allocate_id();
        self.entities.insert(
            id,
            SandboxEntity::new(id, PLAYER_ENTITY, dimension, location, PLAYER_MAX_HEALTH),
        );
        self.players.insert(id, SandboxPlayer::default());
        id
    }

    /// Spawn a mob.
    pub fn spawn_mob(
        &mut self,
        type_id: &str,
        dimension: DimensionId,
        location: DVec3,
        health: f32,
    ) -> EntityId {
        let id = self.allocate_id();
        self.entities
            .insert(id, SandboxEntity::new(id, type_id, dimension, location, health));
        id
    }

    /// Spawn a dropped item entity.
    pub fn drop_item(&mut self, dimension: DimensionId, location: DVec3) -> EntityId {
        self.spawn_mob(DROPPED_ITEM_ENTITY, dimension, location, 5.0)
    }

    /// Remove an entity (or player), making its handle stale.
    pub fn invalidate(&mut self, id: EntityId) {
        self.entities.remove(&id);
        self.players.remove(&id);
    }

    /// Entity by handle.
    pub fn entity(&self, id: EntityId) -> Option<&SandboxEntity> {
        self.entities.get(&id)
    }

    /// Player-only state by handle.
    pub fn player_data(&self, id: EntityId) -> Option<&SandboxPlayer> {
        self.players.get(&id)
    }

    /// Put `stack` into the player's selected slot directly (not counted as a host write).
    pub fn hold(&mut self, player: EntityId, stack: ItemStack) {
        if let Some(data) = self.players.get_mut(&player) {
            let slot = data.selected_slot;
            data.hotbar[slot] = Some(stack);
        }
    }

    /// Select a hotbar slot.
    pub fn select_slot(&mut self, player: EntityId, slot: usize) {
        if let Some(data) = self.players.get_mut(&player) {
            data.selected_slot = slot.min(HOTBAR_SIZE - 1);
        }
    }

    /// Set or clear the off-hand slot.
    pub fn equip_offhand(&mut self, player: EntityId, stack: Option<ItemStack>) {
        if let Some(data) = self.players.get_mut(&player) {
            data.offhand = stack;
        }
    }

    /// Set the crouching flag.
    pub fn set_sneaking(&mut self, player: EntityId, sneaking: bool) {
        if let Some(data) = self.players.get_mut(&player) {
            data.sneaking = sneaking;
        }
    }

    /// Move an entity.
    pub fn teleport(&mut self, id: EntityId, dimension: DimensionId, location: DVec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.dimension = dimension;
            entity.location = location;
        }
    }

    /// Build the event the host would raise when `player` uses the selected item.
    pub fn use_selected(&self, player: EntityId) -> ItemUseEvent {
        ItemUseEvent {
            source: player,
            item: self
                .players
                .get(&player)
                .and_then(|data| data.selected_item().cloned()),
        }
    }

    /// How many times the host API replaced the player's selected slot.
    pub fn selected_item_writes(&self, player: EntityId) -> usize {
        self.players
            .get(&player)
            .map_or(0, |data| data.selected_writes)
    }

    /// Make every damage request against `id` fail.
    pub fn reject_damage_for(&mut self, id: EntityId) {
        self.reject_damage.insert(id);
    }

    /// Make every knockback request against `id` fail.
    pub fn reject_knockback_for(&mut self, id: EntityId) {
        self.reject_knockback.insert(id);
    }

    /// Make every request for `effect_type` fail as unsupported.
    pub fn mark_unsupported(&mut self, effect_type: StatusEffectType) {
        self.unsupported_effects.insert(effect_type);
    }

    /// Commands issued so far.
    pub fn commands(&self) -> &[CommandRecord] {
        &self.commands
    }

    /// Deferred tasks not yet run.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Step `ticks` ticks, running deferred tasks as they come due.
    ///
    /// Stretches with nothing due are skipped in one step.
    pub fn advance(&mut self, ticks: u64) {
        let target = self.tick.advance(ticks);
        while self.tick < target {
            let next = self
                .tasks
                .keys()
                .next()
                .map_or(target, |&(due, _)| due.max(self.tick.advance(1)).min(target));
            let step = next.0 - self.tick.0;
            self.tick = next;
            for data in self.players.values_mut() {
                data.effects.elapse(step);
            }
            self.run_due_tasks();
        }
    }

    fn run_due_tasks(&mut self) {
        while let Some(entry) = self.tasks.first_entry() {
            if entry.key().0 > self.tick {
                break;
            }
            let task = entry.remove();
            task(&mut *self);
        }
    }
}

impl GameHost for SandboxWorld {
    fn player(&self, player: EntityId) -> Option<PlayerState> {
        let data = self.players.get(&player)?;
        let body = self.entities.get(&player)?;
        Some(PlayerState {
            id: player,
            dimension: body.dimension,
            location: body.location,
            sneaking: data.sneaking,
        })
    }

    fn offhand_item(&self, player: EntityId) -> Option<ItemStack> {
        self.players.get(&player)?.offhand.clone()
    }

    fn set_selected_item(&mut self, player: EntityId, stack: ItemStack) -> HostResult {
        let data = self
            .players
            .get_mut(&player)
            .ok_or(HostError::InvalidEntity(player))?;
        let slot = data.selected_slot;
        data.hotbar[slot] = Some(stack);
        data.selected_writes += 1;
        Ok(())
    }

    fn entities_near(
        &self,
        dimension: DimensionId,
        center: DVec3,
        max_distance: f64,
    ) -> Vec<EntitySnapshot> {
        self.entities
            .values()
            .filter(|e| e.dimension == dimension && e.distance_to(center) <= max_distance)
            .map(|e| EntitySnapshot {
                id: e.id,
                type_id: e.type_id.clone(),
                location: e.location,
            })
            .collect()
    }

    fn apply_damage(&mut self, target: EntityId, amount: f32, source: DamageSource) -> HostResult {
        if self.reject_damage.contains(&target) {
            return Err(HostError::Rejected {
                reason: format!("{target} is immune"),
            });
        }
        let entity = self
            .entities
            .get_mut(&target)
            .ok_or(HostError::InvalidEntity(target))?;
        entity.damage_taken.push(DamageRecord { amount, source });
        if entity.damage(amount) {
            trace!(%target, "entity died");
        }
        Ok(())
    }

    fn apply_knockback(&mut self, target: EntityId, knockback: Knockback) -> HostResult {
        if self.reject_knockback.contains(&target) {
            return Err(HostError::Rejected {
                reason: format!("{target} cannot be moved"),
            });
        }
        let entity = self
            .entities
            .get_mut(&target)
            .ok_or(HostError::InvalidEntity(target))?;
        entity.apply_knockback(knockback);
        Ok(())
    }

    fn add_effect(&mut self, target: EntityId, effect: StatusEffect) -> HostResult {
        if self.unsupported_effects.contains(&effect.effect_type) {
            return Err(HostError::Unsupported(effect.effect_type.to_string()));
        }
        let data = self
            .players
            .get_mut(&target)
            .ok_or(HostError::InvalidEntity(target))?;
        data.effects.add(effect);
        Ok(())
    }

    fn run_command(&mut self, dimension: DimensionId, command: &str) {
        self.commands.push(CommandRecord {
            tick: self.tick,
            dimension,
            command: command.to_string(),
        });
    }

    fn run_timeout(&mut self, delay_ticks: u32, task: DeferredTask) {
        let due = self.tick.advance(u64::from(delay_ticks));
        let seq = self.next_task;
        self.next_task += 1;
        self.tasks.insert((due, seq), task);
    }

    fn set_action_bar(&mut self, player: EntityId, text: &str) {
        if let Some(data) = self.players.get_mut(&player) {
            data.action_bar = Some(text.to_string());
        }
    }
}
