//! Headless staff session: replays a script against a sandbox world.

use anyhow::Result;
use glam::DVec3;
use serde::Serialize;
use tracing::{debug, info};
use wizardiuz_abilities::{CastController, UseOutcome};
use wizardiuz_core::{scoped_rng, DimensionId, Element, EntityId, ItemStack};
use wizardiuz_testkit::{EventRecord, JsonlSink, SandboxWorld};

use crate::config::RunnerConfig;
use crate::session_script::{SessionAction, SessionScript};

/// Where the scripted player starts.
const SPAWN: DVec3 = DVec3::new(0.0, 64.0, 0.0);

/// Counts of what each staff use did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub uses: usize,
    pub casts: usize,
    pub switches: usize,
    pub hints: usize,
    pub ignored: usize,
    pub commands: usize,
}

impl SessionSummary {
    fn record(&mut self, outcome: &UseOutcome) {
        self.uses += 1;
        match outcome {
            UseOutcome::Ignored => self.ignored += 1,
            UseOutcome::Switched { .. } => self.switches += 1,
            UseOutcome::NeedsScroll { .. } => self.hints += 1,
            UseOutcome::Cast(_) => self.casts += 1,
        }
    }
}

pub struct Session {
    world: SandboxWorld,
    player: EntityId,
    controller: CastController,
    seed: u64,
    sink: Option<JsonlSink>,
    summary: SessionSummary,
}

impl Session {
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        let mut world = SandboxWorld::new();
        let player = world.spawn_player(DimensionId::Overworld, SPAWN);
        world.hold(player, ItemStack::staff(Element::Water));

        let sink = match &config.event_log {
            Some(path) => Some(JsonlSink::create(path)?),
            None => None,
        };

        Ok(Self {
            world,
            player,
            controller: CastController::new(config.feedback_style()),
            seed: config.rng_seed,
            sink,
            summary: SessionSummary::default(),
        })
    }

    pub fn world(&self) -> &SandboxWorld {
        &self.world
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Run `script` to completion, then `drain_ticks` more ticks.
    ///
    /// The world jumps straight to each step's tick.
    pub fn run(&mut self, mut script: SessionScript, drain_ticks: u64) -> Result<SessionSummary> {
        while let Some(next) = script.next_tick() {
            let now = self.world.tick();
            if next > now {
                self.world.advance(next.0 - now.0);
            }
            for action in script.drain_ready(self.world.tick()) {
                self.apply(action)?;
            }
        }
        self.world.advance(drain_ticks);

        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        self.summary.commands = self.world.commands().len();
        Ok(self.summary.clone())
    }

    fn apply(&mut self, action: SessionAction) -> Result<()> {
        let player = self.player;
        match action {
            SessionAction::UseStaff => self.use_staff()?,
            SessionAction::SetSneaking { sneaking } => self.world.set_sneaking(player, sneaking),
            SessionAction::EquipOffhand { item } => {
                self.world
                    .equip_offhand(player, item.map(|id| ItemStack::new(id, 1)));
            }
            SessionAction::Hold { item } => self.world.hold(player, ItemStack::new(item, 1)),
            SessionAction::SpawnMob {
                type_id,
                x,
                y,
                z,
                health,
            } => {
                let id = self.world.spawn_mob(
                    &type_id,
                    DimensionId::Overworld,
                    DVec3::new(x, y, z),
                    health,
                );
                debug!(%id, type_id = %type_id, "mob spawned");
            }
            SessionAction::DropItem { x, y, z } => {
                self.world
                    .drop_item(DimensionId::Overworld, DVec3::new(x, y, z));
            }
        }
        Ok(())
    }

    fn use_staff(&mut self) -> Result<()> {
        let tick = self.world.tick();
        let event = self.world.use_selected(self.player);
        let mut rng = scoped_rng(self.seed, self.player, tick);
        let outcome = self
            .controller
            .on_item_use(&mut self.world, &mut rng, &event);

        match &outcome {
            UseOutcome::Cast(report) => info!(
                tick = tick.0,
                element = %report.element,
                ability = report.ability,
                category = %report.category,
                "cast"
            ),
            other => info!(tick = tick.0, outcome = ?other, "staff used"),
        }
        self.summary.record(&outcome);

        if let Some(sink) = self.sink.as_mut() {
            sink.write(&EventRecord {
                tick,
                kind: "ItemUse",
                payload: &outcome,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizardiuz_abilities::strip_formatting;
    use wizardiuz_core::element_of_staff;

    fn run_json(json: &str, config: &RunnerConfig) -> (Session, SessionSummary) {
        let script = SessionScript::from_str(json).expect("script parses");
        let mut session = Session::new(config).expect("session starts");
        let summary = session.run(script, config.max_ticks).expect("session runs");
        (session, summary)
    }

    fn held(session: &Session) -> Option<Element> {
        session
            .world()
            .player_data(session.player())
            .and_then(|p| p.selected_item())
            .and_then(|stack| element_of_staff(&stack.type_id))
    }

    #[test]
    fn sneak_cycle_walks_all_elements() {
        let json = r#"{
            "steps": [
                {"tick": 0, "action": "set_sneaking", "sneaking": true},
                {"tick": 1, "action": "use_staff"},
                {"tick": 2, "action": "use_staff"},
                {"tick": 3, "action": "use_staff"},
                {"tick": 4, "action": "use_staff"},
                {"tick": 5, "action": "use_staff"}
            ]
        }"#;
        let (session, summary) = run_json(json, &RunnerConfig::default());
        assert_eq!(summary.switches, 5);
        assert_eq!(summary.casts, 0);
        assert_eq!(held(&session), Some(Element::Water));
    }

    #[test]
    fn scripted_cast_realigns_and_reports() {
        let json = r#"{
            "steps": [
                {"tick": 0, "action": "hold", "item": "wizardiuz:staff_fire"},
                {"tick": 0, "action": "equip_offhand", "item": "wizardiuz:scroll_hail_requiem"},
                {"tick": 0, "action": "spawn_mob", "x": 2.0, "y": 64.0, "z": 0.0, "health": 40.0},
                {"tick": 3, "action": "use_staff"},
                {"tick": 4, "action": "equip_offhand"},
                {"tick": 5, "action": "use_staff"},
                {"tick": 6, "action": "hold", "item": "minecraft:stick"},
                {"tick": 7, "action": "use_staff"}
            ]
        }"#;
        let config = RunnerConfig {
            plain_feedback: true,
            ..RunnerConfig::default()
        };
        let (session, summary) = run_json(json, &config);
        assert_eq!(
            summary,
            SessionSummary {
                uses: 3,
                casts: 1,
                switches: 0,
                hints: 1,
                ignored: 1,
                commands: summary.commands,
            }
        );
        let bar = session
            .world()
            .player_data(session.player())
            .and_then(|p| p.action_bar.clone())
            .expect("feedback shown");
        assert_eq!(strip_formatting(&bar), bar);
        assert_eq!(bar, "Offhand a Wizardiuz Scroll to cast abilities.");
    }

    #[test]
    fn same_seed_same_session() {
        let json = r#"{
            "steps": [
                {"tick": 0, "action": "equip_offhand", "item": "wizardiuz:scroll_banished_sun"},
                {"tick": 0, "action": "spawn_mob", "x": 3.0, "y": 64.0, "z": 0.0, "health": 100.0},
                {"tick": 1, "action": "use_staff"},
                {"tick": 20, "action": "use_staff"},
                {"tick": 40, "action": "set_sneaking", "sneaking": true},
                {"tick": 41, "action": "use_staff"},
                {"tick": 60, "action": "use_staff"}
            ]
        }"#;
        let config = RunnerConfig::default();
        let (first, a) = run_json(json, &config);
        let (second, b) = run_json(json, &config);
        assert_eq!(a, b);
        assert_eq!(first.world().commands(), second.world().commands());
        assert_eq!(
            first.world().player_data(first.player()),
            second.world().player_data(second.player())
        );
    }

    #[test]
    fn far_future_steps_finish_immediately() {
        let json = r#"{
            "steps": [
                {"tick": 0, "action": "equip_offhand", "item": "wizardiuz:scroll_banished_sun"},
                {"tick": 1000000000000, "action": "use_staff"}
            ]
        }"#;
        let (session, summary) = run_json(json, &RunnerConfig::default());
        assert_eq!(summary.casts, 1);
        assert_eq!(
            session.world().tick().0,
            1_000_000_000_000 + RunnerConfig::default().max_ticks
        );
    }

    #[test]
    fn demo_session_replays() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("demos/tide_warden_session.json");
        let script = SessionScript::from_path(&path).expect("demo script loads");
        let config = RunnerConfig::default();
        let mut session = Session::new(&config).expect("session starts");
        let summary = session.run(script, config.max_ticks).expect("session runs");

        assert_eq!(summary.uses, 6);
        assert_eq!(summary.hints, 1);
        assert_eq!(summary.switches, 2);
        assert_eq!(summary.casts, 3);
        assert_eq!(held(&session), Some(Element::Fire));
    }

    #[test]
    fn event_log_has_one_line_per_use() {
        let path = std::env::temp_dir().join(format!(
            "wizardiuz-session-{}.jsonl",
            std::process::id()
        ));
        let config = RunnerConfig {
            event_log: Some(path.clone()),
            ..RunnerConfig::default()
        };
        let json = r#"{
            "steps": [
                {"tick": 0, "action": "use_staff"},
                {"tick": 1, "action": "use_staff"}
            ]
        }"#;
        run_json(json, &config);

        let contents = std::fs::read_to_string(&path).expect("log written");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("valid json");
        assert_eq!(first["kind"], "ItemUse");
        assert_eq!(first["payload"]["outcome"], "needs_scroll");
        assert_eq!(first["payload"]["element"], "water");
        let _ = std::fs::remove_file(path);
    }
}
