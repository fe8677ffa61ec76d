use anyhow::Result;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};
use wizardiuz_core::SimTick;

fn default_mob_type() -> String {
    "minecraft:zombie".to_string()
}

fn default_mob_health() -> f32 {
    20.0
}

/// One thing the scripted player (or the world around it) does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    UseStaff,
    SetSneaking {
        sneaking: bool,
    },
    EquipOffhand {
        #[serde(default)]
        item: Option<String>,
    },
    Hold {
        item: String,
    },
    SpawnMob {
        #[serde(default = "default_mob_type")]
        type_id: String,
        x: f64,
        y: f64,
        z: f64,
        #[serde(default = "default_mob_health")]
        health: f32,
    },
    DropItem {
        x: f64,
        y: f64,
        z: f64,
    },
}

#[derive(Debug, Deserialize)]
struct SessionScriptFile {
    steps: Vec<SessionStepDef>,
}

#[derive(Debug, Deserialize)]
struct SessionStepDef {
    tick: u64,
    #[serde(flatten)]
    action: SessionAction,
}

#[derive(Debug, Clone)]
struct SessionStep {
    tick: SimTick,
    action: SessionAction,
}

/// Deterministic session script.
///
/// Scripts are a list of `{tick, action, ...}` steps, executed in file order.
#[derive(Debug)]
pub struct SessionScript {
    pending: VecDeque<SessionStep>,
}

impl SessionScript {
    /// Load a session script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load a session script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: SessionScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("session script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("session script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            pending.push_back(SessionStep {
                tick: SimTick(step.tick),
                action: step.action,
            });
        }

        Ok(Self { pending })
    }

    /// Drain and return all actions scheduled for ticks `<= tick`.
    pub fn drain_ready(&mut self, tick: SimTick) -> Vec<SessionAction> {
        let mut actions = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                actions.push(step.action);
            }
        }
        actions
    }

    /// Tick of the next pending step.
    pub fn next_tick(&self) -> Option<SimTick> {
        self.pending.front().map(|step| step.tick)
    }

    /// Tick of the last pending step.
    pub fn last_tick(&self) -> Option<SimTick> {
        self.pending.back().map(|step| step.tick)
    }
}
