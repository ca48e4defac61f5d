//! Headless replays: command-line parsing, script loading and the replay runner.
//!
//! A script is a JSON document listing frames; each frame carries the elapsed time and the
//! actions pressed during it:
//!
//! ```json
//! {
//!   "config": { "seed": 7 },
//!   "frames": [
//!     { "delta_ms": 16, "actions": ["moveLeft", "hardDrop"] },
//!     { "delta_ms": 16 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, GameSnapshot, GameSummary};
use crate::engine::{ManualClock, MemorySink, ScriptedInput, Session};
use crate::types::{GameAction, TICK_MS};

pub const USAGE: &str = "usage:
  blockfall replay <script.json> [--config <config.json>] [--seed <n>]
  blockfall config [--config <config.json>] [--seed <n>]

environment: BLOCKFALL_SEED, BLOCKFALL_LOCK_DELAY_MS, BLOCKFALL_MAX_LOCK_RESETS,
             BLOCKFALL_PREVIEW_COUNT, RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Replay { script: PathBuf },
    Config,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub config_path: Option<PathBuf>,
    pub seed: Option<u32>,
}

pub fn parse_args(args: &[String]) -> Result<Cli> {
    let Some(first) = args.first() else {
        return Ok(Cli {
            command: Command::Help,
            config_path: None,
            seed: None,
        });
    };

    let (name, mut command) = match first.as_str() {
        "replay" => ("replay", None),
        "config" => ("config", Some(Command::Config)),
        "help" | "--help" | "-h" => ("help", Some(Command::Help)),
        other => return Err(anyhow!("unknown command: {}\n{}", other, USAGE)),
    };

    let mut config_path = None;
    let mut seed = None;
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("{}: missing value for --config", name))?;
                config_path = Some(PathBuf::from(v));
            }
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("{}: missing value for --seed", name))?;
                seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("{}: invalid --seed value: {}", name, v))?,
                );
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("{}: unknown argument: {}", name, other));
            }
            other => {
                if command.is_some() {
                    return Err(anyhow!("{}: unexpected argument: {}", name, other));
                }
                command = Some(Command::Replay {
                    script: PathBuf::from(other),
                });
            }
        }
        i += 1;
    }

    let command = command.ok_or_else(|| anyhow!("replay: missing script path"))?;
    Ok(Cli {
        command,
        config_path,
        seed,
    })
}

fn default_delta_ms() -> u32 {
    TICK_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayFrame {
    #[serde(default = "default_delta_ms")]
    pub delta_ms: u32,
    #[serde(default)]
    pub actions: Vec<GameAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Config recorded with the script; command-line options take precedence
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub frames: Vec<ReplayFrame>,
}

impl ReplayScript {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| anyhow!("replay: invalid script: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("replay: cannot read {}", path.display()))?;
        Self::from_json(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub frames: u64,
    pub game_over: bool,
    pub summary: GameSummary,
    pub snapshot: GameSnapshot,
}

/// Effective configuration: environment, then the script's config, then `--config`, then `--seed`
pub fn resolve_config(cli: &Cli, script: Option<&ReplayScript>) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env();

    if let Some(recorded) = script.and_then(|s| s.config) {
        config = recorded;
    }

    if let Some(path) = &cli.config_path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("config: cannot read {}", path.display()))?;
        config = serde_json::from_str(&text)
            .map_err(|e| anyhow!("config: invalid {}: {}", path.display(), e))?;
    }

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    config.validate().map_err(|e| anyhow!("config: {}", e))?;
    Ok(config)
}

/// Play every frame of `script` through a session, stopping early at game over
pub fn run_replay(script: &ReplayScript, config: EngineConfig) -> Result<ReplayReport> {
    let mut clock = ManualClock::new();
    let mut input = ScriptedInput::new();
    for frame in &script.frames {
        clock.push(frame.delta_ms);
        input.push_frame(&frame.actions);
    }

    let mut session = Session::new(config, clock, input, MemorySink::new())
        .map_err(|e| anyhow!("replay: {}", e))?;
    let summary = session
        .run(script.frames.len() as u64)
        .map_err(|e| anyhow!("replay: frame {} failed: {}", session.frames() + 1, e))?;

    log::info!(
        "replayed {} of {} frames, score {}",
        session.frames(),
        script.frames.len(),
        summary.score
    );

    Ok(ReplayReport {
        frames: session.frames(),
        game_over: session.state().is_game_over(),
        summary,
        snapshot: session.state().snapshot(),
    })
}
