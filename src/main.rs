//! Headless runner (default binary).
//!
//! `blockfall replay <script.json>` plays a recorded frame script and prints the final state as
//! JSON; `blockfall config` prints the effective configuration. Logging goes to stderr and is
//! controlled with `RUST_LOG`.

use anyhow::Result;

use blockfall::replay::{parse_args, resolve_config, run_replay, Command, ReplayScript, USAGE};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    match &cli.command {
        Command::Help => {
            println!("{}", USAGE);
        }
        Command::Config => {
            let config = resolve_config(&cli, None)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Replay { script } => {
            let script = ReplayScript::load(script)?;
            let config = resolve_config(&cli, Some(&script))?;
            log::debug!("replay config: {:?}", config);
            let report = run_replay(&script, config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
