#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that walks the Wayfarer world from scripted or typed actions.

mod manifest;
mod render;
mod script;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wayfarer_core::Event;
use wayfarer_engine::Engine;

use crate::script::Action;

/// Walk a tile world from the terminal.
#[derive(Debug, Parser)]
#[command(name = "wayfarer", version)]
struct Args {
    /// Directory holding `manifest.toml` and the location documents it lists.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Seed for item placement, overriding the manifest.
    #[arg(long)]
    seed: Option<u64>,
    /// Actions to run instead of reading standard input, e.g. "s s e e i use:0".
    #[arg(long)]
    script: Option<String>,
    /// Print status lines only, without the map.
    #[arg(long)]
    quiet_map: bool,
}

/// Entry point for the Wayfarer command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let bundle = manifest::load(&args.assets)?;
    let config = bundle.config(args.seed);
    let start = bundle.start.clone();
    let mut engine = Engine::new(bundle.assets, config);
    let events = engine
        .boot(start.clone())
        .with_context(|| format!("failed to boot start location `{start}`"))?;
    report(&engine, &events, args.quiet_map);

    match args.script {
        Some(script) => {
            let actions = script::parse(&script).context("failed to parse --script")?;
            let _ = run(&mut engine, &actions, args.quiet_map);
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read standard input")?;
                match script::parse(&line) {
                    Ok(actions) => {
                        if !run(&mut engine, &actions, args.quiet_map) {
                            break;
                        }
                    }
                    Err(error) => eprintln!("{error}"),
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(io::stderr)
        .init();
}

/// Runs the actions in order. Returns `false` once the session should end.
fn run(engine: &mut Engine, actions: &[Action], quiet_map: bool) -> bool {
    for action in actions {
        let outcome = match *action {
            Action::Intent(intent) => engine.submit(intent).and_then(|mut events| {
                // Effects have no duration without a screen, so finish them at once.
                events.extend(engine.settle()?);
                Ok(events)
            }),
            Action::Use(slot) => engine.use_item(slot),
            Action::Look => Ok(Vec::new()),
            Action::Quit => return false,
        };

        match outcome {
            Ok(events) => report(engine, &events, quiet_map),
            Err(error) => {
                tracing::warn!(%error, ?action, "action failed");
                eprintln!("{error}");
                report(engine, error.events(), quiet_map);
            }
        }
    }
    true
}

fn report(engine: &Engine, events: &[Event], quiet_map: bool) {
    for line in events.iter().filter_map(render::describe) {
        println!("{line}");
    }
    if !quiet_map {
        print!("{}", render::frame(engine.world()));
    }
    println!("{}", render::status(engine.world()));
}
