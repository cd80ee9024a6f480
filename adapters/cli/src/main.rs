#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Path Defence encounters without rendering.

mod scenario;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::{CommandError, Event, GameState, Snapshot};
use path_defence_world::{query, World};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::scenario::{Placement, Scenario};

/// Command-line arguments accepted by the runner.
#[derive(Debug, Parser)]
#[command(name = "path-defence")]
#[command(about = "Runs a Path Defence encounter headlessly")]
struct CliArgs {
    /// TOML scenario overriding the default encounter.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks even if the encounter has not ended.
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Buy a unit before the first wave, as `template:x,y`. Repeatable.
    #[arg(long = "place", value_name = "TEMPLATE:X,Y", value_parser = parse_placement)]
    placements: Vec<Placement>,

    /// Start the next wave as soon as the field is clear.
    #[arg(long)]
    auto_waves: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_placement(value: &str) -> Result<Placement, String> {
    value.parse().map_err(|error| format!("{error:#}"))
}

/// Counts of the events observed while running an encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
struct Tally {
    attacks: u32,
    kills: u32,
    escapes: u32,
    waves_completed: u32,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::UnitAttacked { .. } => self.attacks += 1,
            Event::EnemyKilled { .. } => self.kills += 1,
            Event::EnemyEscaped { enemy } => {
                self.escapes += 1;
                tracing::warn!(%enemy, "enemy reached the exit");
            }
            Event::WaveCompleted { .. } => self.waves_completed += 1,
            _ => {}
        }
    }
}

/// Final state of a run.
#[derive(Debug, Serialize)]
struct Report {
    snapshot: Snapshot,
    tally: Tally,
}

impl Report {
    fn summary(&self) -> String {
        let snapshot = &self.snapshot;
        let outcome = match snapshot.state {
            GameState::Playing => "unfinished",
            GameState::GameOver => "defeat",
            GameState::Victory => "victory",
        };
        format!(
            "{outcome} after {} ticks: wave {}/{}, money {}, lives {}, score {}, kills {}, escapes {}",
            snapshot.tick,
            snapshot.wave.current,
            snapshot.wave.total,
            snapshot.money,
            snapshot.lives,
            snapshot.score,
            self.tally.kills,
            self.tally.escapes,
        )
    }
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let mut world = scenario.build_world()?;
    tracing::info!("{}", query::welcome_banner(&world));

    for placement in &args.placements {
        placement.apply(&mut world)?;
    }

    let report = run(&mut world, args.max_ticks, args.auto_waves)?;
    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialize the report")?;
        println!("{json}");
    } else {
        println!("{}", report.summary());
    }

    Ok(())
}

fn run(world: &mut World, max_ticks: u64, auto_waves: bool) -> Result<Report> {
    match world.start_next_wave() {
        Err(CommandError::NoMoreWaves) => tracing::warn!("scenario defines no waves"),
        started => started.context("failed to start the first wave")?,
    }

    let mut tally = Tally::default();
    let mut snapshot = query::snapshot(world);
    for _ in 0..max_ticks {
        snapshot = world.tick();
        for event in world.drain_events() {
            tally.record(&event);
        }

        if snapshot.state.is_terminal() {
            break;
        }
        if snapshot.wave.active || !snapshot.enemies.is_empty() {
            continue;
        }
        if !auto_waves {
            tracing::info!(wave = snapshot.wave.current, "field clear, stopping");
            break;
        }
        world
            .start_next_wave()
            .context("failed to start the next wave")?;
    }

    Ok(Report { snapshot, tally })
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{EnemyId, Point, SimulationConfig};
    use path_defence_world::UnitTemplateRegistry;

    #[test]
    fn tally_counts_combat_outcomes() {
        let mut tally = Tally::default();
        let enemy = EnemyId::new(3);
        for event in [
            Event::EnemyKilled { enemy, bounty: 10 },
            Event::EnemyEscaped { enemy },
            Event::WaveCompleted { wave: 0 },
            Event::WorldReset,
        ] {
            tally.record(&event);
        }

        assert_eq!(
            tally,
            Tally {
                attacks: 0,
                kills: 1,
                escapes: 1,
                waves_completed: 1,
            }
        );
    }

    #[test]
    fn default_encounter_without_defence_is_lost() {
        let mut world = World::new();

        let report = run(&mut world, 100_000, true).expect("run completes");

        assert_eq!(report.snapshot.state, GameState::GameOver);
        assert_eq!(report.snapshot.lives, 0);
        assert!(report.tally.escapes >= 20);
        assert!(report.summary().starts_with("defeat after"));
    }

    #[test]
    fn manual_waves_stop_once_the_field_is_clear() {
        let mut world = World::new();
        world
            .place_unit("sniper", Point::new(300.0, 220.0))
            .map(|_| ())
            .expect("sniper placed");

        let report = run(&mut world, 100_000, false).expect("run completes");

        assert_eq!(report.snapshot.state, GameState::Playing);
        assert_eq!(report.snapshot.wave.current, 1);
        assert_eq!(report.tally.waves_completed, 1);
        assert_eq!(report.tally.kills + report.tally.escapes, 10);
    }

    #[test]
    fn worlds_without_waves_are_won_immediately() {
        let mut world = World::with_config(
            SimulationConfig::default(),
            UnitTemplateRegistry::with_defaults(),
        )
        .expect("valid config");

        let report = run(&mut world, 10, false).expect("run completes");

        assert_eq!(report.snapshot.state, GameState::Victory);
        assert_eq!(report.snapshot.tick, 1);
    }
}
