//! Space Invaders headless driver
//!
//! Runs the simulation with the demo autopilot against the headless gateway
//! and prints the final world snapshot as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use space_invaders::consts::{MAX_SUBSTEPS, SIM_DT};
use space_invaders::platform::{Clock, ManualClock};
use space_invaders::renderer::{HeadlessGateway, draw_world};
use space_invaders::sim::{GameEvent, GameWorld, TickInput, tick};
use space_invaders::{FireTiming, Settings};

#[derive(Parser, Debug)]
#[command(name = "space-invaders")]
#[command(about = "Headless Space Invaders simulation driven by the demo autopilot")]
struct Cli {
    /// RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Number of frames to run
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Settings JSON (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frame delta in seconds
    #[arg(long, default_value_t = SIM_DT)]
    dt: f32,
    /// Run the simulation on a fixed 60 Hz step instead of once per frame
    #[arg(long, default_value_t = false)]
    fixed_step: bool,
    /// Enemy fire timing: per-tick or time-scaled
    #[arg(long)]
    fire_timing: Option<String>,
    /// Write the effective settings to this path and continue
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(name) = &cli.fire_timing {
        settings.fire_timing = match FireTiming::from_str(name) {
            Some(timing) => timing,
            None => bail!("unknown fire timing '{name}' (expected per-tick or time-scaled)"),
        };
    }
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LaserFired { .. } | GameEvent::ShieldHit { .. } => {
                log::trace!("{event:?}")
            }
            _ => log::debug!("{event:?}"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if !(cli.dt > 0.0 && cli.dt.is_finite()) {
        bail!("--dt must be a positive number of seconds");
    }

    let settings = load_settings(&cli)?;
    if let Some(path) = &cli.write_config {
        settings
            .save(path)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        log::info!("Settings written to {}", path.display());
    }

    log::info!(
        "Space Invaders starting: seed {}, {} frames, dt {:.4}, fire timing {}",
        cli.seed,
        cli.frames,
        cli.dt,
        settings.fire_timing.as_str()
    );

    let mut assets = HeadlessGateway::new();
    let mut world = GameWorld::new(settings, cli.seed, &mut assets);
    let mut clock = ManualClock::new(0.0);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut accumulator = 0.0f32;
    let mut ticks = 0u64;

    for _ in 0..cli.frames {
        if cli.fixed_step {
            accumulator += cli.dt.min(0.1);
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                clock.advance(SIM_DT as f64);
                tick(&mut world, &input, clock.now(), SIM_DT, &mut assets);
                log_events(&world.events);
                accumulator -= SIM_DT;
                substeps += 1;
                ticks += 1;
            }
        } else {
            clock.advance(cli.dt as f64);
            tick(&mut world, &input, clock.now(), cli.dt, &mut assets);
            log_events(&world.events);
            ticks += 1;
        }

        assets.begin_frame();
        draw_world(&world, &mut assets);
    }

    let snapshot = world.snapshot();
    log::info!(
        "Ran {} ticks, level {}, score {}, {} draws last frame",
        ticks,
        snapshot.level,
        snapshot.score,
        assets.draws
    );

    world.shutdown(&mut assets);
    if assets.live_handles() != 0 || assets.bad_releases != 0 {
        log::warn!(
            "Asset leak: {} handles still live, {} bad releases",
            assets.live_handles(),
            assets.bad_releases
        );
    }

    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}
