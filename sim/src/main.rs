use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sim::{InputScript, SimConfig, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless platformer mover simulation")]
struct Args {
    /// TOML scene file. The built-in demo level runs when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Override the fixed steps per second.
    #[arg(long)]
    tick_rate: Option<u32>,
    /// Override the simulated duration in seconds.
    #[arg(long)]
    duration: Option<f32>,
    /// Run exactly this many steps, overriding the duration.
    #[arg(long, conflicts_with = "duration")]
    steps: Option<u64>,
    /// Ignore the input script and let the player stand still.
    #[arg(long)]
    idle: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(tick_rate) = args.tick_rate {
        config.tick_rate = tick_rate;
    }
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }

    let dt = config.step_secs()?;
    let steps = match args.steps {
        Some(steps) => steps,
        None => config.step_count()?,
    };
    let script = if args.idle {
        InputScript::default()
    } else {
        InputScript::new(config.script.clone())
    };

    if script.is_empty() {
        info!("no input script; the player stands still");
    }

    let mut sim = Simulation::new(&config).context("failed to build simulation")?;
    info!(
        "running {} steps at {} Hz ({} statics, {} platforms)",
        steps,
        config.tick_rate,
        sim.statics().len(),
        sim.platforms().len()
    );

    let report_every = u64::from(config.tick_rate.max(1));
    for step in 0..steps {
        let input = script.sample(step, dt);
        sim.step(dt, &[input]);

        if (step + 1) % report_every == 0 || step + 1 == steps {
            for player in sim.players() {
                let collisions = player.collisions();
                info!(
                    "t={:.2}s player {:?} pos=({:.3}, {:.3}) vel=({:.2}, {:.2}) below={} slope={:.1}°",
                    sim.now().as_secs_f32(),
                    player.id,
                    player.position.x,
                    player.position.y,
                    player.velocity().x,
                    player.velocity().y,
                    collisions.below,
                    collisions.slope_angle.to_degrees()
                );
            }
            for platform in sim.platforms() {
                info!(
                    "t={:.2}s platform {:?} pos=({:.3}, {:.3}) riders={}",
                    sim.now().as_secs_f32(),
                    platform.id,
                    platform.position().x,
                    platform.position().y,
                    platform.controller().passengers().len()
                );
            }
        }
    }

    Ok(())
}
