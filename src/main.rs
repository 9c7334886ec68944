//! Hexlanes headless runner
//!
//! Loads a level from a content directory and runs it at a fixed timestep,
//! optionally letting the safe-lane solver steer the player.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use hexlanes::Settings;
use hexlanes::consts::{RESPAWN_SECONDS, SIM_DT};
use hexlanes::persistence::DirectoryLoader;
use hexlanes::sim::{AutoPlayer, EventSink, PatternInstance, Simulation};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding `patterns/` and `levels/`
    #[arg(short, long, default_value = "content")]
    content: PathBuf,

    /// Level to run
    #[arg(short, long, default_value = "default")]
    level: String,

    /// Optional settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Simulated seconds to run for
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Override the pattern selection seed
    #[arg(long)]
    seed: Option<u64>,

    /// Let the solver steer the player
    #[arg(long)]
    autoplay: bool,
}

/// Lifecycle counters shared with the runner
#[derive(Default)]
struct Counters {
    spawned: Cell<u32>,
    retired: Cell<u32>,
}

struct LoggingSink {
    counters: Rc<Counters>,
}

impl EventSink for LoggingSink {
    fn pattern_spawned(&mut self, instance: &PatternInstance) {
        self.counters.spawned.set(self.counters.spawned.get() + 1);
        log::debug!("spawned {} ({})", instance.name(), instance.id.0);
    }

    fn pattern_is_past_player(&mut self, instance: &PatternInstance) {
        if instance.last_before_restart {
            log::info!("Level loop completed with {}", instance.name());
        }
    }

    fn pattern_is_off_screen(&mut self, _instance: &PatternInstance) {
        self.counters.retired.set(self.counters.retired.get() + 1);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    settings.autoplay |= args.autoplay;

    let loader = DirectoryLoader::new(&args.content);
    let mut sim = Simulation::new(settings, Box::new(loader), &args.level)
        .with_context(|| format!("Failed to start level `{}`", args.level))?;

    let counters = Rc::new(Counters::default());
    sim.subscribe(Box::new(LoggingSink {
        counters: Rc::clone(&counters),
    }));

    let mut player = AutoPlayer::new(0.0);
    let mut dead_for = 0.0;
    let total_ticks = (args.seconds / SIM_DT).ceil() as u64;
    log::info!(
        "Running {} for {:.1}s ({} ticks, autoplay {})",
        args.level,
        args.seconds,
        total_ticks,
        sim.settings.autoplay
    );

    for _ in 0..total_ticks {
        sim.tick(&mut player, SIM_DT).context("Simulation tick failed")?;
        player.update(&sim.threats, sim.difficulty.player_rotation_rate, SIM_DT);

        if player.dead {
            dead_for += SIM_DT;
            if dead_for >= RESPAWN_SECONDS {
                player.respawn();
                dead_for = 0.0;
            }
        }
    }

    println!("Run complete.");
    println!("Ticks: {}", sim.time_ticks);
    println!("Deaths: {}", player.deaths);
    println!("Patterns spawned: {}", counters.spawned.get());
    println!("Patterns retired: {}", counters.retired.get());
    println!("Levels completed: {}", sim.levels_completed);
    println!("Threat pool: {} allocated", sim.threats.pool().capacity());

    Ok(())
}
