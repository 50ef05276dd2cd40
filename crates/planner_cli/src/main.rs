//! Planner CLI
//!
//! Drives the plan runner with the reference tactician, either over a seeded
//! synthetic world or over recorded tick snapshots.

mod replay;
mod world;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use planner_core::tactics::{DefaultTactician, LearningKickoffAdvisor};
use planner_core::{CommandSource, PlanRunner, PlannerConfig, Posture, RunnerStats, TickReport};

use crate::world::{SyntheticWorld, WorldEvent};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Run the tick-driven plan engine", long_about = None)]
#[command(version = planner_core::VERSION)]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the planner against a seeded synthetic world
    Simulate {
        /// World seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of ticks to run
        #[arg(long, default_value_t = 3_600)]
        ticks: u64,

        /// Tick length in milliseconds
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,

        /// Planner config file (.json, .yaml, .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print every tick report as a JSON line instead of a transcript
        #[arg(long)]
        json: bool,
    },

    /// Feed recorded tick snapshots through the planner
    Replay {
        /// JSON array or JSON lines of tick snapshots
        #[arg(long)]
        input: PathBuf,

        /// Planner config file (.json, .yaml, .yml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a planner configuration
    Config {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        #[arg(long, value_enum, default_value_t = Preset::Default)]
        preset: Preset,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    Aggressive,
    Cautious,
}

impl Preset {
    fn config(self) -> PlannerConfig {
        match self {
            Preset::Default => PlannerConfig::default(),
            Preset::Aggressive => PlannerConfig::aggressive(),
            Preset::Cautious => PlannerConfig::cautious(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate { seed, ticks, tick_ms, config, json } => {
            let config = load_config(config.as_deref())?;
            anyhow::ensure!(tick_ms > 0, "--tick-ms must be positive");
            let stats = simulate(&config, seed, ticks, Duration::from_millis(tick_ms), json)?;
            if !json {
                print_summary(&stats);
            }
        }

        Commands::Replay { input, config } => {
            let config = load_config(config.as_deref())?;
            let ticks = replay::load_ticks(&input)?;
            log::info!("Replaying {} ticks from {}", ticks.len(), input.display());

            let mut runner = PlanRunner::new(DefaultTactician::new(&config));
            for ctx in &ticks {
                let report = runner.tick(ctx);
                println!("{}", serde_json::to_string(&report)?);
            }
        }

        Commands::Config { format, preset } => {
            println!("{}", render_config(&preset.config(), format)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("loading planner config from {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

fn render_config(config: &PlannerConfig, format: Format) -> Result<String> {
    let text = match format {
        Format::Json => serde_json::to_string_pretty(config)?,
        Format::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(text)
}

/// Run `ticks` ticks of the synthetic world. The transcript prints one line
/// whenever the runner changes what is answering (plan posture or default).
fn simulate(config: &PlannerConfig, seed: u64, ticks: u64, tick: Duration, json: bool) -> Result<RunnerStats> {
    let mut world = SyntheticWorld::new(seed, tick);
    let tactician = DefaultTactician::with_advisor(config, LearningKickoffAdvisor::seeded(seed));
    let mut runner = PlanRunner::new(tactician);
    let mut last_answer: Option<(CommandSource, Option<Posture>)> = None;

    log::info!("Simulating {} ticks of {:?} with seed {}", ticks, tick, seed);

    for _ in 0..ticks {
        let ctx = world.context();
        let report = runner.tick(&ctx);

        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            let answer = (report.source, runner.current_plan().map(|plan| plan.posture()));
            if last_answer != Some(answer) {
                print_transition(&report);
                last_answer = Some(answer);
            }
        }

        for event in world.advance(&report.command) {
            if let WorldEvent::Goal { scorer } = event {
                // Kickoff reset: whatever we were doing no longer applies.
                runner.clear();
                last_answer = None;
                if !json {
                    let scores = world.scores();
                    println!("{:>9}  GOAL {:?} ({}-{})", world.time().to_string(), scorer, scores.blue, scores.orange);
                }
            } else {
                log::debug!("{:?} at {}", event, world.time());
            }
        }
    }

    Ok(runner.stats().clone())
}

fn print_transition(report: &TickReport) {
    let source = match report.source {
        CommandSource::Plan => "plan",
        CommandSource::Default => "default",
    };
    println!("{:>9}  {:<7}  {}", report.time.to_string(), source, report.situation);
}

fn print_summary(stats: &RunnerStats) {
    println!("\nSimulation finished");
    println!("   Ticks:          {}", stats.ticks);
    println!("   Plan coverage:  {:.1}%", stats.plan_coverage() * 100.0);
    println!("   Plans adopted:  {} ({} replaced)", stats.plans_adopted, stats.plans_replaced);
    for (posture, count) in &stats.postures {
        println!("     {:<10} {}", posture.name(), count);
    }
    for (posture, count) in &stats.replaced {
        println!("   Abandoned {:<10} {}", posture.name(), count);
    }
    println!(
        "   Finished:       {} succeeded, {} canceled, {} invalidated, {} exhausted",
        stats.succeeded, stats.canceled, stats.invalidated, stats.exhausted
    );
}
