//! qsca - terminal front end for the QSCA cognitive core
//!
//! Provides:
//! - An interactive chat REPL with feature commands
//! - A once-per-second metrics watch
//! - A one-shot status report

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qsca_runtime::config::{LoggingConfig, RuntimeConfig};
use qsca_runtime::{
    narrative, visualization_concept, CognitiveCore, CoreMetrics, FeatureOperations,
    LifecyclePhase,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// QSCA CLI
#[derive(Parser)]
#[command(name = "qsca")]
#[command(about = "QSCA - simulated cognitive state engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QSCA_CONFIG_FILE", global = true)]
    config: Option<String>,

    /// Seed for the simulation RNG
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log level (overrides the configured level)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive conversation (default)
    Chat,

    /// Print metrics once per second
    Watch {
        /// Number of seconds to watch
        #[arg(short, long, default_value_t = 10)]
        seconds: u64,
    },

    /// Boot, then print temporal status and metrics
    Status,
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config =
        RuntimeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    // Override with CLI args
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    init_tracing(&config.logging);

    let core = CognitiveCore::bootstrap(config)
        .await
        .context("failed to bootstrap cognitive core")?;

    let result = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat(&core).await,
        Commands::Watch { seconds } => watch(&core, seconds).await,
        Commands::Status => status(&core).await,
    };

    core.shutdown().await;
    result
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Print status announcements until the core is running.
async fn follow_boot(core: &CognitiveCore) {
    let mut status = core.subscribe_status();
    loop {
        let current = status.borrow_and_update().clone();
        if !current.message.is_empty() {
            println!("  {}", current.message);
        }
        if current.phase == LifecyclePhase::Running {
            break;
        }
        if status.changed().await.is_err() {
            break;
        }
    }
}

async fn chat(core: &CognitiveCore) -> Result<()> {
    follow_boot(core).await;

    let features = core.features();
    println!("\nQSCA> {}\n", narrative::GREETING);
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handle_line(&features, line).await? {
            Flow::Continue => {}
            Flow::Quit => break,
        }
    }

    Ok(())
}

async fn handle_line(features: &FeatureOperations, line: &str) -> Result<Flow> {
    let core = features.core();

    let Some(command) = line.strip_prefix('/') else {
        if let Some(concept) = visualization_concept(line) {
            match features.visualize(&concept).await {
                Ok(visualization) => {
                    reply(&visualization.summary());
                    tracing::info!(locator = %visualization.locator, "Image rendered");
                    voice(features, narrative::IMAGE_SYNTHESIS_SPOKEN).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Visualization failed");
                    reply(narrative::IMAGE_SYNTHESIS_FAILURE);
                }
            }
        } else {
            let response = core.process_input(line).await;
            reply(&response);
            voice(features, &response).await;
        }
        return Ok(Flow::Continue);
    };

    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => print_help(),
        "insight" => reply(&features.generate_quantum_insight().await),
        "ethics" => reply(&features.start_ethical_challenge().await),
        "intervene" if !arg.is_empty() => {
            reply(&features.simulate_temporal_intervention(arg).await)
        }
        "memory" if !arg.is_empty() => reply(&features.query_memory(arg).await),
        "snapshot" => {
            let snapshot = features.create_snapshot().await;
            println!(
                "Snapshot {} at {}: level {}, {} quantum states, goal \"{}\"",
                snapshot.id,
                snapshot.created_at,
                snapshot.experience_level,
                snapshot.quantum_states_estimate,
                snapshot.goal
            );
        }
        "snapshots" => {
            for snapshot in core.snapshots().await {
                println!(
                    "{}  {}  L{}  {}",
                    snapshot.created_at, snapshot.id, snapshot.experience_level, snapshot.goal
                );
            }
        }
        "toggle" => {
            let running = core.toggle().await;
            println!("Simulation {}", if running { "running" } else { "paused" });
        }
        "faster" | "slower" => {
            let step = core.config().simulation.speed_step;
            let delta = if name == "faster" { step } else { -step };
            let speed = core.adjust_speed(delta).await;
            print_speed(core, speed).await;
        }
        "speed" => match arg.parse::<f64>() {
            Ok(requested) => {
                let speed = core.set_speed(requested).await;
                print_speed(core, speed).await;
            }
            Err(_) => {
                let (speed, _) = core.speed().await;
                print_speed(core, speed).await;
            }
        },
        "reset" => {
            core.reset().await;
            println!("Core state reset.");
        }
        "tts" => {
            let enabled = core.toggle_tts().await;
            println!("Voice output {}", if enabled { "enabled" } else { "disabled" });
        }
        "status" => {
            print_metrics(&core.metrics().await);
            for message in core.agent_log().await.iter().take(5) {
                println!("  {}", message);
            }
        }
        "future" => {
            let projection = if arg.is_empty() {
                Some(core.most_likely_future().await)
            } else {
                core.query_future(arg).await
            };
            match projection {
                Some(p) => println!(
                    "{} (p={:.2}, {:.1}y): {}",
                    p.scenario, p.probability, p.timeframe, p.implications
                ),
                None => println!("No projection matches \"{}\".", arg),
            }
        }
        _ => {
            println!("Unknown command or missing argument: /{}", command);
            print_help();
        }
    }

    Ok(Flow::Continue)
}

fn reply(text: &str) {
    println!("QSCA> {}", text);
}

async fn voice(features: &FeatureOperations, text: &str) {
    if let Some(locator) = features.speak(text).await {
        tracing::debug!(%locator, "Voice output ready");
    }
}

async fn print_speed(core: &CognitiveCore, speed: f64) {
    let (_, interval_ms) = core.speed().await;
    println!("Speed {:.2}x ({}ms cycle)", speed, interval_ms);
}

fn print_metrics(metrics: &CoreMetrics) {
    println!(
        "[{}] states={:.0} lr={:.2}% load={} level={} consciousness={:.4} thoughts={} sentiment={} speed={:.2}x{} goal=\"{}\"",
        metrics.phase,
        metrics.quantum_states,
        metrics.learning_rate,
        metrics.cognitive_load,
        metrics.experience_level,
        metrics.consciousness_level,
        metrics.thought_count,
        metrics.sentiment,
        metrics.simulation_speed,
        if metrics.simulation_running { "" } else { " (paused)" },
        metrics.current_goal
    );
}

fn print_help() {
    println!(
        r#"Commands:
  /insight            Quantum insight
  /ethics             Adaptive ethical challenge
  /intervene <text>   Simulate a temporal intervention
  /memory <keyword>   Recall a memory cluster
  /snapshot           Capture a snapshot
  /snapshots          List snapshots
  /toggle             Pause or resume the simulation
  /faster, /slower    Adjust simulation speed
  /speed [x]          Show or set simulation speed
  /reset              Reset core state
  /tts                Toggle voice output
  /status             Show metrics and agent log
  /future [query]     Query temporal projections
  /quit               Exit
Any other line is sent to QSCA; "visualize X" renders an image."#
    );
}

async fn watch(core: &CognitiveCore, seconds: u64) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut last_agent_message = None;

    for _ in 0..seconds {
        ticker.tick().await;
        print_metrics(&core.metrics().await);

        let newest = core.agent_log().await.into_iter().next();
        if newest.is_some() && newest != last_agent_message {
            if let Some(message) = &newest {
                println!("  {}", message);
            }
            last_agent_message = newest;
        }
    }

    Ok(())
}

async fn status(core: &CognitiveCore) -> Result<()> {
    follow_boot(core).await;

    let temporal = core.temporal_status().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&temporal).context("failed to render temporal status")?
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&core.metrics().await).context("failed to render metrics")?
    );
    Ok(())
}
