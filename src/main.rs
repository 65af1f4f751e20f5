use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use gyre::actuator::{Actuator, ExecuteOptions, ShellActuator};
use gyre::engine::{EngineConfig, EngineHooks, LoopEngine};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gyre")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("gyre.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_run_command(
    objective: &str,
    cwd: Option<PathBuf>,
    max_iterations: Option<u32>,
    timeout_ms: Option<u64>,
    delay_ms: Option<u64>,
    narratives: bool,
    json: bool,
    verbose: bool,
    config: &Config,
) -> Result<()> {
    info!("Running loop for objective: {}", objective);

    let mut engine_config = config.engine.clone();
    if let Some(n) = max_iterations {
        engine_config.max_iterations = n;
    }
    if let Some(ms) = delay_ms {
        engine_config.iteration_delay_ms = ms;
    }

    let mut actuator = ShellActuator::new();
    if let Some(dir) = cwd.or_else(|| config.actuator.cwd.clone()) {
        actuator = actuator.with_cwd(dir);
    }
    actuator = actuator.with_default_timeout_ms(timeout_ms.unwrap_or(config.actuator.timeout_ms));

    let mut engine = LoopEngine::new(objective, Arc::new(actuator), engine_config)
        .with_execute_options(ExecuteOptions { timeout_ms });

    if verbose {
        let hooks = EngineHooks::new()
            .on_iteration_start(|iteration, _state| {
                println!("{} iteration {}", "Starting".cyan(), iteration);
            })
            .on_action(|action, result| {
                println!("  {} {} ({}ms)", result.outcome, action, result.duration_ms);
            });
        engine = engine.with_hooks(hooks);
    }

    println!("{} {}", "Running:".green(), objective);
    let state = engine.run().await.context("Loop execution failed")?;

    if json {
        let rendered = state.to_json().context("Failed to serialize final state")?;
        println!("{rendered}");
    } else if let Some(summary) = &state.final_summary {
        println!("\n{summary}");
    }

    if narratives {
        println!();
        for narrative in engine.get_narratives() {
            println!("{narrative}\n");
        }
    }

    let stopped_successfully = state
        .stop_reason
        .as_deref()
        .is_some_and(|r| r.starts_with("stop_success"));
    if stopped_successfully {
        println!("{}", "Loop completed successfully".green());
    } else {
        println!(
            "{} {}",
            "Loop stopped:".yellow(),
            state.stop_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(())
}

fn handle_check_command(cwd: Option<PathBuf>, config: &Config) -> Result<()> {
    let mut actuator = ShellActuator::new();
    if let Some(dir) = cwd.or_else(|| config.actuator.cwd.clone()) {
        actuator = actuator.with_cwd(dir);
    }

    if actuator.is_available() {
        println!("{} shell actuator available", "OK:".green());
        Ok(())
    } else {
        println!("{} shell actuator unavailable", "FAIL:".red());
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    match cli.command {
        Commands::Run {
            ref objective,
            ref cwd,
            max_iterations,
            timeout_ms,
            delay_ms,
            narratives,
            json,
        } => {
            handle_run_command(
                objective,
                cwd.clone(),
                max_iterations,
                timeout_ms,
                delay_ms,
                narratives,
                json,
                cli.is_verbose(),
                &config,
            )
            .await
        }
        Commands::Check { ref cwd } => handle_check_command(cwd.clone(), &config),
    }
}
