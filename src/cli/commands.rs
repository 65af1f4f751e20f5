//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: execute a loop against an objective
//! - check: verify the shell actuator is available

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gyre - an autonomous execution-loop engine
#[derive(Parser, Debug)]
#[command(name = "gyre")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a loop until it reaches a stop condition
    Run {
        /// Objective the loop works toward (executed as a shell command)
        objective: String,

        /// Working directory for shell actions
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Maximum number of iterations
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,

        /// Per-action timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Delay between iterations in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Print per-iteration narratives after the run
        #[arg(long)]
        narratives: bool,

        /// Print the final state as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Check that the shell actuator is available
    Check {
        /// Working directory the actuator would run in
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["gyre"]).is_err());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["gyre", "-v", "check"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["gyre", "-c", "/path/to/gyre.yml", "check"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/gyre.yml")));
    }

    #[test]
    fn test_run_command_defaults() {
        let cli = Cli::try_parse_from(["gyre", "run", "echo hello"]).unwrap();
        match cli.command {
            Commands::Run {
                objective,
                cwd,
                max_iterations,
                timeout_ms,
                delay_ms,
                narratives,
                json,
            } => {
                assert_eq!(objective, "echo hello");
                assert!(cwd.is_none());
                assert!(max_iterations.is_none());
                assert!(timeout_ms.is_none());
                assert!(delay_ms.is_none());
                assert!(!narratives);
                assert!(!json);
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_command_with_flags() {
        let cli = Cli::try_parse_from([
            "gyre",
            "run",
            "cargo test",
            "--cwd",
            "/tmp/project",
            "-n",
            "5",
            "--timeout-ms",
            "30000",
            "--delay-ms",
            "0",
            "--narratives",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                objective,
                cwd,
                max_iterations,
                timeout_ms,
                delay_ms,
                narratives,
                json,
            } => {
                assert_eq!(objective, "cargo test");
                assert_eq!(cwd, Some(PathBuf::from("/tmp/project")));
                assert_eq!(max_iterations, Some(5));
                assert_eq!(timeout_ms, Some(30000));
                assert_eq!(delay_ms, Some(0));
                assert!(narratives);
                assert!(json);
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["gyre", "check"]).unwrap();
        match cli.command {
            Commands::Check { cwd } => assert!(cwd.is_none()),
            _ => panic!("Expected check command"),
        }
    }

    #[test]
    fn test_check_with_cwd() {
        let cli = Cli::try_parse_from(["gyre", "check", "--cwd", "/srv"]).unwrap();
        match cli.command {
            Commands::Check { cwd } => assert_eq!(cwd, Some(PathBuf::from("/srv"))),
            _ => panic!("Expected check command"),
        }
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["gyre", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
