//! Bitcart CLI.
//!
//! Creates, installs, validates and packages Bitcart plugins.
//!
//! # Examples
//!
//! ```bash
//! # Scaffold a plugin and remember host paths entered along the way
//! bitcart-cli plugin init ./demo --save
//!
//! # Link the plugin into the hosts for development
//! bitcart-cli plugin install ./demo --dev
//!
//! # Build demo.bitcart
//! bitcart-cli plugin package ./demo
//! ```

use anyhow::Result;
use bitcart_core::cli::ExitCode;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod actions;
mod commands;
mod prompt;

use actions::PluginAction;

/// Bitcart CLI - plugin development tooling.
#[derive(Parser, Debug)]
#[command(name = "bitcart-cli")]
#[command(version, about, long_about = None)]
#[command(author = "Bitcart Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage plugins: init, install, uninstall, validate, package.
    Plugin {
        /// Plugin action to perform
        #[command(subcommand)]
        action: PluginAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match execute_command(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            ExitCode::ERROR
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging on stderr; stdout carries only command output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes a command to its handler.
fn execute_command(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Plugin { action } => commands::plugin::run(action),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install_dev() {
        let cli = Cli::parse_from(["bitcart-cli", "plugin", "install", "./demo", "-D", "--save"]);
        let Commands::Plugin {
            action: PluginAction::Install { path, dev, save },
        } = cli.command
        else {
            panic!("Expected plugin install");
        };
        assert_eq!(path, PathBuf::from("./demo"));
        assert!(dev);
        assert!(save);
    }

    #[test]
    fn test_parse_install_defaults() {
        let cli = Cli::parse_from(["bitcart-cli", "plugin", "install", "demo"]);
        assert!(matches!(
            cli.command,
            Commands::Plugin {
                action: PluginAction::Install {
                    dev: false,
                    save: false,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_parse_validate_default_schema() {
        let cli = Cli::parse_from(["bitcart-cli", "plugin", "validate", "demo"]);
        let Commands::Plugin {
            action: PluginAction::Validate { schema, .. },
        } = cli.command
        else {
            panic!("Expected plugin validate");
        };
        assert_eq!(schema, bitcart_schema::DEFAULT_SCHEMA_URL);
    }

    #[test]
    fn test_parse_validate_custom_schema() {
        let cli = Cli::parse_from([
            "bitcart-cli",
            "plugin",
            "validate",
            "demo",
            "--schema",
            "http://localhost/v9/plugin.schema.json",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Plugin {
                action: PluginAction::Validate { ref schema, .. }
            } if schema == "http://localhost/v9/plugin.schema.json"
        ));
    }

    #[test]
    fn test_parse_package_no_strip() {
        let cli = Cli::parse_from(["bitcart-cli", "plugin", "package", "demo", "--no-strip"]);
        assert!(matches!(
            cli.command,
            Commands::Plugin {
                action: PluginAction::Package { no_strip: true, .. }
            }
        ));
    }

    #[test]
    fn test_parse_init_save() {
        let cli = Cli::parse_from(["bitcart-cli", "plugin", "init", "new-plugin", "-s"]);
        assert!(matches!(
            cli.command,
            Commands::Plugin {
                action: PluginAction::Init { save: true, .. }
            }
        ));
    }

    #[test]
    fn test_missing_plugin_path_is_rejected() {
        assert!(Cli::try_parse_from(["bitcart-cli", "plugin", "uninstall"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["bitcart-cli", "plugin", "package", "demo", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::parse_from(["bitcart-cli", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
    }
}
