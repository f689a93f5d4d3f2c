//! Action type definitions for CLI commands.

use clap::Subcommand;
use std::path::PathBuf;

/// Plugin lifecycle actions.
#[derive(Subcommand, Debug)]
pub enum PluginAction {
    /// Create a new plugin skeleton interactively
    Init {
        /// Directory to create the plugin in
        path: PathBuf,

        /// Save host repository paths entered during setup
        #[arg(short, long)]
        save: bool,
    },

    /// Install a plugin into the configured host repositories
    Install {
        /// Plugin directory
        path: PathBuf,

        /// Link components instead of copying them (development mode)
        #[arg(short = 'D', long)]
        dev: bool,

        /// Save host repository paths entered during install
        #[arg(short, long)]
        save: bool,
    },

    /// Remove a plugin from the host repositories
    Uninstall {
        /// Plugin directory
        path: PathBuf,

        /// Save host repository paths entered during uninstall
        #[arg(short, long)]
        save: bool,
    },

    /// Check a plugin manifest and its component layout
    Validate {
        /// Plugin directory
        path: PathBuf,

        /// Manifest schema URL
        #[arg(long, default_value = bitcart_schema::DEFAULT_SCHEMA_URL)]
        schema: String,
    },

    /// Package a plugin into a .bitcart archive
    Package {
        /// Plugin directory
        path: PathBuf,

        /// Keep files matched by .gitignore (by default they are deleted before packaging)
        #[arg(long)]
        no_strip: bool,
    },
}
