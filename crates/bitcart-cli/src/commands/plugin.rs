//! Plugin lifecycle commands.
//!
//! Every action loads the host configuration from `~/.bitcart-cli/config.yml`
//! with `BITCART_CLI_*` environment overrides applied, then delegates to the
//! lifecycle engine.

use crate::actions::PluginAction;
use crate::prompt::TerminalPrompter;
use anyhow::{Context, Result};
use bitcart_core::cli::ExitCode;
use bitcart_core::{ConfigStore, Prompter};
use bitcart_lifecycle::{
    HostRegistry, InstallMode, Installer, install_plugin, package_plugin, scaffold_plugin,
    uninstall_plugin, validate_plugin,
};
use bitcart_schema::SchemaCache;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Runs a plugin action.
///
/// # Errors
///
/// Returns an error if the action fails; nothing is retried.
pub fn run(action: PluginAction) -> Result<ExitCode> {
    let prompter = TerminalPrompter;
    match action {
        PluginAction::Init { path, save } => init(&path, save, &prompter),
        PluginAction::Install { path, dev, save } => install(&path, dev, save, &prompter),
        PluginAction::Uninstall { path, save } => uninstall(&path, save, &prompter),
        PluginAction::Validate { path, schema } => validate(&path, &schema),
        PluginAction::Package { path, no_strip } => package(&path, !no_strip),
    }
}

fn success(message: impl std::fmt::Display) {
    println!("{} {message}", "✓".green().bold());
}

fn open_registry<'p>(prompter: &'p dyn Prompter) -> Result<(ConfigStore, HostRegistry<'p>)> {
    let store = ConfigStore::new().context("failed to open settings directory")?;
    let mut hosts = store
        .load_hosts()
        .context("failed to load host configuration")?;
    hosts.apply_process_env();
    Ok((store, HostRegistry::new(hosts, prompter)))
}

/// Creates a plugin skeleton in `path`.
///
/// # Errors
///
/// Returns an error if a question is not answered or files cannot be written.
pub fn init(path: &Path, save: bool, prompter: &dyn Prompter) -> Result<ExitCode> {
    let (store, mut registry) = open_registry(prompter)?;
    let report = scaffold_plugin(path, &mut registry, &Installer::new(), save.then_some(&store))
        .with_context(|| format!("failed to create plugin in {}", path.display()))?;

    info!(
        "Created plugin '{}' with {} components",
        report.manifest.name,
        report.links.len()
    );
    success("Plugin created successfully");
    Ok(ExitCode::SUCCESS)
}

/// Installs the plugin at `path`, copying or linking (`dev`) its components.
///
/// # Errors
///
/// Returns an error if the plugin or a host cannot be resolved or a copy fails.
pub fn install(path: &Path, dev: bool, save: bool, prompter: &dyn Prompter) -> Result<ExitCode> {
    let (store, mut registry) = open_registry(prompter)?;
    let mode = if dev {
        InstallMode::Link
    } else {
        InstallMode::Copy
    };

    let outcomes = install_plugin(
        path,
        &mut registry,
        &Installer::new(),
        mode,
        save.then_some(&store),
    )
    .with_context(|| format!("failed to install plugin {}", path.display()))?;

    success(format!("Plugin installed ({} components)", outcomes.len()));
    Ok(ExitCode::SUCCESS)
}

/// Uninstalls the plugin at `path`.
///
/// # Errors
///
/// Returns an error if the plugin or a host cannot be resolved or removal fails.
pub fn uninstall(path: &Path, save: bool, prompter: &dyn Prompter) -> Result<ExitCode> {
    let (store, mut registry) = open_registry(prompter)?;

    let outcomes = uninstall_plugin(path, &mut registry, &Installer::new(), save.then_some(&store))
        .with_context(|| format!("failed to uninstall plugin {}", path.display()))?;

    success(format!("Plugin uninstalled ({} components)", outcomes.len()));
    Ok(ExitCode::SUCCESS)
}

/// Validates the plugin at `path` against the schema published at `schema_url`.
///
/// # Errors
///
/// Returns an error if the schema cannot be prepared or the plugin is invalid.
pub fn validate(path: &Path, schema_url: &str) -> Result<ExitCode> {
    let cache = SchemaCache::new().context("failed to open schema cache")?;
    let schema = cache
        .prepare(schema_url)
        .with_context(|| format!("failed to prepare schema {schema_url}"))?;

    validate_plugin(path, &schema)
        .with_context(|| format!("plugin {} is invalid", path.display()))?;

    success("Plugin is valid!");
    Ok(ExitCode::SUCCESS)
}

/// Packages the plugin at `path`, stripping ignored files unless `strip` is false.
///
/// # Errors
///
/// Returns an error if stripping or archiving fails.
pub fn package(path: &Path, strip: bool) -> Result<ExitCode> {
    let report = package_plugin(path, strip)
        .with_context(|| format!("failed to package plugin {}", path.display()))?;

    success(format!("Plugin packaged to {}", report.archive.display()));
    Ok(ExitCode::SUCCESS)
}
