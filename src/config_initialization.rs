//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};

use crate::adapters::toml_config::{Settings, TomlConfigAdapter};
use crate::cli::{Cli, Commands};

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<Settings> {
    let mut settings =
        TomlConfigAdapter::load(cli.config.as_deref()).context("Failed to load configuration file")?;

    TomlConfigAdapter::apply_env(&mut settings, |key| std::env::var(key).ok())
        .context("Invalid environment configuration")?;

    apply_cli_configuration_overrides(&mut settings, cli);

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_configuration_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }

    match &cli.command {
        Commands::Remux(args) => {
            if let Some(delay) = args.subtitle_delay {
                settings.remux.subtitle_delay_ms = delay;
            }
        }
        Commands::Verify(args) => {
            if let Some(timeout) = args.timeout {
                settings.validation.timeout_secs = timeout;
            }
        }
        _ => {}
    }
}
