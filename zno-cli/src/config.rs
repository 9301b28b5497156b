use anyhow::Context;
use zno_config::load_config;
use zno_config::shared::ZnoConfig;

/// Loads the configuration for the current environment and validates it.
pub fn load_zno_config() -> anyhow::Result<ZnoConfig> {
    let config = load_config::<ZnoConfig>().context("loading the zno configuration")?;
    config
        .validate()
        .context("validating the zno configuration")?;

    Ok(config)
}
