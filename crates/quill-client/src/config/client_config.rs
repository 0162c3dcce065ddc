use config::{Config, ConfigError, File};
use quill_sync::mutation::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use super::Environment;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CartConfig {
    /// Upper limit of the quantity of a single cart line.
    pub max_quantity: u32,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self { max_quantity: 99 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToastConfig {
    /// How long a notification stays visible.
    pub ttl_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { ttl_ms: 4_000 }
    }
}

impl ToastConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// The client configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub coordinator: CoordinatorConfig,
    pub cart: CartConfig,
    pub toast: ToastConfig,
}

impl ClientConfig {
    /// Load the configuration from the optional json file, overridden by the `QUILL--` environment variables.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        match &config_file {
            Some(path) => {
                log::info!("Loading client configuration from {}", path.display());
                builder = builder.add_source(File::from(path.as_path()));
            }
            None => log::info!("Loading client configuration from the environment"),
        }
        builder = builder.add_source(Environment::new());

        let cfg: ClientConfig = builder.build()?.try_deserialize()?;
        log::debug!("Client configuration: {:#?}", cfg);
        Ok(cfg)
    }
}
