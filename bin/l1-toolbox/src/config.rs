//! Toolbox configuration file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use l1_primitives::AvalancheNetwork;
use l1_validator_registration::{
    poll::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_MAX_ATTEMPTS, DEFAULT_POLL_TIMEOUT},
    PollConfig,
};
use serde::{Deserialize, Serialize};

use crate::args::Args;

const DEFAULT_CHECKPOINT_DIR: &str = "checkpoints";
const DEFAULT_GENESIS_OUTPUT_DIR: &str = ".";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_WATCH_INTERVAL_MS: u64 = 250;

fn default_network() -> AvalancheNetwork {
    AvalancheNetwork::Fuji
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_poll_max_attempts() -> u32 {
    DEFAULT_POLL_MAX_ATTEMPTS
}

fn default_poll_timeout_secs() -> u64 {
    DEFAULT_POLL_TIMEOUT.as_secs()
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CHECKPOINT_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_GENESIS_OUTPUT_DIR)
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_watch_interval_ms() -> u64 {
    DEFAULT_WATCH_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ToolboxConfig {
    #[serde(default = "default_network")]
    pub(crate) network: AvalancheNetwork,

    #[serde(default)]
    pub(crate) endpoints: EndpointsConfig,

    #[serde(default)]
    pub(crate) registration: RegistrationConfig,

    #[serde(default)]
    pub(crate) genesis: GenesisConfig,

    #[serde(default)]
    pub(crate) logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EndpointsConfig {
    /// Avalanche API node; the network's public node when unset.
    #[serde(default)]
    pub(crate) pchain_api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RegistrationConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub(crate) poll_interval_ms: u64,

    #[serde(default = "default_poll_max_attempts")]
    pub(crate) poll_max_attempts: u32,

    #[serde(default = "default_poll_timeout_secs")]
    pub(crate) poll_timeout_secs: u64,

    #[serde(default = "default_checkpoint_dir")]
    pub(crate) checkpoint_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GenesisConfig {
    #[serde(default = "default_debounce_ms")]
    pub(crate) debounce_ms: u64,

    /// How often `--watch` checks the input file for changes.
    #[serde(default = "default_watch_interval_ms")]
    pub(crate) watch_interval_ms: u64,

    #[serde(default = "default_output_dir")]
    pub(crate) output_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LoggingConfig {
    #[serde(default)]
    pub(crate) dir: Option<PathBuf>,

    #[serde(default)]
    pub(crate) json: bool,

    #[serde(default)]
    pub(crate) otlp_url: Option<String>,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            endpoints: EndpointsConfig::default(),
            registration: RegistrationConfig::default(),
            genesis: GenesisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_timeout_secs: default_poll_timeout_secs(),
            checkpoint_dir: default_checkpoint_dir(),
        }
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            watch_interval_ms: default_watch_interval_ms(),
            output_dir: default_output_dir(),
        }
    }
}

impl ToolboxConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Applies command line flags over file values.
    pub(crate) fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(network) = args.network {
            self.network = network;
        }
        if let Some(dir) = &args.log_dir {
            self.logging.dir = Some(dir.clone());
        }
        if args.json_logs {
            self.logging.json = true;
        }
        if let Some(url) = &args.otlp_url {
            self.logging.otlp_url = Some(url.clone());
        }
        self
    }

    pub(crate) fn pchain_api_url(&self) -> &str {
        self.endpoints
            .pchain_api_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_api_url())
    }

    pub(crate) fn poll_config(&self) -> PollConfig {
        let r = &self.registration;
        PollConfig {
            interval: Duration::from_millis(r.poll_interval_ms),
            max_attempts: r.poll_max_attempts,
            timeout: Duration::from_secs(r.poll_timeout_secs),
        }
    }

    pub(crate) fn debounce(&self) -> Duration {
        Duration::from_millis(self.genesis.debounce_ms)
    }

    pub(crate) fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.genesis.watch_interval_ms)
    }
}
