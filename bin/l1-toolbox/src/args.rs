//! Command line arguments for the `l1-toolbox` binary.

use std::path::PathBuf;

use argh::FromArgs;
use l1_primitives::AvalancheNetwork;

/// Avalanche L1 toolbox: genesis generation and validator registration
/// checkpoints.
#[derive(FromArgs, Debug)]
pub(crate) struct Args {
    #[argh(option, description = "config file (toml)", short = 'c')]
    pub(crate) config: Option<PathBuf>,

    #[argh(option, description = "network [mainnet, fuji]", short = 'n')]
    pub(crate) network: Option<AvalancheNetwork>,

    #[argh(option, description = "directory for rolling log files")]
    pub(crate) log_dir: Option<PathBuf>,

    #[argh(switch, description = "emit logs as json")]
    pub(crate) json_logs: bool,

    #[argh(option, description = "the OpenTelemetry OTLP collector url")]
    pub(crate) otlp_url: Option<String>,

    #[argh(subcommand)]
    pub(crate) subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub(crate) enum Subcommand {
    Genesis(SubcGenesis),
    Checkpoint(SubcCheckpoint),
    ShowConfig(SubcShowConfig),
}

/// Validate genesis inputs and write `genesis-<chainId>.json` files.
#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "genesis",
    description = "validates genesis inputs and writes genesis-<chainId>.json"
)]
pub(crate) struct SubcGenesis {
    #[argh(
        option,
        description = "genesis input file (toml), repeatable for several chains",
        short = 'i'
    )]
    pub(crate) input: Vec<PathBuf>,

    #[argh(option, description = "output directory (default from config)", short = 'o')]
    pub(crate) output: Option<PathBuf>,

    #[argh(option, description = "genesis timestamp in unix seconds (default now)")]
    pub(crate) timestamp: Option<u64>,

    #[argh(switch, description = "only validate, do not write files")]
    pub(crate) check: bool,

    #[argh(
        switch,
        description = "keep running and regenerate when the input file changes",
        short = 'w'
    )]
    pub(crate) watch: bool,
}

/// Inspect persisted validator registration checkpoints.
#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "checkpoint",
    description = "prints persisted validator registration checkpoints"
)]
pub(crate) struct SubcCheckpoint {
    #[argh(option, description = "checkpoint store directory (default from config)", short = 's')]
    pub(crate) store: Option<PathBuf>,

    #[argh(
        switch,
        description = "query the P-Chain status of the checkpoint's registration tx"
    )]
    pub(crate) refresh: bool,

    #[argh(
        switch,
        description = "with --refresh, poll until the tx is committed"
    )]
    pub(crate) wait: bool,

    #[argh(positional, description = "registration id; lists all when omitted")]
    pub(crate) id: Option<String>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "show-config",
    description = "prints the effective configuration"
)]
pub(crate) struct SubcShowConfig {}
