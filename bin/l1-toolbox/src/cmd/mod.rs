mod checkpoint;
mod genesis;

use anyhow::Context;

use crate::{args::Subcommand, config::ToolboxConfig};

pub(crate) async fn exec_subc(cmd: Subcommand, config: &ToolboxConfig) -> anyhow::Result<()> {
    match cmd {
        Subcommand::Genesis(subc) => genesis::exec(subc, config).await,
        Subcommand::Checkpoint(subc) => checkpoint::exec(subc, config).await,
        Subcommand::ShowConfig(_) => exec_show_config(config),
    }
}

fn exec_show_config(config: &ToolboxConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("rendering config")?;
    print!("{rendered}");
    Ok(())
}
