//! Command line tool for Avalanche L1 operators.

mod args;
mod cmd;
mod config;

use std::process;

use l1_common::logging::{self, LoggingInitConfig};

use crate::{args::Args, cmd::exec_subc, config::ToolboxConfig};

const SERVICE_NAME: &str = "l1-toolbox";

fn init_logging(config: &ToolboxConfig) {
    let network = config.network.to_string();
    logging::init_logging_from_config(LoggingInitConfig {
        service_base_name: SERVICE_NAME,
        service_label: Some(&network),
        otlp_url: config.logging.otlp_url.as_deref(),
        log_dir: config.logging.dir.as_deref(),
        json_format: config.logging.json,
    });
}

fn main() {
    let args: Args = argh::from_env();
    let inner = || -> anyhow::Result<()> {
        let config = ToolboxConfig::load(args.config.as_deref())?.with_overrides(&args);

        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        rt.block_on(async {
            // The OTLP exporter needs a runtime to start.
            init_logging(&config);
            let res = exec_subc(args.subc, &config).await;
            logging::finalize();
            res
        })
    };
    if let Err(e) = inner() {
        eprintln!("ERROR\n{e:?}");
        process::exit(1);
    }
}
