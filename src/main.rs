use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use stablepools::{app, config};

#[derive(Parser, Debug)]
#[command(version, about = "Scan Curve gauge and pool snapshots for high-yield stable pools")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that relative snapshot and output paths resolve against
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Gauges snapshot (curvefi-all-guages.json)
    #[arg(long)]
    gauges: Option<PathBuf>,

    /// Pools snapshot (all-pools.json)
    #[arg(long)]
    pools: Option<PathBuf>,

    /// Where to save qualifying pools
    #[arg(long)]
    output: Option<PathBuf>,

    /// Minimum total APY in percent (strictly exceeded)
    #[arg(long)]
    min_apy: Option<f64>,

    /// Minimum pool liquidity in USD
    #[arg(long)]
    min_usd_total: Option<f64>,

    /// Print the report without writing the output file
    #[arg(long)]
    no_save: bool,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// CLI values take priority over the config file
    fn apply(self, cfg: &mut config::Config) {
        if let Some(data_dir) = self.data_dir {
            cfg.paths.data_dir = data_dir;
        }
        if let Some(gauges) = self.gauges {
            cfg.paths.gauges = gauges;
        }
        if let Some(pools) = self.pools {
            cfg.paths.pools = pools;
        }
        if let Some(output) = self.output {
            cfg.paths.output = output;
        }
        if let Some(min_apy) = self.min_apy {
            cfg.filter.min_apy = min_apy;
        }
        if let Some(min_usd_total) = self.min_usd_total {
            cfg.filter.min_usd_total = min_usd_total;
        }
        if self.no_save {
            cfg.output.save = false;
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    // Errors are reported, never turned into a failing exit status
    if let Err(e) = try_main(args) {
        error!("{:#}", e);
    }
}

fn try_main(args: Args) -> Result<()> {
    // Priority: CLI args > Config file > Defaults
    let mut cfg = match &args.config {
        Some(path) => config::Config::from_file(path)?,
        None => config::Config::default(),
    };
    args.apply(&mut cfg);

    let app_cfg = app::AppCfg::from_config(cfg)?;
    app::run(&app_cfg);
    Ok(())
}
