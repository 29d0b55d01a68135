//! CLI entry point for the ipmon network configuration watcher.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use ipmon_core::JsonFileStore;

use ipmon_watch::config::WatchConfig;
use ipmon_watch::notify::SmtpNotifier;
use ipmon_watch::probe::SystemProbe;
use ipmon_watch::scheduler::Watcher;

#[derive(Parser)]
#[command(name = "ipmon")]
#[command(about = "Mail a report when this host's network configuration changes")]
struct Cli {
    /// Seconds between checks (overrides watch.interval_secs).
    #[arg(short, long)]
    interval: Option<u64>,

    /// Run a single check and exit.
    #[arg(long)]
    once: bool,

    /// Snapshot file (overrides watch.net_conf).
    #[arg(long)]
    net_conf: Option<String>,

    /// Mail relay settings file (overrides watch.mail_conf).
    #[arg(long)]
    mail_conf: Option<String>,

    /// Config file prefix (default: ipmon).
    #[arg(short, long, default_value = "ipmon")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    tracing::info!(
        net_conf = %config.net_conf,
        mail_conf = %config.mail_conf,
        once = cli.once,
        "Running"
    );

    let store = JsonFileStore::new(&config.net_conf);
    let notifier = SmtpNotifier::new(&config.mail_conf);
    let watcher = Watcher::new(config, SystemProbe::new(), store, notifier);

    if cli.once {
        let check = watcher.run_once().await?;
        tracing::info!(
            check_id = %check.check_id,
            outcome = ?check.outcome,
            "Check complete"
        );
    } else {
        watcher.run().await?;
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<WatchConfig> {
    let config = WatchConfig::load(&cli.config)?.with_overrides(
        cli.interval,
        cli.net_conf.clone(),
        cli.mail_conf.clone(),
    );
    // A single check never uses the interval.
    if !cli.once {
        config.validate()?;
    }
    Ok(config)
}
