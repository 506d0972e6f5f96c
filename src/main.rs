use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod frame;
mod mode;
mod scenario;
mod speed;
mod stats;
mod sweep;
mod transport;
mod xfer;

use cli::{Cmd, SweepOpts};
use scenario::{BucketRunner, Scenario};
use speed::LinkSpeed;
use sweep::SweepEngine;
use transport::open_transport;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    match args.cmd {
        Cmd::Loop(opts) => {
            let conf = opts.bench_config(&LinkSpeed::ALL);
            let ack = conf.ack;
            run(&opts, conf, Scenario::loopback(ack))
        }
        Cmd::Send(opts) => run(&opts, opts.bench_config(&LinkSpeed::ALL), Scenario::plain_sweep()),
        // receive has always run at the base rate only
        Cmd::Receive(opts) => {
            let conf = opts.bench_config(&LinkSpeed::ALL[..1]);
            let ack = conf.ack;
            run(&opts, conf, Scenario::receive_only(ack))
        }
    }
}

fn run(opts: &SweepOpts, conf: config::BenchConfig, mut scenario: Scenario) -> Result<()> {
    let engine = SweepEngine::new(conf).context("invalid sweep configuration")?;
    let first = engine.config().speeds[0];
    let mut transport =
        open_transport(&opts.dev, first).with_context(|| format!("opening {}", opts.dev))?;

    let title = scenario.kind().title();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = engine
        .run(&mut transport, &mut scenario, &mut out)
        .with_context(|| format!("{} on {}", title, transport.path()))?;

    info!(
        buckets = summary.reports.len(),
        partial = summary.partial_buckets(),
        skipped_speeds = summary.skipped_speeds.len(),
        "{title} complete"
    );
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}
