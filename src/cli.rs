use clap::{ArgAction, Args, Parser, Subcommand};
use std::time::Duration;

use crate::config::{AckPolicy, BenchConfig, DEFAULT_END_LEN, DEFAULT_ITERATIONS, DEFAULT_START_LEN};
use crate::speed::LinkSpeed;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rpmsg-bench",
    about = "RPMsg TTY latency sweep across link speeds and payload sizes",
    arg_required_else_help = true
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Round trip with the remote switched into loopback mode
    Loop(SweepOpts),
    /// Round trip without mode control; the remote must already echo
    Send(SweepOpts),
    /// Receive a stream the remote sends unprompted
    Receive(SweepOpts),
}

#[derive(Args, Debug, Clone)]
pub struct SweepOpts {
    /// RPMsg TTY device path
    #[arg(long, default_value = "/dev/ttyRPMSG30")]
    pub dev: String,
    /// First payload size in bytes
    #[arg(long, default_value_t = DEFAULT_START_LEN)]
    pub start: usize,
    /// Largest payload size in bytes (sizes double from --start)
    #[arg(long, default_value_t = DEFAULT_END_LEN)]
    pub end: usize,
    /// Transfers per (speed, size) bucket
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iters: usize,
    /// Comma-separated link speeds, e.g. 115200,921600 (default depends on mode)
    #[arg(long, value_delimiter = ',')]
    pub speeds: Vec<LinkSpeed>,
    /// Do not wait for the remote to acknowledge mode changes
    #[arg(long, default_value_t = false)]
    pub no_ack: bool,
    /// How long to wait for a mode acknowledgement
    #[arg(long, default_value_t = 1000)]
    pub ack_timeout_ms: u64,
}

impl SweepOpts {
    /// `default_speeds` applies when no --speeds were given.
    pub fn bench_config(&self, default_speeds: &[LinkSpeed]) -> BenchConfig {
        let speeds = if self.speeds.is_empty() {
            default_speeds.to_vec()
        } else {
            self.speeds.clone()
        };
        BenchConfig {
            start_len: self.start,
            end_len: self.end,
            iterations: self.iters,
            speeds,
            ack: if self.no_ack {
                AckPolicy::Disabled
            } else {
                AckPolicy::Wait(Duration::from_millis(self.ack_timeout_ms))
            },
        }
    }
}
