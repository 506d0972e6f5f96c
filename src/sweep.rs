use std::io::Write;

use tracing::{debug, error, info, warn};

use crate::config::BenchConfig;
use crate::error::SweepError;
use crate::scenario::BucketRunner;
use crate::speed::LinkSpeed;
use crate::stats::BucketReport;
use crate::transport::Transport;

#[derive(Debug, Default)]
pub struct SweepSummary {
    pub reports: Vec<BucketReport>,
    /// Speeds the transport refused, with the reason.
    pub skipped_speeds: Vec<(LinkSpeed, String)>,
}

impl SweepSummary {
    pub fn partial_buckets(&self) -> usize {
        self.reports.iter().filter(|r| r.is_partial()).count()
    }
}

/// Nested speed × payload-size sweep over one transport.
pub struct SweepEngine {
    config: BenchConfig,
}

impl SweepEngine {
    pub fn new(config: BenchConfig) -> Result<Self, SweepError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn run<T, R, W>(
        &self,
        transport: &mut T,
        runner: &mut R,
        out: &mut W,
    ) -> Result<SweepSummary, SweepError>
    where
        T: Transport + ?Sized,
        R: BucketRunner,
        W: Write + ?Sized,
    {
        let kind = runner.kind();
        let mut current = None;
        if kind.speed_before_enter()
            && let Some(&first) = self.config.speeds.first()
        {
            match transport.set_speed(first) {
                Ok(()) => current = Some(first),
                Err(e) => warn!(baud = first.baud(), "initial speed not applied: {e}"),
            }
        }
        runner.enter(transport).map_err(SweepError::Enter)?;

        // Leave the mode even when report output fails.
        let result = self.sweep(transport, runner, out, current);
        if let Err(e) = runner.exit(transport) {
            warn!("leaving mode failed: {e}");
        }
        result
    }

    fn sweep<T, R, W>(
        &self,
        transport: &mut T,
        runner: &mut R,
        out: &mut W,
        mut current: Option<LinkSpeed>,
    ) -> Result<SweepSummary, SweepError>
    where
        T: Transport + ?Sized,
        R: BucketRunner,
        W: Write + ?Sized,
    {
        let kind = runner.kind();
        let iterations = self.config.iterations;
        if !kind.header_per_speed() {
            self.write_header(out, kind.title())?;
        }

        let mut summary = SweepSummary::default();
        for &speed in &self.config.speeds {
            if current != Some(speed) {
                if let Err(e) = transport.set_speed(speed) {
                    error!(baud = speed.baud(), "skipping speed: {e}");
                    summary.skipped_speeds.push((speed, e.to_string()));
                    continue;
                }
                current = Some(speed);
            }
            info!(baud = speed.baud(), "sweeping {}", kind.title());
            if kind.header_per_speed() {
                self.write_header(out, kind.title())?;
            }

            for size in self.config.payload_sizes() {
                let bucket = runner.run_bucket(transport, speed, size, iterations);
                let report = bucket.report();
                debug!(
                    baud = speed.baud(),
                    size,
                    samples = report.samples,
                    truncated = bucket.is_truncated(),
                    "bucket done"
                );
                writeln!(out, "{report}")?;
                summary.reports.push(report);
            }
        }
        out.flush()?;
        Ok(summary)
    }

    fn write_header<W: Write + ?Sized>(&self, out: &mut W, title: &str) -> std::io::Result<()> {
        writeln!(out, "{title}")?;
        writeln!(
            out,
            "Speed in baudrate, Data_length in bytes, Average time for {} iterations in micro-sec",
            self.config.iterations
        )
    }
}
