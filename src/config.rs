// CLI options and validated run configuration

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_FILE: &str = "ebs-ec2-output.csv";

/// Command-line options.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Collect Amazon CloudWatch metrics for EC2 instances and attached EBS volumes"
)]
pub struct Opts {
    /// Instance list file (first comma-separated field of each line is an
    /// instance id). Without it, all running instances in the region are used.
    #[arg(short, long)]
    pub input_file: Option<PathBuf>,

    /// Output CSV path.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// AWS region.
    #[arg(short, long, default_value = "us-east-1")]
    pub region: String,

    /// Metric look-back window in days.
    #[arg(short, long, default_value_t = 30)]
    pub days_back: u32,

    /// AWS credential profile.
    #[arg(short, long)]
    pub profile: Option<String>,

    /// CloudWatch aggregation period in seconds.
    #[arg(long, default_value_t = 300)]
    pub period: i32,

    /// Volume-metric request rate (token-bucket refill); 0.5 means one call
    /// every two seconds.
    #[arg(long, default_value_t = 0.5)]
    pub calls_per_second: f64,
}

/// Validated configuration threaded through every component; no module-level
/// session state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub region: String,
    pub profile: Option<String>,
    pub input_file: Option<PathBuf>,
    pub output_file: PathBuf,
    pub days_back: u32,
    pub period_seconds: i32,
    pub calls_per_second: f64,
}

impl RunConfig {
    pub fn from_opts(opts: Opts) -> anyhow::Result<Self> {
        let config = RunConfig {
            region: opts.region,
            profile: opts.profile,
            input_file: opts.input_file,
            output_file: opts.output_file,
            days_back: opts.days_back,
            period_seconds: opts.period,
            calls_per_second: opts.calls_per_second,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.days_back >= 1, "days_back must be at least 1");
        anyhow::ensure!(self.period_seconds >= 1, "period must be at least 1 second");
        anyhow::ensure!(
            self.calls_per_second.is_finite() && self.calls_per_second > 0.0,
            "calls_per_second must be positive"
        );
        anyhow::ensure!(!self.region.is_empty(), "region must not be empty");
        Ok(())
    }
}
