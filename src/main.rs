use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_types::region::Region;
use clap::Parser;
use ec2_ebs_report::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let opts = config::Opts::parse();
    let run_config = config::RunConfig::from_opts(opts)?;

    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        "starting"
    );
    tracing::info!(region = %run_config.region, "AWS region");
    tracing::info!(
        input_file = %run_config
            .input_file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<running instances>".into()),
        "input"
    );
    tracing::info!(output_file = %run_config.output_file.display(), "output");
    tracing::info!(days_back = run_config.days_back, "metric history length");

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(run_config.region.clone()));
    if let Some(profile) = &run_config.profile {
        loader = loader.profile_name(profile);
    }
    let shared_config = loader.load().await;

    let collector = collector::Collector::new(
        ec2_repo::Ec2Repo::new(aws_sdk_ec2::Client::new(&shared_config)),
        cloudwatch_repo::CloudWatchRepo::new(aws_sdk_cloudwatch::Client::new(&shared_config)),
        throttle::RateLimiter::new(run_config.calls_per_second),
        run_config.clone(),
    );

    let mut report = report::Report::new();
    let summary = collector.run(&mut report).await?;

    tracing::info!(
        instances_processed = summary.instances_processed,
        instances_skipped = summary.instances_skipped,
        rows_written = summary.rows_written,
        "run complete"
    );
    Ok(())
}
