// Sequential collection pipeline: resolve inventory, then per instance
// describe + CPU metrics + per-volume metrics, aggregate one row per
// (instance, volume) pair, and rewrite the CSV report after each instance.
//
// Error boundaries: a failed volume-metric fetch drops that one cell; any
// failure while processing an instance skips the instance; inventory
// resolution and file I/O failures propagate and abort the run.

use crate::config::RunConfig;
use crate::errors::CollectError;
use crate::metrics::{
    CPU_METRIC, EBS_METRICS, MetricQuery, Statistic, month_span, reduce_average, reduce_maximum,
    reduce_monthly_sum, reduce_rate_maximum, round0, safe_divide,
};
use crate::models::{AggregatedRow, CellValue, CpuSummary, InstanceRecord, VolumeRecord};
use crate::report::Report;
use crate::throttle::RateLimiter;
use std::path::Path;
use tracing::{info, warn};

/// Compute-inventory service seam: list running instances, describe one
/// instance (tags + attached volume ids), describe one volume.
/// The pipeline is sequential and never spawns, so no Send bound is needed.
#[allow(async_fn_in_trait)]
pub trait InventoryApi {
    async fn list_running_instances(&self) -> Result<Vec<String>, CollectError>;
    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceRecord, CollectError>;
    async fn describe_volume(&self, volume_id: &str) -> Result<VolumeRecord, CollectError>;
}

/// Monitoring service seam: one query, one ordered sample sequence.
#[allow(async_fn_in_trait)]
pub trait MetricsApi {
    async fn fetch_samples(&self, query: &MetricQuery) -> Result<Vec<f64>, CollectError>;
}

/// Outcome counters for one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub instances_processed: usize,
    pub instances_skipped: usize,
    pub rows_written: usize,
}

pub struct Collector<I, M> {
    inventory: I,
    metrics: M,
    limiter: RateLimiter,
    config: RunConfig,
}

impl<I: InventoryApi, M: MetricsApi> Collector<I, M> {
    pub fn new(inventory: I, metrics: M, limiter: RateLimiter, config: RunConfig) -> Self {
        Collector {
            inventory,
            metrics,
            limiter,
            config,
        }
    }

    /// The instance ids to process: the input file when one was given,
    /// otherwise every running instance in the region. Order preserved,
    /// duplicates dropped on later appearances.
    pub async fn resolve_instance_ids(&self) -> anyhow::Result<Vec<String>> {
        let ids = match &self.config.input_file {
            Some(path) => read_instance_list(path)?,
            None => self.inventory.list_running_instances().await?,
        };
        Ok(dedup_keep_order(ids))
    }

    pub async fn run(&self, report: &mut Report) -> anyhow::Result<RunSummary> {
        let instance_ids = self.resolve_instance_ids().await?;

        // Establish the output path before any instance completes.
        report.write_csv(&self.config.output_file)?;

        let mut summary = RunSummary::default();
        if instance_ids.is_empty() {
            info!("no instances found");
            return Ok(summary);
        }

        for instance_id in &instance_ids {
            info!(instance_id = %instance_id, "collecting metrics for instance");
            match self.collect_instance(instance_id, report).await {
                Ok(rows) => {
                    summary.instances_processed += 1;
                    summary.rows_written += rows;
                    report.write_csv(&self.config.output_file)?;
                }
                Err(e) => {
                    warn!(instance_id = %instance_id, error = %e, "instance skipped");
                    summary.instances_skipped += 1;
                }
            }
        }

        info!(path = %self.config.output_file.display(), rows = report.len(), "output file generated");
        Ok(summary)
    }

    /// One instance: describe, CPU summary, then one aggregated row per
    /// attached volume. Any error here is caught at the per-instance boundary.
    async fn collect_instance(
        &self,
        instance_id: &str,
        report: &mut Report,
    ) -> Result<usize, CollectError> {
        let instance = self.inventory.describe_instance(instance_id).await?;
        let cpu = self.collect_cpu(instance_id).await?;

        let mut rows = 0;
        for volume_id in &instance.volume_ids {
            info!(volume_id = %volume_id, "collecting metrics for volume");
            let volume = self.inventory.describe_volume(volume_id).await?;
            let mut row = base_row(&instance, cpu, &volume);
            self.collect_volume_metrics(volume_id, &mut row).await;
            apply_derived_fields(&mut row);
            round_presentation(&mut row);
            report.push(row);
            rows += 1;
        }
        Ok(rows)
    }

    async fn collect_cpu(&self, instance_id: &str) -> Result<CpuSummary, CollectError> {
        let max_query = MetricQuery::ec2(
            instance_id,
            CPU_METRIC,
            Statistic::Maximum,
            self.config.period_seconds,
            self.config.days_back,
        );
        let maximum = reduce_maximum(&self.metrics.fetch_samples(&max_query).await?);

        let avg_query = MetricQuery::ec2(
            instance_id,
            CPU_METRIC,
            Statistic::Average,
            self.config.period_seconds,
            self.config.days_back,
        );
        let average = reduce_average(&self.metrics.fetch_samples(&avg_query).await?);

        Ok(CpuSummary { maximum, average })
    }

    /// Eight throttled fetches per volume (4 metrics x Maximum/Sum). A failed
    /// fetch logs the volume id and metric name and leaves that cell absent.
    async fn collect_volume_metrics(&self, volume_id: &str, row: &mut AggregatedRow) {
        let span = month_span(self.config.days_back);
        for statistic in [Statistic::Maximum, Statistic::Sum] {
            for spec in EBS_METRICS {
                self.limiter.acquire().await;
                let query = MetricQuery::ebs(
                    volume_id,
                    spec,
                    statistic,
                    self.config.period_seconds,
                    self.config.days_back,
                );
                match self.metrics.fetch_samples(&query).await {
                    Ok(samples) => match statistic {
                        Statistic::Maximum => row.set(
                            format!("{}Maximum", spec.name),
                            CellValue::Float(reduce_rate_maximum(&samples)),
                        ),
                        Statistic::Sum => row.set(
                            format!("{}Sum", spec.name),
                            CellValue::Float(reduce_monthly_sum(&samples, span)),
                        ),
                        Statistic::Average => {}
                    },
                    Err(e) => {
                        warn!(
                            volume_id = %volume_id,
                            metric = %spec.name,
                            statistic = %statistic,
                            error = %e,
                            "metric fetch failed, cell left absent"
                        );
                    }
                }
            }
        }
    }
}

/// Instance, CPU, and volume cells in report column order. Every row carries
/// its own full copy of both identities, so rows never share stale fields.
fn base_row(instance: &InstanceRecord, cpu: CpuSummary, volume: &VolumeRecord) -> AggregatedRow {
    let mut row = AggregatedRow::new();
    row.set("Instance_Name", CellValue::Text(instance.name.clone()));
    row.set("Instance_Id", CellValue::Text(instance.instance_id.clone()));
    row.set(
        "Instance_Type",
        CellValue::Text(instance.instance_type.clone()),
    );
    row.set(
        "Platform",
        CellValue::Text(instance.platform_details.clone()),
    );
    row.set("EbsOptimized", CellValue::Bool(instance.ebs_optimized));
    row.set(
        "RootDeviceName",
        CellValue::Text(instance.root_device_name.clone()),
    );
    row.set(
        "RootDeviceType",
        CellValue::Text(instance.root_device_type.clone()),
    );
    row.set("CPUUtilization_Max", CellValue::Float(cpu.maximum));
    row.set("CPUUtilization_Avg", CellValue::Float(cpu.average));
    row.set("Volume_Name", CellValue::Text(volume.name.clone()));
    row.set("Volume_Id", CellValue::Text(volume.volume_id.clone()));
    row.set("Volume_Type", CellValue::Text(volume.volume_type.clone()));
    row.set("Volume_Device", CellValue::Text(volume.device.clone()));
    row.set("Volume_state", CellValue::Text(volume.state.clone()));
    row.set(
        "Volume_Allocated_Size (GiB)",
        CellValue::Int(volume.size_gib),
    );
    row.set("Volume_Provision_IOPS", CellValue::Int(volume.iops));
    row.set("Volume_Encrypted", CellValue::Bool(volume.encrypted));
    row
}

/// Derived cells from the per-metric Sum cells; an absent cell (caught fetch
/// failure) contributes 0 rather than failing the row. Runs on the unrounded
/// sums; presentation rounding comes after.
pub fn apply_derived_fields(row: &mut AggregatedRow) {
    let ops_sum = row.number("VolumeReadOpsSum") + row.number("VolumeWriteOpsSum");
    let bytes_sum = row.number("VolumeReadBytesSum") + row.number("VolumeWriteBytesSum");
    row.set("VolumeOpsSum", CellValue::Float(ops_sum));
    row.set("VolumeBytesSum", CellValue::Float(bytes_sum));
    row.set("IoSize", CellValue::Float(safe_divide(bytes_sum, ops_sum)));
}

/// Final presentation rounding: numeric cells become whole numbers, except
/// the per-second `<metric>Maximum` cells, which keep the one-decimal
/// rounding from reduction.
pub fn round_presentation(row: &mut AggregatedRow) {
    for (column, value) in row.cells_mut() {
        if let CellValue::Float(v) = value
            && !column.ends_with("Maximum")
        {
            *v = round0(*v);
        }
    }
}

/// Plain-text instance list: first comma-separated field of each non-empty
/// line. Open failure is fatal for the run.
pub fn read_instance_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect())
}

fn dedup_keep_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
