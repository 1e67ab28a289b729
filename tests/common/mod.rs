// Shared test helpers: in-memory inventory and metric sources

use ec2_ebs_report::collector::{InventoryApi, MetricsApi};
use ec2_ebs_report::config::RunConfig;
use ec2_ebs_report::errors::CollectError;
use ec2_ebs_report::metrics::MetricQuery;
use ec2_ebs_report::models::{InstanceRecord, VolumeRecord};
use std::collections::HashMap;
use std::path::Path;

#[derive(Default)]
pub struct FakeInventory {
    pub running: Vec<String>,
    pub instances: HashMap<String, InstanceRecord>,
    pub volumes: HashMap<String, VolumeRecord>,
}

impl InventoryApi for FakeInventory {
    async fn list_running_instances(&self) -> Result<Vec<String>, CollectError> {
        Ok(self.running.clone())
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceRecord, CollectError> {
        self.instances.get(instance_id).cloned().ok_or_else(|| {
            CollectError::structural(instance_id, "DescribeInstances", "no instance returned")
        })
    }

    async fn describe_volume(&self, volume_id: &str) -> Result<VolumeRecord, CollectError> {
        self.volumes.get(volume_id).cloned().ok_or_else(|| {
            CollectError::structural(volume_id, "DescribeVolumes", "no volume returned")
        })
    }
}

/// Samples keyed by (resource id, metric name, statistic); fetches for
/// (resource id, metric name) pairs listed in `failures` error out.
#[derive(Default)]
pub struct FakeMetrics {
    pub samples: HashMap<(String, String, String), Vec<f64>>,
    pub failures: Vec<(String, String)>,
}

impl FakeMetrics {
    pub fn insert(&mut self, resource_id: &str, metric_name: &str, statistic: &str, values: &[f64]) {
        self.samples.insert(
            (
                resource_id.to_string(),
                metric_name.to_string(),
                statistic.to_string(),
            ),
            values.to_vec(),
        );
    }

    pub fn fail(&mut self, resource_id: &str, metric_name: &str) {
        self.failures
            .push((resource_id.to_string(), metric_name.to_string()));
    }
}

impl MetricsApi for FakeMetrics {
    async fn fetch_samples(&self, query: &MetricQuery) -> Result<Vec<f64>, CollectError> {
        if self
            .failures
            .iter()
            .any(|(r, m)| r == &query.resource_id && m == query.metric_name)
        {
            return Err(CollectError::transient(
                &query.resource_id,
                "GetMetricData",
                "injected failure",
            ));
        }
        Ok(self
            .samples
            .get(&(
                query.resource_id.clone(),
                query.metric_name.to_string(),
                query.statistic.as_str().to_string(),
            ))
            .cloned()
            .unwrap_or_default())
    }
}

pub fn instance(instance_id: &str, name: &str, volume_ids: &[&str]) -> InstanceRecord {
    InstanceRecord {
        instance_id: instance_id.to_string(),
        name: name.to_string(),
        instance_type: "t3.medium".to_string(),
        platform_details: "Linux/UNIX".to_string(),
        ebs_optimized: true,
        root_device_name: "/dev/xvda".to_string(),
        root_device_type: "ebs".to_string(),
        volume_ids: volume_ids.iter().map(|v| v.to_string()).collect(),
    }
}

pub fn volume(volume_id: &str, name: &str) -> VolumeRecord {
    VolumeRecord {
        volume_id: volume_id.to_string(),
        name: name.to_string(),
        volume_type: "gp3".to_string(),
        device: "/dev/xvda".to_string(),
        state: "in-use".to_string(),
        size_gib: 100,
        iops: 3000,
        encrypted: false,
    }
}

pub fn test_config(output_file: &Path) -> RunConfig {
    RunConfig {
        region: "us-east-1".to_string(),
        profile: None,
        input_file: None,
        output_file: output_file.to_path_buf(),
        days_back: 30,
        period_seconds: 300,
        // Fast enough that throttled tests finish promptly under real time.
        calls_per_second: 10_000.0,
    }
}

/// Parse a written CSV into (header, rows) for assertions.
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let contents = std::fs::read_to_string(path).expect("read csv");
    let mut lines = contents.lines();
    let header = match lines.next() {
        Some(h) => h.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };
    let rows = lines
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect();
    (header, rows)
}

/// Cell from a parsed CSV by column name.
pub fn cell<'a>(header: &[String], row: &'a [String], column: &str) -> &'a str {
    let idx = header
        .iter()
        .position(|c| c == column)
        .unwrap_or_else(|| panic!("column {column} not in header {header:?}"));
    &row[idx]
}
