// Metric catalog, query description, and reduction policies.
// CloudWatch returns per-period pre-aggregated samples; everything here turns
// those sample vectors into the scalars that land in the report.

use std::fmt;

pub const EC2_NAMESPACE: &str = "AWS/EC2";
pub const EBS_NAMESPACE: &str = "AWS/EBS";

/// EBS volume metrics report per-60-second totals regardless of query period;
/// dividing by this yields a per-second rate.
const RATE_PERIOD_SECS: f64 = 60.0;

/// Aggregation function applied by the monitoring service within each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Maximum,
    Average,
    Sum,
}

impl Statistic {
    pub fn as_str(self) -> &'static str {
        match self {
            Statistic::Maximum => "Maximum",
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric name and the unit CloudWatch expects it to be queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub unit: &'static str,
}

pub const CPU_METRIC: MetricSpec = MetricSpec {
    name: "CPUUtilization",
    unit: "Percent",
};

/// Volume I/O metrics, queried with both the Maximum and the Sum statistic.
pub const EBS_METRICS: [MetricSpec; 4] = [
    MetricSpec {
        name: "VolumeReadOps",
        unit: "Count",
    },
    MetricSpec {
        name: "VolumeWriteOps",
        unit: "Count",
    },
    MetricSpec {
        name: "VolumeReadBytes",
        unit: "Bytes",
    },
    MetricSpec {
        name: "VolumeWriteBytes",
        unit: "Bytes",
    },
];

/// One monitoring-service sampling request: which resource, which metric,
/// which statistic, over the `[now - days_back, now)` window.
#[derive(Debug, Clone)]
pub struct MetricQuery {
    pub namespace: &'static str,
    pub metric_name: &'static str,
    pub dimension_name: &'static str,
    pub resource_id: String,
    pub statistic: Statistic,
    pub unit: &'static str,
    pub period_seconds: i32,
    pub days_back: u32,
}

impl MetricQuery {
    pub fn ec2(
        instance_id: &str,
        spec: MetricSpec,
        statistic: Statistic,
        period_seconds: i32,
        days_back: u32,
    ) -> Self {
        MetricQuery {
            namespace: EC2_NAMESPACE,
            metric_name: spec.name,
            dimension_name: "InstanceId",
            resource_id: instance_id.to_string(),
            statistic,
            unit: spec.unit,
            period_seconds,
            days_back,
        }
    }

    pub fn ebs(
        volume_id: &str,
        spec: MetricSpec,
        statistic: Statistic,
        period_seconds: i32,
        days_back: u32,
    ) -> Self {
        MetricQuery {
            namespace: EBS_NAMESPACE,
            metric_name: spec.name,
            dimension_name: "VolumeId",
            resource_id: volume_id.to_string(),
            statistic,
            unit: spec.unit,
            period_seconds,
            days_back,
        }
    }
}

/// Normalization divisor for Sum reductions: a 30-day nominal month, so a
/// 60-day window reports half its raw total.
pub fn month_span(days_back: u32) -> f64 {
    days_back as f64 / 30.0
}

/// `x / y`, or 0 when the divisor is zero or the quotient is not finite.
pub fn safe_divide(x: f64, y: f64) -> f64 {
    let quotient = x / y;
    if quotient.is_finite() { quotient } else { 0.0 }
}

pub fn round0(value: f64) -> f64 {
    value.round()
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Maximum of the samples; an empty series reduces to 0, never an error.
pub fn reduce_maximum(samples: &[f64]) -> f64 {
    samples
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, s| match acc {
            Some(m) => Some(m.max(s)),
            None => Some(s),
        })
        .unwrap_or(0.0)
}

/// Arithmetic mean of the samples; empty series reduces to 0.
pub fn reduce_average(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Per-second peak rate: each per-period total divided by 60, rounded to one
/// decimal, then the maximum. Empty series reduces to 0.
pub fn reduce_rate_maximum(samples: &[f64]) -> f64 {
    samples
        .iter()
        .map(|s| round1(s / RATE_PERIOD_SECS))
        .fold(None, |acc: Option<f64>, s| match acc {
            Some(m) => Some(m.max(s)),
            None => Some(s),
        })
        .unwrap_or(0.0)
}

/// Window total normalized to a 30-day month. Empty series reduces to 0.
pub fn reduce_monthly_sum(samples: &[f64], month_span: f64) -> f64 {
    safe_divide(samples.iter().sum(), month_span)
}
