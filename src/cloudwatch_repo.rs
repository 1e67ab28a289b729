// CloudWatch metric sampling via aws-sdk-cloudwatch GetMetricData.
// One query per call; the look-back window is evaluated per call, so a long
// run sees slightly different windows between calls (accepted imprecision).

use crate::collector::MetricsApi;
use crate::errors::CollectError;
use crate::metrics::MetricQuery;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Metric, MetricDataQuery, MetricStat, StandardUnit};
use std::time::{Duration, SystemTime};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

pub struct CloudWatchRepo {
    client: Client,
}

impl CloudWatchRepo {
    pub fn new(client: Client) -> Self {
        CloudWatchRepo { client }
    }
}

impl MetricsApi for CloudWatchRepo {
    async fn fetch_samples(&self, query: &MetricQuery) -> Result<Vec<f64>, CollectError> {
        let end = SystemTime::now();
        let start = end - Duration::from_secs(query.days_back as u64 * SECS_PER_DAY);

        let metric = Metric::builder()
            .namespace(query.namespace)
            .metric_name(query.metric_name)
            .dimensions(
                Dimension::builder()
                    .name(query.dimension_name)
                    .value(&query.resource_id)
                    .build(),
            )
            .build();
        let metric_stat = MetricStat::builder()
            .metric(metric)
            .period(query.period_seconds)
            .stat(query.statistic.as_str())
            .unit(StandardUnit::from(query.unit))
            .build();
        let data_query = MetricDataQuery::builder()
            .id("q0")
            .metric_stat(metric_stat)
            .return_data(true)
            .build();

        let response = self
            .client
            .get_metric_data()
            .metric_data_queries(data_query)
            .start_time(DateTime::from(start))
            .end_time(DateTime::from(end))
            .send()
            .await
            .map_err(|e| CollectError::transient(&query.resource_id, "GetMetricData", e))?;

        // A query that matched nothing reduces to 0 downstream, not an error.
        Ok(response
            .metric_data_results()
            .first()
            .map(|result| result.values().to_vec())
            .unwrap_or_default())
    }
}
