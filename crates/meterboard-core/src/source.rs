//! Usage data access seam
//!
//! `UsageSource` is the single boundary between the chart controller and
//! wherever usage data actually comes from. The synthetic implementation
//! stands in for a backend query; swapping in a real client touches nothing
//! but this module.

use crate::descriptor::{ChartDescriptor, Series};
use crate::error::CoreError;
use crate::period::Period;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;

/// Source of historical usage data for one meter and period
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn fetch_usage(
        &self,
        meter_id: &str,
        period: Period,
    ) -> Result<ChartDescriptor, CoreError>;
}

/// Synthetic usage source producing random values in each period's range
///
/// Latency is simulated so frontends exercise their loading states the same
/// way they would against a real backend.
pub struct SyntheticUsageSource {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl SyntheticUsageSource {
    /// Default simulated latency
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Deterministic source for tests and reproducible demos
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: Self::DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn generate(&self, period: Period) -> ChartDescriptor {
        let range = period.synthetic_range();
        let values: Vec<f64> = {
            let mut rng = self.rng.lock();
            (0..period.bucket_count())
                .map(|_| rng.gen_range(range.clone()) as f64)
                .collect()
        };

        ChartDescriptor::new(period.labels()).with_series(
            Series::new(period.series_label(), values).with_style(period.default_style()),
        )
    }
}

impl Default for SyntheticUsageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageSource for SyntheticUsageSource {
    async fn fetch_usage(
        &self,
        meter_id: &str,
        period: Period,
    ) -> Result<ChartDescriptor, CoreError> {
        let descriptor = self.generate(period);

        debug!(
            meter_id,
            period = %period,
            buckets = descriptor.labels.len(),
            "Generated synthetic usage data"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_source(seed: u64) -> SyntheticUsageSource {
        SyntheticUsageSource::with_seed(seed).with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_lengths_and_ranges_per_period() {
        let source = instant_source(7);

        for period in Period::all() {
            let descriptor = source.fetch_usage("MTR-001", *period).await.unwrap();
            descriptor.validate().unwrap();

            assert_eq!(descriptor.labels, period.labels());
            assert_eq!(descriptor.series.len(), 1);
            assert_eq!(descriptor.series[0].label, period.series_label());

            let range = period.synthetic_range();
            for value in &descriptor.series[0].values {
                assert!(
                    *value >= range.start as f64 && *value < range.end as f64,
                    "{} out of {:?} for {}",
                    value,
                    range,
                    period
                );
            }
        }
    }

    #[tokio::test]
    async fn test_seeded_source_is_deterministic() {
        let a = instant_source(42).fetch_usage("m", Period::Week).await.unwrap();
        let b = instant_source(42).fetch_usage("m", Period::Week).await.unwrap();
        assert_eq!(a, b);
    }
}
