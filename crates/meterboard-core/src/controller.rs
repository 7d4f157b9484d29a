//! Period-switching controller
//!
//! Wires period selection to data loading and chart refresh. Each chart id
//! carries a monotonically increasing request epoch: only the most recently
//! issued request may mutate the registry, so a slow older request can never
//! clobber a newer one. Superseded completions are discarded silently (but
//! observably, via `PeriodOutcome::Superseded` and an event).

use crate::descriptor::{ChartDescriptor, ChartKind};
use crate::error::{CoreError, SetupReport};
use crate::event::{ChartEvent, EventBus};
use crate::period::Period;
use crate::registry::ChartRegistry;
use crate::source::UsageSource;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one period-selection request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodOutcome {
    /// The fetched data was applied to the chart
    Applied,
    /// A newer request was issued while this one was in flight; its result
    /// was discarded and the chart was left untouched
    Superseded,
}

/// Declarative binding for one chart, as embedded in a page manifest
///
/// Mirrors the markup contract: chart id, optional kind (default "line"),
/// inline descriptor data, and an optional meter id enabling period toggles.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartBinding {
    pub chart_id: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    pub data: serde_json::Value,
    #[serde(default)]
    pub meter_id: Option<String>,
}

fn default_kind() -> String {
    "line".to_string()
}

/// Controller wiring period selection to data loading and chart refresh
pub struct UsagePeriodController {
    registry: Arc<ChartRegistry>,
    source: Arc<dyn UsageSource>,
    events: EventBus,
    /// Latest issued request epoch per chart id
    issued: DashMap<String, u64>,
    /// Latest settled (completed, applied or not) epoch per chart id
    settled: DashMap<String, u64>,
}

impl UsagePeriodController {
    pub fn new(registry: Arc<ChartRegistry>, source: Arc<dyn UsageSource>) -> Self {
        Self {
            registry,
            source,
            events: EventBus::default_capacity(),
            issued: DashMap::new(),
            settled: DashMap::new(),
        }
    }

    /// Event bus for subscribing to chart lifecycle events
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    pub fn registry(&self) -> &Arc<ChartRegistry> {
        &self.registry
    }

    /// Whether a request for this chart is still in flight
    pub fn is_loading(&self, chart_id: &str) -> bool {
        let issued = self.issued.get(chart_id).map(|v| *v).unwrap_or(0);
        let settled = self.settled.get(chart_id).map(|v| *v).unwrap_or(0);
        issued > settled
    }

    /// Switch a chart to a new period
    ///
    /// Loads data for the period and applies it, unless a newer selection
    /// for the same chart was issued in the meantime. The loading state is
    /// settled on every completion path, including failures.
    pub async fn select_period(
        &self,
        chart_id: &str,
        meter_id: &str,
        period: Period,
    ) -> Result<PeriodOutcome, CoreError> {
        let epoch = self.next_epoch(chart_id);

        debug!(chart_id, meter_id, period = %period, epoch, "Period selected");
        self.events.publish(ChartEvent::LoadingStarted {
            chart_id: chart_id.to_string(),
            period,
        });

        let fetched = self.source.fetch_usage(meter_id, period).await;

        // The loading indicator comes down regardless of what resolved
        self.settle(chart_id, epoch);

        let descriptor = match fetched {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!(chart_id, meter_id, period = %period, error = %e, "Usage fetch failed");
                self.events.publish(ChartEvent::LoadFailed {
                    chart_id: chart_id.to_string(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        if self.is_stale(chart_id, epoch) {
            debug!(chart_id, period = %period, epoch, "Discarding superseded result");
            self.events.publish(ChartEvent::StaleResultDiscarded {
                chart_id: chart_id.to_string(),
                period,
            });
            return Ok(PeriodOutcome::Superseded);
        }

        match self.registry.update(chart_id, &descriptor) {
            Ok(()) => {
                self.events.publish(ChartEvent::ChartUpdated {
                    chart_id: chart_id.to_string(),
                    period,
                });
                Ok(PeriodOutcome::Applied)
            }
            Err(e) => {
                warn!(chart_id, error = %e, "Failed to apply fetched descriptor");
                self.events.publish(ChartEvent::LoadFailed {
                    chart_id: chart_id.to_string(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Initialize charts from declarative bindings
    ///
    /// A malformed binding fails closed: that chart is skipped and recorded
    /// in the report while the rest of the loop continues.
    pub fn initialize_charts(&self, bindings: &[ChartBinding]) -> SetupReport {
        let mut report = SetupReport::new();

        for binding in bindings {
            match self.initialize_chart(binding) {
                Ok(()) => report.add_initialized(),
                Err(e) => {
                    warn!(chart_id = %binding.chart_id, error = %e, "Skipping chart");
                    report.add_failed(&binding.chart_id, &e);
                }
            }
        }

        info!(
            initialized = report.charts_initialized,
            failed = report.charts_failed,
            "Chart setup complete"
        );
        self.events.publish(ChartEvent::SetupCompleted {
            initialized: report.charts_initialized,
            failed: report.charts_failed,
        });

        report
    }

    fn initialize_chart(&self, binding: &ChartBinding) -> Result<(), CoreError> {
        let kind: ChartKind = binding.kind.parse()?;
        let descriptor: ChartDescriptor = serde_json::from_value(binding.data.clone())
            .map_err(|source| CoreError::DescriptorParse {
                chart_id: binding.chart_id.clone(),
                source,
            })?;

        self.registry.render(&binding.chart_id, kind, &descriptor)
    }

    fn next_epoch(&self, chart_id: &str) -> u64 {
        let mut entry = self.issued.entry(chart_id.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    fn settle(&self, chart_id: &str, epoch: u64) {
        let mut entry = self.settled.entry(chart_id.to_string()).or_insert(0);
        if epoch > *entry {
            *entry = epoch;
        }
    }

    fn is_stale(&self, chart_id: &str, epoch: u64) -> bool {
        let latest = self.issued.get(chart_id).map(|v| *v).unwrap_or(epoch);
        epoch < latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Series;
    use crate::registry::{ChartInstance, ChartOptions, RenderEngine};
    use crate::source::SyntheticUsageSource;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingEngine {
        labels: Arc<Mutex<Option<Vec<String>>>>,
    }

    struct RecordingInstance {
        labels: Arc<Mutex<Option<Vec<String>>>>,
    }

    impl ChartInstance for RecordingInstance {
        fn apply(&mut self, descriptor: &ChartDescriptor) {
            *self.labels.lock() = Some(descriptor.labels.clone());
        }

        fn dispose(&mut self) {
            *self.labels.lock() = None;
        }
    }

    impl RenderEngine for RecordingEngine {
        fn create_chart(
            &self,
            _chart_id: &str,
            _kind: ChartKind,
            descriptor: &ChartDescriptor,
            _options: &ChartOptions,
        ) -> Result<Box<dyn ChartInstance>, CoreError> {
            *self.labels.lock() = Some(descriptor.labels.clone());
            Ok(Box::new(RecordingInstance {
                labels: self.labels.clone(),
            }))
        }
    }

    fn controller() -> (UsagePeriodController, Arc<Mutex<Option<Vec<String>>>>) {
        let engine = RecordingEngine::default();
        let labels = engine.labels.clone();
        let registry = Arc::new(ChartRegistry::with_defaults(Arc::new(engine)));
        let source =
            Arc::new(SyntheticUsageSource::with_seed(1).with_latency(Duration::ZERO));
        (UsagePeriodController::new(registry, source), labels)
    }

    fn binding(chart_id: &str, kind: &str, data: serde_json::Value) -> ChartBinding {
        ChartBinding {
            chart_id: chart_id.to_string(),
            kind: kind.to_string(),
            data,
            meter_id: Some("MTR-001".to_string()),
        }
    }

    fn day_data() -> serde_json::Value {
        let descriptor = ChartDescriptor::new(Period::Day.labels())
            .with_series(Series::new("Water Usage", vec![20.0; 24]));
        serde_json::to_value(descriptor).unwrap()
    }

    #[tokio::test]
    async fn test_select_week_applies_week_labels() {
        let (controller, labels) = controller();
        controller
            .initialize_charts(&[binding("usage-chart", "line", day_data())]);

        let outcome = controller
            .select_period("usage-chart", "MTR-001", Period::Week)
            .await
            .unwrap();

        assert_eq!(outcome, PeriodOutcome::Applied);
        assert_eq!(
            labels.lock().clone().unwrap(),
            vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        );
        assert!(!controller.is_loading("usage-chart"));
    }

    #[tokio::test]
    async fn test_select_period_for_unknown_chart_fails_and_settles() {
        let (controller, _) = controller();

        let err = controller
            .select_period("ghost", "MTR-001", Period::Day)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ChartNotFound { .. }));
        assert!(!controller.is_loading("ghost"));
    }

    #[tokio::test]
    async fn test_setup_skips_malformed_bindings() {
        let (controller, _) = controller();

        let bindings = vec![
            binding("good", "line", day_data()),
            binding("bad-kind", "pie", day_data()),
            binding("bad-data", "bar", serde_json::json!({"labels": "nope"})),
            binding(
                "bad-lengths",
                "line",
                serde_json::json!({
                    "labels": ["Mon", "Tue"],
                    "datasets": [{"label": "Daily Average", "data": [1.0]}]
                }),
            ),
        ];

        let report = controller.initialize_charts(&bindings);

        assert_eq!(report.charts_initialized, 1);
        assert_eq!(report.charts_failed, 3);
        assert!(controller.registry().contains("good"));
        assert!(!controller.registry().contains("bad-kind"));
        assert!(!controller.registry().contains("bad-data"));
        assert!(!controller.registry().contains("bad-lengths"));
    }

    #[tokio::test]
    async fn test_events_published_on_update() {
        let (controller, _) = controller();
        let mut rx = controller.event_bus().subscribe();

        controller.initialize_charts(&[binding("c1", "line", day_data())]);
        assert!(matches!(
            rx.recv().await.unwrap(),
            ChartEvent::SetupCompleted { initialized: 1, failed: 0 }
        ));

        controller
            .select_period("c1", "MTR-001", Period::Month)
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            ChartEvent::LoadingStarted { period: Period::Month, .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ChartEvent::ChartUpdated { period: Period::Month, .. }
        ));
    }
}
