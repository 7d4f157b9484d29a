//! Chart registry and the rendering-engine boundary
//!
//! The registry owns every live chart instance, keyed by chart id. It is an
//! injected service, never a process-wide global, and it guarantees at most
//! one live instance per id: rendering over an existing id disposes the old
//! instance before the new one is created.

use crate::descriptor::{ChartDescriptor, ChartKind};
use crate::error::CoreError;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Legend placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}

/// Animation easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseInOutQuart,
}

/// Shared presentation options applied to every chart
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub legend_position: LegendPosition,
    /// Unit appended to tooltip and axis tick values
    pub unit_suffix: String,
    pub axis_title: String,
    pub begin_at_zero: bool,
    pub animation_duration: Duration,
    pub easing: Easing,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            legend_position: LegendPosition::Top,
            unit_suffix: "L".to_string(),
            axis_title: "Water Usage (Liters)".to_string(),
            begin_at_zero: true,
            animation_duration: Duration::from_millis(1000),
            easing: Easing::EaseInOutQuart,
        }
    }
}

impl ChartOptions {
    /// Tooltip line for one series value, e.g. "Water Usage: 1,234 L"
    pub fn tooltip_label(&self, series_label: &str, value: f64) -> String {
        if series_label.is_empty() {
            format!("{} {}", format_thousands(value), self.unit_suffix)
        } else {
            format!(
                "{}: {} {}",
                series_label,
                format_thousands(value),
                self.unit_suffix
            )
        }
    }

    /// Axis tick label, e.g. "500 L"
    pub fn axis_tick(&self, value: f64) -> String {
        format!("{} {}", format_thousands(value), self.unit_suffix)
    }
}

/// Group integer digits with thousands separators ("1234" -> "1,234")
fn format_thousands(value: f64) -> String {
    let raw = format!("{}", value.round() as i64);
    let (sign, digits) = raw.strip_prefix('-').map_or(("", raw.as_str()), |d| ("-", d));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// A live, disposable rendering instance bound to one display surface
pub trait ChartInstance: Send + Sync {
    /// Replace the instance's labels and series and invalidate its surface
    fn apply(&mut self, descriptor: &ChartDescriptor);

    /// Release the drawing surface; the instance must not be used afterwards
    fn dispose(&mut self);
}

/// Opaque rendering engine producing chart instances
pub trait RenderEngine: Send + Sync {
    fn create_chart(
        &self,
        chart_id: &str,
        kind: ChartKind,
        descriptor: &ChartDescriptor,
        options: &ChartOptions,
    ) -> Result<Box<dyn ChartInstance>, CoreError>;
}

/// Registry of live chart instances keyed by chart id
///
/// DashMap shards guard each entry, so render/update for distinct ids can
/// proceed in parallel while two flows touching the same id serialize.
pub struct ChartRegistry {
    engine: Arc<dyn RenderEngine>,
    options: ChartOptions,
    charts: DashMap<String, Box<dyn ChartInstance>>,
}

impl ChartRegistry {
    pub fn new(engine: Arc<dyn RenderEngine>, options: ChartOptions) -> Self {
        Self {
            engine,
            options,
            charts: DashMap::new(),
        }
    }

    /// Create with default presentation options
    pub fn with_defaults(engine: Arc<dyn RenderEngine>) -> Self {
        Self::new(engine, ChartOptions::default())
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Create a chart instance for `chart_id`, disposing any existing one
    pub fn render(
        &self,
        chart_id: &str,
        kind: ChartKind,
        descriptor: &ChartDescriptor,
    ) -> Result<(), CoreError> {
        descriptor.validate()?;

        // Dispose-before-recreate: never two live instances for one id
        if let Some((_, mut old)) = self.charts.remove(chart_id) {
            old.dispose();
            debug!(chart_id, "Disposed existing chart instance");
        }

        let instance = self
            .engine
            .create_chart(chart_id, kind, descriptor, &self.options)?;
        self.charts.insert(chart_id.to_string(), instance);

        debug!(chart_id, kind = %kind, labels = descriptor.labels.len(), "Chart rendered");
        Ok(())
    }

    /// Replace the labels and series of an existing chart in place
    pub fn update(&self, chart_id: &str, descriptor: &ChartDescriptor) -> Result<(), CoreError> {
        descriptor.validate()?;

        let Some(mut entry) = self.charts.get_mut(chart_id) else {
            return Err(CoreError::ChartNotFound {
                chart_id: chart_id.to_string(),
            });
        };
        entry.apply(descriptor);

        debug!(chart_id, labels = descriptor.labels.len(), "Chart updated");
        Ok(())
    }

    /// Dispose and remove a chart instance; returns false if absent
    pub fn dispose(&self, chart_id: &str) -> bool {
        match self.charts.remove(chart_id) {
            Some((_, mut instance)) => {
                instance.dispose();
                debug!(chart_id, "Chart disposed");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, chart_id: &str) -> bool {
        self.charts.contains_key(chart_id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Series;
    use parking_lot::Mutex;

    /// Mock engine recording instance lifecycles and applied descriptors
    #[derive(Default)]
    struct MockEngine {
        state: Arc<Mutex<MockState>>,
    }

    #[derive(Default)]
    struct MockState {
        created: usize,
        live: usize,
        last_applied: Option<ChartDescriptor>,
    }

    struct MockInstance {
        state: Arc<Mutex<MockState>>,
        disposed: bool,
    }

    impl ChartInstance for MockInstance {
        fn apply(&mut self, descriptor: &ChartDescriptor) {
            self.state.lock().last_applied = Some(descriptor.clone());
        }

        fn dispose(&mut self) {
            assert!(!self.disposed, "instance disposed twice");
            self.disposed = true;
            self.state.lock().live -= 1;
        }
    }

    impl RenderEngine for MockEngine {
        fn create_chart(
            &self,
            _chart_id: &str,
            _kind: ChartKind,
            descriptor: &ChartDescriptor,
            _options: &ChartOptions,
        ) -> Result<Box<dyn ChartInstance>, CoreError> {
            let mut state = self.state.lock();
            state.created += 1;
            state.live += 1;
            state.last_applied = Some(descriptor.clone());
            Ok(Box::new(MockInstance {
                state: self.state.clone(),
                disposed: false,
            }))
        }
    }

    fn descriptor(labels: &[&str]) -> ChartDescriptor {
        ChartDescriptor::new(labels.iter().map(|l| l.to_string()).collect())
            .with_series(Series::new("Water Usage", vec![1.0; labels.len()]))
    }

    fn registry() -> (ChartRegistry, Arc<Mutex<MockState>>) {
        let engine = MockEngine::default();
        let state = engine.state.clone();
        (ChartRegistry::with_defaults(Arc::new(engine)), state)
    }

    #[test]
    fn test_render_twice_disposes_first() {
        let (registry, state) = registry();
        let d = descriptor(&["Mon", "Tue"]);

        registry.render("c1", ChartKind::Line, &d).unwrap();
        registry.render("c1", ChartKind::Line, &d).unwrap();

        let state = state.lock();
        assert_eq!(state.created, 2);
        assert_eq!(state.live, 1, "second render must dispose the first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_absent_id_is_not_found() {
        let (registry, _) = registry();
        let err = registry.update("nope", &descriptor(&["Mon"])).unwrap_err();
        assert!(matches!(err, CoreError::ChartNotFound { chart_id } if chart_id == "nope"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_replaces_labels() {
        let (registry, state) = registry();
        let d1 = descriptor(&["0:00", "1:00"]);
        let d2 = descriptor(&["Mon", "Tue"]);

        registry.render("c1", ChartKind::Line, &d1).unwrap();
        registry.update("c1", &d2).unwrap();

        let applied = state.lock().last_applied.clone().unwrap();
        assert_eq!(applied.labels, d2.labels);
    }

    #[test]
    fn test_render_rejects_invalid_descriptor() {
        let (registry, state) = registry();
        let mut bad = descriptor(&["Mon", "Tue"]);
        bad.series[0].values.pop();

        assert!(registry.render("c1", ChartKind::Bar, &bad).is_err());
        assert_eq!(state.lock().created, 0);
    }

    #[test]
    fn test_dispose_removes_instance() {
        let (registry, state) = registry();
        registry
            .render("c1", ChartKind::Line, &descriptor(&["Jan"]))
            .unwrap();

        assert!(registry.dispose("c1"));
        assert!(!registry.dispose("c1"));
        assert_eq!(state.lock().live, 0);
    }

    #[test]
    fn test_tooltip_and_tick_formatting() {
        let options = ChartOptions::default();
        assert_eq!(
            options.tooltip_label("Monthly Usage", 1234.0),
            "Monthly Usage: 1,234 L"
        );
        assert_eq!(options.tooltip_label("", 42.0), "42 L");
        assert_eq!(options.axis_tick(1500000.0), "1,500,000 L");
        assert_eq!(options.axis_tick(500.0), "500 L");
    }
}
