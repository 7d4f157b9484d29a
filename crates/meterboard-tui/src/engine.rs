//! Ratatui implementation of the rendering-engine boundary
//!
//! Chart instances and the engine share per-chart state behind a lock: the
//! draw loop iterates live charts each frame, while the registry mutates
//! them through the `ChartInstance` handles. Disposing a handle removes its
//! chart from the surface map, so a disposed chart can never be drawn again.

use meterboard_core::{
    ChartDescriptor, ChartInstance, ChartKind, ChartOptions, ChartRegistry, CoreError,
    RenderEngine,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Drawable state of one live chart
#[derive(Debug, Clone)]
pub struct ChartState {
    pub kind: ChartKind,
    pub descriptor: ChartDescriptor,
}

type SurfaceMap = Arc<RwLock<HashMap<String, ChartState>>>;

/// Rendering engine backed by terminal surfaces
#[derive(Default)]
pub struct TuiRenderEngine {
    surfaces: SurfaceMap,
}

impl TuiRenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one chart's drawable state
    pub fn chart(&self, chart_id: &str) -> Option<ChartState> {
        self.surfaces.read().get(chart_id).cloned()
    }

    /// Snapshot of all live charts, for draw loops iterating every surface
    pub fn charts(&self) -> Vec<(String, ChartState)> {
        self.surfaces
            .read()
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.surfaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.read().is_empty()
    }
}

struct TuiChartInstance {
    chart_id: String,
    surfaces: SurfaceMap,
}

impl ChartInstance for TuiChartInstance {
    fn apply(&mut self, descriptor: &ChartDescriptor) {
        if let Some(state) = self.surfaces.write().get_mut(&self.chart_id) {
            state.descriptor = descriptor.clone();
        }
    }

    fn dispose(&mut self) {
        self.surfaces.write().remove(&self.chart_id);
        debug!(chart_id = %self.chart_id, "Surface released");
    }
}

impl RenderEngine for TuiRenderEngine {
    fn create_chart(
        &self,
        chart_id: &str,
        kind: ChartKind,
        descriptor: &ChartDescriptor,
        _options: &ChartOptions,
    ) -> Result<Box<dyn ChartInstance>, CoreError> {
        self.surfaces.write().insert(
            chart_id.to_string(),
            ChartState {
                kind,
                descriptor: descriptor.clone(),
            },
        );

        Ok(Box::new(TuiChartInstance {
            chart_id: chart_id.to_string(),
            surfaces: self.surfaces.clone(),
        }))
    }
}

/// Build a registry wired to a fresh TUI engine
pub fn tui_registry() -> (Arc<TuiRenderEngine>, Arc<ChartRegistry>) {
    let engine = Arc::new(TuiRenderEngine::new());
    let registry = Arc::new(ChartRegistry::with_defaults(engine.clone()));
    (engine, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterboard_core::{Period, Series};

    fn descriptor(period: Period) -> ChartDescriptor {
        ChartDescriptor::new(period.labels()).with_series(Series::new(
            period.series_label(),
            vec![1.0; period.bucket_count()],
        ))
    }

    #[test]
    fn test_render_then_update_swaps_descriptor() {
        let (engine, registry) = tui_registry();

        registry
            .render("usage-chart", ChartKind::Line, &descriptor(Period::Day))
            .unwrap();
        registry
            .update("usage-chart", &descriptor(Period::Week))
            .unwrap();

        let state = engine.chart("usage-chart").unwrap();
        assert_eq!(state.descriptor.labels, Period::Week.labels());
        assert_eq!(state.kind, ChartKind::Line);
    }

    #[test]
    fn test_rerender_keeps_single_surface() {
        let (engine, registry) = tui_registry();

        registry
            .render("usage-chart", ChartKind::Line, &descriptor(Period::Day))
            .unwrap();
        registry
            .render("usage-chart", ChartKind::Bar, &descriptor(Period::Month))
            .unwrap();

        assert_eq!(engine.len(), 1);
        assert_eq!(engine.chart("usage-chart").unwrap().kind, ChartKind::Bar);
    }

    #[test]
    fn test_dispose_removes_surface() {
        let (engine, registry) = tui_registry();

        registry
            .render("usage-chart", ChartKind::Line, &descriptor(Period::Day))
            .unwrap();
        assert!(registry.dispose("usage-chart"));

        assert!(engine.is_empty());
        assert!(engine.chart("usage-chart").is_none());
    }
}
