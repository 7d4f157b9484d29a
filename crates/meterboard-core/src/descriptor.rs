//! Declarative chart descriptors
//!
//! A descriptor is the renderer-agnostic description of one chart: ordered
//! category labels plus one or more named series aligned to them by index.
//! Descriptors can be embedded as JSON in a page manifest and are validated
//! before they ever reach a rendering engine.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl FromStr for ChartKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            other => Err(CoreError::UnknownChartKind {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RGBA color used for series fills and borders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Presentation styling for one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesStyle {
    pub background: Rgba,
    pub border: Rgba,
    pub border_width: f32,
    /// Curve tension for line charts (0.0 = straight segments)
    pub tension: f32,
    pub fill: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            background: Rgba::new(54, 162, 235, 0.2),
            border: Rgba::new(54, 162, 235, 1.0),
            border_width: 2.0,
            tension: 0.3,
            fill: true,
        }
    }
}

/// One named series of values, aligned by index to the descriptor's labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    #[serde(rename = "data")]
    pub values: Vec<f64>,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
            style: SeriesStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }
}

/// Declarative chart descriptor: labels plus aligned series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub labels: Vec<String>,
    #[serde(rename = "datasets")]
    pub series: Vec<Series>,
}

impl ChartDescriptor {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Validate the alignment invariant: every series length equals the
    /// labels length, and at least one series is present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.series.is_empty() {
            return Err(CoreError::EmptyDescriptor);
        }
        for series in &self.series {
            if series.values.len() != self.labels.len() {
                return Err(CoreError::SeriesLengthMismatch {
                    series: series.label.clone(),
                    expected: self.labels.len(),
                    actual: series.values.len(),
                });
            }
        }
        Ok(())
    }
}
