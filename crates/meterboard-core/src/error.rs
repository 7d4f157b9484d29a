//! Error types for meterboard-core
//!
//! Provides a structured error hierarchy with thiserror plus a setup report
//! for graceful degradation during page initialization.

use thiserror::Error;

/// Core error type for meterboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Descriptor Errors
    // ===================
    #[error("Series '{series}' has {actual} values but {expected} labels")]
    SeriesLengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("Chart descriptor has no series")]
    EmptyDescriptor,

    #[error("Unknown chart kind: {value}")]
    UnknownChartKind { value: String },

    #[error("Unknown period: {value}")]
    UnknownPeriod { value: String },

    #[error("Failed to parse descriptor for chart '{chart_id}'")]
    DescriptorParse {
        chart_id: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Registry Errors
    // ===================
    #[error("Chart not found: {chart_id}")]
    ChartNotFound { chart_id: String },

    #[error("Rendering engine error for chart '{chart_id}': {message}")]
    Engine { chart_id: String, message: String },

    // ===================
    // Data Source Errors
    // ===================
    #[error("Failed to fetch usage for meter '{meter_id}': {message}")]
    Fetch { meter_id: String, message: String },

    // ===================
    // Form Submission Errors
    // ===================
    #[error("Request failed")]
    Request {
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned status {status}")]
    Backend { status: u16 },

    #[error("Failed to decode backend response")]
    ResponseDecode {
        #[source]
        source: reqwest::Error,
    },
}

/// Individual error entry collected during chart setup
#[derive(Debug, Clone)]
pub struct SetupError {
    pub chart_id: String,
    pub message: String,
}

impl SetupError {
    pub fn new(chart_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            chart_id: chart_id.into(),
            message: message.into(),
        }
    }
}

/// Report of errors encountered while initializing charts from bindings
///
/// Enables graceful degradation: one malformed binding is skipped and
/// recorded instead of aborting the whole setup loop.
#[derive(Debug, Default)]
pub struct SetupReport {
    pub errors: Vec<SetupError>,
    pub charts_initialized: usize,
    pub charts_failed: usize,
}

impl SetupReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully initialized chart
    pub fn add_initialized(&mut self) {
        self.charts_initialized += 1;
    }

    /// Record a failed chart with its error
    pub fn add_failed(&mut self, chart_id: impl Into<String>, error: &CoreError) {
        self.charts_failed += 1;
        self.errors
            .push(SetupError::new(chart_id, error.to_string()));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: SetupReport) {
        self.errors.extend(other.errors);
        self.charts_initialized += other.charts_initialized;
        self.charts_failed += other.charts_failed;
    }
}
