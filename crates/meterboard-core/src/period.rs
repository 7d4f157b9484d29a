//! Time-granularity periods driving label generation and data ranges

use crate::descriptor::{Rgba, SeriesStyle};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Time-granularity selector for usage charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn all() -> &'static [Period] {
        &[Period::Day, Period::Week, Period::Month]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Number of buckets this period is divided into
    pub fn bucket_count(&self) -> usize {
        match self {
            Self::Day => 24,
            Self::Week => 7,
            Self::Month => 12,
        }
    }

    /// Ordered category labels: hourly "H:00", Mon..Sun, Jan..Dec
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Day => (0..24).map(|h| format!("{}:00", h)).collect(),
            Self::Week => WEEKDAYS.iter().map(|d| d.to_string()).collect(),
            Self::Month => MONTHS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Half-open range of synthetic usage values for this period (liters)
    pub fn synthetic_range(&self) -> Range<u32> {
        match self {
            Self::Day => 10..60,
            Self::Week => 50..150,
            Self::Month => 500..1500,
        }
    }

    /// Display label of the series produced for this period
    pub fn series_label(&self) -> &'static str {
        match self {
            Self::Day => "Water Usage",
            Self::Week => "Daily Average",
            Self::Month => "Monthly Usage",
        }
    }

    /// Default styling for this period's series
    pub fn default_style(&self) -> SeriesStyle {
        let (background, border) = match self {
            Self::Day => (Rgba::new(54, 162, 235, 0.2), Rgba::new(54, 162, 235, 1.0)),
            Self::Week => (Rgba::new(75, 192, 192, 0.2), Rgba::new(75, 192, 192, 1.0)),
            Self::Month => (
                Rgba::new(153, 102, 255, 0.2),
                Rgba::new(153, 102, 255, 1.0),
            ),
        };
        SeriesStyle {
            background,
            border,
            ..SeriesStyle::default()
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(CoreError::UnknownPeriod {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
