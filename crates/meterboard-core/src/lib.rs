//! meterboard-core - Core library for meterboard
//!
//! Chart descriptors, the rendering-engine boundary and registry, the
//! period-switching controller, notifications, and form submission.

pub mod controller;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod notify;
pub mod period;
pub mod registry;
pub mod source;
pub mod submit;

pub use controller::{ChartBinding, PeriodOutcome, UsagePeriodController};
pub use descriptor::{ChartDescriptor, ChartKind, Rgba, Series, SeriesStyle};
pub use error::{CoreError, SetupError, SetupReport};
pub use event::{ChartEvent, EventBus};
pub use notify::{BusyGuard, BusyState, Notification, NotificationCenter, Severity};
pub use period::Period;
pub use registry::{ChartInstance, ChartOptions, ChartRegistry, RenderEngine};
pub use source::{SyntheticUsageSource, UsageSource};
pub use submit::{FormClient, FormRequest, Navigation, SubmitOutcome, SubmitResponse};
