//! finchart: interactive financial time-series charts.
//!
//! Raw provider records are normalized and aligned into a primary series
//! (plus an optional composite benchmark in stock mode), laid out by a
//! coordinate mapper, and drawn as a layered primitive frame. A pointer state
//! machine drives hover inspection and click-and-drag measurement.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartHost, ChartSession, ChartSessionConfig, ChartStyle};
pub use error::{ChartError, ChartResult};
