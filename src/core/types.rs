use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::date_to_ordinal;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot for axes, title and info strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotInsets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for PlotInsets {
    fn default() -> Self {
        Self {
            left: 72.0,
            right: 64.0,
            top: 64.0,
            bottom: 120.0,
        }
    }
}

/// Pixel rectangle the series are mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> ChartResult<Self> {
        if !left.is_finite() || !top.is_finite() || !width.is_finite() || !height.is_finite() {
            return Err(ChartError::InvalidData(
                "plot area must be finite".to_owned(),
            ));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidData(
                "plot area must have positive width and height".to_owned(),
            ));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    pub fn from_viewport(viewport: Viewport, insets: PlotInsets) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Self::new(
            insets.left,
            insets.top,
            f64::from(viewport.width) - insets.left - insets.right,
            f64::from(viewport.height) - insets.top - insets.bottom,
        )
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Inclusive on all edges so the last point stays reachable.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x.is_finite()
            && y.is_finite()
            && x >= self.left
            && x <= self.right()
            && y >= self.top
            && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimeSeriesPoint {
    #[must_use]
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    #[must_use]
    pub fn ordinal(self) -> i32 {
        date_to_ordinal(self.date)
    }
}

/// Non-empty series, strictly ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Validates an already-canonical sequence.
    pub fn new(points: Vec<TimeSeriesPoint>) -> ChartResult<Self> {
        if points.is_empty() {
            return Err(ChartError::InvalidSelection(
                "series must contain at least one point".to_owned(),
            ));
        }
        if points.iter().any(|point| !point.value.is_finite()) {
            return Err(ChartError::InvalidData(
                "series values must be finite".to_owned(),
            ));
        }
        if points.windows(2).any(|pair| pair[0].date >= pair[1].date) {
            return Err(ChartError::InvalidSelection(
                "series dates must be strictly ascending".to_owned(),
            ));
        }
        Ok(Self { points })
    }

    pub(crate) fn from_canonical(points: Vec<TimeSeriesPoint>) -> Self {
        debug_assert!(!points.is_empty());
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<TimeSeriesPoint> {
        self.points.get(index).copied()
    }

    #[must_use]
    pub fn first(&self) -> TimeSeriesPoint {
        self.points[0]
    }

    #[must_use]
    pub fn last(&self) -> TimeSeriesPoint {
        self.points[self.points.len() - 1]
    }

    /// `(min, max)` over all values.
    #[must_use]
    pub fn value_range(&self) -> (f64, f64) {
        let min = self
            .points
            .iter()
            .map(|point| OrderedFloat(point.value))
            .min()
            .map_or(0.0, |value| value.0);
        let max = self
            .points
            .iter()
            .map(|point| OrderedFloat(point.value))
            .max()
            .map_or(0.0, |value| value.0);
        (min, max)
    }

    #[must_use]
    pub fn ordinals(&self) -> Vec<i32> {
        self.points.iter().map(|point| point.ordinal()).collect()
    }

    /// Points whose date lies in `[start, end]` (either argument order).
    #[must_use]
    pub fn points_between(&self, start: NaiveDate, end: NaiveDate) -> &[TimeSeriesPoint] {
        let (low, high) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let from = self.points.partition_point(|point| point.date < low);
        let to = self.points.partition_point(|point| point.date <= high);
        &self.points[from..to.max(from)]
    }
}

/// Chart kind; drives label precision, composite overlay and title sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChartMode {
    #[default]
    Stock,
    Currency,
    Macro,
}

impl ChartMode {
    /// Decimals used for hover and measurement labels.
    #[must_use]
    pub fn label_precision(self) -> usize {
        match self {
            Self::Currency => 3,
            Self::Stock | Self::Macro => 2,
        }
    }

    #[must_use]
    pub fn has_composite(self) -> bool {
        matches!(self, Self::Stock)
    }

    /// Instrument names vary in length, so stock titles shrink to fit.
    #[must_use]
    pub fn uses_dynamic_title(self) -> bool {
        matches!(self, Self::Stock)
    }
}

/// Primary-series point selected by pointer snapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnappedPoint {
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
}
