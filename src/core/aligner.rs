use chrono::NaiveDate;
use tracing::debug;

use crate::core::{TimeSeries, TimeSeriesPoint};
use crate::error::{ChartError, ChartResult};

/// Primary series with an optional composite overlay and the shared x domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub primary: TimeSeries,
    pub composite: Option<TimeSeries>,
}

impl AlignedSeries {
    /// First and last primary date; the composite never widens it.
    #[must_use]
    pub fn x_domain(&self) -> (NaiveDate, NaiveDate) {
        (self.primary.first().date, self.primary.last().date)
    }
}

/// Stable-sorts by date and keeps the first value seen for each date.
pub fn align(mut points: Vec<TimeSeriesPoint>) -> ChartResult<TimeSeries> {
    let original_count = points.len();
    points.retain(|point| point.value.is_finite());
    // `sort_by_key` is stable, so equal dates keep input order.
    points.sort_by_key(|point| point.date);
    points.dedup_by(|later, earlier| later.date == earlier.date);

    debug!(
        original_count,
        canonical_count = points.len(),
        "aligned series"
    );

    if points.is_empty() {
        return Err(ChartError::InvalidSelection(
            "series has no points".to_owned(),
        ));
    }
    Ok(TimeSeries::from_canonical(points))
}

pub fn align_single(points: Vec<TimeSeriesPoint>) -> ChartResult<AlignedSeries> {
    Ok(AlignedSeries {
        primary: align(points)?,
        composite: None,
    })
}

/// Aligns a primary series and its composite benchmark.
pub fn align_pair(
    primary: Vec<TimeSeriesPoint>,
    composite: Vec<TimeSeriesPoint>,
) -> ChartResult<AlignedSeries> {
    if primary.is_empty() {
        return Err(ChartError::InvalidSelection(
            "primary series is empty".to_owned(),
        ));
    }
    if composite.is_empty() {
        return Err(ChartError::InvalidSelection(
            "composite series is empty".to_owned(),
        ));
    }
    Ok(AlignedSeries {
        primary: align(primary)?,
        composite: Some(align(composite)?),
    })
}
