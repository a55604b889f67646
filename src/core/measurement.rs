use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{SnappedPoint, TimeSeries};
use crate::error::{ChartError, ChartResult};

/// Sign of a measured change; drives the highlight color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeDirection {
    Increase,
    /// Includes an unchanged value.
    Decrease,
}

/// Result of a drag from `anchor` to `current`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub anchor: SnappedPoint,
    pub current: SnappedPoint,
    pub days_diff: i64,
    pub value_diff: f64,
    /// `None` when the anchor value is zero.
    pub percent_diff: Option<f64>,
    pub direction: ChangeDirection,
}

impl Measurement {
    /// Measures between two snapped points of `series`.
    ///
    /// Needs at least two points in the series; a zero anchor only drops the
    /// percent figure.
    pub fn between(
        series: &TimeSeries,
        anchor: SnappedPoint,
        current: SnappedPoint,
    ) -> ChartResult<Self> {
        if series.len() < 2 {
            return Err(ChartError::InvalidSelection(
                "measuring needs at least two points".to_owned(),
            ));
        }
        if series.get(anchor.index).is_none() || series.get(current.index).is_none() {
            return Err(ChartError::InvalidSelection(
                "measurement endpoints are outside the series".to_owned(),
            ));
        }

        let value_diff = current.value - anchor.value;
        let percent_diff = percent_change(anchor.value, current.value).ok();
        Ok(Self {
            anchor,
            current,
            days_diff: (current.date - anchor.date).num_days().abs(),
            value_diff,
            percent_diff,
            direction: if value_diff > 0.0 {
                ChangeDirection::Increase
            } else {
                ChangeDirection::Decrease
            },
        })
    }

    /// Earlier and later date of the selection.
    #[must_use]
    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        if self.anchor.date <= self.current.date {
            (self.anchor.date, self.current.date)
        } else {
            (self.current.date, self.anchor.date)
        }
    }

    /// Three-line summary shown in the chart corner.
    #[must_use]
    pub fn difference_text(&self) -> String {
        let change = match self.percent_diff {
            Some(percent) => format!("{percent:.2}%"),
            None => "n/a".to_owned(),
        };
        format!(
            "Days: {}\nValue: {:.2}\nChange: {change}",
            self.days_diff, self.value_diff
        )
    }
}

pub fn percent_change(anchor: f64, current: f64) -> ChartResult<f64> {
    if anchor == 0.0 {
        return Err(ChartError::ZeroAnchorValue);
    }
    Ok((current - anchor) / anchor * 100.0)
}
