use chrono::NaiveDate;

use crate::core::primitives::{date_to_ordinal, ordinal_to_date};
use crate::core::{LinearScale, PixelRange, TimeSeries};
use crate::error::ChartResult;

/// Days added on each side when the series covers a single date.
const SINGLE_DATE_HALF_SPAN_DAYS: f64 = 1.0;

/// Horizontal date axis over ordinal day numbers.
///
/// `first`/`last` are the exact series bounds; the mapped domain only differs
/// from them when both are the same day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateScale {
    first: NaiveDate,
    last: NaiveDate,
    linear: LinearScale,
}

impl DateScale {
    pub fn new(first: NaiveDate, last: NaiveDate) -> ChartResult<Self> {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        let start = f64::from(date_to_ordinal(first));
        let end = f64::from(date_to_ordinal(last));
        let linear = if first == last {
            LinearScale::new(
                start - SINGLE_DATE_HALF_SPAN_DAYS,
                end + SINGLE_DATE_HALF_SPAN_DAYS,
            )?
        } else {
            LinearScale::new(start, end)?
        };
        Ok(Self {
            first,
            last,
            linear,
        })
    }

    pub fn from_series(series: &TimeSeries) -> ChartResult<Self> {
        Self::new(series.first().date, series.last().date)
    }

    #[must_use]
    pub fn date_range(self) -> (NaiveDate, NaiveDate) {
        (self.first, self.last)
    }

    /// Mapped ordinal domain.
    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn span_days(self) -> f64 {
        self.linear.span()
    }

    pub fn ordinal_to_pixel(self, ordinal: f64, range: PixelRange) -> ChartResult<f64> {
        self.linear.domain_to_pixel(ordinal, range)
    }

    pub fn date_to_pixel(self, date: NaiveDate, range: PixelRange) -> ChartResult<f64> {
        self.ordinal_to_pixel(f64::from(date_to_ordinal(date)), range)
    }

    pub fn pixel_to_ordinal(self, pixel: f64, range: PixelRange) -> ChartResult<f64> {
        self.linear.pixel_to_domain(pixel, range)
    }

    pub fn pixel_to_date(self, pixel: f64, range: PixelRange) -> ChartResult<NaiveDate> {
        ordinal_to_date(self.pixel_to_ordinal(pixel, range)?)
    }
}
