use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, PixelRange, TimeSeries};
use crate::error::{ChartError, ChartResult};

/// Tuning controls for value-domain fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScaleTuning {
    /// Fraction of `max - min` added below and above the data.
    pub padding_ratio: f64,
    /// Half-span used when every value is identical, as a fraction of `|value|`.
    pub flat_padding_ratio: f64,
    /// Lower bound for the flat half-span (covers an all-zero series).
    pub flat_padding_min: f64,
}

impl Default for ValueScaleTuning {
    fn default() -> Self {
        Self {
            padding_ratio: 0.01,
            flat_padding_ratio: 0.01,
            flat_padding_min: 1.0,
        }
    }
}

impl ValueScaleTuning {
    fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("padding_ratio", self.padding_ratio),
            ("flat_padding_ratio", self.flat_padding_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "value scale `{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.flat_padding_min.is_finite() || self.flat_padding_min <= 0.0 {
            return Err(ChartError::InvalidData(
                "value scale flat padding minimum must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Vertical value axis mapped to an inverted Y pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    data_min: f64,
    data_max: f64,
    linear: LinearScale,
}

impl ValueScale {
    pub fn from_range(data_min: f64, data_max: f64) -> ChartResult<Self> {
        Self::from_range_tuned(data_min, data_max, ValueScaleTuning::default())
    }

    pub fn from_range_tuned(
        data_min: f64,
        data_max: f64,
        tuning: ValueScaleTuning,
    ) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        if !data_min.is_finite() || !data_max.is_finite() {
            return Err(ChartError::InvalidData(
                "value range must be finite".to_owned(),
            ));
        }
        let (data_min, data_max) = if data_min <= data_max {
            (data_min, data_max)
        } else {
            (data_max, data_min)
        };

        let range = data_max - data_min;
        let linear = if range > 0.0 {
            let pad = range * tuning.padding_ratio;
            LinearScale::new(data_min - pad, data_max + pad)?
        } else {
            let pad = (data_min.abs() * tuning.flat_padding_ratio).max(tuning.flat_padding_min);
            LinearScale::new(data_min - pad, data_max + pad)?
        };

        Ok(Self {
            data_min,
            data_max,
            linear,
        })
    }

    pub fn from_series(series: &TimeSeries) -> ChartResult<Self> {
        let (min, max) = series.value_range();
        Self::from_range(min, max)
    }

    /// Padded domain actually mapped to pixels (the visible y-limits).
    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn data_range(self) -> (f64, f64) {
        (self.data_min, self.data_max)
    }

    /// `max - min` of the data, used to pick the tick format.
    #[must_use]
    pub fn data_span(self) -> f64 {
        self.data_max - self.data_min
    }

    #[must_use]
    pub fn visible_span(self) -> f64 {
        self.linear.span()
    }

    pub fn value_to_pixel(self, value: f64, range: PixelRange) -> ChartResult<f64> {
        self.linear.domain_to_pixel(value, range)
    }

    pub fn pixel_to_value(self, pixel: f64, range: PixelRange) -> ChartResult<f64> {
        self.linear.pixel_to_domain(pixel, range)
    }
}
