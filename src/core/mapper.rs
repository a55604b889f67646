use chrono::NaiveDate;

use crate::core::aligner::AlignedSeries;
use crate::core::{
    DateScale, PixelRange, PlotArea, SnappedPoint, TimeSeries, TimeSeriesPoint, ValueScale,
};
use crate::error::{ChartError, ChartResult};

/// Which vertical axis a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueAxis {
    Primary,
    /// Independent right-hand axis of the composite overlay.
    Composite,
}

/// Bidirectional pixel/domain mapping for one chart layout.
///
/// Rebuilt whenever the series or the plot area change; it never mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    plot: PlotArea,
    date_scale: DateScale,
    value_scale: ValueScale,
    composite_scale: Option<ValueScale>,
    primary: TimeSeries,
    ordinals: Vec<i32>,
}

impl CoordinateMapper {
    pub fn new(plot: PlotArea, series: &AlignedSeries) -> ChartResult<Self> {
        let date_scale = DateScale::from_series(&series.primary)?;
        let value_scale = ValueScale::from_series(&series.primary)?;
        let composite_scale = series
            .composite
            .as_ref()
            .map(ValueScale::from_series)
            .transpose()?;
        Ok(Self {
            plot,
            date_scale,
            value_scale,
            composite_scale,
            ordinals: series.primary.ordinals(),
            primary: series.primary.clone(),
        })
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    #[must_use]
    pub fn date_scale(&self) -> DateScale {
        self.date_scale
    }

    #[must_use]
    pub fn value_scale(&self) -> ValueScale {
        self.value_scale
    }

    #[must_use]
    pub fn composite_scale(&self) -> Option<ValueScale> {
        self.composite_scale
    }

    #[must_use]
    pub fn primary(&self) -> &TimeSeries {
        &self.primary
    }

    /// `isInsidePlotArea` predicate of the render surface.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.plot.contains(x, y)
    }

    fn x_range(&self) -> ChartResult<PixelRange> {
        PixelRange::new(self.plot.left, self.plot.right())
    }

    fn y_range(&self) -> ChartResult<PixelRange> {
        PixelRange::new(self.plot.bottom(), self.plot.top)
    }

    fn scale_for(&self, axis: ValueAxis) -> ChartResult<ValueScale> {
        match axis {
            ValueAxis::Primary => Ok(self.value_scale),
            ValueAxis::Composite => self.composite_scale.ok_or_else(|| {
                ChartError::InvalidData("chart has no composite axis".to_owned())
            }),
        }
    }

    pub fn ordinal_to_pixel(&self, ordinal: f64) -> ChartResult<f64> {
        self.date_scale.ordinal_to_pixel(ordinal, self.x_range()?)
    }

    pub fn date_to_pixel(&self, date: NaiveDate) -> ChartResult<f64> {
        self.date_scale.date_to_pixel(date, self.x_range()?)
    }

    pub fn value_to_pixel(&self, value: f64) -> ChartResult<f64> {
        self.axis_value_to_pixel(value, ValueAxis::Primary)
    }

    pub fn composite_value_to_pixel(&self, value: f64) -> ChartResult<f64> {
        self.axis_value_to_pixel(value, ValueAxis::Composite)
    }

    pub fn axis_value_to_pixel(&self, value: f64, axis: ValueAxis) -> ChartResult<f64> {
        self.scale_for(axis)?.value_to_pixel(value, self.y_range()?)
    }

    pub fn point_to_pixel(&self, point: TimeSeriesPoint, axis: ValueAxis) -> ChartResult<(f64, f64)> {
        Ok((
            self.date_to_pixel(point.date)?,
            self.axis_value_to_pixel(point.value, axis)?,
        ))
    }

    pub fn pixel_to_ordinal(&self, pixel_x: f64) -> ChartResult<f64> {
        self.date_scale.pixel_to_ordinal(pixel_x, self.x_range()?)
    }

    pub fn pixel_to_date(&self, pixel_x: f64) -> ChartResult<NaiveDate> {
        self.date_scale.pixel_to_date(pixel_x, self.x_range()?)
    }

    pub fn pixel_to_value(&self, pixel_y: f64) -> ChartResult<f64> {
        self.value_scale.pixel_to_value(pixel_y, self.y_range()?)
    }

    /// Index of the primary point closest to `pixel_x`.
    ///
    /// Left binary search for the first ordinal >= the query, then step back
    /// when the previous point is strictly closer (or the search ran off the
    /// end). Exact midpoints resolve to the later point.
    pub fn nearest_index(&self, pixel_x: f64) -> ChartResult<usize> {
        let query = self.pixel_to_ordinal(pixel_x)?;
        Ok(nearest_ordinal_index(&self.ordinals, query))
    }

    pub fn nearest_point(&self, pixel_x: f64) -> ChartResult<SnappedPoint> {
        let index = self.nearest_index(pixel_x)?;
        let point = self.primary.get(index).ok_or_else(|| {
            ChartError::InvalidSelection("nearest index outside the series".to_owned())
        })?;
        Ok(SnappedPoint {
            index,
            date: point.date,
            value: point.value,
        })
    }
}

pub(crate) fn nearest_ordinal_index(ordinals: &[i32], query: f64) -> usize {
    let mut index = ordinals.partition_point(|&ordinal| f64::from(ordinal) < query);
    if index > 0
        && (index == ordinals.len()
            || (query - f64::from(ordinals[index - 1])).abs()
                < (query - f64::from(ordinals[index])).abs())
    {
        index -= 1;
    }
    index
}
