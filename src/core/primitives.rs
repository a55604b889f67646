use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ChartError, ChartResult};

/// Day count since 0001-01-01 (day 1), used as the linear x coordinate.
#[must_use]
pub fn date_to_ordinal(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

/// Rounds a fractional ordinal to the nearest calendar day.
pub fn ordinal_to_date(ordinal: f64) -> ChartResult<NaiveDate> {
    if !ordinal.is_finite() {
        return Err(ChartError::InvalidData("ordinal must be finite".to_owned()));
    }
    let rounded = ordinal.round();
    if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(ChartError::InvalidData(format!(
            "ordinal {ordinal} is outside the calendar range"
        )));
    }
    NaiveDate::from_num_days_from_ce_opt(rounded as i32).ok_or_else(|| {
        ChartError::InvalidData(format!("ordinal {ordinal} is outside the calendar range"))
    })
}

/// Rounds half-to-even on the exact binary value, matching how provider
/// values were historically rounded.
pub fn round_to_places(value: f64, places: u32, field_name: &str) -> ChartResult<f64> {
    if !value.is_finite() {
        return Err(ChartError::InvalidData(format!(
            "{field_name} must be finite"
        )));
    }
    let exact = Decimal::from_f64_retain(value)
        .or_else(|| Decimal::from_f64(value))
        .ok_or_else(|| {
            ChartError::InvalidData(format!("{field_name} cannot be represented as decimal"))
        })?;
    exact
        .round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
        .to_f64()
        .ok_or_else(|| {
            ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
        })
}
