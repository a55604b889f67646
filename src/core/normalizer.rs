use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::aligner::align;
use crate::core::primitives::round_to_places;
use crate::core::{TimeSeries, TimeSeriesPoint};
use crate::error::{ChartError, ChartResult};

/// Precision of a provider's date strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateGranularity {
    /// `YYYY`
    Year,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM-DD`
    Day,
}

impl fmt::Display for DateGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Year => "YYYY",
            Self::Month => "YYYY-MM",
            Self::Day => "YYYY-MM-DD",
        })
    }
}

impl DateGranularity {
    /// Parses `input` at exactly this granularity; coarser dates land on the
    /// first day of their year or month.
    pub fn parse(self, input: &str) -> ChartResult<NaiveDate> {
        let trimmed = input.trim().trim_end_matches('\0');
        let parse_error = || ChartError::DateParse {
            input: input.to_owned(),
            granularity: self,
        };

        match self {
            Self::Year => {
                if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(parse_error());
                }
                let year: i32 = trimmed.parse().map_err(|_| parse_error())?;
                NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(parse_error)
            }
            Self::Month => {
                if trimmed.len() != 7 {
                    return Err(parse_error());
                }
                NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
                    .map_err(|_| parse_error())
            }
            Self::Day => {
                if trimmed.len() != 10 {
                    return Err(parse_error());
                }
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| parse_error())
            }
        }
    }
}

/// The four raw-record families the data providers emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderShape {
    /// Monthly price-index points (inflation).
    MacroIndex,
    /// Daily OHLCV rows.
    StockDaily,
    /// Daily currency-pair rates.
    CurrencyDaily,
    /// Yearly interest-rate and economic indicator points.
    Indicator,
}

impl ProviderShape {
    #[must_use]
    pub fn granularity(self) -> DateGranularity {
        match self {
            Self::MacroIndex => DateGranularity::Month,
            Self::StockDaily | Self::CurrencyDaily => DateGranularity::Day,
            Self::Indicator => DateGranularity::Year,
        }
    }

    #[must_use]
    pub fn decimal_places(self) -> u32 {
        match self {
            Self::StockDaily | Self::CurrencyDaily => 4,
            Self::MacroIndex | Self::Indicator => 2,
        }
    }
}

/// One provider row. Only `date` and one of `close`/`value` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl RawRecord {
    #[must_use]
    pub fn with_value(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
            value: Some(value),
        }
    }

    #[must_use]
    pub fn ohlcv(
        date: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date: date.into(),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
            value: None,
        }
    }

    /// `close` when present, otherwise `value`.
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        self.close.or(self.value)
    }
}

/// A provider response tagged with its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBatch {
    pub shape: ProviderShape,
    pub records: Vec<RawRecord>,
}

impl RawBatch {
    #[must_use]
    pub fn new(shape: ProviderShape, records: Vec<RawRecord>) -> Self {
        Self { shape, records }
    }

    /// Builds a currency batch from the provider's parallel arrays.
    #[must_use]
    pub fn from_rate_pairs(dates: Vec<String>, rates: Vec<f64>) -> Self {
        if dates.len() != rates.len() {
            warn!(
                dates_len = dates.len(),
                rates_len = rates.len(),
                "currency dates and rates differ in length; extra entries dropped"
            );
        }
        let records = dates
            .into_iter()
            .zip(rates)
            .map(|(date, rate)| RawRecord::with_value(date, rate))
            .collect();
        Self::new(ProviderShape::CurrencyDaily, records)
    }

    pub fn from_json_str(shape: ProviderShape, input: &str) -> ChartResult<Self> {
        let records: Vec<RawRecord> = serde_json::from_str(input).map_err(|e| {
            ChartError::DataUnavailable(format!("failed to parse provider payload: {e}"))
        })?;
        Ok(Self::new(shape, records))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Converts a batch into unordered canonical points.
///
/// Unparsable records are logged and skipped. Fails with
/// [`ChartError::DataUnavailable`] when nothing usable remains.
pub fn normalize(batch: &RawBatch) -> ChartResult<Vec<TimeSeriesPoint>> {
    if batch.records.is_empty() {
        return Err(ChartError::DataUnavailable(
            "provider returned no records".to_owned(),
        ));
    }

    let granularity = batch.shape.granularity();
    let places = batch.shape.decimal_places();
    let mut points = Vec::with_capacity(batch.records.len());
    let mut skipped = 0_usize;

    for record in &batch.records {
        match normalize_record(record, granularity, places) {
            Ok(point) => points.push(point),
            Err(err) => {
                skipped += 1;
                warn!(error = %err, date = %record.date, "skipping raw record");
            }
        }
    }

    debug!(
        shape = ?batch.shape,
        original_count = batch.records.len(),
        normalized_count = points.len(),
        skipped,
        "normalized raw batch"
    );

    if points.is_empty() {
        return Err(ChartError::DataUnavailable(format!(
            "all {} records failed to parse",
            batch.records.len()
        )));
    }
    Ok(points)
}

/// Normalizes and aligns in one step.
pub fn normalize_series(batch: &RawBatch) -> ChartResult<TimeSeries> {
    align(normalize(batch)?)
}

fn normalize_record(
    record: &RawRecord,
    granularity: DateGranularity,
    places: u32,
) -> ChartResult<TimeSeriesPoint> {
    let date = granularity.parse(&record.date)?;
    let raw = record.numeric().ok_or_else(|| {
        ChartError::InvalidData(format!("record `{}` has no close or value", record.date))
    })?;
    let value = round_to_places(raw, places, "record value")?;
    Ok(TimeSeriesPoint::new(date, value))
}

#[cfg(test)]
mod tests {
    use super::DateGranularity;
    use chrono::NaiveDate;

    #[test]
    fn granularity_rejects_mismatched_precision() {
        assert!(DateGranularity::Year.parse("2020-01").is_err());
        assert!(DateGranularity::Month.parse("2020").is_err());
        assert!(DateGranularity::Day.parse("2020-01").is_err());
        assert!(DateGranularity::Month.parse("2020-13").is_err());
    }

    #[test]
    fn granularity_trims_fixed_width_padding() {
        assert_eq!(
            DateGranularity::Year.parse("2019\0").expect("year"),
            NaiveDate::from_ymd_opt(2019, 1, 1).expect("date")
        );
        assert_eq!(
            DateGranularity::Month.parse(" 2019-07 ").expect("month"),
            NaiveDate::from_ymd_opt(2019, 7, 1).expect("date")
        );
    }
}
