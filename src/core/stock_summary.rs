use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::RawRecord;
use crate::core::format::format_grouped_integer;

/// Latest-bar figures plus the period extremes, shown under stock charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub period_high: f64,
    pub period_low: f64,
}

impl StockSummary {
    /// Uses the last complete OHLCV row in provider order.
    ///
    /// Returns `None` when no row carries all five fields.
    #[must_use]
    pub fn from_records(records: &[RawRecord]) -> Option<Self> {
        let complete = || {
            records.iter().filter_map(|record| {
                Some((
                    record.open?,
                    record.high?,
                    record.low?,
                    record.close?,
                    record.volume?,
                ))
            })
        };

        let (open, high, low, close, volume) = complete().last()?;
        let period_high = complete().map(|row| OrderedFloat(row.1)).max()?.0;
        let period_low = complete().map(|row| OrderedFloat(row.2)).min()?.0;

        Some(Self {
            open,
            high,
            low,
            close,
            volume,
            period_high,
            period_low,
        })
    }

    /// Two display lines for the info strip.
    #[must_use]
    pub fn lines(&self) -> [String; 2] {
        [
            format!(
                "Open: {:.2}   High: {:.2}   Low: {:.2}   Close: {:.2}",
                self.open, self.high, self.low, self.close
            ),
            format!(
                "Volume: {}   52W High: {:.2}   52W Low: {:.2}",
                format_grouped_integer(self.volume),
                self.period_high,
                self.period_low
            ),
        ]
    }
}
