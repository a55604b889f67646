//! Interfaces to the systems around the chart: data providers, exchange
//! rates and the ticker directory.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Period, RawBatch};
use crate::error::ChartResult;

/// Which side of the chart a fetch feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// The charted stock, currency pair or indicator.
    #[default]
    Instrument,
    /// The benchmark index overlaid in stock mode.
    Composite,
}

/// What to fetch: one instrument over one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub instrument: String,
    pub period: Period,
    #[serde(default)]
    pub kind: SeriesKind,
}

impl SeriesRequest {
    #[must_use]
    pub fn new(instrument: impl Into<String>, period: Period) -> Self {
        Self {
            instrument: instrument.into(),
            period,
            kind: SeriesKind::Instrument,
        }
    }

    #[must_use]
    pub fn composite(symbol: impl Into<String>, period: Period) -> Self {
        Self {
            instrument: symbol.into(),
            period,
            kind: SeriesKind::Composite,
        }
    }

    /// Period code for the provider serving this kind of series.
    #[must_use]
    pub fn period_code(&self) -> &'static str {
        match self.kind {
            SeriesKind::Instrument => self.period.code(),
            SeriesKind::Composite => self.period.composite_code(),
        }
    }
}

/// Source of raw historical records.
///
/// Implementations return `ChartError::DataUnavailable` when nothing usable
/// comes back.
pub trait SeriesProvider {
    fn fetch(&self, request: &SeriesRequest) -> ChartResult<RawBatch>;
}

/// Spot exchange rates between currency codes.
pub trait RateSource {
    fn rate(&self, from: &str, to: &str) -> ChartResult<f64>;
}

/// Conversion text for the amount field.
///
/// With no amount this is the `1 EUR = 1.08 USD` placeholder, falling back to
/// `EUR to USD` when the rate is unavailable.
pub fn conversion_text<S: RateSource + ?Sized>(
    source: &S,
    amount: Option<f64>,
    from: &str,
    to: &str,
) -> String {
    match (amount, source.rate(from, to)) {
        (None, Ok(rate)) => format!("1 {from} = {rate:.2} {to}"),
        (None, Err(_)) => format!("{from} to {to}"),
        (Some(amount), Ok(rate)) => format!("Result: {:.2} {to}", amount * rate),
        (Some(_), Err(err)) => format!("Error: {err}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub display_name: String,
    pub symbol: String,
}

impl TickerEntry {
    #[must_use]
    pub fn new(display_name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            symbol: symbol.into(),
        }
    }

    /// `SYMBOL - Company Name`, as listed in the search dropdown.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.symbol, self.display_name)
    }
}

/// Constituents of composite indices.
pub trait TickerDirectory {
    fn companies(&self, composite: &str) -> Vec<TickerEntry>;

    /// Case-insensitive substring match on symbol or name.
    fn search(&self, composite: &str, term: &str) -> Vec<TickerEntry> {
        let term = term.to_lowercase();
        self.companies(composite)
            .into_iter()
            .filter(|entry| {
                entry.symbol.to_lowercase().contains(&term)
                    || entry.display_name.to_lowercase().contains(&term)
            })
            .collect()
    }
}

/// In-memory directory; composites keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMapTickerDirectory {
    composites: IndexMap<String, Vec<TickerEntry>>,
}

impl IndexMapTickerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, composite: impl Into<String>, entries: Vec<TickerEntry>) {
        self.composites.insert(composite.into(), entries);
    }

    pub fn composite_names(&self) -> impl Iterator<Item = &str> {
        self.composites.keys().map(String::as_str)
    }
}

impl TickerDirectory for IndexMapTickerDirectory {
    fn companies(&self, composite: &str) -> Vec<TickerEntry> {
        self.composites.get(composite).cloned().unwrap_or_default()
    }
}
