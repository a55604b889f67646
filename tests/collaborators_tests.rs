use finchart::api::{IndexMapTickerDirectory, RateSource, TickerDirectory, TickerEntry, conversion_text};
use finchart::{ChartError, ChartResult};

struct FixedRate(f64);

impl RateSource for FixedRate {
    fn rate(&self, _from: &str, _to: &str) -> ChartResult<f64> {
        Ok(self.0)
    }
}

struct Offline;

impl RateSource for Offline {
    fn rate(&self, from: &str, to: &str) -> ChartResult<f64> {
        Err(ChartError::DataUnavailable(format!("no rate for {from}/{to}")))
    }
}

#[test]
fn conversion_placeholder_shows_unit_rate() {
    assert_eq!(
        conversion_text(&FixedRate(1.0832), None, "EUR", "USD"),
        "1 EUR = 1.08 USD"
    );
    assert_eq!(conversion_text(&Offline, None, "EUR", "USD"), "EUR to USD");
}

#[test]
fn conversion_multiplies_amount_by_rate() {
    assert_eq!(
        conversion_text(&FixedRate(1.5), Some(10.0), "GBP", "USD"),
        "Result: 15.00 USD"
    );
}

#[test]
fn conversion_failure_reports_the_error() {
    let text = conversion_text(&Offline, Some(10.0), "GBP", "JPY");
    assert!(text.starts_with("Error: "));
    assert!(text.contains("GBP/JPY"));
}

fn directory() -> IndexMapTickerDirectory {
    let mut directory = IndexMapTickerDirectory::new();
    directory.insert(
        "S&P 500",
        vec![
            TickerEntry::new("Apple Inc.", "AAPL"),
            TickerEntry::new("Microsoft Corporation", "MSFT"),
            TickerEntry::new("Applied Materials", "AMAT"),
        ],
    );
    directory.insert("DAX", vec![TickerEntry::new("SAP SE", "SAP.DE")]);
    directory
}

#[test]
fn search_matches_symbol_or_name_case_insensitively() {
    let directory = directory();

    let labels: Vec<String> = directory
        .search("S&P 500", "appl")
        .iter()
        .map(TickerEntry::label)
        .collect();
    assert_eq!(
        labels,
        vec![
            "AAPL - Apple Inc.".to_owned(),
            "AMAT - Applied Materials".to_owned()
        ]
    );
    assert_eq!(directory.search("S&P 500", "msft").len(), 1);
    assert!(directory.search("S&P 500", "zzz").is_empty());
}

#[test]
fn unknown_composite_has_no_companies() {
    let directory = directory();
    assert!(directory.companies("FTSE 100").is_empty());
    assert_eq!(
        directory.composite_names().collect::<Vec<_>>(),
        vec!["S&P 500", "DAX"]
    );
}
