use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Requested chart span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
    #[serde(rename = "20Y")]
    TwentyYears,
    #[serde(rename = "30Y")]
    ThirtyYears,
    #[serde(rename = "40Y")]
    FortyYears,
    #[serde(rename = "Max")]
    Max,
}

/// Date label style on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XLabelGranularity {
    /// `%Y`
    Year,
    /// `%b`
    Month,
    /// `%b %d`
    MonthDay,
}

impl Period {
    pub const ALL: [Period; 10] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::YearToDate,
        Period::OneYear,
        Period::FiveYears,
        Period::TenYears,
        Period::TwentyYears,
        Period::ThirtyYears,
        Period::FortyYears,
        Period::Max,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::YearToDate => "YTD",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::TenYears => "10Y",
            Self::TwentyYears => "20Y",
            Self::ThirtyYears => "30Y",
            Self::FortyYears => "40Y",
            Self::Max => "Max",
        }
    }

    #[must_use]
    pub fn is_multi_year(self) -> bool {
        matches!(
            self,
            Self::FiveYears
                | Self::TenYears
                | Self::TwentyYears
                | Self::ThirtyYears
                | Self::FortyYears
                | Self::Max
        )
    }

    #[must_use]
    pub fn x_label_granularity(self) -> XLabelGranularity {
        match self {
            _ if self.is_multi_year() => XLabelGranularity::Year,
            Self::YearToDate | Self::OneYear => XLabelGranularity::Month,
            _ => XLabelGranularity::MonthDay,
        }
    }

    /// Period code understood by the composite-index provider.
    #[must_use]
    pub fn composite_code(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::YearToDate => "ytd",
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::TwentyYears => "20y",
            Self::ThirtyYears => "30y",
            Self::FortyYears => "40y",
            Self::Max => "max",
        }
    }

    /// `(start, end)` request bounds for yearly/monthly macro providers.
    ///
    /// Five-year requests end at the last complete month (`YYYY-MM`); the
    /// longer spans end at the current year. Short spans have no macro
    /// resolution and fall back to five years.
    #[must_use]
    pub fn macro_year_range(self, today: NaiveDate) -> (String, String) {
        let year = today.year();
        let years_back = match self {
            Self::TenYears => 10,
            Self::TwentyYears => 20,
            Self::ThirtyYears => 30,
            Self::FortyYears => 40,
            Self::Max => 100,
            Self::FiveYears => {
                let last_month = today.with_day(1).unwrap_or(today) - Duration::days(1);
                return (
                    (year - 5).to_string(),
                    last_month.format("%Y-%m").to_string(),
                );
            }
            _ => 5,
        };
        ((year - years_back).to_string(), year.to_string())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = ChartError;

    fn from_str(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|period| period.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ChartError::InvalidSelection(format!("unknown period `{input}`")))
    }
}
