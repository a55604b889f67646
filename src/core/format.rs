//! Text formatting for axis ticks, value labels, titles and captions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{ChartMode, XLabelGranularity};

/// Base point size for titles that shrink with their text.
pub const DYNAMIC_TITLE_BASE_PT: u32 = 15;
/// Point size for titles whose text length is known to fit.
pub const FIXED_TITLE_PT: u32 = 16;
pub const DYNAMIC_TITLE_MAX_CHARS: usize = 37;
pub const DYNAMIC_TITLE_MIN_PT: u32 = 10;

/// Value spans above this use integer tick labels.
pub const INTEGER_TICK_SPAN_THRESHOLD: f64 = 5.0;

const DATE_CAPTION_PATTERN: &str = "%d %b %Y";

/// Tick label style of the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueTickFormat {
    /// Truncated toward zero.
    Integer,
    /// Three significant figures, `%.3g` style.
    Significant3,
}

impl ValueTickFormat {
    /// Picks the style from `max - min` of the visible values.
    #[must_use]
    pub fn for_span(span: f64) -> Self {
        if span > INTEGER_TICK_SPAN_THRESHOLD {
            Self::Integer
        } else {
            Self::Significant3
        }
    }

    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Integer => format_truncated_integer(value),
            Self::Significant3 => format_significant(value, 3),
        }
    }
}

fn format_truncated_integer(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // `as` saturates, which is the intent for out-of-range ticks.
    (value.trunc() as i64).to_string()
}

/// `printf("%.{significant}g")` semantics: trailing zeros removed, exponent
/// form when the decimal exponent is below -4 or at least `significant`.
#[must_use]
pub fn format_significant(value: f64, significant: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let significant = significant.max(1);
    let scientific = format!("{:.*e}", significant - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let significant_i32 = i32::try_from(significant).unwrap_or(i32::MAX);
    if exponent < -4 || exponent >= significant_i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = usize::try_from(significant_i32 - 1 - exponent).unwrap_or(0);
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_owned()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[must_use]
pub fn format_date_label(date: NaiveDate, granularity: XLabelGranularity) -> String {
    let pattern = match granularity {
        XLabelGranularity::Year => "%Y",
        XLabelGranularity::Month => "%b",
        XLabelGranularity::MonthDay => "%b %d",
    };
    date.format(pattern).to_string()
}

/// Hover/measurement label text: 3 decimals for currencies, 2 otherwise.
#[must_use]
pub fn format_value_label(value: f64, mode: ChartMode) -> String {
    format!("{value:.prec$}", prec = mode.label_precision())
}

/// Shrinks 1pt per 2 characters beyond the limit, never below the floor.
#[must_use]
pub fn dynamic_title_font_size(title: &str) -> u32 {
    let len = title.chars().count();
    if len <= DYNAMIC_TITLE_MAX_CHARS {
        return DYNAMIC_TITLE_BASE_PT;
    }
    let shrink = u32::try_from((len - DYNAMIC_TITLE_MAX_CHARS) / 2).unwrap_or(u32::MAX);
    DYNAMIC_TITLE_BASE_PT
        .saturating_sub(shrink)
        .max(DYNAMIC_TITLE_MIN_PT)
}

#[must_use]
pub fn title_font_size(title: &str, mode: ChartMode) -> u32 {
    if mode.uses_dynamic_title() {
        dynamic_title_font_size(title)
    } else {
        FIXED_TITLE_PT
    }
}

/// `DD Mon YYYY - DD Mon YYYY`, in the order given.
#[must_use]
pub fn format_date_range_caption(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} - {}",
        start.format(DATE_CAPTION_PATTERN),
        end.format(DATE_CAPTION_PATTERN)
    )
}

/// Rounds to whole units and groups thousands with commas.
#[must_use]
pub fn format_grouped_integer(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_matches_printf_general_format() {
        assert_eq!(format_significant(1.002, 3), "1");
        assert_eq!(format_significant(1.0015, 3), "1");
        assert_eq!(format_significant(0.998, 3), "0.998");
        assert_eq!(format_significant(105.0, 3), "105");
        assert_eq!(format_significant(2.5, 3), "2.5");
        assert_eq!(format_significant(999.7, 3), "1e+03");
        assert_eq!(format_significant(1234.0, 3), "1.23e+03");
        assert_eq!(format_significant(0.00001234, 3), "1.23e-05");
        assert_eq!(format_significant(-0.0456, 3), "-0.0456");
        assert_eq!(format_significant(0.0, 3), "0");
    }

    #[test]
    fn integer_ticks_truncate_toward_zero() {
        assert_eq!(ValueTickFormat::Integer.format(104.9), "104");
        assert_eq!(ValueTickFormat::Integer.format(-3.7), "-3");
        assert_eq!(ValueTickFormat::Integer.format(-0.2), "0");
    }

    #[test]
    fn grouped_integer_inserts_separators() {
        assert_eq!(format_grouped_integer(0.0), "0");
        assert_eq!(format_grouped_integer(999.4), "999");
        assert_eq!(format_grouped_integer(1_234_567.6), "1,234,568");
        assert_eq!(format_grouped_integer(-12_000.0), "-12,000");
    }

    #[test]
    fn title_shrinks_in_steps_of_two_characters() {
        assert_eq!(dynamic_title_font_size(&"x".repeat(37)), 15);
        assert_eq!(dynamic_title_font_size(&"x".repeat(38)), 15);
        assert_eq!(dynamic_title_font_size(&"x".repeat(39)), 14);
        assert_eq!(dynamic_title_font_size(&"x".repeat(45)), 11);
        assert_eq!(dynamic_title_font_size(&"x".repeat(200)), 10);
    }
}
