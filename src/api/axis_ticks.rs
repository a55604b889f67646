use chrono::{Datelike, Duration, NaiveDate};

use crate::core::XLabelGranularity;

pub(super) const AXIS_VALUE_TARGET_SPACING_PX: f64 = 48.0;
pub(super) const AXIS_VALUE_MIN_TICKS: usize = 2;
pub(super) const AXIS_VALUE_MAX_TICKS: usize = 12;

pub(super) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Candidate x ticks inside `[first, last]` for the label granularity.
///
/// Years tick on January 1st, months on the 1st, day labels on every day;
/// spacing is thinned afterwards in pixel space. Falls back to `first` when
/// no boundary lies inside the range.
pub(super) fn date_tick_candidates(
    first: NaiveDate,
    last: NaiveDate,
    granularity: XLabelGranularity,
) -> Vec<NaiveDate> {
    let mut ticks = Vec::new();
    match granularity {
        XLabelGranularity::Year => {
            for year in first.year()..=last.year() {
                if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
                    if date >= first && date <= last {
                        ticks.push(date);
                    }
                }
            }
        }
        XLabelGranularity::Month => {
            let mut cursor = NaiveDate::from_ymd_opt(first.year(), first.month(), 1);
            while let Some(date) = cursor {
                if date > last {
                    break;
                }
                if date >= first {
                    ticks.push(date);
                }
                cursor = date.checked_add_months(chrono::Months::new(1));
            }
        }
        XLabelGranularity::MonthDay => {
            let mut date = first;
            while date <= last {
                ticks.push(date);
                date += Duration::days(1);
            }
        }
    }

    if ticks.is_empty() {
        ticks.push(first);
    }
    ticks
}

/// Round values (1, 2 or 5 times a power of ten) covering `[min, max]`.
pub(super) fn nice_value_ticks(min: f64, max: f64, target_count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || target_count < 2 {
        return Vec::new();
    }

    let raw_step = (max - min) / (target_count - 1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let residual = raw_step / magnitude;
    let step = magnitude
        * if residual <= 1.0 {
            1.0
        } else if residual <= 2.0 {
            2.0
        } else if residual <= 5.0 {
            5.0
        } else {
            10.0
        };

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .map(|index| index as f64 * step)
        // Snap away float noise such as 0.30000000000000004.
        .map(|value| (value / step).round() * step)
        .collect()
}

/// Greedy thinning by pixel position; the last candidate replaces the last
/// kept tick when there is room for it.
pub(super) fn select_ticks_with_min_spacing<T: Copy>(
    mut ticks: Vec<(T, f64)>,
    min_spacing_px: f64,
) -> Vec<(T, f64)> {
    ticks.sort_by(|left, right| left.1.total_cmp(&right.1));
    if ticks.len() <= 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: Vec<(T, f64)> = Vec::with_capacity(ticks.len());
    for tick in ticks.iter().copied() {
        match selected.last() {
            Some(last) if tick.1 - last.1 < min_spacing_px => {}
            _ => selected.push(tick),
        }
    }

    if let (Some(last_tick), Some(selected_last)) = (ticks.last().copied(), selected.last().copied())
    {
        if selected_last.1 != last_tick.1 && selected.len() >= 2 {
            let penultimate = selected[selected.len() - 2];
            if last_tick.1 - penultimate.1 >= min_spacing_px {
                let last_index = selected.len() - 1;
                selected[last_index] = last_tick;
            }
        }
    }

    selected
}
