use serde::{Deserialize, Serialize};

use crate::core::{ChartMode, Period, PlotArea, PlotInsets, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

pub const SESSION_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Colors, widths and font sizes for one chart.
///
/// Font sizes are in points and converted to pixels at 100 dpi.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub background_color: Color,
    pub line_color: Color,
    pub line_width: f64,
    pub fill_alpha: f64,
    /// Primary line alpha while a click or drag is active.
    pub dimmed_line_alpha: f64,
    pub dimmed_fill_alpha: f64,
    pub composite_color: Color,
    pub composite_line_width: f64,
    pub increase_color: Color,
    pub decrease_color: Color,
    pub highlight_alpha: f64,
    pub crosshair_alpha: f64,
    pub crosshair_width: f64,
    pub marker_radius_px: f64,
    pub marker_border_width: f64,
    pub text_color: Color,
    pub tick_font_size_pt: f64,
    pub label_font_size_pt: f64,
    pub min_x_tick_spacing_px: f64,
    pub min_y_tick_spacing_px: f64,
    pub show_stock_info: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgb8(0x22, 0x22, 0x22),
            line_color: Color::rgb8(0x5c, 0xc4, 0xfc),
            line_width: 2.0,
            fill_alpha: 0.1,
            dimmed_line_alpha: 0.3,
            dimmed_fill_alpha: 0.05,
            composite_color: Color::rgb(1.0, 0.0, 0.0),
            composite_line_width: 2.0,
            increase_color: Color::rgb8(0x00, 0x80, 0x00),
            decrease_color: Color::rgb(1.0, 0.0, 0.0),
            highlight_alpha: 0.2,
            crosshair_alpha: 0.7,
            crosshair_width: 1.0,
            marker_radius_px: 5.5,
            marker_border_width: 1.5,
            text_color: Color::rgb(1.0, 1.0, 1.0),
            tick_font_size_pt: 10.0,
            label_font_size_pt: 10.0,
            min_x_tick_spacing_px: 64.0,
            min_y_tick_spacing_px: 32.0,
            show_stock_info: true,
        }
    }
}

impl ChartStyle {
    pub fn validate(self) -> ChartResult<()> {
        for color in [
            self.background_color,
            self.line_color,
            self.composite_color,
            self.increase_color,
            self.decrease_color,
            self.text_color,
        ] {
            color.validate()?;
        }
        for (name, alpha) in [
            ("fill_alpha", self.fill_alpha),
            ("dimmed_line_alpha", self.dimmed_line_alpha),
            ("dimmed_fill_alpha", self.dimmed_fill_alpha),
            ("highlight_alpha", self.highlight_alpha),
            ("crosshair_alpha", self.crosshair_alpha),
        ] {
            if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and in [0, 1]"
                )));
            }
        }
        for (name, value) in [
            ("line_width", self.line_width),
            ("composite_line_width", self.composite_line_width),
            ("crosshair_width", self.crosshair_width),
            ("marker_radius_px", self.marker_radius_px),
            ("tick_font_size_pt", self.tick_font_size_pt),
            ("label_font_size_pt", self.label_font_size_pt),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("marker_border_width", self.marker_border_width),
            ("min_x_tick_spacing_px", self.min_x_tick_spacing_px),
            ("min_y_tick_spacing_px", self.min_y_tick_spacing_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Serializable setup for one chart session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSessionConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub insets: PlotInsets,
    #[serde(default)]
    pub mode: ChartMode,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub style: ChartStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSessionConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ChartSessionConfig,
}

impl Default for ChartSessionConfig {
    fn default() -> Self {
        Self::new(Viewport::new(1000, 600))
    }
}

impl ChartSessionConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            insets: PlotInsets::default(),
            mode: ChartMode::default(),
            period: Period::default(),
            title: String::new(),
            y_label: String::new(),
            style: ChartStyle::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ChartMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_y_label(mut self, y_label: impl Into<String>) -> Self {
        self.y_label = y_label.into();
        self
    }

    #[must_use]
    pub fn with_insets(mut self, insets: PlotInsets) -> Self {
        self.insets = insets;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Plot rectangle left after insets; fails when nothing remains.
    pub fn plot_area(&self) -> ChartResult<PlotArea> {
        PlotArea::from_viewport(self.viewport, self.insets)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, inset) in [
            ("left", self.insets.left),
            ("right", self.insets.right),
            ("top", self.insets.top),
            ("bottom", self.insets.bottom),
        ] {
            if !inset.is_finite() || inset < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "plot inset `{name}` must be finite and >= 0"
                )));
            }
        }
        self.plot_area()?;
        self.style.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize session config: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSessionConfigJsonContractV1 {
            schema_version: SESSION_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize session config contract v1: {e}"))
        })
    }

    /// Accepts either the bare config or the versioned contract wrapper.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(config) = serde_json::from_str::<ChartSessionConfig>(input) {
            return Ok(config);
        }
        let payload: ChartSessionConfigJsonContractV1 =
            serde_json::from_str(input).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse session config json: {e}"))
            })?;
        if payload.schema_version != SESSION_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported session config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}
