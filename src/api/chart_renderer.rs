use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::core::{
    AlignedSeries, AreaGeometry, ChangeDirection, ChartMode, CoordinateMapper, Measurement,
    PixelVertex, PlotArea, SnappedPoint, StockSummary, TimeSeries, ValueAxis, ValueTickFormat,
    Viewport, clip_polyline_x, format, project_area, project_points,
};
use crate::core::primitives::round_to_places;
use crate::error::ChartResult;
use crate::interaction::HoverLabelPlacement;
use crate::render::{
    AreaPrimitive, CanvasLayerKind, Color, LinePrimitive, LineStrokeStyle, MarkerPrimitive,
    RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
};

use super::axis_ticks::{
    AXIS_VALUE_MAX_TICKS, AXIS_VALUE_MIN_TICKS, AXIS_VALUE_TARGET_SPACING_PX,
    axis_tick_target_count, date_tick_candidates, nice_value_ticks,
    select_ticks_with_min_spacing,
};
use super::{ChartSessionConfig, ChartStyle};

/// Figures are laid out at 100 dpi.
const PX_PER_PT: f64 = 100.0 / 72.0;
const TICK_LENGTH_PX: f64 = 4.0;
const TICK_LABEL_GAP_PX: f64 = 6.0;
const TITLE_PAD_PX: f64 = 20.0;
const Y_LABEL_OFFSET_PX: f64 = 56.0;
const X_TICK_ROTATION_DEG: f64 = 45.0;
const CAPTION_GAP_PX: f64 = 4.0;
/// Spans narrower than this share of the plot stack both endpoint labels.
const NARROW_SELECTION_RATIO: f64 = 0.1;
/// Vertical step between stacked endpoint labels, as a share of the y range.
const STACKED_LABEL_STEP_RATIO: f64 = 0.05;
const MEASUREMENT_LABEL_DECIMALS: u32 = 3;

/// Hover label state: which point and where the text sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverOverlay {
    pub point: SnappedPoint,
    pub placement: HoverLabelPlacement,
}

/// Mutable overlay state drawn on top of the static chart.
///
/// Everything here is plain data; `ChartRenderer::frame` turns it into
/// primitives using the current mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPrimitives {
    pub crosshair_x: Option<f64>,
    pub marker: Option<SnappedPoint>,
    pub hover_label: Option<HoverOverlay>,
    pub line_alpha: f64,
    pub fill_alpha: f64,
    pub measurement: Option<Measurement>,
}

impl OverlayPrimitives {
    #[must_use]
    pub fn new(style: &ChartStyle) -> Self {
        Self {
            crosshair_x: None,
            marker: None,
            hover_label: None,
            line_alpha: 1.0,
            fill_alpha: style.fill_alpha,
            measurement: None,
        }
    }

    /// Hides every overlay and restores full series opacity.
    pub fn reset(&mut self, style: &ChartStyle) {
        *self = Self::new(style);
    }

    pub fn dim(&mut self, style: &ChartStyle) {
        self.line_alpha = style.dimmed_line_alpha;
        self.fill_alpha = style.dimmed_fill_alpha;
    }

    pub fn restore(&mut self, style: &ChartStyle) {
        self.line_alpha = 1.0;
        self.fill_alpha = style.fill_alpha;
    }

    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.line_alpha < 1.0
    }
}

/// Draws one chart: static layers built once per layout, overlays per frame.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: ChartSessionConfig,
    series: AlignedSeries,
    stock_summary: Option<StockSummary>,
    mapper: CoordinateMapper,
    primary_geometry: AreaGeometry,
    static_frame: RenderFrame,
    overlays: OverlayPrimitives,
}

impl ChartRenderer {
    pub fn new(
        config: ChartSessionConfig,
        mut series: AlignedSeries,
        stock_summary: Option<StockSummary>,
    ) -> ChartResult<Self> {
        config.validate()?;
        if !config.mode.has_composite() && series.composite.is_some() {
            warn!(mode = ?config.mode, "composite series ignored outside stock mode");
            series.composite = None;
        }

        let mapper = CoordinateMapper::new(config.plot_area()?, &series)?;
        let overlays = OverlayPrimitives::new(&config.style);
        let mut renderer = Self {
            config,
            series,
            stock_summary,
            mapper,
            primary_geometry: AreaGeometry {
                line_points: Vec::new(),
                fill_polygon: Vec::new(),
            },
            static_frame: RenderFrame::new(Viewport::new(1, 1)),
            overlays,
        };
        renderer.rebuild_static()?;
        Ok(renderer)
    }

    #[must_use]
    pub fn config(&self) -> &ChartSessionConfig {
        &self.config
    }

    #[must_use]
    pub fn series(&self) -> &AlignedSeries {
        &self.series
    }

    #[must_use]
    pub fn primary(&self) -> &TimeSeries {
        &self.series.primary
    }

    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlayPrimitives {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayPrimitives {
        &mut self.overlays
    }

    /// Relayouts for a new surface size; overlays keep their data points.
    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        let previous = self.config.viewport;
        self.config.viewport = viewport;
        let rebuilt = self
            .config
            .plot_area()
            .and_then(|plot| CoordinateMapper::new(plot, &self.series));
        match rebuilt {
            Ok(mapper) => {
                self.mapper = mapper;
                // Raw pointer x no longer matches the new layout.
                self.overlays.crosshair_x = None;
                self.rebuild_static()
            }
            Err(err) => {
                self.config.viewport = previous;
                Err(err)
            }
        }
    }

    fn rebuild_static(&mut self) -> ChartResult<()> {
        let (data_min, _) = self.series.primary.value_range();
        self.primary_geometry =
            project_area(self.series.primary.points(), &self.mapper, data_min)?;

        let mut frame = RenderFrame::new(self.config.viewport);
        self.push_background(&mut frame);
        self.push_composite(&mut frame)?;
        self.push_axes(&mut frame)?;
        self.push_titles(&mut frame);
        self.static_frame = frame;

        debug!(
            primary_points = self.series.primary.len(),
            composite_points = self.series.composite.as_ref().map_or(0, TimeSeries::len),
            width = self.config.viewport.width,
            height = self.config.viewport.height,
            "rebuilt static chart layers"
        );
        Ok(())
    }

    /// Materializes the static layers plus the current overlay state.
    pub fn frame(&self) -> ChartResult<RenderFrame> {
        let style = &self.config.style;
        let mut frame = self.static_frame.clone();

        if self.primary_geometry.fill_polygon.len() >= 3 {
            frame.push_area(
                CanvasLayerKind::Fill,
                AreaPrimitive::new(
                    self.primary_geometry.fill_polygon.clone(),
                    style.line_color.with_alpha(self.overlays.fill_alpha),
                ),
            );
        }
        push_polyline(
            &mut frame,
            CanvasLayerKind::Series,
            &self.primary_geometry.line_points,
            style.line_width,
            style.line_color.with_alpha(self.overlays.line_alpha),
        );

        if let Some(measurement) = &self.overlays.measurement {
            self.push_measurement(&mut frame, measurement)?;
        }
        self.push_crosshair(&mut frame)?;
        Ok(frame)
    }

    fn plot(&self) -> PlotArea {
        self.mapper.plot_area()
    }

    fn font_px(points: f64) -> f64 {
        points * PX_PER_PT
    }

    fn push_background(&self, frame: &mut RenderFrame) {
        let viewport = self.config.viewport;
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
                self.config.style.background_color,
            ),
        );
    }

    fn push_composite(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        let (Some(composite), Some(scale)) =
            (self.series.composite.as_ref(), self.mapper.composite_scale())
        else {
            return Ok(());
        };
        let style = &self.config.style;
        let plot = self.plot();

        // The composite keeps its own date range; only the primary's x domain is drawn.
        let projected = project_points(composite.points(), &self.mapper, ValueAxis::Composite)?;
        let vertices = clip_polyline_x(&projected, plot.left, plot.right());
        push_polyline(
            frame,
            CanvasLayerKind::Composite,
            &vertices,
            style.composite_line_width,
            style.composite_color,
        );

        frame.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(
                plot.right(),
                plot.top,
                plot.right(),
                plot.bottom(),
                1.0,
                style.composite_color,
            ),
        );
        let (domain_min, domain_max) = scale.domain();
        let tick_format = ValueTickFormat::for_span(scale.data_span());
        self.push_value_ticks(
            frame,
            domain_min,
            domain_max,
            ValueAxis::Composite,
            tick_format,
            style.composite_color,
        )
    }

    fn push_axes(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        let style = &self.config.style;
        let plot = self.plot();

        frame.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(plot.left, plot.top, plot.left, plot.bottom(), 1.0, style.line_color),
        );
        frame.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(
                plot.left,
                plot.bottom(),
                plot.right(),
                plot.bottom(),
                1.0,
                style.line_color,
            ),
        );

        self.push_date_ticks(frame)?;

        let (domain_min, domain_max) = self.mapper.value_scale().domain();
        let tick_format = ValueTickFormat::for_span(self.mapper.value_scale().data_span());
        self.push_value_ticks(
            frame,
            domain_min,
            domain_max,
            ValueAxis::Primary,
            tick_format,
            style.text_color,
        )?;

        if !self.config.y_label.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    self.config.y_label.clone(),
                    plot.left - Y_LABEL_OFFSET_PX,
                    plot.top + plot.height / 2.0,
                    Self::font_px(style.label_font_size_pt),
                    style.line_color,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Bottom)
                .rotated(90.0),
            );
        }
        Ok(())
    }

    fn push_date_ticks(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        let style = &self.config.style;
        let plot = self.plot();
        let granularity = self.config.period.x_label_granularity();
        let (first, last) = self.series.x_domain();

        let candidates = date_tick_candidates(first, last, granularity)
            .into_iter()
            .map(|date| Ok((date, self.mapper.date_to_pixel(date)?)))
            .collect::<ChartResult<Vec<(NaiveDate, f64)>>>()?;
        let ticks = select_ticks_with_min_spacing(candidates, style.min_x_tick_spacing_px);

        for (date, x) in ticks {
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(
                    x,
                    plot.bottom(),
                    x,
                    plot.bottom() + TICK_LENGTH_PX,
                    1.0,
                    style.text_color,
                ),
            );
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    format::format_date_label(date, granularity),
                    x,
                    plot.bottom() + TICK_LENGTH_PX + TICK_LABEL_GAP_PX,
                    Self::font_px(style.tick_font_size_pt),
                    style.text_color,
                    TextHAlign::Right,
                )
                .rotated(X_TICK_ROTATION_DEG),
            );
        }
        Ok(())
    }

    fn push_value_ticks(
        &self,
        frame: &mut RenderFrame,
        domain_min: f64,
        domain_max: f64,
        axis: ValueAxis,
        tick_format: ValueTickFormat,
        color: Color,
    ) -> ChartResult<()> {
        let style = &self.config.style;
        let plot = self.plot();
        let target = axis_tick_target_count(
            plot.height,
            AXIS_VALUE_TARGET_SPACING_PX,
            AXIS_VALUE_MIN_TICKS,
            AXIS_VALUE_MAX_TICKS,
        );

        let candidates = nice_value_ticks(domain_min, domain_max, target)
            .into_iter()
            .map(|value| Ok((value, self.mapper.axis_value_to_pixel(value, axis)?)))
            .collect::<ChartResult<Vec<(f64, f64)>>>()?;
        let ticks = select_ticks_with_min_spacing(candidates, style.min_y_tick_spacing_px);

        let (edge_x, tick_end_x, label_x, h_align) = match axis {
            ValueAxis::Primary => (
                plot.left,
                plot.left - TICK_LENGTH_PX,
                plot.left - TICK_LENGTH_PX - TICK_LABEL_GAP_PX,
                TextHAlign::Right,
            ),
            ValueAxis::Composite => (
                plot.right(),
                plot.right() + TICK_LENGTH_PX,
                plot.right() + TICK_LENGTH_PX + TICK_LABEL_GAP_PX,
                TextHAlign::Left,
            ),
        };

        for (value, y) in ticks {
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(edge_x, y, tick_end_x, y, 1.0, color),
            );
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    tick_format.format(value),
                    label_x,
                    y,
                    Self::font_px(style.tick_font_size_pt),
                    color,
                    h_align,
                )
                .with_v_align(TextVAlign::Middle),
            );
        }
        Ok(())
    }

    fn push_titles(&self, frame: &mut RenderFrame) {
        let style = &self.config.style;
        let plot = self.plot();

        if !self.config.title.is_empty() {
            let title_pt = format::title_font_size(&self.config.title, self.config.mode);
            frame.push_text(
                CanvasLayerKind::Title,
                TextPrimitive::new(
                    self.config.title.clone(),
                    plot.left,
                    plot.top - TITLE_PAD_PX,
                    Self::font_px(f64::from(title_pt)),
                    style.line_color,
                    TextHAlign::Left,
                )
                .with_v_align(TextVAlign::Bottom),
            );
        }

        if self.config.mode != ChartMode::Stock || !style.show_stock_info {
            return;
        }
        let Some(summary) = &self.stock_summary else {
            return;
        };
        let font_px = Self::font_px(style.label_font_size_pt);
        let strip_top = plot.bottom() + self.config.insets.bottom * 0.55;
        for (row, line) in summary.lines().into_iter().enumerate() {
            frame.push_text(
                CanvasLayerKind::Title,
                TextPrimitive::new(
                    line,
                    plot.left + plot.width / 2.0,
                    strip_top + row as f64 * font_px * 1.4,
                    font_px,
                    style.line_color,
                    TextHAlign::Center,
                ),
            );
        }
    }

    fn push_measurement(&self, frame: &mut RenderFrame, measurement: &Measurement) -> ChartResult<()> {
        let style = &self.config.style;
        let plot = self.plot();
        let mode = self.config.mode;
        let color = match measurement.direction {
            ChangeDirection::Increase => style.increase_color,
            ChangeDirection::Decrease => style.decrease_color,
        };

        let (start_date, end_date) = measurement.date_span();
        let start_x = self.mapper.date_to_pixel(start_date)?;
        let end_x = self.mapper.date_to_pixel(end_date)?;
        frame.push_rect(
            CanvasLayerKind::Highlight,
            RectPrimitive::new(
                start_x,
                plot.top,
                end_x - start_x,
                plot.height,
                color.with_alpha(style.highlight_alpha),
            ),
        );

        let selected = self.series.primary.points_between(start_date, end_date);
        let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
            return Ok(());
        };
        let vertices = project_points(selected, &self.mapper, ValueAxis::Primary)?;
        push_polyline(
            frame,
            CanvasLayerKind::Measurement,
            &vertices,
            style.line_width,
            style.line_color,
        );

        let start_value = round_to_places(first.value, MEASUREMENT_LABEL_DECIMALS, "start value")?;
        let end_value = round_to_places(last.value, MEASUREMENT_LABEL_DECIMALS, "end value")?;
        let (domain_min, domain_max) = self.mapper.value_scale().domain();
        let label_step = (domain_max - domain_min) * STACKED_LABEL_STEP_RATIO;
        let (start_label_value, end_label_value) =
            if (end_x - start_x).abs() < plot.width * NARROW_SELECTION_RATIO {
                let stacked = start_value.max(end_value) + label_step;
                (stacked, stacked + label_step)
            } else {
                (start_value, end_value)
            };

        let font_px = Self::font_px(style.label_font_size_pt);
        for (x, value, label_value) in [
            (start_x, start_value, start_label_value),
            (end_x, end_value, end_label_value),
        ] {
            let y = self.mapper.value_to_pixel(value)?;
            let mut marker = MarkerPrimitive::new(x, y, style.marker_radius_px, color);
            marker.border_width = style.marker_border_width;
            frame.push_marker(CanvasLayerKind::Measurement, marker);
            frame.push_text(
                CanvasLayerKind::Measurement,
                TextPrimitive::new(
                    format::format_value_label(value, mode),
                    x,
                    self.mapper.value_to_pixel(label_value)?,
                    font_px,
                    style.text_color,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Bottom)
                .bold(),
            );
        }

        frame.push_text(
            CanvasLayerKind::Measurement,
            TextPrimitive::new(
                format::format_date_range_caption(measurement.anchor.date, measurement.current.date),
                plot.left + plot.width / 2.0,
                plot.top - CAPTION_GAP_PX,
                font_px,
                style.text_color,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Bottom),
        );
        frame.push_text(
            CanvasLayerKind::Measurement,
            TextPrimitive::new(
                measurement.difference_text(),
                plot.left + plot.width * 0.98,
                plot.top - CAPTION_GAP_PX,
                font_px,
                style.text_color,
                TextHAlign::Right,
            )
            .with_v_align(TextVAlign::Bottom),
        );
        Ok(())
    }

    fn push_crosshair(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        let style = &self.config.style;
        let plot = self.plot();
        let mode = self.config.mode;

        if let Some(x) = self.overlays.crosshair_x {
            frame.push_line(
                CanvasLayerKind::Crosshair,
                LinePrimitive::new(
                    x,
                    plot.top,
                    x,
                    plot.bottom(),
                    style.crosshair_width,
                    style.line_color.with_alpha(style.crosshair_alpha),
                )
                .with_stroke_style(LineStrokeStyle::Dashed),
            );
        }

        if let Some(point) = self.overlays.marker {
            let x = self.mapper.date_to_pixel(point.date)?;
            let y = self.mapper.value_to_pixel(point.value)?;
            let mut marker = MarkerPrimitive::new(x, y, style.marker_radius_px, style.line_color);
            marker.border_width = style.marker_border_width;
            frame.push_marker(CanvasLayerKind::Crosshair, marker);
        }

        if let Some(hover) = self.overlays.hover_label {
            let x = self.mapper.date_to_pixel(hover.point.date)?;
            let y = match hover.placement {
                HoverLabelPlacement::Top => plot.top,
                HoverLabelPlacement::AtValue => self.mapper.value_to_pixel(hover.point.value)?,
            };
            frame.push_text(
                CanvasLayerKind::Crosshair,
                TextPrimitive::new(
                    format::format_value_label(hover.point.value, mode),
                    x,
                    y,
                    Self::font_px(style.label_font_size_pt),
                    style.text_color,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Bottom)
                .bold(),
            );
        }
        Ok(())
    }
}

fn push_polyline(
    frame: &mut RenderFrame,
    layer: CanvasLayerKind,
    vertices: &[PixelVertex],
    stroke_width: f64,
    color: Color,
) {
    for pair in vertices.windows(2) {
        frame.push_line(
            layer,
            LinePrimitive::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y, stroke_width, color),
        );
    }
}
