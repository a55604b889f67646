use tracing::{debug, trace, warn};

use crate::core::{AlignedSeries, CoordinateMapper, Measurement, StockSummary, Viewport};
use crate::error::ChartResult;
use crate::interaction::{InteractionState, OverlayCommand, PointerEvent, ResolvedPointer};
#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;
use crate::render::{RenderFrame, Renderer};

use super::{ChartRenderer, ChartSessionConfig, HoverOverlay, OverlayPrimitives};

/// One interactive chart: chart state, layout, overlays and its renderer.
///
/// Pointer handlers never fail: an error while resolving or applying a
/// transition clears every overlay and returns to `Idle`.
pub struct ChartSession<R: Renderer> {
    renderer: R,
    chart: ChartRenderer,
    state: InteractionState,
}

impl<R: Renderer> ChartSession<R> {
    pub fn new(
        renderer: R,
        config: ChartSessionConfig,
        series: AlignedSeries,
        stock_summary: Option<StockSummary>,
    ) -> ChartResult<Self> {
        let chart = ChartRenderer::new(config, series, stock_summary)?;
        debug!(
            mode = ?chart.config().mode,
            period = %chart.config().period,
            points = chart.primary().len(),
            has_composite = chart.series().composite.is_some(),
            "chart session created"
        );
        Ok(Self {
            renderer,
            chart,
            state: InteractionState::Idle,
        })
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &ChartSessionConfig {
        self.chart.config()
    }

    #[must_use]
    pub fn chart(&self) -> &ChartRenderer {
        &self.chart
    }

    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        self.chart.mapper()
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlayPrimitives {
        self.chart.overlays()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn is_inside_plot_area(&self, x: f64, y: f64) -> bool {
        self.chart.mapper().contains(x, y)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.chart.set_viewport(viewport)?;
        debug!(
            width = viewport.width,
            height = viewport.height,
            "chart session resized"
        );
        Ok(())
    }

    pub fn frame(&self) -> ChartResult<RenderFrame> {
        self.chart.frame()
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.chart.frame()?;
        self.renderer.render(&frame)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> InteractionState {
        self.handle_pointer(PointerEvent::Move { x, y })
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> InteractionState {
        self.handle_pointer(PointerEvent::Down { x, y })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> InteractionState {
        self.handle_pointer(PointerEvent::Up { x, y })
    }

    pub fn pointer_leave(&mut self) -> InteractionState {
        self.handle_pointer(PointerEvent::Leave)
    }

    /// Runs one pointer event through the state machine and updates overlays.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionState {
        if let Err(err) = self.try_handle_pointer(event) {
            warn!(error = %err, ?event, "pointer handling failed; clearing overlays");
            let style = self.chart.config().style;
            self.chart.overlays_mut().reset(&style);
            self.state = InteractionState::Idle;
        }
        self.state
    }

    fn try_handle_pointer(&mut self, event: PointerEvent) -> ChartResult<()> {
        let resolved = self.resolve(event)?;
        let transition = self.state.on_pointer(resolved);
        for command in &transition.commands {
            self.apply(*command)?;
        }
        trace!(from = ?self.state, to = ?transition.next, "interaction transition");
        self.state = transition.next;
        Ok(())
    }

    fn resolve(&self, event: PointerEvent) -> ChartResult<ResolvedPointer> {
        match event.position() {
            Some((x, y)) if self.is_inside_plot_area(x, y) => {
                let hit = self.chart.mapper().nearest_point(x)?;
                Ok(ResolvedPointer::inside(event, hit))
            }
            _ => Ok(ResolvedPointer::outside(event)),
        }
    }

    fn apply(&mut self, command: OverlayCommand) -> ChartResult<()> {
        let style = self.chart.config().style;
        let measurement = match command {
            OverlayCommand::ShowMeasurement { anchor, current } => {
                Some(Measurement::between(self.chart.primary(), anchor, current)?)
            }
            _ => None,
        };

        let overlays = self.chart.overlays_mut();
        match command {
            OverlayCommand::ShowCrosshair { x } => overlays.crosshair_x = Some(x),
            OverlayCommand::HideCrosshair => overlays.crosshair_x = None,
            OverlayCommand::ShowMarker(point) => overlays.marker = Some(point),
            OverlayCommand::HideMarker => overlays.marker = None,
            OverlayCommand::ShowHoverLabel { point, placement } => {
                overlays.hover_label = Some(HoverOverlay { point, placement });
            }
            OverlayCommand::HideHoverLabel => overlays.hover_label = None,
            OverlayCommand::DimSeries => overlays.dim(&style),
            OverlayCommand::RestoreSeries => overlays.restore(&style),
            OverlayCommand::ShowMeasurement { .. } => {
                overlays.dim(&style);
                overlays.measurement = measurement;
            }
            OverlayCommand::ClearMeasurement => overlays.measurement = None,
        }
        Ok(())
    }

    /// Releases the renderer and hands it back; the chart state is dropped.
    pub fn close(mut self) -> R {
        self.renderer.release();
        debug!("chart session closed");
        self.renderer
    }
}

#[cfg(feature = "cairo-backend")]
impl<R: Renderer + CairoContextRenderer> ChartSession<R> {
    /// Draws into a Cairo context owned by the caller, such as a GTK draw
    /// callback.
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()> {
        let frame = self.chart.frame()?;
        self.renderer.render_on_cairo_context(context, &frame)
    }
}
