use tracing::{debug, trace, warn};

use crate::core::{ChartMode, StockSummary, align_pair, align_single, normalize};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionState, PointerEvent};
use crate::render::Renderer;

use super::{ChartSession, ChartSessionConfig, SeriesProvider, SeriesRequest};

pub const COMPOSITE_UNAVAILABLE_MESSAGE: &str = "No valid composite data available";

/// Everything needed to load one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub instrument: String,
    /// Benchmark index drawn on the right axis; stock charts only.
    pub composite: Option<String>,
    pub config: ChartSessionConfig,
}

impl ChartRequest {
    #[must_use]
    pub fn new(instrument: impl Into<String>, config: ChartSessionConfig) -> Self {
        Self {
            instrument: instrument.into(),
            composite: None,
            config,
        }
    }

    #[must_use]
    pub fn with_composite(mut self, composite: impl Into<String>) -> Self {
        self.composite = Some(composite.into());
        self
    }
}

/// Slot holding at most one live chart session.
///
/// Loading a chart replaces the previous one; pointer events arriving with no
/// session are ignored.
pub struct ChartHost<R: Renderer> {
    session: Option<ChartSession<R>>,
    status: Option<String>,
}

impl<R: Renderer> Default for ChartHost<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Renderer> ChartHost<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: None,
            status: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&ChartSession<R>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ChartSession<R>> {
        self.session.as_mut()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Last user-facing status line, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Fetches, normalizes and aligns the requested series, then replaces
    /// the current chart.
    ///
    /// The previous chart is closed even when loading fails. A missing
    /// composite only sets the status line; the primary chart still loads.
    pub fn load<P: SeriesProvider + ?Sized>(
        &mut self,
        provider: &P,
        request: &ChartRequest,
        renderer: R,
    ) -> ChartResult<()> {
        self.close();
        match self.build_session(provider, request, renderer) {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, instrument = %request.instrument, "chart load failed");
                self.status = Some(err.status_message());
                Err(err)
            }
        }
    }

    fn build_session<P: SeriesProvider + ?Sized>(
        &mut self,
        provider: &P,
        request: &ChartRequest,
        renderer: R,
    ) -> ChartResult<ChartSession<R>> {
        let config = request.config.clone();
        let batch = provider.fetch(&SeriesRequest::new(
            request.instrument.clone(),
            config.period,
        ))?;
        let primary = normalize(&batch)?;

        let composite = match (&request.composite, config.mode.has_composite()) {
            (Some(symbol), true) => {
                let fetched = provider
                    .fetch(&SeriesRequest::composite(symbol.clone(), config.period))
                    .and_then(|batch| normalize(&batch));
                match fetched {
                    Ok(points) => Some(points),
                    Err(err) => {
                        warn!(error = %err, composite = %symbol, "composite series unavailable");
                        self.status = Some(COMPOSITE_UNAVAILABLE_MESSAGE.to_owned());
                        None
                    }
                }
            }
            _ => None,
        };

        let series = match composite {
            Some(composite) => align_pair(primary, composite)?,
            None => align_single(primary)?,
        };
        let stock_summary = match config.mode {
            ChartMode::Stock => StockSummary::from_records(&batch.records),
            ChartMode::Currency | ChartMode::Macro => None,
        };

        ChartSession::new(renderer, config, series, stock_summary)
    }

    /// Installs `session`, closing the current one. Returns the old renderer.
    pub fn replace(&mut self, session: ChartSession<R>) -> Option<R> {
        let previous = self.close();
        self.session = Some(session);
        previous
    }

    /// Closes the current chart and returns its released renderer.
    pub fn close(&mut self) -> Option<R> {
        self.status = None;
        let session = self.session.take()?;
        debug!("closing chart");
        Some(session.close())
    }

    /// Forwards a pointer event to the live session.
    ///
    /// Events arriving after teardown are dropped and report `Idle`.
    pub fn dispatch(&mut self, event: PointerEvent) -> InteractionState {
        match self.session.as_mut() {
            Some(session) => session.handle_pointer(event),
            None => {
                trace!(?event, "pointer event after chart teardown ignored");
                InteractionState::Idle
            }
        }
    }

    pub fn render(&mut self) -> ChartResult<()> {
        match self.session.as_mut() {
            Some(session) => session.render(),
            None => Err(ChartError::RenderSurfaceDestroyed),
        }
    }
}
