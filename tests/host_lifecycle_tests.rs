use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use finchart::api::{
    COMPOSITE_UNAVAILABLE_MESSAGE, ChartHost, ChartRequest, ChartSession, SeriesKind,
    SeriesProvider, SeriesRequest,
};
use finchart::core::{ChartMode, Period, ProviderShape, RawBatch, RawRecord, Viewport};
use finchart::interaction::{InteractionState, PointerEvent};
use finchart::render::{NullRenderer, RenderFrame, Renderer};
use finchart::{ChartError, ChartResult, ChartSessionConfig};

#[derive(Default)]
struct FakeProvider {
    batches: HashMap<String, RawBatch>,
    requests: Cell<usize>,
    seen: RefCell<Vec<SeriesRequest>>,
}

impl FakeProvider {
    fn with(mut self, instrument: &str, batch: RawBatch) -> Self {
        self.batches.insert(instrument.to_owned(), batch);
        self
    }
}

impl SeriesProvider for FakeProvider {
    fn fetch(&self, request: &SeriesRequest) -> ChartResult<RawBatch> {
        self.requests.set(self.requests.get() + 1);
        self.seen.borrow_mut().push(request.clone());
        self.batches.get(&request.instrument).cloned().ok_or_else(|| {
            ChartError::DataUnavailable(format!("unknown instrument {}", request.instrument))
        })
    }
}

#[derive(Default)]
struct TrackingRenderer {
    releases: Rc<Cell<usize>>,
    renders: usize,
}

impl Renderer for TrackingRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.renders += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

fn stock_batch() -> RawBatch {
    RawBatch::new(
        ProviderShape::StockDaily,
        vec![
            RawRecord::ohlcv("2023-01-02", 99.0, 101.0, 98.0, 100.0, 1_000.0),
            RawRecord::ohlcv("2023-01-03", 100.0, 106.0, 99.5, 105.0, 2_000.0),
            RawRecord::ohlcv("2023-01-04", 105.0, 105.5, 94.0, 95.0, 3_000.0),
        ],
    )
}

fn index_batch() -> RawBatch {
    RawBatch::new(
        ProviderShape::StockDaily,
        vec![
            RawRecord::with_value("2022-12-30", 3_800.0),
            RawRecord::with_value("2023-01-03", 3_850.0),
        ],
    )
}

fn stock_request() -> ChartRequest {
    let config = ChartSessionConfig::new(Viewport::new(1000, 600))
        .with_mode(ChartMode::Stock)
        .with_period(Period::OneMonth)
        .with_title("ACME");
    ChartRequest::new("ACME", config).with_composite("^GSPC")
}

#[test]
fn load_builds_session_with_composite_and_stock_summary() {
    let provider = FakeProvider::default()
        .with("ACME", stock_batch())
        .with("^GSPC", index_batch());
    let mut host = ChartHost::new();

    host.load(&provider, &stock_request(), NullRenderer::default())
        .expect("load");

    assert!(host.is_active());
    assert_eq!(host.status_message(), None);
    assert_eq!(provider.requests.get(), 2);
    let session = host.session().expect("session");
    assert_eq!(session.chart().primary().len(), 3);
    assert_eq!(
        session
            .chart()
            .series()
            .composite
            .as_ref()
            .expect("composite")
            .len(),
        2
    );

    let frame = session.frame().expect("frame");
    assert!(
        frame
            .texts()
            .any(|text| text.text.starts_with("Open: 105.00   High: 105.50"))
    );
    assert!(
        frame
            .texts()
            .any(|text| text.text.contains("52W High: 106.00   52W Low: 94.00"))
    );
}

#[test]
fn missing_composite_still_loads_primary_chart() {
    let provider = FakeProvider::default().with("ACME", stock_batch());
    let mut host = ChartHost::new();

    host.load(&provider, &stock_request(), NullRenderer::default())
        .expect("primary chart loads");

    assert_eq!(host.status_message(), Some(COMPOSITE_UNAVAILABLE_MESSAGE));
    let session = host.session().expect("session");
    assert!(session.chart().series().composite.is_none());
}

#[test]
fn composite_is_not_fetched_outside_stock_mode() {
    let provider = FakeProvider::default()
        .with(
            "EURUSD",
            RawBatch::from_rate_pairs(
                vec!["2023-01-02".to_owned(), "2023-01-03".to_owned()],
                vec![1.0712, 1.0655],
            ),
        )
        .with("^GSPC", index_batch());
    let config = ChartSessionConfig::new(Viewport::new(1000, 600)).with_mode(ChartMode::Currency);
    let request = ChartRequest::new("EURUSD", config).with_composite("^GSPC");
    let mut host = ChartHost::new();

    host.load(&provider, &request, NullRenderer::default())
        .expect("load");

    assert_eq!(provider.requests.get(), 1);
    assert!(
        host.session()
            .expect("session")
            .chart()
            .series()
            .composite
            .is_none()
    );
}

#[test]
fn empty_provider_response_sets_status_and_leaves_no_chart() {
    let provider =
        FakeProvider::default().with("ACME", RawBatch::new(ProviderShape::StockDaily, Vec::new()));
    let mut host: ChartHost<NullRenderer> = ChartHost::new();

    let err = host
        .load(&provider, &stock_request(), NullRenderer::default())
        .expect_err("no data");

    assert!(matches!(err, ChartError::DataUnavailable(_)));
    assert!(!host.is_active());
    assert!(
        host.status_message()
            .expect("status")
            .starts_with("No valid historical data available")
    );
}

#[test]
fn failed_load_closes_the_previous_chart() {
    let releases = Rc::new(Cell::new(0));
    let provider = FakeProvider::default().with("ACME", stock_batch());
    let mut host = ChartHost::new();

    host.load(
        &provider,
        &stock_request(),
        TrackingRenderer {
            releases: Rc::clone(&releases),
            renders: 0,
        },
    )
    .expect("first load");

    let missing = ChartRequest::new("NOPE", stock_request().config);
    host.load(&provider, &missing, TrackingRenderer::default())
        .expect_err("unknown instrument");

    assert_eq!(releases.get(), 1);
    assert!(!host.is_active());
}

#[test]
fn replace_and_close_release_renderers_once() {
    let releases = Rc::new(Cell::new(0));
    let provider = FakeProvider::default().with("ACME", stock_batch());
    let mut host = ChartHost::new();
    host.load(
        &provider,
        &stock_request(),
        TrackingRenderer {
            releases: Rc::clone(&releases),
            renders: 0,
        },
    )
    .expect("load");
    host.render().expect("render");

    let series = host.session().expect("session").chart().series().clone();
    let next = ChartSession::new(
        TrackingRenderer {
            releases: Rc::clone(&releases),
            renders: 0,
        },
        ChartSessionConfig::default(),
        series,
        None,
    )
    .expect("next session");

    let previous = host.replace(next).expect("previous renderer");
    assert_eq!(previous.renders, 1);
    assert_eq!(releases.get(), 1);

    host.close().expect("closed renderer");
    assert_eq!(releases.get(), 2);
    assert!(host.close().is_none());
    assert_eq!(releases.get(), 2);
}

#[test]
fn events_after_teardown_are_ignored() {
    let provider = FakeProvider::default().with("ACME", stock_batch());
    let mut host = ChartHost::new();
    host.load(&provider, &stock_request(), NullRenderer::default())
        .expect("load");
    host.close().expect("closed renderer");

    assert_eq!(
        host.dispatch(PointerEvent::Down { x: 500.0, y: 300.0 }),
        InteractionState::Idle
    );
    assert_eq!(
        host.dispatch(PointerEvent::Move { x: 600.0, y: 300.0 }),
        InteractionState::Idle
    );
    assert_eq!(host.dispatch(PointerEvent::Leave), InteractionState::Idle);
    assert!(!host.is_active());

    let err = host.render().expect_err("no chart to render");
    assert_eq!(err, ChartError::RenderSurfaceDestroyed);
    assert!(err.is_recoverable());
}

#[test]
fn composite_fetch_is_tagged_for_the_index_provider() {
    let provider = FakeProvider::default()
        .with("ACME", stock_batch())
        .with("^GSPC", index_batch());
    let mut host = ChartHost::new();
    host.load(&provider, &stock_request(), NullRenderer::default())
        .expect("load");

    let seen = provider.seen.borrow();
    let fetched: Vec<(&str, SeriesKind, &str)> = seen
        .iter()
        .map(|request| (request.instrument.as_str(), request.kind, request.period_code()))
        .collect();
    assert_eq!(
        fetched,
        vec![
            ("ACME", SeriesKind::Instrument, "1M"),
            ("^GSPC", SeriesKind::Composite, "1mo"),
        ]
    );
}

#[test]
fn dispatch_drives_the_live_session() {
    let provider = FakeProvider::default().with("ACME", stock_batch());
    let mut host = ChartHost::new();
    host.load(&provider, &stock_request(), NullRenderer::default())
        .expect("load");

    let state = host.dispatch(PointerEvent::Down { x: 72.0, y: 300.0 });
    assert!(matches!(state, InteractionState::Clicked { .. }));
    let state = host.dispatch(PointerEvent::Move { x: 936.0, y: 300.0 });
    assert!(state.is_dragging());

    let measurement = host
        .session()
        .expect("session")
        .overlays()
        .measurement
        .expect("measurement");
    assert!((measurement.value_diff + 5.0).abs() <= 1e-9);
}
