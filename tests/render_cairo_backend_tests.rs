#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use chrono::NaiveDate;
use finchart::api::ChartSession;
use finchart::core::{ChartMode, TimeSeriesPoint, Viewport, align_single};
use finchart::render::{CairoRenderer, Color, Renderer};
use finchart::{ChartError, ChartSessionConfig};

fn session(width: u32, height: u32) -> ChartSession<CairoRenderer> {
    let renderer = CairoRenderer::new(width as i32, height as i32).expect("renderer");
    let series = align_single(vec![
        TimeSeriesPoint::new(NaiveDate::from_ymd_opt(2023, 1, 1).expect("date"), 100.0),
        TimeSeriesPoint::new(NaiveDate::from_ymd_opt(2023, 1, 2).expect("date"), 105.0),
        TimeSeriesPoint::new(NaiveDate::from_ymd_opt(2023, 1, 3).expect("date"), 95.0),
    ])
    .expect("series");
    let config = ChartSessionConfig::new(Viewport::new(width, height))
        .with_mode(ChartMode::Stock)
        .with_title("ACME");
    ChartSession::new(renderer, config, series, None).expect("session")
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_series_fill_and_measurement() {
    let mut session = session(1000, 600);
    session.render().expect("idle render");
    let idle = session.renderer().last_stats();
    assert_eq!(idle.areas_drawn, 1);
    assert!(idle.lines_drawn >= 4);
    assert!(idle.texts_drawn >= 1);
    assert_eq!(idle.markers_drawn, 0);

    session.pointer_down(72.0, 300.0);
    session.pointer_move(936.0, 300.0);
    session.render().expect("drag render");
    let dragging = session.renderer().last_stats();
    assert_eq!(dragging.rects_drawn, idle.rects_drawn + 1);
    assert_eq!(dragging.markers_drawn, 3);
    assert_eq!(dragging.texts_drawn, idle.texts_drawn + 4);
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let mut session = session(600, 320);
    session.pointer_move(300.0, 200.0);

    let surface = ImageSurface::create(Format::ARgb32, 600, 320).expect("surface");
    let context = Context::new(&surface).expect("context");
    session
        .render_on_cairo_context(&context)
        .expect("render on context");

    assert_eq!(session.renderer().last_stats().markers_drawn, 1);
}

#[test]
fn released_renderer_reports_destroyed_surface() {
    let session = session(600, 320);
    let frame = session.frame().expect("frame");
    let mut renderer = session.close();

    assert!(renderer.surface().is_none());
    assert_eq!(renderer.render(&frame), Err(ChartError::RenderSurfaceDestroyed));
}

#[test]
fn clear_color_is_validated() {
    let mut renderer = CairoRenderer::new(10, 10).expect("renderer");
    let err = renderer
        .set_clear_color(Color::rgba(1.5, 0.0, 0.0, 1.0))
        .expect_err("channel out of range");
    assert!(matches!(err, ChartError::InvalidData(_)));
    renderer
        .set_clear_color(Color::rgb(0.0, 0.0, 0.0))
        .expect("valid color");
    assert_eq!(renderer.clear_color(), Color::rgb(0.0, 0.0, 0.0));
}
