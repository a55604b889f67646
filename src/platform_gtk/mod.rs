//! GTK4 binding: draws a chart session into a `DrawingArea` and feeds it
//! pointer events.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4 as gtk;
use gtk::prelude::*;
use tracing::debug;

use crate::api::ChartSession;
use crate::core::Viewport;
use crate::render::{CairoContextRenderer, Renderer};

/// Keeps a session attached to a drawing area until dropped.
///
/// Dropping the adapter removes its controllers and draw callback, so no event
/// reaches the session afterwards, and releases the renderer.
pub struct GtkChartAdapter<R: Renderer + CairoContextRenderer + 'static> {
    drawing_area: gtk::DrawingArea,
    session: Rc<RefCell<ChartSession<R>>>,
    motion: gtk::EventControllerMotion,
    drag: gtk::GestureDrag,
}

impl<R: Renderer + CairoContextRenderer + 'static> GtkChartAdapter<R> {
    #[must_use]
    pub fn attach(drawing_area: &gtk::DrawingArea, session: ChartSession<R>) -> Self {
        let session = Rc::new(RefCell::new(session));

        drawing_area.set_draw_func({
            let session = Rc::clone(&session);
            move |_widget, context, width, height| {
                if width <= 0 || height <= 0 {
                    return;
                }
                let Ok(mut chart) = session.try_borrow_mut() else {
                    return;
                };

                let viewport = Viewport::new(width.unsigned_abs(), height.unsigned_abs());
                if chart.config().viewport != viewport {
                    if let Err(err) = chart.set_viewport(viewport) {
                        debug!(error = %err, width, height, "chart resize rejected");
                        return;
                    }
                }
                if let Err(err) = chart.render_on_cairo_context(context) {
                    debug!(error = %err, "chart draw failed");
                }
            }
        });

        let motion = gtk::EventControllerMotion::new();
        {
            let session = Rc::clone(&session);
            let drawing_area = drawing_area.clone();
            motion.connect_motion(move |_, x, y| {
                if let Ok(mut chart) = session.try_borrow_mut() {
                    chart.pointer_move(x, y);
                }
                drawing_area.queue_draw();
            });
        }
        {
            let session = Rc::clone(&session);
            let drawing_area = drawing_area.clone();
            motion.connect_leave(move |_| {
                if let Ok(mut chart) = session.try_borrow_mut() {
                    chart.pointer_leave();
                }
                drawing_area.queue_draw();
            });
        }
        drawing_area.add_controller(motion.clone());

        let drag = gtk::GestureDrag::new();
        let drag_origin = Rc::new(Cell::new((0.0, 0.0)));
        {
            let session = Rc::clone(&session);
            let drawing_area = drawing_area.clone();
            let drag_origin = Rc::clone(&drag_origin);
            drag.connect_drag_begin(move |_, x, y| {
                drag_origin.set((x, y));
                if let Ok(mut chart) = session.try_borrow_mut() {
                    chart.pointer_down(x, y);
                }
                drawing_area.queue_draw();
            });
        }
        {
            let session = Rc::clone(&session);
            let drawing_area = drawing_area.clone();
            let drag_origin = Rc::clone(&drag_origin);
            drag.connect_drag_update(move |_, offset_x, offset_y| {
                let (x, y) = drag_origin.get();
                if let Ok(mut chart) = session.try_borrow_mut() {
                    chart.pointer_move(x + offset_x, y + offset_y);
                }
                drawing_area.queue_draw();
            });
        }
        {
            let session = Rc::clone(&session);
            let drawing_area = drawing_area.clone();
            let drag_origin = Rc::clone(&drag_origin);
            drag.connect_drag_end(move |_, offset_x, offset_y| {
                let (x, y) = drag_origin.get();
                if let Ok(mut chart) = session.try_borrow_mut() {
                    chart.pointer_up(x + offset_x, y + offset_y);
                }
                drawing_area.queue_draw();
            });
        }
        drawing_area.add_controller(drag.clone());

        drawing_area.queue_draw();
        Self {
            drawing_area: drawing_area.clone(),
            session,
            motion,
            drag,
        }
    }

    /// Runs `f` on the session unless a GTK callback currently holds it.
    pub fn with_session<T>(&self, f: impl FnOnce(&mut ChartSession<R>) -> T) -> Option<T> {
        let result = self.session.try_borrow_mut().ok().map(|mut chart| f(&mut chart));
        self.drawing_area.queue_draw();
        result
    }
}

impl<R: Renderer + CairoContextRenderer + 'static> Drop for GtkChartAdapter<R> {
    fn drop(&mut self) {
        self.drawing_area.remove_controller(&self.motion);
        self.drawing_area.remove_controller(&self.drag);
        self.drawing_area.set_draw_func(|_, _, _, _| {});
        if let Ok(mut chart) = self.session.try_borrow_mut() {
            chart.renderer_mut().release();
        }
        self.drawing_area.queue_draw();
        debug!("gtk chart adapter detached");
    }
}
