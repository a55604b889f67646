use serde::{Deserialize, Serialize};

/// Draw layers, listed bottom to top.
///
/// The composite overlay sits below everything on the primary axis, and the
/// primary line sits above its own fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Composite,
    Highlight,
    Fill,
    Series,
    Measurement,
    Crosshair,
    Axis,
    Title,
}

impl CanvasLayerKind {
    pub const CANONICAL_ORDER: [CanvasLayerKind; 9] = [
        CanvasLayerKind::Background,
        CanvasLayerKind::Composite,
        CanvasLayerKind::Highlight,
        CanvasLayerKind::Fill,
        CanvasLayerKind::Series,
        CanvasLayerKind::Measurement,
        CanvasLayerKind::Crosshair,
        CanvasLayerKind::Axis,
        CanvasLayerKind::Title,
    ];

    #[must_use]
    pub fn z_index(self) -> usize {
        Self::CANONICAL_ORDER
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::CanvasLayerKind;

    #[test]
    fn primary_series_draws_above_fill_and_composite() {
        let series = CanvasLayerKind::Series.z_index();
        assert!(series > CanvasLayerKind::Fill.z_index());
        assert!(series > CanvasLayerKind::Composite.z_index());
        assert!(CanvasLayerKind::Fill.z_index() > CanvasLayerKind::Composite.z_index());
    }

    #[test]
    fn measurement_overlays_draw_above_dimmed_series() {
        assert!(CanvasLayerKind::Measurement.z_index() > CanvasLayerKind::Series.z_index());
        assert!(CanvasLayerKind::Highlight.z_index() < CanvasLayerKind::Fill.z_index());
    }
}
