use serde::{Deserialize, Serialize};

use crate::core::{CoordinateMapper, TimeSeriesPoint, ValueAxis};
use crate::error::ChartResult;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

/// Vertex in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelVertex {
    pub x: f64,
    pub y: f64,
}

/// Deterministic geometry for a filled series.
///
/// `line_points` follows the mapped data points.
/// `fill_polygon` is an explicitly closed polygon against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaGeometry {
    pub line_points: Vec<PixelVertex>,
    pub fill_polygon: Vec<PixelVertex>,
}

/// Maps points into pixel space on the chosen value axis.
pub fn project_points(
    points: &[TimeSeriesPoint],
    mapper: &CoordinateMapper,
    axis: ValueAxis,
) -> ChartResult<Vec<PixelVertex>> {
    #[cfg(feature = "parallel-projection")]
    {
        points
            .par_iter()
            .map(|point| project_one(*point, mapper, axis))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        points
            .iter()
            .map(|point| project_one(*point, mapper, axis))
            .collect()
    }
}

fn project_one(
    point: TimeSeriesPoint,
    mapper: &CoordinateMapper,
    axis: ValueAxis,
) -> ChartResult<PixelVertex> {
    let (x, y) = mapper.point_to_pixel(point, axis)?;
    Ok(PixelVertex { x, y })
}

/// Clips an x-ascending polyline to `[left, right]`.
///
/// Segments crossing a bound are cut at the bound with a linearly
/// interpolated vertex; segments entirely outside are dropped.
#[must_use]
pub fn clip_polyline_x(vertices: &[PixelVertex], left: f64, right: f64) -> Vec<PixelVertex> {
    if let [only] = vertices {
        return if (left..=right).contains(&only.x) {
            vec![*only]
        } else {
            Vec::new()
        };
    }

    let mut clipped: Vec<PixelVertex> = Vec::with_capacity(vertices.len());
    for pair in vertices.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if to.x < left || from.x > right {
            continue;
        }
        let start = if from.x < left {
            vertex_at_x(from, to, left)
        } else {
            from
        };
        let end = if to.x > right {
            vertex_at_x(from, to, right)
        } else {
            to
        };
        for vertex in [start, end] {
            if clipped.last() != Some(&vertex) {
                clipped.push(vertex);
            }
        }
    }
    clipped
}

// Callers guarantee `from.x < x < to.x` or an endpoint match, so the span is non-zero.
fn vertex_at_x(from: PixelVertex, to: PixelVertex, x: f64) -> PixelVertex {
    let t = (x - from.x) / (to.x - from.x);
    PixelVertex {
        x,
        y: from.y + (to.y - from.y) * t,
    }
}

/// Projects points into a line plus a fill down to `baseline_value`.
pub fn project_area(
    points: &[TimeSeriesPoint],
    mapper: &CoordinateMapper,
    baseline_value: f64,
) -> ChartResult<AreaGeometry> {
    let line_points = project_points(points, mapper, ValueAxis::Primary)?;
    let (Some(first), Some(last)) = (line_points.first().copied(), line_points.last().copied())
    else {
        return Ok(AreaGeometry {
            line_points,
            fill_polygon: Vec::new(),
        });
    };

    let baseline_y = mapper.value_to_pixel(baseline_value)?;
    let mut fill_polygon = Vec::with_capacity(line_points.len() + 3);
    fill_polygon.push(PixelVertex {
        x: first.x,
        y: baseline_y,
    });
    fill_polygon.extend(line_points.iter().copied());
    fill_polygon.push(PixelVertex {
        x: last.x,
        y: baseline_y,
    });
    // Explicitly repeat the first baseline vertex so consumers can render this
    // as a closed polygon without adding implicit closure rules.
    fill_polygon.push(PixelVertex {
        x: first.x,
        y: baseline_y,
    });

    Ok(AreaGeometry {
        line_points,
        fill_polygon,
    })
}
