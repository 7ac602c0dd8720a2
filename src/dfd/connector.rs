use std::f32::consts::FRAC_PI_6;

use super::surface::{Stroke, Surface};
use super::types::Point;

/// How far from each shape center the visible line starts and ends.
pub const ENDPOINT_OFFSET: f32 = 50.0;
pub const ARROW_HEAD_LENGTH: f32 = 10.0;

/// Geometry of one connector, before it touches a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    pub start: Point,
    pub end: Point,
    pub head_left: Point,
    pub head_right: Point,
}

impl ArrowGeometry {
    /// `None` when `from` and `to` coincide (or are not finite), since there
    /// is no direction to point in.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = dx.hypot(dy);
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }

        let (ux, uy) = (dx / length, dy / length);
        let start = Point::new(from.x + ux * ENDPOINT_OFFSET, from.y + uy * ENDPOINT_OFFSET);
        let end = Point::new(to.x - ux * ENDPOINT_OFFSET, to.y - uy * ENDPOINT_OFFSET);

        let angle = dy.atan2(dx);
        let barb = |theta: f32| {
            Point::new(
                end.x - ARROW_HEAD_LENGTH * theta.cos(),
                end.y - ARROW_HEAD_LENGTH * theta.sin(),
            )
        };

        Some(Self {
            start,
            end,
            head_left: barb(angle - FRAC_PI_6),
            head_right: barb(angle + FRAC_PI_6),
        })
    }
}

/// Draw a trimmed connector with a two-stroke arrowhead.
///
/// Returns whether anything was drawn; degenerate connectors are skipped.
pub fn draw_arrow<S: Surface + ?Sized>(surface: &mut S, from: Point, to: Point, stroke: &Stroke) -> bool {
    let Some(arrow) = ArrowGeometry::between(from, to) else {
        log::trace!("skipping zero-length connector at ({}, {})", from.x, from.y);
        return false;
    };

    surface.line(arrow.start, arrow.end, stroke);
    surface.line(arrow.end, arrow.head_left, stroke);
    surface.line(arrow.end, arrow.head_right, stroke);
    true
}
