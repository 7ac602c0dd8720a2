//! Full-diagram redraw.
//!
//! Layers are painted back to front: trust boundary, connectors, shapes, PII
//! annotation, legend. Connectors go before shapes so that shape fills hide
//! the line origins.

use super::connector::draw_arrow;
use super::layout::{Layout, LayoutEngine};
use super::shapes::{self, draw_shape};
use super::surface::{Font, Stroke, Surface, TextStyle};
use super::types::{DiagramModel, EntityKind, Point, Warning};
use crate::theme::DiagramTheme;

const BOUNDARY_INSET_X: f32 = 40.0;
const BOUNDARY_TOP: f32 = 80.0;
const BOUNDARY_HEIGHT_INSET: f32 = 140.0;
const BOUNDARY_DASH: [f32; 2] = [10.0, 5.0];
const BOUNDARY_STROKE_WIDTH: f32 = 3.0;
const FLOW_STROKE_WIDTH: f32 = 2.0;

const PII_X: f32 = 50.0;
const PII_ITEMS_X: f32 = 140.0;
const PII_BOTTOM_OFFSET: f32 = 40.0;

const LEGEND_X: f32 = 50.0;
const LEGEND_GAP_BELOW_SHAPES: f32 = 80.0;
const LEGEND_BOTTOM_RESERVE: f32 = 180.0;
const LEGEND_HEIGHT: f32 = 140.0;
const LEGEND_ITEM_SPACING: f32 = 280.0;
const LEGEND_ROW_SPACING: f32 = 55.0;
const LEGEND_LABEL_OFFSET: f32 = 50.0;
const LEGEND_SWATCH: f32 = 35.0;

/// What a render pass drew and what it had to skip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub shapes_drawn: usize,
    pub arrows_drawn: usize,
    /// Y coordinate the legend block is anchored at.
    pub legend_top: f32,
    pub warnings: Vec<Warning>,
}

/// Where the legend goes: under the lowest shape, but never higher than a
/// fixed distance from the bottom of the canvas.
pub fn legend_top(layout: &Layout, canvas_height: f32) -> f32 {
    (layout.lowest_bottom() + LEGEND_GAP_BELOW_SHAPES).max(canvas_height - LEGEND_BOTTOM_RESERVE)
}

/// Clear `surface` and draw the whole diagram.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    model: &DiagramModel,
    theme: &DiagramTheme,
) -> RenderReport {
    let width = surface.width();
    let height = surface.height();

    surface.clear();
    draw_trust_boundary(surface, &model.deployment, theme);

    let layout = LayoutEngine::new(width, height).layout(model);
    let mut report = RenderReport {
        warnings: layout.warnings.clone(),
        ..RenderReport::default()
    };

    let flow_stroke = Stroke::solid(&theme.flow_color, FLOW_STROKE_WIDTH);
    for (index, flow) in model.data_flows.iter().enumerate() {
        let source = layout.get(&flow.source);
        let process = layout.get(&flow.process);
        let target = layout.get(&flow.target);

        for (name, pos) in [
            (&flow.source, source),
            (&flow.process, process),
            (&flow.target, target),
        ] {
            if pos.is_none() {
                report.warnings.push(Warning::DanglingReference {
                    flow: index,
                    name: name.clone(),
                });
            }
        }

        for leg in [(source, process), (process, target)] {
            if let (Some(from), Some(to)) = leg
                && draw_arrow(surface, from.center(), to.center(), &flow_stroke)
            {
                report.arrows_drawn += 1;
            }
        }
    }

    for (name, pos) in &layout.positions {
        draw_shape(surface, pos.kind, pos.center(), name, theme);
        report.shapes_drawn += 1;
    }

    if !model.piidata.is_empty() {
        draw_pii_annotation(surface, &model.piidata, theme);
    }

    report.legend_top = legend_top(&layout, height);
    draw_legend(surface, report.legend_top, theme);

    log::debug!(
        "rendered {} shapes, {} arrows, legend at y={}",
        report.shapes_drawn,
        report.arrows_drawn,
        report.legend_top
    );
    report
}

fn draw_trust_boundary<S: Surface + ?Sized>(surface: &mut S, deployment: &str, theme: &DiagramTheme) {
    let stroke = Stroke::dashed(&theme.boundary_color, BOUNDARY_STROKE_WIDTH, BOUNDARY_DASH);
    let (width, height) = (surface.width(), surface.height());
    surface.rect(
        Point::new(BOUNDARY_INSET_X, BOUNDARY_TOP),
        width - 2.0 * BOUNDARY_INSET_X,
        height - BOUNDARY_HEIGHT_INSET,
        None,
        Some(&stroke),
    );
    surface.text(
        &format!("Trust Boundary: {}", deployment),
        Point::new(50.0, 70.0),
        &TextStyle::label(Font::bold(14.0), &theme.boundary_color),
    );
}

fn draw_pii_annotation<S: Surface + ?Sized>(surface: &mut S, items: &[String], theme: &DiagramTheme) {
    let y = surface.height() - PII_BOTTOM_OFFSET;
    surface.text(
        "⚠ PII Data:",
        Point::new(PII_X, y),
        &TextStyle::label(Font::bold(12.0), &theme.pii_color),
    );
    surface.text(
        &items.join(", "),
        Point::new(PII_ITEMS_X, y),
        &TextStyle::label(Font::regular(12.0), &theme.pii_color),
    );
}

fn draw_legend<S: Surface + ?Sized>(surface: &mut S, top: f32, theme: &DiagramTheme) {
    let panel_stroke = Stroke::solid(&theme.legend_border, 2.0);
    let panel_width = surface.width() - 100.0;
    surface.rect(
        Point::new(LEGEND_X - 10.0, top - 35.0),
        panel_width,
        LEGEND_HEIGHT,
        Some(theme.legend_fill.as_str()),
        Some(&panel_stroke),
    );
    surface.text(
        "Legend",
        Point::new(LEGEND_X, top - 10.0),
        &TextStyle::label(Font::bold(16.0), &theme.legend_text),
    );

    let label_style = TextStyle::label(Font::regular(13.0), &theme.legend_text);
    let label = |surface: &mut S, x: f32, y: f32, text: &str| {
        surface.text(text, Point::new(x + LEGEND_LABEL_OFFSET, y + 2.0), &label_style);
    };

    // Row 1: the three shape kinds.
    let y = top + 25.0;
    let mut x = LEGEND_X;
    for kind in EntityKind::ALL {
        draw_kind_swatch(surface, kind, x, y, theme);
        label(surface, x, y, kind.label());
        x += LEGEND_ITEM_SPACING;
    }

    // Row 2: flow, boundary, PII marker.
    let y = y + LEGEND_ROW_SPACING;
    let mut x = LEGEND_X;

    let flow = Stroke::solid(&theme.flow_color, FLOW_STROKE_WIDTH);
    surface.line(Point::new(x, y), Point::new(x + 30.0, y), &flow);
    surface.line(Point::new(x + 30.0, y), Point::new(x + 24.0, y - 5.0), &flow);
    surface.line(Point::new(x + 30.0, y), Point::new(x + 24.0, y + 5.0), &flow);
    label(surface, x, y, "Data Flow");
    x += LEGEND_ITEM_SPACING;

    let boundary = Stroke::dashed(&theme.boundary_color, BOUNDARY_STROKE_WIDTH, [8.0, 4.0]);
    surface.line(Point::new(x, y), Point::new(x + LEGEND_SWATCH, y), &boundary);
    label(surface, x, y, "Trust Boundary");
    x += LEGEND_ITEM_SPACING;

    surface.text(
        "⚠",
        Point::new(x + 5.0, y + 4.0),
        &TextStyle::label(Font::bold(18.0), &theme.pii_color),
    );
    label(surface, x, y, "PII Data");
}

fn draw_kind_swatch<S: Surface + ?Sized>(
    surface: &mut S,
    kind: EntityKind,
    x: f32,
    y: f32,
    theme: &DiagramTheme,
) {
    match kind {
        EntityKind::Entity => {
            let stroke = Stroke::solid(&theme.entity_stroke, shapes::SHAPE_STROKE_WIDTH);
            surface.rect(
                Point::new(x, y - 12.0),
                LEGEND_SWATCH,
                24.0,
                Some(theme.entity_fill.as_str()),
                Some(&stroke),
            );
        }
        EntityKind::Process => {
            let stroke = Stroke::solid(&theme.process_stroke, shapes::SHAPE_STROKE_WIDTH);
            surface.circle(Point::new(x + 18.0, y), 14.0, Some(theme.process_fill.as_str()), Some(&stroke));
        }
        EntityKind::Store => {
            let stroke = Stroke::solid(&theme.store_stroke, shapes::SHAPE_STROKE_WIDTH);
            surface.line(Point::new(x, y - 12.0), Point::new(x + LEGEND_SWATCH, y - 12.0), &stroke);
            surface.line(Point::new(x, y + 12.0), Point::new(x + LEGEND_SWATCH, y + 12.0), &stroke);
        }
    }
}
