use super::surface::{Font, Stroke, Surface, TextStyle};
use super::types::{EntityKind, Point};
use crate::theme::DiagramTheme;

pub const ENTITY_WIDTH: f32 = 120.0;
pub const ENTITY_HEIGHT: f32 = 60.0;
pub const PROCESS_RADIUS: f32 = 50.0;
pub const STORE_WIDTH: f32 = 140.0;
pub const STORE_HEIGHT: f32 = 60.0;

pub const SHAPE_STROKE_WIDTH: f32 = 2.0;
pub const LABEL_LINE_HEIGHT: f32 = 14.0;
const LABEL_PADDING: f32 = 10.0;
const PROCESS_LABEL_RATIO: f32 = 1.6;

/// Usable label width inside a shape.
pub fn label_max_width(kind: EntityKind) -> f32 {
    match kind {
        EntityKind::Entity => ENTITY_WIDTH - LABEL_PADDING,
        EntityKind::Process => PROCESS_RADIUS * PROCESS_LABEL_RATIO,
        EntityKind::Store => STORE_WIDTH - LABEL_PADDING,
    }
}

pub fn label_font(kind: EntityKind) -> Font {
    match kind {
        EntityKind::Entity => Font::bold(12.0),
        EntityKind::Process | EntityKind::Store => Font::bold(11.0),
    }
}

/// Draw one element and its label, centered on `center`.
pub fn draw_shape<S: Surface + ?Sized>(
    surface: &mut S,
    kind: EntityKind,
    center: Point,
    label: &str,
    theme: &DiagramTheme,
) {
    let text_color = match kind {
        EntityKind::Entity => {
            let stroke = Stroke::solid(&theme.entity_stroke, SHAPE_STROKE_WIDTH);
            surface.rect(
                Point::new(center.x - ENTITY_WIDTH / 2.0, center.y - ENTITY_HEIGHT / 2.0),
                ENTITY_WIDTH,
                ENTITY_HEIGHT,
                Some(theme.entity_fill.as_str()),
                Some(&stroke),
            );
            &theme.entity_text
        }
        EntityKind::Process => {
            let stroke = Stroke::solid(&theme.process_stroke, SHAPE_STROKE_WIDTH);
            surface.circle(center, PROCESS_RADIUS, Some(theme.process_fill.as_str()), Some(&stroke));
            &theme.process_text
        }
        EntityKind::Store => {
            // Open-ended box: top and bottom rules only.
            let stroke = Stroke::solid(&theme.store_stroke, SHAPE_STROKE_WIDTH);
            let left = center.x - STORE_WIDTH / 2.0;
            let right = center.x + STORE_WIDTH / 2.0;
            let top = center.y - STORE_HEIGHT / 2.0;
            let bottom = center.y + STORE_HEIGHT / 2.0;
            surface.line(Point::new(left, top), Point::new(right, top), &stroke);
            surface.line(Point::new(left, bottom), Point::new(right, bottom), &stroke);
            &theme.store_text
        }
    };

    let font = label_font(kind);
    let lines = wrap_text(surface, label, font, label_max_width(kind));
    draw_centered_lines(surface, &lines, center, &TextStyle::centered(font, text_color));
}

/// Greedy word wrap.
///
/// Words are split on single spaces and appended while the trial line stays
/// strictly narrower than `max_width`. A word wider than `max_width` is never
/// broken; it just occupies its own line.
pub fn wrap_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    font: Font,
    max_width: f32,
) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let trial = format!("{} {}", current, word);
        if surface.measure_text(&trial, font) < max_width {
            current = trial;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

/// Stack `lines` so the block is vertically centered on `center`.
pub fn draw_centered_lines<S: Surface + ?Sized>(
    surface: &mut S,
    lines: &[String],
    center: Point,
    style: &TextStyle,
) {
    let block = lines.len().saturating_sub(1) as f32 * LABEL_LINE_HEIGHT;
    let start_y = center.y - block / 2.0;

    for (i, line) in lines.iter().enumerate() {
        surface.text(
            line,
            Point::new(center.x, start_y + i as f32 * LABEL_LINE_HEIGHT),
            style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfd::surface::{Canvas, DrawOp};
    use crate::fonts::ApproxMeasure;

    fn canvas() -> Canvas<ApproxMeasure> {
        Canvas::new(1400.0, 800.0, ApproxMeasure::default())
    }

    fn texts(canvas: &Canvas<ApproxMeasure>) -> Vec<(String, Point)> {
        canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, at, .. } => Some((text.clone(), *at)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn short_label_stays_on_one_line() {
        let mut canvas = canvas();
        let lines = wrap_text(&mut canvas, "User", Font::bold(12.0), 110.0);
        assert_eq!(lines, vec!["User"]);
    }

    #[test]
    fn long_label_wraps_greedily() {
        // 11px bold approx: ~7.13 px per char, so 80px fits 11 chars.
        let mut canvas = canvas();
        let lines = wrap_text(&mut canvas, "Validate Customer Payment Data", Font::bold(11.0), 80.0);
        assert_eq!(lines, vec!["Validate", "Customer", "Payment", "Data"]);

        let lines = wrap_text(&mut canvas, "Log In Now", Font::bold(11.0), 80.0);
        assert_eq!(lines, vec!["Log In Now"]);
    }

    #[test]
    fn overlong_word_is_not_split() {
        let mut canvas = canvas();
        let lines = wrap_text(&mut canvas, "Authentication Microservice", Font::bold(11.0), 80.0);
        assert_eq!(lines, vec!["Authentication", "Microservice"]);
    }

    #[test]
    fn empty_label_yields_single_empty_line() {
        let mut canvas = canvas();
        assert_eq!(wrap_text(&mut canvas, "", Font::bold(12.0), 110.0), vec![""]);
    }

    #[test]
    fn entity_is_a_filled_rect_with_centered_label() {
        let mut canvas = canvas();
        let theme = DiagramTheme::default();
        draw_shape(&mut canvas, EntityKind::Entity, Point::new(220.0, 150.0), "User", &theme);

        match &canvas.ops()[0] {
            DrawOp::Rect {
                origin,
                width,
                height,
                fill,
                stroke,
            } => {
                assert_eq!(*origin, Point::new(160.0, 120.0));
                assert_eq!((*width, *height), (ENTITY_WIDTH, ENTITY_HEIGHT));
                assert_eq!(fill.as_deref(), Some("#dbeafe"));
                assert_eq!(stroke.as_ref().map(|s| s.width), Some(2.0));
            }
            other => panic!("expected rect, got {other:?}"),
        }
        assert_eq!(texts(&canvas), vec![("User".to_string(), Point::new(220.0, 150.0))]);
    }

    #[test]
    fn process_is_a_circle() {
        let mut canvas = canvas();
        draw_shape(
            &mut canvas,
            EntityKind::Process,
            Point::new(700.0, 270.0),
            "Login",
            &DiagramTheme::default(),
        );
        assert!(matches!(
            canvas.ops()[0],
            DrawOp::Circle { radius, .. } if radius == PROCESS_RADIUS
        ));
    }

    #[test]
    fn store_has_only_top_and_bottom_rules() {
        let mut canvas = canvas();
        draw_shape(
            &mut canvas,
            EntityKind::Store,
            Point::new(1180.0, 150.0),
            "Users",
            &DiagramTheme::default(),
        );

        let lines: Vec<(Point, Point)> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lines,
            vec![
                (Point::new(1110.0, 120.0), Point::new(1250.0, 120.0)),
                (Point::new(1110.0, 180.0), Point::new(1250.0, 180.0)),
            ]
        );
        assert!(!canvas.ops().iter().any(|op| matches!(op, DrawOp::Rect { .. })));
    }

    #[test]
    fn multi_line_block_is_vertically_centered() {
        let mut canvas = canvas();
        draw_shape(
            &mut canvas,
            EntityKind::Process,
            Point::new(700.0, 150.0),
            "Validate Customer Payment",
            &DiagramTheme::default(),
        );
        let ys: Vec<f32> = texts(&canvas).iter().map(|(_, p)| p.y).collect();
        assert_eq!(ys, vec![136.0, 150.0, 164.0]);
    }
}
