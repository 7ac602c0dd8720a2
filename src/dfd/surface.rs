//! Drawing surface abstraction.
//!
//! The scene is drawn through the [`Surface`] trait with canvas-style
//! primitives. [`Canvas`] is the implementation used everywhere: it records a
//! display list of [`DrawOp`]s that can be inspected directly or serialized to
//! an SVG document, which [`crate::export`] turns into pixels.

use std::fmt::Write as _;

use super::types::Point;
use crate::fonts::TextMeasure;
use crate::xml::escape_xml;

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: &str, width: f32) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &str, width: f32, dash: [f32; 2]) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: String,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// Left-aligned text sitting on the alphabetic baseline.
    pub fn label(font: Font, color: &str) -> Self {
        Self {
            font,
            color: color.to_string(),
            align: TextAlign::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    /// Text centered on its anchor point in both directions.
    pub fn centered(font: Font, color: &str) -> Self {
        Self {
            font,
            color: color.to_string(),
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }
}

/// One recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        origin: Point,
        width: f32,
        height: f32,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Something the scene can be drawn onto.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Drop everything drawn so far.
    fn clear(&mut self);

    fn draw(&mut self, op: DrawOp);

    fn measure_text(&mut self, text: &str, font: Font) -> f32;

    fn rect(
        &mut self,
        origin: Point,
        width: f32,
        height: f32,
        fill: Option<&str>,
        stroke: Option<&Stroke>,
    ) {
        self.draw(DrawOp::Rect {
            origin,
            width,
            height,
            fill: fill.map(str::to_string),
            stroke: stroke.cloned(),
        });
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Option<&str>, stroke: Option<&Stroke>) {
        self.draw(DrawOp::Circle {
            center,
            radius,
            fill: fill.map(str::to_string),
            stroke: stroke.cloned(),
        });
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.draw(DrawOp::Line {
            from,
            to,
            stroke: stroke.clone(),
        });
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.draw(DrawOp::Text {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
    }
}

/// Display-list surface of a fixed size.
pub struct Canvas<M: TextMeasure> {
    width: f32,
    height: f32,
    background: String,
    font_family: String,
    ops: Vec<DrawOp>,
    measure: M,
}

impl<M: TextMeasure> Canvas<M> {
    pub fn new(width: f32, height: f32, measure: M) -> Self {
        Self {
            width,
            height,
            background: "#ffffff".to_string(),
            font_family: "sans-serif".to_string(),
            ops: Vec::new(),
            measure,
        }
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background = color.to_string();
        self
    }

    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Serialize the display list as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(256 + self.ops.len() * 160);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        svg.push('\n');
        let _ = writeln!(
            svg,
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            self.width,
            self.height,
            escape_xml(&self.background)
        );

        for op in &self.ops {
            write_op(&mut svg, op, &self.font_family);
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl<M: TextMeasure> Surface for Canvas<M> {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    fn measure_text(&mut self, text: &str, font: Font) -> f32 {
        self.measure.measure_text(text, font.size, font.bold)
    }
}

fn paint_attrs(fill: Option<&String>, stroke: Option<&Stroke>) -> String {
    let mut attrs = String::new();
    match fill {
        Some(color) => {
            let _ = write!(attrs, r#" fill="{}""#, escape_xml(color));
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = stroke {
        attrs.push_str(&stroke_attrs(stroke));
    }
    attrs
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{:.1}""#,
        escape_xml(&stroke.color),
        stroke.width
    );
    if let Some([on, off]) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{},{}""#, on, off);
    }
    attrs
}

fn write_op(svg: &mut String, op: &DrawOp, font_family: &str) {
    match op {
        DrawOp::Rect {
            origin,
            width,
            height,
            fill,
            stroke,
        } => {
            let _ = write!(
                svg,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{} />"#,
                origin.x,
                origin.y,
                width,
                height,
                paint_attrs(fill.as_ref(), stroke.as_ref())
            );
        }
        DrawOp::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let _ = write!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"{} />"#,
                center.x,
                center.y,
                radius,
                paint_attrs(fill.as_ref(), stroke.as_ref())
            );
        }
        DrawOp::Line { from, to, stroke } => {
            let _ = write!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{} stroke-linecap="round" />"#,
                from.x,
                from.y,
                to.x,
                to.y,
                stroke_attrs(stroke)
            );
        }
        DrawOp::Text { text, at, style } => {
            let anchor = match style.align {
                TextAlign::Start => "start",
                TextAlign::Center => "middle",
            };
            let baseline = match style.baseline {
                TextBaseline::Alphabetic => "",
                TextBaseline::Middle => r#" dominant-baseline="central""#,
            };
            let weight = if style.font.bold {
                r#" font-weight="bold""#
            } else {
                ""
            };
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}"{} fill="{}" text-anchor="{}"{}>{}</text>"#,
                at.x,
                at.y,
                escape_xml(font_family),
                style.font.size,
                weight,
                escape_xml(&style.color),
                anchor,
                baseline,
                escape_xml(text)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::ApproxMeasure;

    fn canvas() -> Canvas<ApproxMeasure> {
        Canvas::new(200.0, 100.0, ApproxMeasure::default())
    }

    #[test]
    fn clear_discards_recorded_ops() {
        let mut canvas = canvas();
        canvas.line(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &Stroke::solid("#000", 1.0));
        assert_eq!(canvas.ops().len(), 1);
        canvas.clear();
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn svg_document_has_canvas_size_and_background() {
        let svg = canvas().with_background("#fafafa").to_svg();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100""#));
        assert!(svg.contains(r##"fill="#fafafa""##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn dashed_stroke_and_open_fill_serialize() {
        let mut canvas = canvas();
        canvas.rect(
            Point::new(40.0, 80.0),
            120.0,
            20.0,
            None,
            Some(&Stroke::dashed("#dc2626", 3.0, [10.0, 5.0])),
        );
        let svg = canvas.to_svg();
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"stroke-dasharray="10,5""#));
        assert!(svg.contains(r#"stroke-width="3.0""#));
    }

    #[test]
    fn text_is_escaped_and_aligned() {
        let mut canvas = canvas().with_font_family("Inter");
        canvas.text(
            "A & B",
            Point::new(50.0, 50.0),
            &TextStyle::centered(Font::bold(12.0), "#1e40af"),
        );
        let svg = canvas.to_svg();
        assert!(svg.contains(">A &amp; B</text>"));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"font-family="Inter""#));
    }
}
