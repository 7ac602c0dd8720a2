use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use lru::LruCache;

use crate::xml::sanitize_xml_text;

const MEASURE_CACHE_SIZE: usize = 1024;

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
    is_bold: bool,
}

/// Measures the advance width of a single line of label text.
pub trait TextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> f32;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> f32 {
        (**self).measure_text(text, font_size, is_bold)
    }
}

/// Shapes text with a system face, sans-serif unless told otherwise.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    family: String,
    cache: LruCache<MeasureKey, f32>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(MEASURE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            font_system: FontSystem::new(),
            family: "sans-serif".to_string(),
            cache: LruCache::new(capacity),
        }
    }

    /// Measure with the same family the SVG text is written with.
    pub fn with_family(mut self, family: &str) -> Self {
        self.family = family.to_string();
        self.cache.clear();
        self
    }
}

/// Map a CSS-style `font-family` value onto a cosmic-text family. Only the
/// first entry of a fallback list is used.
fn resolve_family(css: &str) -> Family<'_> {
    let first = css
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'');

    match first.to_ascii_lowercase().as_str() {
        "" | "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(first),
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> f32 {
        let cleaned = sanitize_xml_text(text);
        let key = MeasureKey {
            text: cleaned.to_string(),
            font_size_bits: font_size.to_bits(),
            is_bold,
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height: font_size * 1.2,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(resolve_family(&self.family)).weight(if is_bold {
            Weight::BOLD
        } else {
            Weight::NORMAL
        });
        buffer.set_text(&mut self.font_system, &cleaned, &attrs, Shaping::Advanced, None);

        let width = buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0_f32, f32::max);

        self.cache.put(key, width);
        width
    }
}

/// Font-free width estimate: a fixed advance per character.
///
/// Used when no system fonts are wanted (tests, `--approx-text`), so wrapping
/// is reproducible across machines.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    pub char_width_ratio: f32,
    pub bold_factor: f32,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            bold_factor: 1.08,
        }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32, is_bold: bool) -> f32 {
        let chars = sanitize_xml_text(text).chars().count() as f32;
        let weight = if is_bold { self.bold_factor } else { 1.0 };
        chars * font_size * self.char_width_ratio * weight
    }
}

#[cfg(test)]
mod tests {
    use super::{ApproxMeasure, Family, TextMeasure, resolve_family};

    #[test]
    fn approx_width_grows_with_length_and_weight() {
        let mut measure = ApproxMeasure::default();
        let short = measure.measure_text("User", 12.0, false);
        let long = measure.measure_text("User Account", 12.0, false);
        let bold = measure.measure_text("User", 12.0, true);

        assert!(long > short);
        assert!(bold > short);
        assert_eq!(measure.measure_text("", 12.0, true), 0.0);
    }

    #[test]
    fn css_family_names_resolve() {
        assert_eq!(resolve_family("sans-serif"), Family::SansSerif);
        assert_eq!(resolve_family(""), Family::SansSerif);
        assert_eq!(resolve_family("Monospace"), Family::Monospace);
        assert_eq!(resolve_family("Inter"), Family::Name("Inter"));
        assert_eq!(
            resolve_family("'Fira Sans', Arial, sans-serif"),
            Family::Name("Fira Sans")
        );
    }

    #[test]
    fn mutable_reference_forwards() {
        fn width_of<M: TextMeasure>(mut measure: M) -> f32 {
            measure.measure_text("abc", 10.0, false)
        }

        let mut inner = ApproxMeasure::default();
        let width = width_of(&mut inner);
        assert!((width - 18.0).abs() < 1e-3, "got {width}");
    }
}
