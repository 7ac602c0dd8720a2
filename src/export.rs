//! SVG to raster / PDF conversion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::ExportError;

/// Output formats the CLI knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or("Output file has no extension")?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                other
            )),
        }
    }
}

/// Where extra fonts are looked up besides the system ones.
#[derive(Debug, Clone, Default)]
pub struct FontSources {
    pub system: bool,
    pub dirs: Vec<PathBuf>,
}

impl FontSources {
    pub fn system_and_local() -> Self {
        Self {
            system: true,
            dirs: vec![PathBuf::from("fonts")],
        }
    }
}

/// Rasterize an SVG document into a pixmap, `scale` pixels per SVG unit.
pub fn rasterize(svg: &str, scale: f32, fonts: &FontSources) -> Result<Pixmap, ExportError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::Scale(scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        if fonts.system {
            fontdb.load_system_fonts();
        }
        for dir in fonts.dirs.iter().filter(|d| d.is_dir()) {
            fontdb.load_fonts_dir(dir);
        }

        let picks = FallbackFamilies::pick(fontdb.faces().flat_map(|face| {
            face.families.iter().map(|(family, _)| family.as_str())
        }));
        if let Some(family) = picks.sans.as_deref() {
            fontdb.set_sans_serif_family(family);
            fontdb.set_serif_family(family);
        }
        if let Some(family) = picks.mono.as_deref() {
            fontdb.set_monospace_family(family);
        }
    }

    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| ExportError::Svg(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    log::debug!("rasterized {}x{} pixmap", width, height);
    Ok(pixmap)
}

pub fn svg_to_png(svg: &str, scale: f32, fonts: &FontSources) -> Result<Vec<u8>, ExportError> {
    rasterize(svg, scale, fonts)?
        .encode_png()
        .map_err(|e| ExportError::Png(e.to_string()))
}

pub fn svg_to_pdf(svg: &str, fonts: &FontSources) -> Result<Vec<u8>, ExportError> {
    use svg2pdf::usvg::fontdb;

    let mut db = fontdb::Database::new();
    if fonts.system {
        db.load_system_fonts();
    }
    for dir in fonts.dirs.iter().filter(|d| d.is_dir()) {
        db.load_fonts_dir(dir);
    }

    let picks = FallbackFamilies::pick(
        db.faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = picks.sans.as_deref() {
        db.set_sans_serif_family(family);
        db.set_serif_family(family);
    }
    if let Some(family) = picks.mono.as_deref() {
        db.set_monospace_family(family);
    }

    let opts = svg2pdf::usvg::Options {
        fontdb: Arc::new(db),
        ..Default::default()
    };
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    // Text as paths: viewers without the font still show labels.
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };
    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

/// Families to map the generic `sans-serif` / `monospace` names onto when the
/// platform does not configure them.
#[derive(Debug, Default, PartialEq)]
struct FallbackFamilies {
    sans: Option<String>,
    mono: Option<String>,
}

impl FallbackFamilies {
    fn pick<'a>(families: impl Iterator<Item = &'a str>) -> Self {
        let mut sans: Option<&str> = None;
        let mut mono: Option<&str> = None;
        let mut first: Option<&str> = None;

        for family in families {
            first.get_or_insert(family);
            let lower = family.to_ascii_lowercase();
            if sans.is_none() && lower.contains("sans") {
                sans = Some(family);
            }
            if mono.is_none() && (lower.contains("mono") || lower.contains("code")) {
                mono = Some(family);
            }
        }

        Self {
            sans: sans.or(first).map(str::to_string),
            mono: mono.or(sans).or(first).map(str::to_string),
        }
    }
}
