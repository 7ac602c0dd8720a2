use thiserror::Error;

/// Why a JSON description could not become a diagram.
///
/// Individual malformed flows never end up here; those are reported as
/// [`Warning`](crate::dfd::Warning)s next to the parsed model.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Missing \"DFD features\" key")]
    MissingFeatures,
    #[error("\"DFD features\" must be an object, found {0}")]
    FeaturesNotObject(&'static str),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to parse SVG: {0}")]
    Svg(String),
    #[error("Failed to create {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("Failed to encode PNG: {0}")]
    Png(String),
    #[error("Failed to convert SVG to PDF: {0}")]
    Pdf(String),
    #[error("Invalid raster scale: {0}")]
    Scale(f32),
}
