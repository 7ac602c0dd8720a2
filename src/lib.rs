//! Data Flow Diagram rendering.
//!
//! A JSON description is parsed into a [`dfd::DiagramModel`], laid out in
//! three fixed columns, and drawn onto a [`dfd::Surface`]. The
//! [`dfd::Canvas`] surface serializes to SVG; [`export`] turns that into PNG
//! or PDF bytes.

pub mod dfd;
pub mod error;
pub mod export;
pub mod fonts;
pub mod theme;
pub mod xml;

pub use error::{ExportError, ParseError};
