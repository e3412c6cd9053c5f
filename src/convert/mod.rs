use std::{fmt::Display, sync::Arc};
use thiserror::Error;

mod dimensions;
mod raster;
mod sizing;

pub use dimensions::{resolve, resolve_document, validate, ValidationError};
pub use raster::Rasterizer;
pub use sizing::compute_output_size;

/// Raw SVG markup. Cloning is cheap, the text is shared.
#[derive(Debug, Clone)]
pub struct SourceDocument(Arc<str>);

impl SourceDocument {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// A width/height pair in SVG user units (or pixels, once computed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Caller-supplied output parameters. `None` means "derive from the source".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionRequest {
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Encoder hint in `[0, 1]`.
    pub quality: Option<f32>,
    pub transparent_background: Option<bool>,
    pub scale: Option<f32>,
    pub maintain_aspect_ratio: Option<bool>,
}

/// A successfully rasterized document.
#[derive(Debug, Clone)]
pub struct Converted {
    pub png: Vec<u8>,
    pub original_size: Size,
    pub output_size: Size,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid SVG format")]
    InvalidSvg,

    #[error("Failed to load SVG image")]
    Decode,

    #[error("Failed to create blob")]
    Encode,

    #[error("Conversion failed: {0}")]
    Other(String),
}

pub type ConversionOutcome = Result<Converted, ConversionError>;

/// Something that can turn a source document into a PNG.
pub trait Converter {
    async fn convert(
        &self,
        source: &SourceDocument,
        request: &ConversionRequest,
    ) -> ConversionOutcome;
}
