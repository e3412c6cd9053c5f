use super::{
    compute_output_size, resolve_document, validate, ConversionError, ConversionOutcome,
    ConversionRequest, Converted, Converter, Size, SourceDocument,
};
use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    ExtendedColorType, ImageEncoder,
};
use log::debug;
use resvg::{
    tiny_skia::{Color, Pixmap},
    usvg::{fontdb::Database, Options, Transform, Tree},
};
use std::sync::Arc;
use tokio::task;

/// Draws SVG documents onto private pixmaps and encodes them as PNG.
pub struct Rasterizer {
    font_db: Arc<Database>,
}

impl Rasterizer {
    pub fn new(font_db: Arc<Database>) -> Self {
        Self { font_db }
    }

    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::new(Arc::new(db))
    }

    pub async fn rasterize(
        &self,
        source: &SourceDocument,
        request: &ConversionRequest,
    ) -> ConversionOutcome {
        let original_size = match validate(source.text()) {
            Ok(doc) => resolve_document(&doc),
            Err(err) => {
                debug!("Rejected document: {err}");
                return Err(ConversionError::InvalidSvg);
            }
        };

        let output_size = compute_output_size(original_size, request);
        let (width, height) = pixel_size(output_size).ok_or_else(|| {
            ConversionError::Other(format!("invalid output size {output_size}"))
        })?;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ConversionError::Other(format!("could not allocate a {width}x{height} surface"))
        })?;

        if !request.transparent_background.unwrap_or(false) {
            pixmap.fill(Color::WHITE);
        }

        let pixmap = {
            let source = source.clone();
            let font_db = self.font_db.clone();
            task::spawn_blocking(move || draw(&source, font_db, pixmap))
                .await
                .map_err(|err| ConversionError::Other(err.to_string()))??
        };

        let quality = request.quality.unwrap_or(1.0);
        let png = task::spawn_blocking(move || encode(&pixmap, quality))
            .await
            .map_err(|err| ConversionError::Other(err.to_string()))?
            .map_err(|err| {
                debug!("PNG encoding failed: {err}");
                ConversionError::Encode
            })?;

        Ok(Converted {
            png,
            original_size,
            output_size,
        })
    }
}

impl Converter for Rasterizer {
    async fn convert(
        &self,
        source: &SourceDocument,
        request: &ConversionRequest,
    ) -> ConversionOutcome {
        self.rasterize(source, request).await
    }
}

fn pixel_size(size: Size) -> Option<(u32, u32)> {
    let dimension = |value: f32| {
        (value.is_finite() && value > 0.0).then(|| value.round().max(1.0) as u32)
    };

    Some((dimension(size.width)?, dimension(size.height)?))
}

/// Stretches the document over the whole pixmap, no letterboxing.
fn draw(
    source: &SourceDocument,
    font_db: Arc<Database>,
    mut pixmap: Pixmap,
) -> Result<Pixmap, ConversionError> {
    let opt = Options {
        fontdb: font_db,
        ..Default::default()
    };

    let rtree = Tree::from_str(source.text(), &opt).map_err(|err| {
        debug!("Failed to parse SVG: {err}");
        ConversionError::Decode
    })?;

    let tree_size = rtree.size();
    let transform = Transform::from_scale(
        pixmap.width() as f32 / tree_size.width(),
        pixmap.height() as f32 / tree_size.height(),
    );

    resvg::render(&rtree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}

/// PNG is lossless, so the quality hint picks how hard the encoder works.
fn compression_for(quality: f32) -> CompressionType {
    if quality >= 0.9 {
        CompressionType::Best
    } else if quality >= 0.5 {
        CompressionType::Default
    } else {
        CompressionType::Fast
    }
}

fn encode(pixmap: &Pixmap, quality: f32) -> image::ImageResult<Vec<u8>> {
    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect::<Vec<_>>();

    let mut png = Vec::new();
    PngEncoder::new_with_quality(&mut png, compression_for(quality), FilterType::Adaptive)
        .write_image(
            &rgba,
            pixmap.width(),
            pixmap.height(),
            ExtendedColorType::Rgba8,
        )?;

    Ok(png)
}
