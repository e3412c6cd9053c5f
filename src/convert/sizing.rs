use super::{ConversionRequest, Size};

/// Computes the raster size for a document of size `intrinsic`.
///
/// Aspect ratio correction only applies when exactly one of width/height is
/// requested. Asking for both sets them verbatim even with
/// `maintain_aspect_ratio`. The scale multiplier is applied last. No upper
/// bound is enforced here.
pub fn compute_output_size(intrinsic: Size, request: &ConversionRequest) -> Size {
    let mut width = request.width.unwrap_or(intrinsic.width);
    let mut height = request.height.unwrap_or(intrinsic.height);

    if request.maintain_aspect_ratio.unwrap_or(false) {
        let aspect_ratio = intrinsic.width / intrinsic.height;

        match (request.width, request.height) {
            (Some(requested), None) => height = requested / aspect_ratio,
            (None, Some(requested)) => width = requested * aspect_ratio,
            _ => {}
        }
    }

    let scale = request.scale.unwrap_or(1.0);

    Size::new(width * scale, height * scale)
}
