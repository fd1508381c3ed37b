//! Normalizing fetched image bytes into self-contained PNG data

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::config::MAX_SVG_DIMENSION;
use crate::error::MaterializeError;
use crate::roster::fetch::percent_decode;
use crate::state::data::EncodedImage;

/// Decode `bytes` into pixels and re-encode them as PNG.
///
/// Raster formats go through the image crate; SVG is rasterized at its
/// intrinsic size.
pub fn normalize_to_png(bytes: &[u8], svg: bool) -> Result<EncodedImage, MaterializeError> {
    let pixels = if svg {
        rasterize_svg(bytes)?
    } else {
        image::load_from_memory(bytes)?.to_rgba8()
    };

    encode_png(pixels).map(EncodedImage::png)
}

fn encode_png(pixels: RgbaImage) -> Result<Vec<u8>, MaterializeError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| MaterializeError::Encode(e.to_string()))?;
    Ok(buf)
}

fn rasterize_svg(bytes: &[u8]) -> Result<RgbaImage, MaterializeError> {
    fn to_px(v: f32) -> Result<u32, MaterializeError> {
        if !v.is_finite() || v <= 0.0 {
            return Err(MaterializeError::Raster("svg has invalid width/height".to_string()));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    if width > MAX_SVG_DIMENSION || height > MAX_SVG_DIMENSION {
        return Err(MaterializeError::Raster(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIMENSION}x{MAX_SVG_DIMENSION})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MaterializeError::Raster("failed to allocate svg pixmap".to_string()))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(&tree, resvg::tiny_skia::Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let color = px.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| MaterializeError::Raster("pixel buffer size mismatch".to_string()))
}

/// Whether a fetched image should be treated as SVG
pub fn is_svg(path: &str, content_type: Option<&str>) -> bool {
    let target = path.split(['?', '#']).next().unwrap_or_default();
    target.to_ascii_lowercase().ends_with(".svg")
        || content_type.is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/svg"))
}

/// Last path segment, percent-decoded ("a/b/Klee%20Chibi.png" -> "Klee Chibi.png")
pub fn display_name(path: &str) -> String {
    let target = path.split(['?', '#']).next().unwrap_or_default();
    let segment = target.trim_end_matches('/').rsplit('/').next().unwrap_or(target);
    percent_decode(segment)
}
