//! Rasterization capability and PNG export.
//!
//! Off-screen rasterization is a platform side effect, so it sits
//! behind the [`Rasterizer`] trait; the default backend renders the
//! serialized SVG with resvg into a tiny-skia pixmap.

use qrforge_common::{Color, QrForgeError, QrForgeResult};
use qrforge_scene_core::RenderedScene;

use crate::svg::{scene_to_svg, SvgOptions};

/// A decoded raster image, straight RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Flatten onto an opaque background, producing RGB8 rows.
    pub fn flatten_onto(&self, background: Color) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.rgba.len() / 4 * 3);
        for pixel in self.rgba.chunks_exact(4) {
            let alpha = pixel[3] as u32;
            let blend = |fg: u8, bg: u8| -> u8 {
                ((fg as u32 * alpha + bg as u32 * (255 - alpha)) / 255) as u8
            };
            rgb.push(blend(pixel[0], background.r));
            rgb.push(blend(pixel[1], background.g));
            rgb.push(blend(pixel[2], background.b));
        }
        rgb
    }
}

/// Off-screen SVG rasterization.
pub trait Rasterizer: Send + Sync {
    /// Render an SVG document to the requested pixel dimensions.
    fn rasterize(&self, svg: &str, width: u32, height: u32) -> QrForgeResult<RasterImage>;
}

/// Default backend: usvg parse, resvg render, tiny-skia pixmap.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResvgRasterizer;

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, svg: &str, width: u32, height: u32) -> QrForgeResult<RasterImage> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| QrForgeError::raster(format!("SVG parse failed: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| QrForgeError::raster("raster target has zero size"))?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for pixel in pixmap.pixels() {
            let demultiplied = pixel.demultiply();
            rgba.extend_from_slice(&[
                demultiplied.red(),
                demultiplied.green(),
                demultiplied.blue(),
                demultiplied.alpha(),
            ]);
        }

        Ok(RasterImage {
            width,
            height,
            rgba,
        })
    }
}

/// PNG export options.
#[derive(Debug, Clone, PartialEq)]
pub struct PngOptions {
    /// Output scale relative to the canvas size (2.0 for retina).
    pub scale: f64,

    /// Flat background filled before drawing, instead of alpha
    /// transparency.
    pub background: Option<Color>,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

/// Rasterize a scene and encode it as a PNG blob.
pub fn scene_to_png(
    scene: &RenderedScene,
    rasterizer: &dyn Rasterizer,
    options: &PngOptions,
) -> QrForgeResult<Vec<u8>> {
    if !options.scale.is_finite() || options.scale <= 0.0 {
        return Err(QrForgeError::validation(format!(
            "PNG scale {} must be positive",
            options.scale
        )));
    }

    let target = (scene.width * options.scale).round().max(1.0) as u32;
    let svg = scene_to_svg(
        scene,
        &SvgOptions {
            background: options.background,
            metadata: None,
            ..SvgOptions::default()
        },
    );

    let image = rasterizer.rasterize(&svg, target, target)?;
    encode_png(&image)
}

/// Encode RGBA rows as PNG bytes.
pub fn encode_png(image: &RasterImage) -> QrForgeResult<Vec<u8>> {
    let buffer: image::ImageBuffer<image::Rgba<u8>, _> =
        image::ImageBuffer::from_raw(image.width, image.height, image.rgba.clone())
            .ok_or_else(|| QrForgeError::raster("raster buffer does not match dimensions"))?;

    let mut out = Vec::new();
    buffer
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| QrForgeError::raster(format!("PNG encode failed: {e}")))?;
    Ok(out)
}

/// Encode the image as JPEG over an opaque background (PDF embedding).
pub fn encode_jpeg_rgb(image: &RasterImage, background: Color) -> QrForgeResult<Vec<u8>> {
    let rgb = image.flatten_onto(background);
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90);
    encoder
        .encode(&rgb, image.width, image.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| QrForgeError::raster(format!("JPEG encode failed: {e}")))?;
    Ok(out)
}
