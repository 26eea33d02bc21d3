//! PDF serialization.
//!
//! A single page is created from a page-size/orientation/unit triple and
//! the artwork is centered within the page margins. Scenes expressible
//! with solid paints are written directly into the content stream as
//! vectors; gradient or image paints trigger the raster fallback, which
//! embeds a rasterized JPEG instead.
//!
//! PDF's origin is bottom-left, like PostScript; the vector path
//! applies the Y-flip once through the content-stream transform matrix.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use qrforge_common::{Color, QrForgeResult, RenderWarning};
use qrforge_scene_core::{PathCommand, PathData, Paint, RenderedScene, SceneNode, Transform};

use crate::raster::{encode_jpeg_rgb, Rasterizer};
use crate::svg::{scene_to_svg, DocumentMetadata, SvgOptions};

/// Raster fallback supersampling factor relative to the canvas size.
const RASTER_FALLBACK_SCALE: f64 = 2.0;

/// Standard page sizes, portrait-first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    A4,
    Letter,
    Legal,
    A3,
    A5,
    /// Custom dimensions expressed in the job's [`PageUnit`].
    Custom { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageUnit {
    Mm,
    Cm,
    In,
    Px,
    Pt,
}

impl PageUnit {
    /// Convert a value in this unit to PostScript points.
    pub fn to_points(&self, value: f64) -> f64 {
        match self {
            Self::Mm => value * 72.0 / 25.4,
            Self::Cm => value * 72.0 / 2.54,
            Self::In => value * 72.0,
            // CSS reference pixel at 96 dpi.
            Self::Px => value * 0.75,
            Self::Pt => value,
        }
    }
}

impl PageSize {
    /// Page dimensions in points, before orientation.
    pub fn dimensions_pt(&self, unit: PageUnit) -> (f64, f64) {
        let mm = PageUnit::Mm;
        let inch = PageUnit::In;
        match *self {
            Self::A4 => (mm.to_points(210.0), mm.to_points(297.0)),
            Self::A3 => (mm.to_points(297.0), mm.to_points(420.0)),
            Self::A5 => (mm.to_points(148.0), mm.to_points(210.0)),
            Self::Letter => (inch.to_points(8.5), inch.to_points(11.0)),
            Self::Legal => (inch.to_points(8.5), inch.to_points(14.0)),
            Self::Custom { width, height } => (unit.to_points(width), unit.to_points(height)),
        }
    }
}

/// PDF export options.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub unit: PageUnit,

    /// Page margin, expressed in `unit`.
    pub margin: f64,

    pub metadata: Option<DocumentMetadata>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            unit: PageUnit::Mm,
            margin: 10.0,
            metadata: None,
        }
    }
}

/// Serialized PDF plus any fallback applied.
#[derive(Debug, Clone)]
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub warnings: Vec<RenderWarning>,
}

/// Serialize a composed scene to a single-page PDF.
pub fn scene_to_pdf(
    scene: &RenderedScene,
    options: &PdfOptions,
    rasterizer: &dyn Rasterizer,
) -> QrForgeResult<PdfOutput> {
    let (base_w, base_h) = options.page_size.dimensions_pt(options.unit);
    let (page_w, page_h) = match options.orientation {
        Orientation::Portrait => (base_w, base_h),
        Orientation::Landscape => (base_h, base_w),
    };

    let margin = options.unit.to_points(options.margin).max(0.0);
    let avail_w = (page_w - 2.0 * margin).max(1.0);
    let avail_h = (page_h - 2.0 * margin).max(1.0);
    let scale = (avail_w / scene.width).min(avail_h / scene.height);
    let art_w = scene.width * scale;
    let art_h = scene.height * scale;
    let tx = (page_w - art_w) / 2.0;
    let ty = (page_h - art_h) / 2.0;

    let mut warnings = Vec::new();

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let image_id = Ref::new(5);
    let info_id = Ref::new(6);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    let vector = scene.is_vector_solid();
    let mut jpeg: Option<(Vec<u8>, u32, u32)> = None;

    if !vector {
        // Rasterize once up front so a failure surfaces before any page
        // objects are written.
        let reason = "scene uses gradient or image paints".to_string();
        tracing::debug!(%reason, "PDF raster fallback");
        let px = (scene.width * RASTER_FALLBACK_SCALE).round().max(1.0) as u32;
        let svg = scene_to_svg(
            scene,
            &SvgOptions {
                metadata: None,
                ..SvgOptions::default()
            },
        );
        let image = rasterizer.rasterize(&svg, px, px)?;
        let data = encode_jpeg_rgb(&image, Color::WHITE)?;
        jpeg = Some((data, image.width, image.height));
        warnings.push(RenderWarning::PdfRasterFallback { reason });
    }

    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w as f32, page_h as f32));
        page.parent(pages_id);
        page.contents(content_id);
        let mut resources = page.resources();
        if jpeg.is_some() {
            resources.x_objects().pair(Name(b"Im1"), image_id);
        }
        resources.finish();
        page.finish();
    }

    let mut content = Content::new();
    if let Some((data, width, height)) = &jpeg {
        content.save_state();
        content.transform([art_w as f32, 0.0, 0.0, art_h as f32, tx as f32, ty as f32]);
        content.x_object(Name(b"Im1"));
        content.restore_state();

        let mut image = pdf.image_xobject(image_id, data);
        image.filter(Filter::DctDecode);
        image.width(*width as i32);
        image.height(*height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();
    } else {
        content.save_state();
        // Map scene space (top-left origin) onto the page: scale,
        // flip Y, center.
        content.transform([
            scale as f32,
            0.0,
            0.0,
            -scale as f32,
            tx as f32,
            (ty + art_h) as f32,
        ]);
        for node in &scene.nodes {
            write_node(&mut content, node);
        }
        content.restore_state();
    }
    pdf.stream(content_id, &content.finish());

    let metadata = options.metadata.clone().unwrap_or_default();
    let mut info = pdf.document_info(info_id);
    info.title(TextStr(&metadata.title));
    info.author(TextStr(&metadata.creator));
    if let Some(description) = &metadata.description {
        info.subject(TextStr(description));
    }
    info.keywords(TextStr("qr code"));
    info.producer(TextStr("qrforge"));
    info.finish();

    Ok(PdfOutput {
        bytes: pdf.finish(),
        warnings,
    })
}

fn write_node(content: &mut Content, node: &SceneNode) {
    match node {
        SceneNode::Rect {
            x,
            y,
            w,
            h,
            rx,
            fill,
            stroke,
        } => {
            if *rx > 0.0 {
                let mut data = PathData::new();
                data.push_rounded_rect(*x, *y, *w, *h, *rx);
                fill_path(content, &data, fill, false);
                stroke_path(content, &data, stroke);
            } else {
                if let Some(color) = fill.as_solid() {
                    set_fill(content, color);
                    content.rect(*x as f32, *y as f32, *w as f32, *h as f32);
                    content.fill_nonzero();
                }
                let mut data = PathData::new();
                data.push_rect(*x, *y, *w, *h);
                stroke_path(content, &data, stroke);
            }
        }
        SceneNode::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
        } => {
            let mut data = PathData::new();
            data.push_circle(*cx, *cy, *r);
            fill_path(content, &data, fill, false);
            stroke_path(content, &data, stroke);
        }
        SceneNode::Path {
            data,
            fill,
            even_odd,
            stroke,
        } => {
            fill_path(content, data, fill, *even_odd);
            stroke_path(content, data, stroke);
        }
        // Vector output never carries images; the raster fallback owns
        // image-bearing scenes entirely.
        SceneNode::Image { .. } => {}
        SceneNode::Group {
            transform,
            children,
            ..
        } => {
            let rotated = matches!(transform, Some(Transform::Rotate { .. }));
            if rotated {
                content.save_state();
            }
            if let Some(Transform::Rotate { deg, cx, cy }) = transform {
                let theta = deg.to_radians();
                let (sin, cos) = theta.sin_cos();
                // rotate(deg, cx, cy) composed in scene coordinates.
                content.transform([
                    cos as f32,
                    sin as f32,
                    -sin as f32,
                    cos as f32,
                    (cx - cx * cos + cy * sin) as f32,
                    (cy - cx * sin - cy * cos) as f32,
                ]);
            }
            for child in children {
                write_node(content, child);
            }
            if rotated {
                content.restore_state();
            }
        }
    }
}

fn fill_path(content: &mut Content, data: &PathData, fill: &Paint, even_odd: bool) {
    let Some(color) = fill.as_solid() else {
        return;
    };
    set_fill(content, color);
    emit_path(content, data);
    if even_odd {
        content.fill_even_odd();
    } else {
        content.fill_nonzero();
    }
}

fn stroke_path(
    content: &mut Content,
    data: &PathData,
    stroke: &Option<qrforge_scene_core::Stroke>,
) {
    let Some(stroke) = stroke else {
        return;
    };
    let Some(color) = stroke.paint.as_solid() else {
        return;
    };
    let (r, g, b) = color.to_rgb_f32();
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(stroke.width as f32);
    if let Some(dash) = &stroke.dash {
        content.set_dash_pattern(dash.iter().map(|d| *d as f32), 0.0);
    }
    emit_path(content, data);
    content.stroke();
}

fn set_fill(content: &mut Content, color: Color) {
    let (r, g, b) = color.to_rgb_f32();
    content.set_fill_rgb(r, g, b);
}

/// Emit path commands; PDF has no quadratic or H/V operators, so those
/// are rewritten with the current point tracked in scene space.
fn emit_path(content: &mut Content, data: &PathData) {
    let mut current = (0.0f64, 0.0f64);
    for command in &data.commands {
        match *command {
            PathCommand::MoveTo { x, y } => {
                content.move_to(x as f32, y as f32);
                current = (x, y);
            }
            PathCommand::LineTo { x, y } => {
                content.line_to(x as f32, y as f32);
                current = (x, y);
            }
            PathCommand::HorizTo { x } => {
                content.line_to(x as f32, current.1 as f32);
                current.0 = x;
            }
            PathCommand::VertTo { y } => {
                content.line_to(current.0 as f32, y as f32);
                current.1 = y;
            }
            PathCommand::QuadTo { x1, y1, x, y } => {
                let (x0, y0) = current;
                let c1x = x0 + 2.0 / 3.0 * (x1 - x0);
                let c1y = y0 + 2.0 / 3.0 * (y1 - y0);
                let c2x = x + 2.0 / 3.0 * (x1 - x);
                let c2y = y + 2.0 / 3.0 * (y1 - y);
                content.cubic_to(
                    c1x as f32, c1y as f32, c2x as f32, c2y as f32, x as f32, y as f32,
                );
                current = (x, y);
            }
            PathCommand::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                content.cubic_to(
                    x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                );
                current = (x, y);
            }
            PathCommand::Close => {
                content.close_path();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterImage;
    use qrforge_common::QrForgeResult;
    use qrforge_design_model::{
        DesignerConfig, EcLevel, FillConfig, GradientKind, GradientSpec,
    };
    use qrforge_scene_core::render_design;

    struct StubRasterizer;

    impl Rasterizer for StubRasterizer {
        fn rasterize(&self, _svg: &str, width: u32, height: u32) -> QrForgeResult<RasterImage> {
            Ok(RasterImage {
                width,
                height,
                rgba: vec![255; (width * height * 4) as usize],
            })
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_unit_conversions() {
        assert!((PageUnit::Mm.to_points(25.4) - 72.0).abs() < 1e-9);
        assert!((PageUnit::In.to_points(1.0) - 72.0).abs() < 1e-9);
        assert!((PageUnit::Px.to_points(96.0) - 72.0).abs() < 1e-9);
        assert!((PageUnit::Cm.to_points(2.54) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_a4_landscape_swaps_dimensions() {
        let (w, h) = PageSize::A4.dimensions_pt(PageUnit::Mm);
        assert!(h > w);
        // 210 mm = 595.27 pt.
        assert!((w - 595.275_590_551).abs() < 1e-6);
    }

    #[test]
    fn test_solid_scene_exports_as_vectors() {
        let scene =
            render_design("vector pdf", EcLevel::M, &DesignerConfig::default()).unwrap();
        let output = scene_to_pdf(&scene, &PdfOptions::default(), &StubRasterizer).unwrap();
        assert_eq!(&output.bytes[..5], b"%PDF-");
        assert!(output.warnings.is_empty());
        assert!(!contains(&output.bytes, b"DCTDecode"));
    }

    #[test]
    fn test_gradient_scene_falls_back_to_raster() {
        let design = DesignerConfig {
            foreground: FillConfig::Gradient(GradientSpec {
                kind: GradientKind::Linear,
                start: qrforge_common::Color::BLACK,
                end: qrforge_common::Color::WHITE,
                rotation_deg: 90.0,
            }),
            ..DesignerConfig::default()
        };
        let scene = render_design("raster pdf", EcLevel::M, &design).unwrap();
        let output = scene_to_pdf(&scene, &PdfOptions::default(), &StubRasterizer).unwrap();
        assert!(matches!(
            output.warnings.as_slice(),
            [RenderWarning::PdfRasterFallback { .. }]
        ));
        assert!(contains(&output.bytes, b"DCTDecode"));
    }

    #[test]
    fn test_metadata_lands_in_info_dict() {
        let scene = render_design("pdf info", EcLevel::M, &DesignerConfig::default()).unwrap();
        let options = PdfOptions {
            metadata: Some(DocumentMetadata {
                title: "Spring Menu".to_string(),
                creator: "studio".to_string(),
                description: None,
                date: None,
            }),
            ..PdfOptions::default()
        };
        let output = scene_to_pdf(&scene, &options, &StubRasterizer).unwrap();
        assert!(contains(&output.bytes, b"Spring Menu"));
    }
}
