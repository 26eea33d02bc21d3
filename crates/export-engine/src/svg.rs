//! SVG serialization.
//!
//! Produces a well-formed document with a single root `<svg>` carrying
//! `width`, `height`, and a `viewBox`, an optional Dublin-Core
//! `<metadata>` block, and a `<defs>` section for gradient, pattern,
//! and clip-path nodes referenced by `url(#id)`.

use qrforge_common::{Color, QrForgeError, QrForgeResult};
use qrforge_scene_core::{
    fmt_num, DefNode, Paint, RenderedScene, SceneNode, Stroke, Transform,
};

/// Document metadata embedded as Dublin-Core fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub title: String,
    pub creator: String,
    pub description: Option<String>,
    /// ISO 8601 date; today when absent.
    pub date: Option<String>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "QR Code".to_string(),
            creator: "qrforge".to_string(),
            description: None,
            date: None,
        }
    }
}

impl DocumentMetadata {
    fn date_or_today(&self) -> String {
        self.date
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string())
    }
}

/// SVG serialization options.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Emit the leading `<?xml ...?>` declaration.
    pub xml_declaration: bool,

    /// Dublin-Core metadata block.
    pub metadata: Option<DocumentMetadata>,

    /// Solid background rect inserted before the scene's own layers.
    pub background: Option<Color>,

    /// Optimized output: no indentation, newlines, or comments.
    pub optimized: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            metadata: None,
            background: None,
            optimized: false,
        }
    }
}

struct SvgWriter {
    out: String,
    optimized: bool,
    depth: usize,
}

impl SvgWriter {
    fn new(optimized: bool) -> Self {
        Self {
            out: String::new(),
            optimized,
            depth: 0,
        }
    }

    fn line(&mut self, content: &str) {
        if self.optimized {
            self.out.push_str(content);
        } else {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
            self.out.push_str(content);
            self.out.push('\n');
        }
    }

    fn open(&mut self, content: &str) {
        self.line(content);
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{tag}>"));
    }
}

/// Serialize a composed scene.
pub fn scene_to_svg(scene: &RenderedScene, options: &SvgOptions) -> String {
    let mut w = SvgWriter::new(options.optimized);

    if options.xml_declaration {
        w.line("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    }

    let width = fmt_num(scene.width);
    let height = fmt_num(scene.height);
    w.open(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    ));

    if let Some(metadata) = &options.metadata {
        write_metadata(&mut w, metadata);
    }

    if !scene.defs.is_empty() {
        w.open("<defs>");
        for def in &scene.defs {
            write_def(&mut w, def);
        }
        w.close("defs");
    }

    if let Some(background) = options.background {
        w.line(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            background.to_hex()
        ));
    }

    for node in &scene.nodes {
        write_node(&mut w, node);
    }

    w.close("svg");
    w.out
}

fn write_metadata(w: &mut SvgWriter, metadata: &DocumentMetadata) {
    w.open("<metadata>");
    w.open(
        "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\">",
    );
    w.open("<rdf:Description>");
    w.line(&format!("<dc:title>{}</dc:title>", escape_xml(&metadata.title)));
    w.line(&format!(
        "<dc:creator>{}</dc:creator>",
        escape_xml(&metadata.creator)
    ));
    if let Some(description) = &metadata.description {
        w.line(&format!(
            "<dc:description>{}</dc:description>",
            escape_xml(description)
        ));
    }
    w.line(&format!("<dc:date>{}</dc:date>", metadata.date_or_today()));
    w.line("<dc:format>image/svg+xml</dc:format>");
    w.close("rdf:Description");
    w.close("rdf:RDF");
    w.close("metadata");
}

fn write_def(w: &mut SvgWriter, def: &DefNode) {
    match def {
        DefNode::LinearGradient {
            id,
            start,
            end,
            x1,
            y1,
            x2,
            y2,
        } => {
            w.open(&format!(
                "<linearGradient id=\"{id}\" x1=\"{}%\" y1=\"{}%\" x2=\"{}%\" y2=\"{}%\">",
                fmt_num(*x1),
                fmt_num(*y1),
                fmt_num(*x2),
                fmt_num(*y2)
            ));
            w.line(&format!(
                "<stop offset=\"0%\" stop-color=\"{}\"/>",
                start.to_hex()
            ));
            w.line(&format!(
                "<stop offset=\"100%\" stop-color=\"{}\"/>",
                end.to_hex()
            ));
            w.close("linearGradient");
        }
        DefNode::RadialGradient { id, start, end } => {
            w.open(&format!(
                "<radialGradient id=\"{id}\" cx=\"50%\" cy=\"50%\" r=\"50%\">"
            ));
            w.line(&format!(
                "<stop offset=\"0%\" stop-color=\"{}\"/>",
                start.to_hex()
            ));
            w.line(&format!(
                "<stop offset=\"100%\" stop-color=\"{}\"/>",
                end.to_hex()
            ));
            w.close("radialGradient");
        }
        DefNode::ImagePattern { id, href, opacity } => {
            w.open(&format!(
                "<pattern id=\"{id}\" patternUnits=\"objectBoundingBox\" width=\"1\" height=\"1\">"
            ));
            w.line(&format!(
                "<image href=\"{}\" width=\"1\" height=\"1\" \
                 preserveAspectRatio=\"xMidYMid slice\" opacity=\"{}\"/>",
                escape_xml(href),
                fmt_num(*opacity)
            ));
            w.close("pattern");
        }
        DefNode::CircleClip { id, cx, cy, r } => {
            w.open(&format!("<clipPath id=\"{id}\">"));
            w.line(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                fmt_num(*cx),
                fmt_num(*cy),
                fmt_num(*r)
            ));
            w.close("clipPath");
        }
    }
}

fn write_node(w: &mut SvgWriter, node: &SceneNode) {
    match node {
        SceneNode::Rect {
            x,
            y,
            w: width,
            h,
            rx,
            fill,
            stroke,
        } => {
            let mut attrs = format!(
                "x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*width),
                fmt_num(*h)
            );
            if *rx > 0.0 {
                attrs.push_str(&format!(" rx=\"{}\"", fmt_num(*rx)));
            }
            w.line(&format!(
                "<rect {attrs} fill=\"{}\"{}/>",
                paint_ref(fill),
                stroke_attrs(stroke)
            ));
        }
        SceneNode::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
        } => {
            w.line(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"{}/>",
                fmt_num(*cx),
                fmt_num(*cy),
                fmt_num(*r),
                paint_ref(fill),
                stroke_attrs(stroke)
            ));
        }
        SceneNode::Path {
            data,
            fill,
            even_odd,
            stroke,
        } => {
            let rule = if *even_odd {
                " fill-rule=\"evenodd\""
            } else {
                ""
            };
            w.line(&format!(
                "<path d=\"{}\" fill=\"{}\"{rule}{}/>",
                data.to_svg(),
                paint_ref(fill),
                stroke_attrs(stroke)
            ));
        }
        SceneNode::Image {
            href,
            x,
            y,
            w: width,
            h,
            opacity,
            clip,
        } => {
            let mut attrs = format!(
                "href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
                 preserveAspectRatio=\"xMidYMid slice\"",
                escape_xml(href),
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*width),
                fmt_num(*h)
            );
            if *opacity < 1.0 {
                attrs.push_str(&format!(" opacity=\"{}\"", fmt_num(*opacity)));
            }
            if let Some(clip) = clip {
                attrs.push_str(&format!(" clip-path=\"url(#{clip})\""));
            }
            w.line(&format!("<image {attrs}/>"));
        }
        SceneNode::Group {
            transform,
            opacity,
            children,
        } => {
            let mut attrs = String::new();
            if let Some(Transform::Rotate { deg, cx, cy }) = transform {
                attrs.push_str(&format!(
                    " transform=\"rotate({} {} {})\"",
                    fmt_num(*deg),
                    fmt_num(*cx),
                    fmt_num(*cy)
                ));
            }
            if *opacity < 1.0 {
                attrs.push_str(&format!(" opacity=\"{}\"", fmt_num(*opacity)));
            }
            w.open(&format!("<g{attrs}>"));
            for child in children {
                write_node(w, child);
            }
            w.close("g");
        }
    }
}

fn paint_ref(paint: &Paint) -> String {
    match paint {
        Paint::None => "none".to_string(),
        Paint::Solid(color) => color.to_hex(),
        Paint::Reference(id) => format!("url(#{id})"),
    }
}

fn stroke_attrs(stroke: &Option<Stroke>) -> String {
    let Some(stroke) = stroke else {
        return String::new();
    };
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        paint_ref(&stroke.paint),
        fmt_num(stroke.width)
    );
    if let Some(dash) = &stroke.dash {
        let pattern: Vec<String> = dash.iter().map(|d| fmt_num(*d)).collect();
        attrs.push_str(&format!(" stroke-dasharray=\"{}\"", pattern.join(" ")));
    }
    attrs
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rewrite the root `width`/`height` attributes, preserving the
/// `viewBox` so the drawing scales instead of cropping.
pub fn resize_svg(svg: &str, width: u32, height: u32) -> QrForgeResult<String> {
    let start = svg
        .find("<svg")
        .ok_or_else(|| QrForgeError::serialization("no <svg> root element"))?;
    let end = svg[start..]
        .find('>')
        .map(|i| start + i)
        .ok_or_else(|| QrForgeError::serialization("unterminated <svg> root tag"))?;

    let tag = &svg[start..=end];
    let tag = replace_attr(tag, "width", &width.to_string())?;
    let tag = replace_attr(&tag, "height", &height.to_string())?;

    Ok(format!("{}{}{}", &svg[..start], tag, &svg[end + 1..]))
}

fn replace_attr(tag: &str, name: &str, value: &str) -> QrForgeResult<String> {
    let needle = format!(" {name}=\"");
    let at = tag
        .find(&needle)
        .ok_or_else(|| QrForgeError::serialization(format!("root tag missing {name}")))?;
    let value_start = at + needle.len();
    let value_end = tag[value_start..]
        .find('"')
        .map(|i| value_start + i)
        .ok_or_else(|| QrForgeError::serialization(format!("unterminated {name} attribute")))?;
    Ok(format!(
        "{}{}{}",
        &tag[..value_start],
        value,
        &tag[value_end..]
    ))
}

/// Read an attribute off the root `<svg>` tag.
pub fn root_attr(svg: &str, name: &str) -> Option<String> {
    let start = svg.find("<svg")?;
    let end = svg[start..].find('>')? + start;
    let tag = &svg[start..=end];
    let needle = format!(" {name}=\"");
    let at = tag.find(&needle)?;
    let value_start = at + needle.len();
    let value_end = tag[value_start..].find('"')? + value_start;
    Some(tag[value_start..value_end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrforge_design_model::{DesignerConfig, EcLevel};
    use qrforge_scene_core::render_design;

    fn sample_scene() -> RenderedScene {
        render_design("https://example.com", EcLevel::M, &DesignerConfig::default()).unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_requested_size() {
        let svg = scene_to_svg(&sample_scene(), &SvgOptions::default());
        assert_eq!(root_attr(&svg, "width").as_deref(), Some("1024"));
        assert_eq!(root_attr(&svg, "height").as_deref(), Some("1024"));
        assert_eq!(root_attr(&svg, "viewBox").as_deref(), Some("0 0 1024 1024"));
    }

    #[test]
    fn test_xml_declaration_toggle() {
        let scene = sample_scene();
        let with = scene_to_svg(&scene, &SvgOptions::default());
        assert!(with.starts_with("<?xml"));

        let without = scene_to_svg(
            &scene,
            &SvgOptions {
                xml_declaration: false,
                ..SvgOptions::default()
            },
        );
        assert!(without.starts_with("<svg"));
    }

    #[test]
    fn test_metadata_block_carries_dublin_core() {
        let svg = scene_to_svg(
            &sample_scene(),
            &SvgOptions {
                metadata: Some(DocumentMetadata {
                    title: "Menu & Specials".to_string(),
                    creator: "qrforge".to_string(),
                    description: Some("table tent".to_string()),
                    date: Some("2024-06-01".to_string()),
                }),
                ..SvgOptions::default()
            },
        );
        assert!(svg.contains("<dc:title>Menu &amp; Specials</dc:title>"));
        assert!(svg.contains("<dc:date>2024-06-01</dc:date>"));
        assert!(svg.contains("image/svg+xml"));
    }

    #[test]
    fn test_optimized_output_has_no_newlines() {
        let svg = scene_to_svg(
            &sample_scene(),
            &SvgOptions {
                optimized: true,
                xml_declaration: false,
                ..SvgOptions::default()
            },
        );
        assert!(!svg.contains('\n'));
        assert!(svg.len() < scene_to_svg(&sample_scene(), &SvgOptions::default()).len());
    }

    #[test]
    fn test_resize_rewrites_only_dimensions() {
        let svg = scene_to_svg(&sample_scene(), &SvgOptions::default());
        let resized = resize_svg(&svg, 512, 512).unwrap();
        assert_eq!(root_attr(&resized, "width").as_deref(), Some("512"));
        assert_eq!(root_attr(&resized, "height").as_deref(), Some("512"));
        // The viewBox still describes the original canvas.
        assert_eq!(
            root_attr(&resized, "viewBox").as_deref(),
            Some("0 0 1024 1024")
        );
    }

    #[test]
    fn test_background_rect_insertion() {
        let svg = scene_to_svg(
            &sample_scene(),
            &SvgOptions {
                background: Some(qrforge_common::Color::WHITE),
                ..SvgOptions::default()
            },
        );
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>"));
    }
}
