//! EPS serialization.
//!
//! Translates scene nodes into PostScript drawing ops. PostScript's
//! origin is bottom-left while the scene's is top-left, so every Y
//! coordinate is flipped as `height - y` (`height - y - h` for rects)
//! during translation.
//!
//! Quadratic segments have no PostScript equivalent; they are converted
//! to cubics (control points at 2/3 along each leg) before emission so
//! rounded module shapes survive EPS export.

use qrforge_common::{Color, RenderWarning};
use qrforge_scene_core::{
    fmt_num, DefNode, Paint, PathCommand, PathData, RenderedScene, SceneNode, Stroke, Transform,
};

use crate::svg::DocumentMetadata;

/// EPS serialization options.
#[derive(Debug, Clone, Default)]
pub struct EpsOptions {
    pub metadata: Option<DocumentMetadata>,
}

/// Serialized EPS plus the degradations applied along the way.
#[derive(Debug, Clone)]
pub struct EpsOutput {
    pub postscript: String,
    pub warnings: Vec<RenderWarning>,
}

/// Serialize a composed scene to EPS.
pub fn scene_to_eps(scene: &RenderedScene, options: &EpsOptions) -> EpsOutput {
    let mut emitter = Emitter {
        out: String::new(),
        height: scene.height,
        defs: &scene.defs,
        warnings: Vec::new(),
    };

    emitter.header(scene, options);
    emitter.prolog();
    for node in &scene.nodes {
        emitter.node(node);
    }
    emitter.push_line("showpage");
    emitter.push_line("%%EOF");

    EpsOutput {
        postscript: emitter.out,
        warnings: emitter.warnings,
    }
}

struct Emitter<'a> {
    out: String,
    height: f64,
    defs: &'a [DefNode],
    warnings: Vec<RenderWarning>,
}

impl Emitter<'_> {
    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    fn header(&mut self, scene: &RenderedScene, options: &EpsOptions) {
        let metadata = options.metadata.clone().unwrap_or_default();
        self.push_line("%!PS-Adobe-3.0 EPSF-3.0");
        self.push_line(&format!(
            "%%BoundingBox: 0 0 {} {}",
            scene.width.ceil() as i64,
            scene.height.ceil() as i64
        ));
        self.push_line(&format!(
            "%%HiResBoundingBox: 0 0 {} {}",
            fmt_num(scene.width),
            fmt_num(scene.height)
        ));
        self.push_line(&format!("%%Title: ({})", escape_ps(&metadata.title)));
        self.push_line(&format!("%%Creator: ({})", escape_ps(&metadata.creator)));
        self.push_line(&format!(
            "%%CreationDate: ({})",
            metadata
                .date
                .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string())
        ));
        self.push_line("%%DocumentData: Clean7Bit");
        self.push_line("%%LanguageLevel: 2");
        self.push_line("%%Pages: 1");
        self.push_line("%%EndComments");
    }

    fn prolog(&mut self) {
        self.push_line("%%BeginProlog");
        self.push_line("/m { moveto } bind def");
        self.push_line("/l { lineto } bind def");
        self.push_line("/c { curveto } bind def");
        self.push_line("/cp { closepath } bind def");
        self.push_line("/f { fill } bind def");
        self.push_line("/ef { eofill } bind def");
        self.push_line("/s { stroke } bind def");
        self.push_line("/w { setlinewidth } bind def");
        self.push_line("/rgb { setrgbcolor } bind def");
        self.push_line("/rf { rectfill } bind def");
        self.push_line("%%EndProlog");
    }

    fn node(&mut self, node: &SceneNode) {
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
                    self.filled_path(&data, fill, false, "rounded rect");
                    self.stroked_path(&data, stroke);
                } else if stroke.is_none() {
                    if let Some(color) = self.flatten(fill, "rect") {
                        self.set_color(color);
                        self.push_line(&format!(
                            "{} {} {} {} rf",
                            fmt_num(*x),
                            fmt_num(self.flip(*y) - h),
                            fmt_num(*w),
                            fmt_num(*h)
                        ));
                    }
                } else {
                    let mut data = PathData::new();
                    data.push_rect(*x, *y, *w, *h);
                    self.filled_path(&data, fill, false, "rect");
                    self.stroked_path(&data, stroke);
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
                self.filled_path(&data, fill, false, "circle");
                self.stroked_path(&data, stroke);
            }
            SceneNode::Path {
                data,
                fill,
                even_odd,
                stroke,
            } => {
                self.filled_path(data, fill, *even_odd, "path");
                self.stroked_path(data, stroke);
            }
            SceneNode::Image { href, .. } => {
                // EPS output carries vector art only.
                self.warnings.push(RenderWarning::AssetSkipped {
                    url: href.clone(),
                    reason: "EPS export does not embed images".to_string(),
                });
            }
            SceneNode::Group {
                transform,
                children,
                ..
            } => {
                let rotated = matches!(transform, Some(Transform::Rotate { .. }));
                if let Some(Transform::Rotate { deg, cx, cy }) = transform {
                    // A clockwise rotation in top-left coordinates is
                    // counterclockwise once the Y axis is flipped.
                    let fy = self.flip(*cy);
                    self.push_line("gsave");
                    self.push_line(&format!("{} {} translate", fmt_num(*cx), fmt_num(fy)));
                    self.push_line(&format!("{} rotate", fmt_num(-*deg)));
                    self.push_line(&format!(
                        "{} {} translate",
                        fmt_num(-*cx),
                        fmt_num(-fy)
                    ));
                }
                for child in children {
                    self.node(child);
                }
                if rotated {
                    self.push_line("grestore");
                }
            }
        }
    }

    fn filled_path(&mut self, data: &PathData, fill: &Paint, even_odd: bool, element: &str) {
        let Some(color) = self.flatten(fill, element) else {
            return;
        };
        self.set_color(color);
        self.path_commands(data);
        self.push_line(if even_odd { "ef" } else { "f" });
    }

    fn stroked_path(&mut self, data: &PathData, stroke: &Option<Stroke>) {
        let Some(stroke) = stroke else {
            return;
        };
        let Some(color) = self.flatten(&stroke.paint, "stroke") else {
            return;
        };
        self.push_line("gsave");
        self.set_color(color);
        self.push_line(&format!("{} w", fmt_num(stroke.width)));
        if let Some(dash) = &stroke.dash {
            let pattern: Vec<String> = dash.iter().map(|d| fmt_num(*d)).collect();
            self.push_line(&format!("[{}] 0 setdash", pattern.join(" ")));
        }
        self.path_commands(data);
        self.push_line("s");
        self.push_line("grestore");
    }

    /// Translate path commands, flipping Y per coordinate pair and
    /// rewriting H/V/Q in terms of m/l/c.
    fn path_commands(&mut self, data: &PathData) {
        let mut current = (0.0, 0.0);
        let mut lines = Vec::new();
        for command in &data.commands {
            match *command {
                PathCommand::MoveTo { x, y } => {
                    lines.push(format!("{} {} m", fmt_num(x), fmt_num(self.flip(y))));
                    current = (x, y);
                }
                PathCommand::LineTo { x, y } => {
                    lines.push(format!("{} {} l", fmt_num(x), fmt_num(self.flip(y))));
                    current = (x, y);
                }
                PathCommand::HorizTo { x } => {
                    lines.push(format!(
                        "{} {} l",
                        fmt_num(x),
                        fmt_num(self.flip(current.1))
                    ));
                    current.0 = x;
                }
                PathCommand::VertTo { y } => {
                    lines.push(format!(
                        "{} {} l",
                        fmt_num(current.0),
                        fmt_num(self.flip(y))
                    ));
                    current.1 = y;
                }
                PathCommand::QuadTo { x1, y1, x, y } => {
                    // Exact quadratic-to-cubic elevation.
                    let (x0, y0) = current;
                    let c1x = x0 + 2.0 / 3.0 * (x1 - x0);
                    let c1y = y0 + 2.0 / 3.0 * (y1 - y0);
                    let c2x = x + 2.0 / 3.0 * (x1 - x);
                    let c2y = y + 2.0 / 3.0 * (y1 - y);
                    lines.push(format!(
                        "{} {} {} {} {} {} c",
                        fmt_num(c1x),
                        fmt_num(self.flip(c1y)),
                        fmt_num(c2x),
                        fmt_num(self.flip(c2y)),
                        fmt_num(x),
                        fmt_num(self.flip(y))
                    ));
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
                    lines.push(format!(
                        "{} {} {} {} {} {} c",
                        fmt_num(x1),
                        fmt_num(self.flip(y1)),
                        fmt_num(x2),
                        fmt_num(self.flip(y2)),
                        fmt_num(x),
                        fmt_num(self.flip(y))
                    ));
                    current = (x, y);
                }
                PathCommand::Close => lines.push("cp".to_string()),
            }
        }
        for line in lines {
            self.push_line(&line);
        }
    }

    fn set_color(&mut self, color: Color) {
        let (r, g, b) = color.to_rgb_f32();
        self.push_line(&format!(
            "{} {} {} rgb",
            fmt_num(r as f64),
            fmt_num(g as f64),
            fmt_num(b as f64)
        ));
    }

    /// Reduce a paint to a flat color, warning when a gradient or
    /// pattern loses information.
    fn flatten(&mut self, paint: &Paint, element: &str) -> Option<Color> {
        match paint {
            Paint::None => None,
            Paint::Solid(color) => Some(*color),
            Paint::Reference(id) => {
                let color = self
                    .defs
                    .iter()
                    .find(|d| d.id() == id)
                    .and_then(|d| match d {
                        DefNode::LinearGradient { start, .. }
                        | DefNode::RadialGradient { start, .. } => Some(*start),
                        _ => None,
                    })
                    .unwrap_or(Color::BLACK);
                self.warnings.push(RenderWarning::EpsFillDowngraded {
                    element: element.to_string(),
                });
                Some(color)
            }
        }
    }
}

fn escape_ps(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrforge_scene_core::RenderedScene;

    fn scene_with(node: SceneNode) -> RenderedScene {
        let mut scene = RenderedScene::new(300.0, 300.0);
        scene.push(node);
        scene
    }

    #[test]
    fn test_rect_y_flip() {
        // A rect at (10, 20) size 5x5 in a 300-tall canvas anchors at
        // y' = 300 - 20 - 5 = 275.
        let scene = scene_with(SceneNode::Rect {
            x: 10.0,
            y: 20.0,
            w: 5.0,
            h: 5.0,
            rx: 0.0,
            fill: Paint::Solid(Color::BLACK),
            stroke: None,
        });
        let output = scene_to_eps(&scene, &EpsOptions::default());
        assert!(output.postscript.contains("10 275 5 5 rf"));
    }

    #[test]
    fn test_path_commands_flip_each_coordinate() {
        let mut data = PathData::new();
        data.move_to(0.0, 0.0).line_to(100.0, 50.0).close();
        let scene = scene_with(SceneNode::Path {
            data,
            fill: Paint::Solid(Color::BLACK),
            even_odd: false,
            stroke: None,
        });
        let output = scene_to_eps(&scene, &EpsOptions::default());
        assert!(output.postscript.contains("0 300 m"));
        assert!(output.postscript.contains("100 250 l"));
        assert!(output.postscript.contains("cp"));
    }

    #[test]
    fn test_quadratic_converts_to_cubic() {
        let mut data = PathData::new();
        data.move_to(0.0, 0.0).quad_to(30.0, 0.0, 30.0, 30.0);
        let scene = scene_with(SceneNode::Path {
            data,
            fill: Paint::Solid(Color::BLACK),
            even_odd: false,
            stroke: None,
        });
        let output = scene_to_eps(&scene, &EpsOptions::default());
        // Control points at 2/3 of each leg, endpoint preserved, all
        // Y-flipped: c1 = (20, 300), c2 = (30, 290), end = (30, 270).
        assert!(output.postscript.contains("20 300 30 290 30 270 c"));
    }

    #[test]
    fn test_header_and_bounding_box() {
        let scene = RenderedScene::new(300.0, 300.0);
        let output = scene_to_eps(&scene, &EpsOptions::default());
        assert!(output.postscript.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
        assert!(output.postscript.contains("%%BoundingBox: 0 0 300 300"));
        assert!(output.postscript.contains("%%HiResBoundingBox: 0 0 300 300"));
        assert!(output.postscript.contains("%%EndProlog"));
        assert!(output.postscript.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_gradient_fill_downgrades_with_warning() {
        let mut scene = RenderedScene::new(300.0, 300.0);
        scene.push_def(DefNode::LinearGradient {
            id: "fg-paint".to_string(),
            start: Color::new(0x20, 0x40, 0x60),
            end: Color::WHITE,
            x1: 0.0,
            y1: 50.0,
            x2: 100.0,
            y2: 50.0,
        });
        scene.push(SceneNode::Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
            rx: 0.0,
            fill: Paint::Reference("fg-paint".to_string()),
            stroke: None,
        });
        let output = scene_to_eps(&scene, &EpsOptions::default());
        assert!(matches!(
            output.warnings.as_slice(),
            [RenderWarning::EpsFillDowngraded { .. }]
        ));
        // Flattened to the gradient start color.
        assert!(output.postscript.contains("rgb"));
        assert!(output.postscript.contains("0.125"));
    }

    #[test]
    fn test_image_nodes_are_skipped_with_warning() {
        let scene = scene_with(SceneNode::Image {
            href: "logo.png".to_string(),
            x: 0.0,
            y: 0.0,
            w: 50.0,
            h: 50.0,
            opacity: 1.0,
            clip: None,
        });
        let output = scene_to_eps(&scene, &EpsOptions::default());
        assert!(matches!(
            output.warnings.as_slice(),
            [RenderWarning::AssetSkipped { .. }]
        ));
        assert!(!output.postscript.contains("logo.png"));
    }

    #[test]
    fn test_rotation_group_unflips_angle() {
        let scene = scene_with(SceneNode::Group {
            transform: Some(Transform::Rotate {
                deg: 30.0,
                cx: 100.0,
                cy: 100.0,
            }),
            opacity: 1.0,
            children: vec![],
        });
        let output = scene_to_eps(&scene, &EpsOptions::default());
        assert!(output.postscript.contains("100 200 translate"));
        assert!(output.postscript.contains("-30 rotate"));
        assert!(output.postscript.contains("grestore"));
    }
}
