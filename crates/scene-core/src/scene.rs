//! The rendered scene tree.
//!
//! A `RenderedScene` is the in-memory vector representation composed for
//! one render: definition nodes (gradients, patterns, clip paths) plus a
//! layered list of shape nodes. It is produced fresh on every config
//! change, handed to a serializer, and discarded.

use qrforge_common::{Color, RenderWarning};

/// Kappa constant for approximating a quarter circle with one cubic.
pub const CIRCLE_KAPPA: f64 = 0.552_284_749_8;

/// Paint applied to a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Solid(Color),
    /// Reference to a definition node (`url(#id)` in SVG).
    Reference(String),
}

impl Paint {
    /// Solid color if this paint carries one directly.
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Self::Solid(color) => Some(*color),
            _ => None,
        }
    }
}

/// Stroke drawn along a shape's contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    /// Dash pattern lengths, `None` for a solid stroke.
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            paint: Paint::Solid(color),
            width,
            dash: None,
        }
    }
}

/// One command of a 2D path (the subset shared by SVG, PDF, and EPS).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    HorizTo { x: f64 },
    VertTo { y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Close,
}

/// A 2D path as explicit commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::MoveTo { x, y });
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::LineTo { x, y });
        self
    }

    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { x1, y1, x, y });
        self
    }

    pub fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Axis-aligned rectangle subpath.
    pub fn push_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.move_to(x, y)
            .line_to(x + w, y)
            .line_to(x + w, y + h)
            .line_to(x, y + h)
            .close()
    }

    /// Rounded rectangle subpath; corners are quadratic arcs with the
    /// control point at the square corner. A radius of zero degenerates
    /// to `push_rect`.
    pub fn push_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64) -> &mut Self {
        if r <= 0.0 {
            return self.push_rect(x, y, w, h);
        }
        let r = r.min(w / 2.0).min(h / 2.0);
        self.move_to(x + r, y)
            .line_to(x + w - r, y)
            .quad_to(x + w, y, x + w, y + r)
            .line_to(x + w, y + h - r)
            .quad_to(x + w, y + h, x + w - r, y + h)
            .line_to(x + r, y + h)
            .quad_to(x, y + h, x, y + h - r)
            .line_to(x, y + r)
            .quad_to(x, y, x + r, y)
            .close()
    }

    /// Circle subpath built from four cubic arcs.
    pub fn push_circle(&mut self, cx: f64, cy: f64, r: f64) -> &mut Self {
        let k = CIRCLE_KAPPA * r;
        self.move_to(cx + r, cy)
            .cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r)
            .cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy)
            .cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r)
            .cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy)
            .close()
    }

    /// Render as an SVG `d` attribute string.
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            match *command {
                PathCommand::MoveTo { x, y } => {
                    d.push_str(&format!("M {} {}", fmt_num(x), fmt_num(y)))
                }
                PathCommand::LineTo { x, y } => {
                    d.push_str(&format!("L {} {}", fmt_num(x), fmt_num(y)))
                }
                PathCommand::HorizTo { x } => d.push_str(&format!("H {}", fmt_num(x))),
                PathCommand::VertTo { y } => d.push_str(&format!("V {}", fmt_num(y))),
                PathCommand::QuadTo { x1, y1, x, y } => d.push_str(&format!(
                    "Q {} {} {} {}",
                    fmt_num(x1),
                    fmt_num(y1),
                    fmt_num(x),
                    fmt_num(y)
                )),
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => d.push_str(&format!(
                    "C {} {} {} {} {} {}",
                    fmt_num(x1),
                    fmt_num(y1),
                    fmt_num(x2),
                    fmt_num(y2),
                    fmt_num(x),
                    fmt_num(y)
                )),
                PathCommand::Close => d.push('Z'),
            }
        }
        d
    }
}

/// Trim trailing zeros so serialized coordinates stay compact.
pub fn fmt_num(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// A definition node referenced by id from shape paints.
#[derive(Debug, Clone, PartialEq)]
pub enum DefNode {
    LinearGradient {
        id: String,
        start: Color,
        end: Color,
        /// Axis endpoints as percentages of the bounding box.
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// Centered radial gradient; rotation does not apply.
    RadialGradient {
        id: String,
        start: Color,
        end: Color,
    },
    /// Tiling pattern referencing an image URL.
    ImagePattern {
        id: String,
        href: String,
        opacity: f64,
    },
    /// Circular clip path (logo clipping).
    CircleClip {
        id: String,
        cx: f64,
        cy: f64,
        r: f64,
    },
}

impl DefNode {
    pub fn id(&self) -> &str {
        match self {
            Self::LinearGradient { id, .. }
            | Self::RadialGradient { id, .. }
            | Self::ImagePattern { id, .. }
            | Self::CircleClip { id, .. } => id,
        }
    }
}

/// Affine transform applied to a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Rotation in degrees about a fixed point.
    Rotate { deg: f64, cx: f64, cy: f64 },
}

/// One node of the rendered scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        /// Corner radius; zero draws sharp corners.
        rx: f64,
        fill: Paint,
        stroke: Option<Stroke>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Paint,
        stroke: Option<Stroke>,
    },
    Path {
        data: PathData,
        fill: Paint,
        /// Even-odd winding carves inner subpaths out as holes.
        even_odd: bool,
        stroke: Option<Stroke>,
    },
    Image {
        href: String,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        opacity: f64,
        /// Id of a clip-path definition, if any.
        clip: Option<String>,
    },
    Group {
        transform: Option<Transform>,
        opacity: f64,
        children: Vec<SceneNode>,
    },
}

/// The composed vector scene for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedScene {
    pub width: f64,
    pub height: f64,
    pub defs: Vec<DefNode>,
    pub nodes: Vec<SceneNode>,
    pub warnings: Vec<RenderWarning>,
}

impl RenderedScene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            defs: Vec::new(),
            nodes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn push_def(&mut self, def: DefNode) {
        self.defs.push(def);
    }

    pub fn warn(&mut self, warning: RenderWarning) {
        self.warnings.push(warning);
    }

    /// Depth-first visit over every node, including group children.
    pub fn visit(&self, f: &mut impl FnMut(&SceneNode)) {
        fn walk(nodes: &[SceneNode], f: &mut impl FnMut(&SceneNode)) {
            for node in nodes {
                f(node);
                if let SceneNode::Group { children, .. } = node {
                    walk(children, f);
                }
            }
        }
        walk(&self.nodes, f);
    }

    /// Whether the scene is expressible with solid paints alone: no
    /// gradient/pattern references and no embedded images. Decides
    /// between native vector PDF output and the raster fallback.
    pub fn is_vector_solid(&self) -> bool {
        let mut solid = self.defs.iter().all(|d| matches!(d, DefNode::CircleClip { .. }));
        self.visit(&mut |node| match node {
            SceneNode::Image { .. } => solid = false,
            SceneNode::Rect { fill, stroke, .. }
            | SceneNode::Circle { fill, stroke, .. }
            | SceneNode::Path { fill, stroke, .. } => {
                if matches!(fill, Paint::Reference(_)) {
                    solid = false;
                }
                if let Some(stroke) = stroke {
                    if matches!(stroke.paint, Paint::Reference(_)) {
                        solid = false;
                    }
                }
            }
            SceneNode::Group { .. } => {}
        });
        solid
    }

    /// Total node count (groups counted, children included).
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_svg_rendering() {
        let mut path = PathData::new();
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .quad_to(10.0, 10.0, 0.0, 10.0)
            .close();
        assert_eq!(path.to_svg(), "M 0 0 L 10 0 Q 10 10 0 10 Z");
    }

    #[test]
    fn test_fmt_num_trims() {
        assert_eq!(fmt_num(4.0), "4");
        assert_eq!(fmt_num(4.25), "4.25");
        assert_eq!(fmt_num(4.256_789), "4.257");
    }

    #[test]
    fn test_circle_path_closes_where_it_starts() {
        let mut path = PathData::new();
        path.push_circle(50.0, 50.0, 10.0);
        assert!(matches!(
            path.commands.first(),
            Some(PathCommand::MoveTo { x, y }) if *x == 60.0 && *y == 50.0
        ));
        let last_curve = path
            .commands
            .iter()
            .rev()
            .find(|c| matches!(c, PathCommand::CubicTo { .. }));
        assert!(matches!(
            last_curve,
            Some(PathCommand::CubicTo { x, y, .. }) if *x == 60.0 && *y == 50.0
        ));
    }

    #[test]
    fn test_vector_solid_detection() {
        let mut scene = RenderedScene::new(100.0, 100.0);
        scene.push(SceneNode::Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
            rx: 0.0,
            fill: Paint::Solid(qrforge_common::Color::BLACK),
            stroke: None,
        });
        assert!(scene.is_vector_solid());

        scene.push(SceneNode::Circle {
            cx: 5.0,
            cy: 5.0,
            r: 2.0,
            fill: Paint::Reference("fg-paint".to_string()),
            stroke: None,
        });
        assert!(!scene.is_vector_solid());
    }

    #[test]
    fn test_visit_descends_into_groups() {
        let mut scene = RenderedScene::new(10.0, 10.0);
        scene.push(SceneNode::Group {
            transform: None,
            opacity: 1.0,
            children: vec![SceneNode::Circle {
                cx: 1.0,
                cy: 1.0,
                r: 1.0,
                fill: Paint::None,
                stroke: None,
            }],
        });
        assert_eq!(scene.node_count(), 2);
    }
}
