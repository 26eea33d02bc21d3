//! Finder-pattern rendering.
//!
//! Each of the three finder patterns is a 7×7-module block: an outer
//! frame (7×7 minus a 5×5 hollow) and an inner 3×3 dot. Both are drawn
//! independently of the data-module shape so scanners always see the
//! canonical geometry.
//!
//! Frame hollows are carved with even-odd subpaths instead of
//! background-colored rects, so gradient or image backgrounds show
//! through the hollow.

use qrforge_design_model::{CornerDotStyle, CornerFrameStyle};

use crate::geometry::{GridGeometry, FINDER_SIZE};
use crate::scene::{Paint, PathData, SceneNode, Stroke};

/// Emit frame and dot primitives for the three finder patterns.
pub fn render_finder_patterns(
    geometry: &GridGeometry,
    frame_style: CornerFrameStyle,
    dot_style: CornerDotStyle,
    fill: &Paint,
) -> Vec<SceneNode> {
    let mut nodes = Vec::with_capacity(6);
    let m = geometry.module_size();
    for (row, col) in geometry.finder_origins() {
        let (x, y, _) = geometry.cell_rect(row, col);
        nodes.push(frame_node(x, y, m, frame_style, fill.clone()));
        nodes.push(dot_node(x, y, m, dot_style, fill.clone()));
    }
    nodes
}

fn frame_node(x: f64, y: f64, m: f64, style: CornerFrameStyle, fill: Paint) -> SceneNode {
    let outer = FINDER_SIZE as f64 * m;
    let hollow = outer - 2.0 * m;
    match style {
        CornerFrameStyle::Square => {
            let mut data = PathData::new();
            data.push_rect(x, y, outer, outer);
            data.push_rect(x + m, y + m, hollow, hollow);
            SceneNode::Path {
                data,
                fill,
                even_odd: true,
                stroke: None,
            }
        }
        CornerFrameStyle::Rounded => ring_path(x, y, m, outer, 2.0 * m, m, fill),
        CornerFrameStyle::ExtraRounded => ring_path(x, y, m, outer, 3.0 * m, 2.0 * m, fill),
        CornerFrameStyle::Circular => {
            let c = outer / 2.0;
            let mut data = PathData::new();
            data.push_circle(x + c, y + c, c);
            data.push_circle(x + c, y + c, c - m);
            SceneNode::Path {
                data,
                fill,
                even_odd: true,
                stroke: None,
            }
        }
        // Decorative: stroked outline with four corner dots, not a
        // literal finder shape.
        CornerFrameStyle::Dot => {
            let stroke = Stroke {
                paint: fill.clone(),
                width: m / 2.0,
                dash: None,
            };
            let inset = m / 4.0;
            let mut children = vec![SceneNode::Rect {
                x: x + inset,
                y: y + inset,
                w: outer - 2.0 * inset,
                h: outer - 2.0 * inset,
                rx: 0.0,
                fill: Paint::None,
                stroke: Some(stroke),
            }];
            for (cx, cy) in [
                (x, y),
                (x + outer, y),
                (x, y + outer),
                (x + outer, y + outer),
            ] {
                children.push(SceneNode::Circle {
                    cx,
                    cy,
                    r: m / 2.0,
                    fill: fill.clone(),
                    stroke: None,
                });
            }
            SceneNode::Group {
                transform: None,
                opacity: 1.0,
                children,
            }
        }
    }
}

/// Even-odd ring of two rounded rects: the outer frame edge and the
/// negative hollow.
fn ring_path(x: f64, y: f64, m: f64, outer: f64, outer_r: f64, hollow_r: f64, fill: Paint) -> SceneNode {
    let hollow = outer - 2.0 * m;
    let mut data = PathData::new();
    data.push_rounded_rect(x, y, outer, outer, outer_r);
    data.push_rounded_rect(x + m, y + m, hollow, hollow, hollow_r);
    SceneNode::Path {
        data,
        fill,
        even_odd: true,
        stroke: None,
    }
}

fn dot_node(x: f64, y: f64, m: f64, style: CornerDotStyle, fill: Paint) -> SceneNode {
    // Inner 3x3 block, two modules in from the frame edge.
    let dot = 3.0 * m;
    let dx = x + 2.0 * m;
    let dy = y + 2.0 * m;
    match style {
        CornerDotStyle::Square => SceneNode::Rect {
            x: dx,
            y: dy,
            w: dot,
            h: dot,
            rx: 0.0,
            fill,
            stroke: None,
        },
        CornerDotStyle::Rounded => SceneNode::Rect {
            x: dx,
            y: dy,
            w: dot,
            h: dot,
            rx: dot * 0.3,
            fill,
            stroke: None,
        },
        CornerDotStyle::Circle => SceneNode::Circle {
            cx: dx + dot / 2.0,
            cy: dy + dot / 2.0,
            r: dot / 2.0,
            fill,
            stroke: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PathCommand;

    fn plan() -> GridGeometry {
        // 21 modules, margin 2: module size 500 / 25 = 20 px.
        GridGeometry::plan(21, 500, 2, None)
    }

    #[test]
    fn test_three_frames_and_three_dots() {
        let nodes = render_finder_patterns(
            &plan(),
            CornerFrameStyle::Square,
            CornerDotStyle::Square,
            &Paint::None,
        );
        assert_eq!(nodes.len(), 6);
    }

    #[test]
    fn test_square_frame_is_even_odd_ring() {
        let nodes = render_finder_patterns(
            &plan(),
            CornerFrameStyle::Square,
            CornerDotStyle::Square,
            &Paint::None,
        );
        match &nodes[0] {
            SceneNode::Path { data, even_odd, .. } => {
                assert!(*even_odd);
                let moves = data
                    .commands
                    .iter()
                    .filter(|c| matches!(c, PathCommand::MoveTo { .. }))
                    .count();
                assert_eq!(moves, 2, "outer edge plus negative hollow");
            }
            other => panic!("expected a path node, got {other:?}"),
        }
    }

    #[test]
    fn test_frames_anchor_at_canonical_corners() {
        let geometry = plan();
        let nodes = render_finder_patterns(
            &geometry,
            CornerFrameStyle::Square,
            CornerDotStyle::Square,
            &Paint::None,
        );
        // Frames are nodes 0, 2, 4; their first command is the outer
        // rect's top-left corner.
        let origins: Vec<(f64, f64)> = [0, 2, 4]
            .iter()
            .map(|i| match &nodes[*i] {
                SceneNode::Path { data, .. } => match data.commands[0] {
                    PathCommand::MoveTo { x, y } => (x, y),
                    _ => panic!("frame should start with MoveTo"),
                },
                _ => panic!("expected path"),
            })
            .collect();
        // Offset 40 px; far corner starts at module 14 -> 40 + 280.
        assert_eq!(origins[0], (40.0, 40.0));
        assert_eq!(origins[1], (320.0, 40.0));
        assert_eq!(origins[2], (40.0, 320.0));
    }

    #[test]
    fn test_circle_dot_is_centered_in_block() {
        let nodes = render_finder_patterns(
            &plan(),
            CornerFrameStyle::Square,
            CornerDotStyle::Circle,
            &Paint::None,
        );
        match &nodes[1] {
            SceneNode::Circle { cx, cy, r, .. } => {
                // Block at (40, 40), 7 modules of 20 px: center at 110.
                assert_eq!((*cx, *cy), (110.0, 110.0));
                assert_eq!(*r, 30.0);
            }
            other => panic!("expected a circle node, got {other:?}"),
        }
    }

    #[test]
    fn test_dot_frame_variant_strokes_outline() {
        let nodes = render_finder_patterns(
            &plan(),
            CornerFrameStyle::Dot,
            CornerDotStyle::Square,
            &Paint::None,
        );
        match &nodes[0] {
            SceneNode::Group { children, .. } => {
                assert_eq!(children.len(), 5, "outline plus four corner dots");
                assert!(matches!(
                    &children[0],
                    SceneNode::Rect { stroke: Some(_), .. }
                ));
            }
            other => panic!("expected a group node, got {other:?}"),
        }
    }
}
