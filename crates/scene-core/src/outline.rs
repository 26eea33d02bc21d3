//! Canvas outline rendering.
//!
//! The outline wraps the finished scene with a stroked shape inset by
//! half the stroke width so the stroke stays fully inside the canvas.

use qrforge_design_model::{OutlineConfig, OutlineStyle};

use crate::scene::{Paint, SceneNode, Stroke};

/// Render the outline layer. Empty when disabled.
pub fn render_outline(config: &OutlineConfig, canvas_size: f64) -> Vec<SceneNode> {
    if !config.enabled {
        return Vec::new();
    }

    let width = config.width;
    let inset = width / 2.0;
    let edge = canvas_size - width;
    let stroke = Stroke::solid(config.color, width);

    match &config.style {
        OutlineStyle::Square => vec![stroked_rect(inset, edge, 0.0, stroke)],
        OutlineStyle::Rounded { radius } => vec![stroked_rect(inset, edge, *radius, stroke)],
        OutlineStyle::Circular => vec![SceneNode::Circle {
            cx: canvas_size / 2.0,
            cy: canvas_size / 2.0,
            r: edge / 2.0,
            fill: Paint::None,
            stroke: Some(stroke),
        }],
        OutlineStyle::Dashed => {
            let dashed = Stroke {
                dash: Some(vec![width * 3.0, width * 2.0]),
                ..stroke
            };
            vec![stroked_rect(inset, edge, 0.0, dashed)]
        }
        OutlineStyle::Double { gap } => {
            let inner_inset = inset + width + gap;
            let inner_edge = canvas_size - 2.0 * inner_inset;
            vec![
                stroked_rect(inset, edge, 0.0, stroke.clone()),
                stroked_rect(inner_inset, inner_edge, 0.0, stroke),
            ]
        }
    }
}

fn stroked_rect(inset: f64, edge: f64, rx: f64, stroke: Stroke) -> SceneNode {
    SceneNode::Rect {
        x: inset,
        y: inset,
        w: edge,
        h: edge,
        rx,
        fill: Paint::None,
        stroke: Some(stroke),
    }
}
