//! Canvas background layer.

use qrforge_design_model::BackgroundConfig;

use crate::fill::resolve_fill;
use crate::scene::{DefNode, Paint, SceneNode};
use qrforge_design_model::FillConfig;

/// Background layer for the canvas: at most one node plus one def.
pub fn render_background(
    config: &BackgroundConfig,
    width: f64,
    height: f64,
) -> (Option<SceneNode>, Option<DefNode>) {
    match config {
        BackgroundConfig::Transparent => (None, None),
        BackgroundConfig::Solid { color } => (
            Some(full_rect(width, height, Paint::Solid(*color))),
            None,
        ),
        BackgroundConfig::Gradient(gradient) => {
            let resolved = resolve_fill(
                &FillConfig::Gradient(gradient.clone()),
                "bg-paint",
            );
            (
                Some(full_rect(width, height, resolved.paint)),
                resolved.def,
            )
        }
        // A background image is stretched over the canvas directly; no
        // tiling pattern is needed.
        BackgroundConfig::Image { url, opacity } => (
            Some(SceneNode::Image {
                href: url.clone(),
                x: 0.0,
                y: 0.0,
                w: width,
                h: height,
                opacity: *opacity,
                clip: None,
            }),
            None,
        ),
    }
}

fn full_rect(width: f64, height: f64, fill: Paint) -> SceneNode {
    SceneNode::Rect {
        x: 0.0,
        y: 0.0,
        w: width,
        h: height,
        rx: 0.0,
        fill,
        stroke: None,
    }
}
