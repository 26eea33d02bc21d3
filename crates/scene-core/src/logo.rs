//! Logo compositing and clearance math.
//!
//! The logo layer covers the clearance area that the geometry planner
//! left undrawn. If the two disagree (a caller changed the logo config
//! without replanning the grid), the logo still renders but the mismatch
//! is flagged; scan-reliability guarantees are void until replanned.

use qrforge_common::RenderWarning;
use qrforge_design_model::{LogoConfig, LogoShape};

use crate::scene::{DefNode, Paint, SceneNode, Stroke};

/// Padding of the background plate as a fraction of the logo size.
const PLATE_PADDING_RATIO: f64 = 0.1;

/// Composed logo layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogoLayer {
    pub nodes: Vec<SceneNode>,
    pub defs: Vec<DefNode>,
    pub warnings: Vec<RenderWarning>,
}

/// Render the logo layer, centered on the canvas.
///
/// `planned_clearance_px` is the clearance-box edge the geometry planner
/// actually used, when known.
pub fn render_logo(
    config: &LogoConfig,
    canvas_size: f64,
    planned_clearance_px: Option<f64>,
) -> LogoLayer {
    let mut layer = LogoLayer::default();

    let logo_size = canvas_size * config.size;
    let x = (canvas_size - logo_size) / 2.0;
    let y = x;
    let center = canvas_size / 2.0;

    if let Some(clearance) = planned_clearance_px {
        if clearance + 1e-6 < logo_size {
            layer.warnings.push(RenderWarning::ClearanceMismatch {
                clearance_px: clearance,
                footprint_px: logo_size,
            });
        }
    }

    // Background plate, slightly larger than the logo itself.
    if let Some(plate_color) = config.background_color {
        let padding = logo_size * PLATE_PADDING_RATIO;
        layer.nodes.push(plate_shape(
            config.shape,
            x - padding,
            y - padding,
            logo_size + 2.0 * padding,
            Paint::Solid(plate_color),
            None,
        ));
    }

    // The logo image, clipped to a circle when requested.
    let clip = match config.shape {
        LogoShape::Circle => {
            let id = "logo-clip".to_string();
            layer.defs.push(DefNode::CircleClip {
                id: id.clone(),
                cx: center,
                cy: center,
                r: logo_size / 2.0,
            });
            Some(id)
        }
        LogoShape::Square => None,
    };
    layer.nodes.push(SceneNode::Image {
        href: config.url.clone(),
        x,
        y,
        w: logo_size,
        h: logo_size,
        opacity: 1.0,
        clip,
    });

    // Border stroke matching the logo shape.
    if let Some(border_color) = config.border_color {
        if config.border_width > 0.0 {
            layer.nodes.push(plate_shape(
                config.shape,
                x,
                y,
                logo_size,
                Paint::None,
                Some(Stroke::solid(border_color, config.border_width)),
            ));
        }
    }

    layer
}

fn plate_shape(
    shape: LogoShape,
    x: f64,
    y: f64,
    size: f64,
    fill: Paint,
    stroke: Option<Stroke>,
) -> SceneNode {
    match shape {
        LogoShape::Square => SceneNode::Rect {
            x,
            y,
            w: size,
            h: size,
            rx: 0.0,
            fill,
            stroke,
        },
        LogoShape::Circle => SceneNode::Circle {
            cx: x + size / 2.0,
            cy: y + size / 2.0,
            r: size / 2.0,
            fill,
            stroke,
        },
    }
}
