//! Sticker compositing.
//!
//! Stickers are decorative overlays anchored to named positions or
//! custom fractional coordinates. A sticker near a finder pattern is
//! flagged, never blocked.

use qrforge_common::{FinderCorner, RenderWarning};
use qrforge_design_model::StickerConfig;

use crate::scene::{SceneNode, Transform};

/// Fraction of the canvas near each corner treated as a finder region
/// for the overlap check.
const FINDER_REGION_RATIO: f64 = 0.15;

/// Composed sticker layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StickerLayer {
    pub nodes: Vec<SceneNode>,
    pub warnings: Vec<RenderWarning>,
}

/// Pixel origin for an anchor fraction: 0 aligns left/top, 1 aligns
/// right/bottom (subtracting the sticker size), 0.5 centers.
pub fn sticker_origin(fx: f64, fy: f64, canvas_size: f64, sticker_size: f64) -> (f64, f64) {
    (
        fx * (canvas_size - sticker_size),
        fy * (canvas_size - sticker_size),
    )
}

/// Axis-aligned bounds of a square sticker after rotation about its
/// center: `(min_x, min_y, max_x, max_y)`.
pub fn rotated_bounds(x: f64, y: f64, size: f64, rotation_deg: f64) -> (f64, f64, f64, f64) {
    let half = size / 2.0;
    let cx = x + half;
    let cy = y + half;
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let extent = half * (sin.abs() + cos.abs());
    (cx - extent, cy - extent, cx + extent, cy + extent)
}

/// Finder corner regions whose outer 15%-of-canvas box intersects the
/// given bounds.
pub fn finder_overlaps(bounds: (f64, f64, f64, f64), canvas_size: f64) -> Vec<FinderCorner> {
    let region = canvas_size * FINDER_REGION_RATIO;
    let corners = [
        (FinderCorner::TopLeft, 0.0, 0.0),
        (FinderCorner::TopRight, canvas_size - region, 0.0),
        (FinderCorner::BottomLeft, 0.0, canvas_size - region),
    ];
    let (min_x, min_y, max_x, max_y) = bounds;
    corners
        .into_iter()
        .filter(|(_, rx, ry)| {
            min_x < rx + region && max_x > *rx && min_y < ry + region && max_y > *ry
        })
        .map(|(corner, _, _)| corner)
        .collect()
}

/// Render one sticker and collect finder-overlap warnings.
pub fn render_sticker(config: &StickerConfig, canvas_size: f64) -> StickerLayer {
    let mut layer = StickerLayer::default();

    let size = canvas_size * config.size;
    let (fx, fy) = config.position.resolve();
    let (x, y) = sticker_origin(fx, fy, canvas_size, size);

    let bounds = rotated_bounds(x, y, size, config.rotation_deg);
    for corner in finder_overlaps(bounds, canvas_size) {
        layer.warnings.push(RenderWarning::FinderOverlap {
            sticker_id: config.id.clone(),
            corner,
        });
    }

    let image = SceneNode::Image {
        href: config.url.clone(),
        x,
        y,
        w: size,
        h: size,
        opacity: config.opacity,
        clip: None,
    };

    // Rotation is applied about the sticker's own center.
    let node = if config.rotation_deg.rem_euclid(360.0) != 0.0 {
        SceneNode::Group {
            transform: Some(Transform::Rotate {
                deg: config.rotation_deg,
                cx: x + size / 2.0,
                cy: y + size / 2.0,
            }),
            opacity: 1.0,
            children: vec![image],
        }
    } else {
        image
    };
    layer.nodes.push(node);

    layer
}
