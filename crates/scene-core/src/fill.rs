//! Fill resolution: paint configuration to references and definitions.

use qrforge_design_model::{FillConfig, GradientKind, GradientSpec};

use crate::scene::{DefNode, Paint};

/// A resolved paint: the reference a shape carries plus, for non-solid
/// fills, the definition node backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFill {
    pub paint: Paint,
    pub def: Option<DefNode>,
}

impl ResolvedFill {
    fn solid(color: qrforge_common::Color) -> Self {
        Self {
            paint: Paint::Solid(color),
            def: None,
        }
    }
}

/// Linear-gradient axis endpoints as percentages of the bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientAxis {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Map a rotation to axis percentages. Idempotent mod 360.
pub fn gradient_axis(rotation_deg: f64) -> GradientAxis {
    let theta = rotation_deg.rem_euclid(360.0).to_radians();
    let (sin, cos) = theta.sin_cos();
    GradientAxis {
        x1: 50.0 - 50.0 * cos,
        y1: 50.0 - 50.0 * sin,
        x2: 50.0 + 50.0 * cos,
        y2: 50.0 + 50.0 * sin,
    }
}

/// Resolve a fill configuration into a paint plus definition, keyed by
/// `id` so multiple fills coexist in one scene.
pub fn resolve_fill(config: &FillConfig, id: &str) -> ResolvedFill {
    match config {
        FillConfig::Solid { color } => ResolvedFill::solid(*color),
        FillConfig::Gradient(gradient) => resolve_gradient(gradient, id),
        FillConfig::Image { url, opacity } => ResolvedFill {
            paint: Paint::Reference(id.to_string()),
            def: Some(DefNode::ImagePattern {
                id: id.to_string(),
                href: url.clone(),
                opacity: *opacity,
            }),
        },
    }
}

fn resolve_gradient(gradient: &GradientSpec, id: &str) -> ResolvedFill {
    let def = match gradient.kind {
        GradientKind::Linear => {
            let axis = gradient_axis(gradient.rotation_deg);
            DefNode::LinearGradient {
                id: id.to_string(),
                start: gradient.start,
                end: gradient.end,
                x1: axis.x1,
                y1: axis.y1,
                x2: axis.x2,
                y2: axis.y2,
            }
        }
        // Radial gradients are centered; rotation has no effect.
        GradientKind::Radial => DefNode::RadialGradient {
            id: id.to_string(),
            start: gradient.start,
            end: gradient.end,
        },
    };
    ResolvedFill {
        paint: Paint::Reference(id.to_string()),
        def: Some(def),
    }
}
