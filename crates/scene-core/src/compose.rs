//! Scene composition pipeline.
//!
//! Wires the pipeline stages together over immutable inputs:
//! geometry planning, module and finder rendering, fill resolution,
//! background, logo, stickers, and outline. The result is one
//! self-contained [`RenderedScene`] per render call.

use qrforge_common::QrForgeResult;
use qrforge_design_model::{DesignerConfig, EcLevel, QrMatrix};

use crate::background::render_background;
use crate::corners::render_finder_patterns;
use crate::fill::resolve_fill;
use crate::geometry::{ClearanceSpec, GridGeometry};
use crate::logo::render_logo;
use crate::outline::render_outline;
use crate::scene::RenderedScene;
use crate::shapes::render_modules;
use crate::sticker::render_sticker;

/// Compose the full scene for an encoded matrix and a design.
///
/// Fatal validation problems abort before anything is built; everything
/// else lands in `scene.warnings`.
pub fn compose_scene(matrix: &QrMatrix, design: &DesignerConfig) -> QrForgeResult<RenderedScene> {
    let warnings = design.validate(matrix.ec_level())?;

    let canvas = design.size as f64;
    let mut scene = RenderedScene::new(canvas, canvas);
    scene.warnings = warnings;

    let clearance = design.logo.as_ref().map(|logo| ClearanceSpec {
        extent: logo.size + logo.margin,
    });
    let geometry = GridGeometry::plan(
        matrix.module_count(),
        design.size,
        design.margin,
        clearance,
    );

    // Background first so every later layer paints over it.
    let (bg_node, bg_def) = render_background(&design.background, canvas, canvas);
    if let Some(def) = bg_def {
        scene.push_def(def);
    }
    if let Some(node) = bg_node {
        scene.push(node);
    }

    // One shared foreground paint for data modules and finder patterns.
    let foreground = resolve_fill(&design.foreground, "fg-paint");
    if let Some(def) = foreground.def {
        scene.push_def(def);
    }

    scene.nodes.extend(render_modules(
        matrix,
        &geometry,
        design.module_shape,
        &foreground.paint,
    ));
    scene.nodes.extend(render_finder_patterns(
        &geometry,
        design.corner_frame_style,
        design.corner_dot_style,
        &foreground.paint,
    ));

    if let Some(logo) = &design.logo {
        let layer = render_logo(logo, canvas, geometry.clearance_px());
        scene.defs.extend(layer.defs);
        scene.nodes.extend(layer.nodes);
        scene.warnings.extend(layer.warnings);
    }

    for sticker in &design.stickers {
        let layer = render_sticker(sticker, canvas);
        scene.nodes.extend(layer.nodes);
        scene.warnings.extend(layer.warnings);
    }

    scene.nodes.extend(render_outline(&design.outline, canvas));

    tracing::debug!(
        nodes = scene.node_count(),
        defs = scene.defs.len(),
        warnings = scene.warnings.len(),
        "Scene composed"
    );

    Ok(scene)
}

/// Encode a payload and compose its scene in one step.
pub fn render_design(
    payload: &str,
    ec_level: EcLevel,
    design: &DesignerConfig,
) -> QrForgeResult<RenderedScene> {
    let matrix = QrMatrix::encode(payload, ec_level)?;
    compose_scene(&matrix, design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrforge_common::{Color, RenderWarning};
    use qrforge_design_model::{
        BackgroundConfig, FillConfig, GradientKind, GradientSpec, LogoConfig, LogoShape,
        ModuleShape,
    };

    #[test]
    fn test_default_design_composes() {
        let scene = render_design("https://example.com", EcLevel::M, &DesignerConfig::default())
            .unwrap();
        assert_eq!(scene.width, 1024.0);
        assert!(scene.warnings.is_empty());
        // Background + modules + 6 finder nodes at minimum.
        assert!(scene.node_count() > 7);
    }

    #[test]
    fn test_gradient_foreground_registers_def() {
        let design = DesignerConfig {
            foreground: FillConfig::Gradient(GradientSpec {
                kind: GradientKind::Linear,
                start: Color::BLACK,
                end: Color::new(0x00, 0x33, 0x99),
                rotation_deg: 45.0,
            }),
            background: BackgroundConfig::Transparent,
            ..DesignerConfig::default()
        };
        let scene = render_design("hello", EcLevel::M, &design).unwrap();
        assert_eq!(scene.defs.len(), 1);
        assert_eq!(scene.defs[0].id(), "fg-paint");
    }

    #[test]
    fn test_logo_layer_lands_after_modules() {
        let design = DesignerConfig {
            logo: Some(LogoConfig {
                url: "logo.png".to_string(),
                size: 0.2,
                margin: 0.05,
                shape: LogoShape::Square,
                background_color: None,
                border_color: None,
                border_width: 0.0,
            }),
            ..DesignerConfig::default()
        };
        let scene = render_design("hello world", EcLevel::H, &design).unwrap();
        // The logo image is the last node before any outline.
        assert!(matches!(
            scene.nodes.last(),
            Some(crate::scene::SceneNode::Image { .. })
        ));
        assert!(scene.warnings.is_empty());
    }

    #[test]
    fn test_low_ec_with_big_logo_warns_but_renders() {
        let design = DesignerConfig {
            logo: Some(LogoConfig {
                url: "logo.png".to_string(),
                size: 0.30,
                margin: 0.05,
                shape: LogoShape::Square,
                background_color: None,
                border_color: None,
                border_width: 0.0,
            }),
            ..DesignerConfig::default()
        };
        let scene = render_design("hello world", EcLevel::L, &design).unwrap();
        assert!(scene
            .warnings
            .iter()
            .any(|w| matches!(w, RenderWarning::ClearanceViolation { .. })));
        assert!(scene.node_count() > 0);
    }

    #[test]
    fn test_validation_error_renders_nothing() {
        let design = DesignerConfig {
            size: 0,
            ..DesignerConfig::default()
        };
        assert!(render_design("hello", EcLevel::M, &design).is_err());
    }

    #[test]
    fn test_clearance_skips_center_modules() {
        let with_logo = DesignerConfig {
            module_shape: ModuleShape::Square,
            logo: Some(LogoConfig {
                url: "logo.png".to_string(),
                size: 0.25,
                margin: 0.05,
                shape: LogoShape::Square,
                background_color: None,
                border_color: None,
                border_width: 0.0,
            }),
            ..DesignerConfig::default()
        };
        let without_logo = DesignerConfig::default();

        let payload = "clearance check payload";
        let a = render_design(payload, EcLevel::H, &with_logo).unwrap();
        let b = render_design(payload, EcLevel::H, &without_logo).unwrap();
        // The logo layer adds one node but removes many module nodes.
        assert!(a.node_count() < b.node_count());
    }
}
