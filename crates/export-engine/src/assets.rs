//! Asset resolution for image-bearing layers.
//!
//! Serialized SVG can reference remote URLs as-is, but rasterization
//! needs a self-contained document, so local files are inlined as
//! base64 data URIs. A layer whose asset fails to load is skipped with
//! a warning; the rest of the scene still renders.

use std::path::Path;

use base64::Engine as _;

use qrforge_common::{Color, QrForgeError, QrForgeResult, RenderWarning};
use qrforge_scene_core::{DefNode, Paint, RenderedScene, SceneNode};

/// Resolves asset URLs into hrefs embeddable in serialized output.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, url: &str) -> QrForgeResult<String>;
}

/// Leaves every URL untouched (browser-style consumers fetch them).
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

impl AssetResolver for PassthroughResolver {
    fn resolve(&self, url: &str) -> QrForgeResult<String> {
        Ok(url.to_string())
    }
}

/// Inlines local files as data URIs; remote and data URLs pass through.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileAssetResolver;

impl AssetResolver for FileAssetResolver {
    fn resolve(&self, url: &str) -> QrForgeResult<String> {
        if url.starts_with("data:") || url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }

        let path = Path::new(url);
        let bytes = std::fs::read(path)
            .map_err(|e| QrForgeError::asset_load(url, e.to_string()))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:{};base64,{encoded}", mime_for(path)))
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Resolve every image reference in a scene in place.
///
/// Image nodes whose asset fails drop out of the scene; pattern fills
/// whose asset fails are flattened to solid black. Both degradations
/// land in `scene.warnings`.
pub fn resolve_scene_assets(scene: &mut RenderedScene, resolver: &dyn AssetResolver) {
    let mut failed_patterns: Vec<String> = Vec::new();
    let mut warnings: Vec<RenderWarning> = Vec::new();

    scene.defs.retain_mut(|def| {
        if let DefNode::ImagePattern { id, href, .. } = def {
            match resolver.resolve(href) {
                Ok(resolved) => {
                    *href = resolved;
                    true
                }
                Err(e) => {
                    warnings.push(RenderWarning::AssetSkipped {
                        url: href.clone(),
                        reason: e.to_string(),
                    });
                    failed_patterns.push(id.clone());
                    false
                }
            }
        } else {
            true
        }
    });

    resolve_nodes(&mut scene.nodes, resolver, &failed_patterns, &mut warnings);
    scene.warnings.extend(warnings);
}

fn resolve_nodes(
    nodes: &mut Vec<SceneNode>,
    resolver: &dyn AssetResolver,
    failed_patterns: &[String],
    warnings: &mut Vec<RenderWarning>,
) {
    nodes.retain_mut(|node| match node {
        SceneNode::Image { href, .. } => match resolver.resolve(href) {
            Ok(resolved) => {
                *href = resolved;
                true
            }
            Err(e) => {
                tracing::warn!(url = %href, error = %e, "Skipping image layer");
                warnings.push(RenderWarning::AssetSkipped {
                    url: href.clone(),
                    reason: e.to_string(),
                });
                false
            }
        },
        SceneNode::Group { children, .. } => {
            resolve_nodes(children, resolver, failed_patterns, warnings);
            true
        }
        SceneNode::Rect { fill, .. } | SceneNode::Circle { fill, .. } | SceneNode::Path { fill, .. } => {
            if let Paint::Reference(id) = fill {
                if failed_patterns.iter().any(|p| p == id) {
                    *fill = Paint::Solid(Color::BLACK);
                }
            }
            true
        }
    });
}
