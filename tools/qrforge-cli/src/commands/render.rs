//! Render one QR code to a file.

use std::path::PathBuf;

use qrforge_design_model::{DesignerConfig, EcLevel};
use qrforge_export_engine::{
    resolve_scene_assets, scene_to_eps, scene_to_pdf, scene_to_png, scene_to_svg,
    DocumentMetadata, EpsOptions, FileAssetResolver, PdfOptions, PngOptions, ResvgRasterizer,
    SvgOptions,
};
use qrforge_scene_core::render_design;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    payload: String,
    output: Option<PathBuf>,
    format: String,
    design_path: Option<PathBuf>,
    size: Option<u32>,
    margin: Option<u32>,
    ec: String,
    scale: f64,
    optimized: bool,
    title: Option<String>,
) -> anyhow::Result<()> {
    let ec_level = EcLevel::parse(&ec).map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut design = match &design_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read design {}: {e}", path.display()))?;
            DesignerConfig::from_json(&json)
                .map_err(|e| anyhow::anyhow!("Failed to parse design: {e}"))?
        }
        None => DesignerConfig::default(),
    };
    if let Some(size) = size {
        design.size = size;
    }
    if let Some(margin) = margin {
        design.margin = margin;
    }

    let output_path = output.unwrap_or_else(|| PathBuf::from(format!("qr.{format}")));
    println!("Rendering {} -> {}", payload, output_path.display());

    let mut scene = render_design(&payload, ec_level, &design)
        .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;
    resolve_scene_assets(&mut scene, &FileAssetResolver);

    let metadata = DocumentMetadata {
        title: title.unwrap_or_else(|| "QR Code".to_string()),
        creator: "qrforge".to_string(),
        description: None,
        date: None,
    };

    let rasterizer = ResvgRasterizer;
    let mut warnings = scene.warnings.clone();

    match format.as_str() {
        "svg" => {
            let svg = scene_to_svg(
                &scene,
                &SvgOptions {
                    optimized,
                    metadata: Some(metadata),
                    ..SvgOptions::default()
                },
            );
            std::fs::write(&output_path, svg)?;
        }
        "png" => {
            let png = scene_to_png(
                &scene,
                &rasterizer,
                &PngOptions {
                    scale,
                    background: None,
                },
            )
            .map_err(|e| anyhow::anyhow!("PNG export failed: {e}"))?;
            std::fs::write(&output_path, png)?;
        }
        "pdf" => {
            let pdf = scene_to_pdf(
                &scene,
                &PdfOptions {
                    metadata: Some(metadata),
                    ..PdfOptions::default()
                },
                &rasterizer,
            )
            .map_err(|e| anyhow::anyhow!("PDF export failed: {e}"))?;
            warnings.extend(pdf.warnings);
            std::fs::write(&output_path, pdf.bytes)?;
        }
        "eps" => {
            let eps = scene_to_eps(
                &scene,
                &EpsOptions {
                    metadata: Some(metadata),
                },
            );
            warnings.extend(eps.warnings);
            std::fs::write(&output_path, eps.postscript)?;
        }
        other => {
            return Err(anyhow::anyhow!(
                "Unknown format: {other}. Use: svg, png, pdf, eps"
            ));
        }
    }

    if warnings.is_empty() {
        println!("Done: {}", output_path.display());
    } else {
        println!("Done with {} warning(s):", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}
