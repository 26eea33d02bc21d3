//! Validate a design file.

use std::path::PathBuf;

use qrforge_design_model::{DesignerConfig, EcLevel};

pub fn run(design_path: PathBuf, ec: String) -> anyhow::Result<()> {
    println!("Validating design: {}", design_path.display());

    let ec_level = EcLevel::parse(&ec).map_err(|e| anyhow::anyhow!("{e}"))?;
    let json = std::fs::read_to_string(&design_path)
        .map_err(|e| anyhow::anyhow!("Failed to read design: {e}"))?;
    let design = DesignerConfig::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse design: {e}"))?;

    println!("  Canvas: {}px, margin {} modules", design.size, design.margin);
    println!("  Module shape: {:?}", design.module_shape);
    println!("  Corners: {:?} / {:?}", design.corner_frame_style, design.corner_dot_style);
    println!("  Logo: {}", if design.logo.is_some() { "yes" } else { "no" });
    println!("  Stickers: {}", design.stickers.len());

    match design.validate(ec_level) {
        Ok(warnings) if warnings.is_empty() => {
            println!("\nDesign is valid at level {ec_level}.");
        }
        Ok(warnings) => {
            println!("\nDesign renders at level {ec_level}, with warnings:");
            for warning in &warnings {
                println!("  - {warning}");
            }
            println!(
                "\n{} warning(s). Scannability may suffer; consider a higher EC level.",
                warnings.len()
            );
        }
        Err(e) => {
            println!("\nDesign is invalid: {e}");
        }
    }

    Ok(())
}
