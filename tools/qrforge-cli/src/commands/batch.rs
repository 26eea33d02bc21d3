//! Render a batch manifest into a ZIP archive.

use std::path::PathBuf;

use qrforge_export_engine::{
    export_batch, BatchJob, BatchProgress, ProgressCallback, ResvgRasterizer,
};

pub async fn run(manifest: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    println!("Reading manifest: {}", manifest.display());

    let json = std::fs::read_to_string(&manifest)
        .map_err(|e| anyhow::anyhow!("Failed to read manifest: {e}"))?;
    let job = BatchJob::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse manifest: {e}"))?;

    println!("  Items: {}", job.items.len());
    println!("  Formats: {:?}", job.format);

    let progress: ProgressCallback = Box::new(|p: BatchProgress| {
        print!(
            "\r  Progress: {:.0}% ({}/{}) {}          ",
            p.percentage, p.current, p.total, p.current_file
        );
    });

    let result = export_batch(job, &ResvgRasterizer, Some(progress), None).await;

    match result {
        Ok(batch) => {
            println!();
            std::fs::write(&output, &batch.archive)?;
            println!("Archive written: {}", output.display());
            println!("  Succeeded: {}", batch.report.succeeded);
            if !batch.report.failed.is_empty() {
                println!("  Failed: {}", batch.report.failed.len());
                for (name, error) in &batch.report.failed {
                    println!("    - {name}: {error}");
                }
            }
            if !batch.report.warnings.is_empty() {
                println!("  Warnings: {}", batch.report.warnings.len());
                for warning in &batch.report.warnings {
                    println!("    - {warning}");
                }
            }
        }
        Err(e) => {
            println!("\nBatch export failed: {e}");
        }
    }

    Ok(())
}
