//! Batch export to ZIP archives.
//!
//! Items render sequentially to bound peak memory and give per-item
//! progress; one item failing is logged and recorded without aborting
//! the batch. Cancellation is cooperative, checked between items.

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use qrforge_common::{QrForgeError, QrForgeResult, RenderWarning};
use qrforge_design_model::{DesignerConfig, EcLevel, QrMatrix};
use qrforge_scene_core::compose_scene;

use crate::eps::{scene_to_eps, EpsOptions};
use crate::pdf::{scene_to_pdf, PdfOptions};
use crate::raster::{scene_to_png, PngOptions, Rasterizer};
use crate::svg::{scene_to_svg, SvgOptions};

/// Formats rendered for each batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFormat {
    Svg,
    Png,
    Pdf,
    Eps,
    All,
}

impl BatchFormat {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Svg => &["svg"],
            Self::Png => &["png"],
            Self::Pdf => &["pdf"],
            Self::Eps => &["eps"],
            Self::All => &["svg", "png", "pdf", "eps"],
        }
    }
}

/// One named scene in a batch manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub name: String,
    pub payload: String,

    /// Optional folder path inside the archive.
    #[serde(default)]
    pub folder: Option<String>,

    /// Per-item design override; the job default applies otherwise.
    #[serde(default)]
    pub design: Option<DesignerConfig>,

    #[serde(default)]
    pub ec_level: Option<EcLevel>,

    /// Arbitrary metadata written as a `<name>.json` sidecar.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// A batch export job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub items: Vec<BatchItem>,
    pub format: BatchFormat,

    #[serde(default)]
    pub default_design: DesignerConfig,

    #[serde(default = "default_ec_level")]
    pub default_ec_level: EcLevel,

    /// Write metadata sidecars for items that carry metadata.
    #[serde(default)]
    pub include_metadata: bool,
}

fn default_ec_level() -> EcLevel {
    EcLevel::M
}

impl BatchJob {
    /// Parse a batch manifest from JSON.
    pub fn from_json(json: &str) -> QrForgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Progress report delivered after each item.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub percentage: f64,
    pub current_file: String,
}

/// Progress callback for batch rendering.
pub type ProgressCallback = Box<dyn Fn(BatchProgress) + Send>;

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    /// `(item name, error)` for every failed item.
    pub failed: Vec<(String, String)>,
    /// Render warnings aggregated across items.
    pub warnings: Vec<RenderWarning>,
}

/// Finished archive plus its report.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub archive: Vec<u8>,
    pub report: BatchReport,
}

/// Render every item and assemble the ZIP archive.
pub async fn export_batch(
    job: BatchJob,
    rasterizer: &dyn Rasterizer,
    progress: Option<ProgressCallback>,
    cancel: Option<Arc<AtomicBool>>,
) -> QrForgeResult<BatchOutput> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let total = job.items.len();
    let mut report = BatchReport::default();

    tracing::info!(items = total, format = ?job.format, "Starting batch export");

    for (index, item) in job.items.iter().enumerate() {
        if let Some(cancel) = &cancel {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(completed = index, total, "Batch export cancelled");
                return Err(QrForgeError::Cancelled);
            }
        }

        match render_item(&job, item, rasterizer) {
            Ok((entries, warnings)) => {
                for (path, bytes) in entries {
                    writer
                        .start_file(path, options)
                        .map_err(|e| QrForgeError::archive(e.to_string()))?;
                    writer.write_all(&bytes)?;
                }
                report.warnings.extend(warnings);
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(item = %item.name, error = %e, "Batch item failed, continuing");
                report.failed.push((item.name.clone(), e.to_string()));
            }
        }

        if let Some(progress) = &progress {
            progress(BatchProgress {
                current: index + 1,
                total,
                percentage: (index + 1) as f64 / total.max(1) as f64 * 100.0,
                current_file: item.name.clone(),
            });
        }

        // Keep the executor responsive between items on long batches.
        tokio::task::yield_now().await;
    }

    let cursor = writer
        .finish()
        .map_err(|e| QrForgeError::archive(e.to_string()))?;

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed.len(),
        "Batch export finished"
    );

    Ok(BatchOutput {
        archive: cursor.into_inner(),
        report,
    })
}

type Entries = Vec<(String, Vec<u8>)>;

fn render_item(
    job: &BatchJob,
    item: &BatchItem,
    rasterizer: &dyn Rasterizer,
) -> QrForgeResult<(Entries, Vec<RenderWarning>)> {
    let design = item.design.as_ref().unwrap_or(&job.default_design);
    let ec_level = item.ec_level.unwrap_or(job.default_ec_level);

    let matrix = QrMatrix::encode(&item.payload, ec_level)?;
    let scene = compose_scene(&matrix, design)?;

    let base = match &item.folder {
        Some(folder) => format!("{}/{}", folder.trim_matches('/'), item.name),
        None => item.name.clone(),
    };

    let mut entries = Entries::new();
    for extension in job.format.extensions() {
        let bytes = match *extension {
            "svg" => scene_to_svg(&scene, &SvgOptions::default()).into_bytes(),
            "png" => scene_to_png(&scene, rasterizer, &PngOptions::default())?,
            "pdf" => scene_to_pdf(&scene, &PdfOptions::default(), rasterizer)?.bytes,
            "eps" => scene_to_eps(&scene, &EpsOptions::default())
                .postscript
                .into_bytes(),
            other => {
                return Err(QrForgeError::archive(format!(
                    "unknown batch format '{other}'"
                )))
            }
        };
        entries.push((format!("{base}.{extension}"), bytes));
    }

    if job.include_metadata {
        if let Some(metadata) = &item.metadata {
            entries.push((format!("{base}.json"), serde_json::to_vec_pretty(metadata)?));
        }
    }

    Ok((entries, scene.warnings))
}

// Cancellation flags are plain atomics so callers can share one across
// tasks without extra machinery.
pub fn cancellation_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}
