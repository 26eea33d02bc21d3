use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use qrforge_common::{QrForgeError, QrForgeResult};
use qrforge_design_model::{DesignerConfig, EcLevel};
use qrforge_export_engine::{
    cancellation_flag, export_batch, root_attr, scene_to_eps, scene_to_svg, BatchFormat,
    BatchItem, BatchJob, BatchProgress, EpsOptions, RasterImage, Rasterizer, SvgOptions,
};
use qrforge_scene_core::render_design;

struct StubRasterizer;

impl Rasterizer for StubRasterizer {
    fn rasterize(&self, _svg: &str, width: u32, height: u32) -> QrForgeResult<RasterImage> {
        Ok(RasterImage {
            width,
            height,
            rgba: vec![255; (width * height * 4) as usize],
        })
    }
}

fn item(name: &str, payload: &str) -> BatchItem {
    BatchItem {
        name: name.to_string(),
        payload: payload.to_string(),
        folder: None,
        design: None,
        ec_level: None,
        metadata: None,
    }
}

fn job(items: Vec<BatchItem>, format: BatchFormat) -> BatchJob {
    BatchJob {
        items,
        format,
        default_design: DesignerConfig::default(),
        default_ec_level: EcLevel::M,
        include_metadata: false,
    }
}

#[test]
fn svg_roundtrip_preserves_canvas_size() {
    let design = DesignerConfig {
        size: 768,
        ..DesignerConfig::default()
    };
    let scene = render_design("https://example.com", EcLevel::Q, &design).unwrap();
    let svg = scene_to_svg(&scene, &SvgOptions::default());
    assert_eq!(root_attr(&svg, "width").as_deref(), Some("768"));
    assert_eq!(root_attr(&svg, "viewBox").as_deref(), Some("0 0 768 768"));
}

#[test]
fn eps_of_composed_scene_translates_every_shape() {
    let scene = render_design("eps check", EcLevel::M, &DesignerConfig::default()).unwrap();
    let output = scene_to_eps(&scene, &EpsOptions::default());
    assert!(output.postscript.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
    // Solid black default design degrades nothing.
    assert!(output.warnings.is_empty());
    // Every module of the default square shape lands as a rectfill.
    assert!(output.postscript.matches(" rf\n").count() > 50);
}

#[tokio::test]
async fn batch_continues_past_failing_item() {
    // Item "b" exceeds the payload ceiling and must fail alone.
    let oversized = "x".repeat(3000);
    let batch = job(
        vec![
            item("table-1", "https://example.com/t/1"),
            item("broken", &oversized),
            item("table-2", "https://example.com/t/2"),
        ],
        BatchFormat::Svg,
    );

    let output = export_batch(batch, &StubRasterizer, None, None)
        .await
        .unwrap();

    assert_eq!(output.report.succeeded, 2);
    assert_eq!(output.report.failed.len(), 1);
    assert_eq!(output.report.failed[0].0, "broken");

    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(output.archive)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"table-1.svg".to_string()));
    assert!(names.contains(&"table-2.svg".to_string()));
}

#[tokio::test]
async fn batch_reports_progress_per_item() {
    let batch = job(
        vec![item("a", "payload a"), item("b", "payload b")],
        BatchFormat::Svg,
    );

    let seen: Arc<Mutex<Vec<BatchProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: qrforge_export_engine::ProgressCallback =
        Box::new(move |p| sink.lock().unwrap().push(p));

    export_batch(batch, &StubRasterizer, Some(callback), None)
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].current, 1);
    assert_eq!(seen[0].total, 2);
    assert_eq!(seen[0].percentage, 50.0);
    assert_eq!(seen[1].current_file, "b");
    assert_eq!(seen[1].percentage, 100.0);
}

#[tokio::test]
async fn batch_respects_cancellation_between_items() {
    let batch = job(
        vec![item("a", "payload a"), item("b", "payload b")],
        BatchFormat::Svg,
    );

    let cancel = cancellation_flag();
    cancel.store(true, Ordering::Relaxed);

    let result = export_batch(batch, &StubRasterizer, None, Some(cancel)).await;
    assert!(matches!(result, Err(QrForgeError::Cancelled)));
}

#[tokio::test]
async fn batch_folders_and_sidecars_shape_the_archive() {
    let mut first = item("front", "https://example.com/front");
    first.folder = Some("store-12".to_string());
    first.metadata = Some(serde_json::json!({ "campaign": "spring" }));

    let batch = BatchJob {
        items: vec![first],
        format: BatchFormat::Svg,
        default_design: DesignerConfig::default(),
        default_ec_level: EcLevel::M,
        include_metadata: true,
    };

    let output = export_batch(batch, &StubRasterizer, None, None)
        .await
        .unwrap();

    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(output.archive)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"store-12/front.svg".to_string()));
    assert!(names.contains(&"store-12/front.json".to_string()));
}

#[tokio::test]
async fn batch_all_formats_emits_one_entry_per_format() {
    let batch = job(vec![item("menu", "https://example.com/menu")], BatchFormat::All);
    let output = export_batch(batch, &StubRasterizer, None, None)
        .await
        .unwrap();

    let archive = zip::ZipArchive::new(std::io::Cursor::new(output.archive)).unwrap();
    assert_eq!(archive.len(), 4);
}

#[test]
fn manifest_json_parses_with_defaults() {
    let manifest = r#"{
        "items": [
            { "name": "a", "payload": "https://example.com/a" },
            { "name": "b", "payload": "https://example.com/b", "folder": "north" }
        ],
        "format": "all"
    }"#;
    let job = BatchJob::from_json(manifest).unwrap();
    assert_eq!(job.items.len(), 2);
    assert_eq!(job.format, BatchFormat::All);
    assert_eq!(job.default_ec_level, EcLevel::M);
    assert_eq!(job.items[1].folder.as_deref(), Some("north"));
}
