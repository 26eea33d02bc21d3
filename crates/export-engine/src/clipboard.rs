//! Clipboard capability.
//!
//! Writing to the system clipboard is a platform side effect, so it
//! sits behind a sink trait; the engine only produces the PNG bytes.

use std::sync::Mutex;

use qrforge_common::QrForgeResult;
use qrforge_scene_core::RenderedScene;

use crate::raster::{scene_to_png, PngOptions, Rasterizer};

/// Platform clipboard sink.
pub trait ClipboardSink: Send + Sync {
    fn put_image(&self, png: &[u8]) -> QrForgeResult<()>;
}

/// Render a scene to PNG and hand it to the sink.
pub fn export_to_clipboard(
    scene: &RenderedScene,
    rasterizer: &dyn Rasterizer,
    sink: &dyn ClipboardSink,
    options: &PngOptions,
) -> QrForgeResult<()> {
    let png = scene_to_png(scene, rasterizer, options)?;
    tracing::info!(bytes = png.len(), "Copied render to clipboard");
    sink.put_image(&png)
}

/// Collecting sink for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<Vec<u8>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Option<Vec<u8>> {
        self.contents.lock().expect("clipboard lock").take()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn put_image(&self, png: &[u8]) -> QrForgeResult<()> {
        *self.contents.lock().expect("clipboard lock") = Some(png.to_vec());
        Ok(())
    }
}
