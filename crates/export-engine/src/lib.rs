//! QRForge Export Engine
//!
//! Serializes composed scenes to their delivery formats:
//!
//! ```text
//! RenderedScene ──┬── SVG  (metadata, minify, resize)
//!                 ├── PNG  (Rasterizer capability, retina scale)
//!                 ├── PDF  (vector content stream, raster fallback)
//!                 ├── EPS  (PostScript translation, Y-flip)
//!                 └── ZIP  (batch of named scenes, progress + cancel)
//! ```
//!
//! Platform side effects live behind small capability traits
//! ([`Rasterizer`], [`ClipboardSink`], [`AssetResolver`]) so the
//! geometry and serialization logic stays testable without a browser
//! or display environment.

pub mod archive;
pub mod assets;
pub mod clipboard;
pub mod eps;
pub mod pdf;
pub mod raster;
pub mod svg;

pub use archive::*;
pub use assets::{resolve_scene_assets, AssetResolver, FileAssetResolver, PassthroughResolver};
pub use clipboard::{export_to_clipboard, ClipboardSink, MemoryClipboard};
pub use eps::{scene_to_eps, EpsOptions, EpsOutput};
pub use pdf::{scene_to_pdf, Orientation, PageSize, PageUnit, PdfOptions, PdfOutput};
pub use raster::{encode_png, scene_to_png, PngOptions, RasterImage, Rasterizer, ResvgRasterizer};
pub use svg::{resize_svg, root_attr, scene_to_svg, DocumentMetadata, SvgOptions};
