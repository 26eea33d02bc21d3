//! QRForge Scene Core
//!
//! Pure composition pipeline that turns an encoded QR matrix plus a
//! designer configuration into a layered vector scene:
//!
//! ```text
//! QrMatrix ──┐
//!            ├── GeometryPlanner (module roles, pixel rects)
//! design ────┘         │
//!                      ├── ModuleShapeRenderer (data modules)
//!                      ├── CornerPatternRenderer (finder patterns)
//!                      ├── FillResolver / BackgroundComposer
//!                      ├── LogoCompositor / StickerCompositor
//!                      └── OutlineRenderer
//!                                │
//!                                ▼
//!                          RenderedScene
//! ```
//!
//! Every stage is a pure function over immutable inputs; no stage reads
//! ambient state or performs I/O. Serialization of the resulting scene
//! lives in `qrforge-export-engine`.

pub mod background;
pub mod compose;
pub mod corners;
pub mod fill;
pub mod geometry;
pub mod logo;
pub mod outline;
pub mod scene;
pub mod shapes;
pub mod sticker;

pub use compose::*;
pub use geometry::{ClearanceSpec, GridGeometry, ModuleRole, PlannedCell};
pub use scene::*;
