//! Designer configuration: canvas, shapes, and outline.

use serde::{Deserialize, Serialize};

use qrforge_common::{Color, QrForgeError, QrForgeResult, RenderWarning};

use crate::fill::{BackgroundConfig, FillConfig};
use crate::matrix::EcLevel;
use crate::overlay::{LogoConfig, StickerConfig};

/// Outline width above this fraction of the canvas risks scan failure.
pub const OUTLINE_WIDTH_WARN_RATIO: f64 = 0.05;

/// Visual style applied to each dark data module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleShape {
    /// Axis-aligned square, one module per side.
    Square,
    /// Rect with corner radius at 25% of the module size.
    Rounded,
    /// Circle inscribed in the module.
    Dots,
    /// Slightly smaller circle for visual separation between neighbors.
    Circular,
    /// Polygon through the four edge midpoints.
    Diamond,
    /// Contextual rounding: a corner rounds only when both adjacent
    /// neighbors are absent.
    Classy,
    /// Contextual rounding with a larger radius and a looser rule
    /// (either adjacent neighbor absent).
    ClassyRounded,
}

/// Outer frame style of the three finder patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerFrameStyle {
    Square,
    Rounded,
    ExtraRounded,
    Circular,
    /// Stroked frame outline plus four corner dots (decorative).
    Dot,
}

/// Inner dot style of the three finder patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotStyle {
    Square,
    Rounded,
    Circle,
}

/// Border shape drawn around the whole composed canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OutlineStyle {
    Square,
    Rounded { radius: f64 },
    Circular,
    Dashed,
    Double { gap: f64 },
}

/// Border drawn around the whole composed canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub enabled: bool,
    pub style: OutlineStyle,
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            style: OutlineStyle::Square,
            color: Color::BLACK,
            width: 4.0,
        }
    }
}

/// Complete designer configuration, authored by the UI or a design file
/// and consumed read-only by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    /// Canvas size in pixels (square).
    pub size: u32,

    /// Quiet-zone margin in modules.
    pub margin: u32,

    pub module_shape: ModuleShape,
    pub corner_frame_style: CornerFrameStyle,
    pub corner_dot_style: CornerDotStyle,

    pub foreground: FillConfig,
    pub background: BackgroundConfig,

    pub logo: Option<LogoConfig>,

    #[serde(default)]
    pub stickers: Vec<StickerConfig>,

    pub outline: OutlineConfig,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            margin: 4,
            module_shape: ModuleShape::Square,
            corner_frame_style: CornerFrameStyle::Square,
            corner_dot_style: CornerDotStyle::Square,
            foreground: FillConfig::default(),
            background: BackgroundConfig::default(),
            logo: None,
            stickers: Vec::new(),
            outline: OutlineConfig::default(),
        }
    }
}

impl DesignerConfig {
    /// Validate the whole design against an error-correction level.
    ///
    /// Invalid values abort with a `Validation` error and nothing
    /// renders; scannability concerns come back as warnings and the
    /// caller decides how to surface them.
    pub fn validate(&self, ec_level: EcLevel) -> QrForgeResult<Vec<RenderWarning>> {
        let mut warnings = Vec::new();

        if self.size == 0 {
            return Err(QrForgeError::validation("canvas size must be positive"));
        }

        self.foreground.validate()?;
        self.background.validate()?;

        if let Some(logo) = &self.logo {
            logo.validate()?;
            warnings.extend(logo.clearance_check(ec_level));
        }

        let mut seen_ids = std::collections::HashSet::new();
        for sticker in &self.stickers {
            sticker.validate()?;
            if !seen_ids.insert(sticker.id.as_str()) {
                return Err(QrForgeError::validation(format!(
                    "duplicate sticker id '{}'",
                    sticker.id
                )));
            }
        }

        if self.outline.enabled {
            if !self.outline.width.is_finite() || self.outline.width <= 0.0 {
                return Err(QrForgeError::validation("outline width must be positive"));
            }
            let max = self.size as f64 * OUTLINE_WIDTH_WARN_RATIO;
            if self.outline.width > max {
                warnings.push(RenderWarning::OutlineTooThick {
                    width: self.outline.width,
                    max,
                });
            }
        }

        Ok(warnings)
    }

    /// Load a design from JSON.
    pub fn from_json(json: &str) -> QrForgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the design to pretty JSON (design files).
    pub fn to_json(&self) -> QrForgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
