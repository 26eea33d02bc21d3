//! Fill and background paint configuration.
//!
//! Paint sources are closed tagged unions so every consumer handles each
//! variant exhaustively at compile time.

use serde::{Deserialize, Serialize};

use qrforge_common::{Color, QrForgeError, QrForgeResult};

fn default_opacity() -> f64 {
    1.0
}

/// Gradient flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

/// A two-stop gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub kind: GradientKind,
    pub start: Color,
    pub end: Color,

    /// Rotation in degrees. Linear gradients only; radial ignores it.
    #[serde(default)]
    pub rotation_deg: f64,
}

impl GradientSpec {
    /// Rotation normalized into `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation_deg.rem_euclid(360.0)
    }

    pub fn validate(&self) -> QrForgeResult<()> {
        if !self.rotation_deg.is_finite() || !(0.0..=360.0).contains(&self.rotation_deg) {
            return Err(QrForgeError::validation(format!(
                "gradient rotation {} is outside [0, 360]",
                self.rotation_deg
            )));
        }
        Ok(())
    }
}

/// Paint source for the dark modules and finder patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FillConfig {
    Solid { color: Color },
    Gradient(GradientSpec),
    Image {
        url: String,
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
}

impl Default for FillConfig {
    fn default() -> Self {
        Self::Solid {
            color: Color::BLACK,
        }
    }
}

impl FillConfig {
    pub fn validate(&self) -> QrForgeResult<()> {
        match self {
            Self::Solid { .. } => Ok(()),
            Self::Gradient(gradient) => gradient.validate(),
            Self::Image { url, opacity } => validate_image(url, *opacity),
        }
    }
}

/// Canvas background layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundConfig {
    Transparent,
    Solid { color: Color },
    Gradient(GradientSpec),
    Image {
        url: String,
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self::Solid {
            color: Color::WHITE,
        }
    }
}

impl BackgroundConfig {
    pub fn validate(&self) -> QrForgeResult<()> {
        match self {
            Self::Transparent | Self::Solid { .. } => Ok(()),
            Self::Gradient(gradient) => gradient.validate(),
            Self::Image { url, opacity } => validate_image(url, *opacity),
        }
    }
}

fn validate_image(url: &str, opacity: f64) -> QrForgeResult<()> {
    if url.trim().is_empty() {
        return Err(QrForgeError::validation("image fill requires a URL"));
    }
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(QrForgeError::validation(format!(
            "image opacity {opacity} is outside [0, 1]"
        )));
    }
    Ok(())
}
