//! Logo and sticker overlay configuration.

use serde::{Deserialize, Serialize};

use qrforge_common::{Color, QrForgeError, QrForgeResult, RenderWarning};

use crate::matrix::EcLevel;

/// Safety factor applied to the error-correction recovery budget before
/// comparing it to the area obscured by a logo.
pub const CLEARANCE_SAFETY_FACTOR: f64 = 0.8;

/// Shape of the logo plate and image clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoShape {
    Square,
    Circle,
}

/// An embedded logo centered on the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoConfig {
    pub url: String,

    /// Edge length as a fraction of the canvas (0–0.5).
    pub size: f64,

    /// Clearance margin around the logo as a fraction of the canvas (0–0.3).
    #[serde(default)]
    pub margin: f64,

    #[serde(default = "default_logo_shape")]
    pub shape: LogoShape,

    /// Optional plate painted behind the logo.
    #[serde(default)]
    pub background_color: Option<Color>,

    /// Optional border stroke matching the logo shape.
    #[serde(default)]
    pub border_color: Option<Color>,

    #[serde(default)]
    pub border_width: f64,
}

fn default_logo_shape() -> LogoShape {
    LogoShape::Square
}

impl LogoConfig {
    pub fn validate(&self) -> QrForgeResult<()> {
        if self.url.trim().is_empty() {
            return Err(QrForgeError::validation("logo requires a URL"));
        }
        if !self.size.is_finite() || self.size <= 0.0 || self.size > 0.5 {
            return Err(QrForgeError::validation(format!(
                "logo size {} is outside (0, 0.5]",
                self.size
            )));
        }
        if !self.margin.is_finite() || !(0.0..=0.3).contains(&self.margin) {
            return Err(QrForgeError::validation(format!(
                "logo margin {} is outside [0, 0.3]",
                self.margin
            )));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(QrForgeError::validation("logo border width must be >= 0"));
        }
        Ok(())
    }

    /// Fraction of the symbol obscured by the logo plus its clearance
    /// margin: `(size + margin)²`.
    pub fn obscured_ratio(&self) -> f64 {
        let side = self.size + self.margin;
        side * side
    }

    /// Check the obscured area against the error-correction recovery
    /// budget. Never clamps; a violation comes back as a warning and
    /// rendering proceeds.
    pub fn clearance_check(&self, ec_level: EcLevel) -> Option<RenderWarning> {
        let budget = ec_level.recovery_ratio() * CLEARANCE_SAFETY_FACTOR;
        let obscured = self.obscured_ratio();
        (obscured > budget).then_some(RenderWarning::ClearanceViolation {
            obscured_ratio: obscured,
            budget_ratio: budget,
        })
    }
}

/// Named anchor or custom fractional position for a sticker.
///
/// Fractional coordinates follow anchor semantics: 0 aligns the sticker's
/// left/top edge, 1 aligns its right/bottom edge, 0.5 centers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "kebab-case")]
pub enum StickerPosition {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Custom { x: f64, y: f64 },
}

impl StickerPosition {
    /// Resolve to a fractional `(x, y)` anchor in `[0, 1]²`.
    pub fn resolve(&self) -> (f64, f64) {
        match *self {
            Self::Top => (0.5, 0.0),
            Self::Bottom => (0.5, 1.0),
            Self::Left => (0.0, 0.5),
            Self::Right => (1.0, 0.5),
            Self::TopLeft => (0.0, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
            Self::Custom { x, y } => (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)),
        }
    }
}

/// One decorative sticker layered over the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerConfig {
    pub id: String,
    pub url: String,
    pub position: StickerPosition,

    /// Edge length as a fraction of the canvas (0.05–0.5).
    pub size: f64,

    /// Rotation about the sticker's own center, degrees (0–360).
    #[serde(default)]
    pub rotation_deg: f64,

    #[serde(default = "default_sticker_opacity")]
    pub opacity: f64,
}

fn default_sticker_opacity() -> f64 {
    1.0
}

impl StickerConfig {
    pub fn validate(&self) -> QrForgeResult<()> {
        if self.id.trim().is_empty() {
            return Err(QrForgeError::validation("sticker requires an id"));
        }
        if self.url.trim().is_empty() {
            return Err(QrForgeError::validation(format!(
                "sticker '{}' requires a URL",
                self.id
            )));
        }
        if !self.size.is_finite() || !(0.05..=0.5).contains(&self.size) {
            return Err(QrForgeError::validation(format!(
                "sticker '{}' size {} is outside [0.05, 0.5]",
                self.id, self.size
            )));
        }
        if !self.rotation_deg.is_finite() || !(0.0..=360.0).contains(&self.rotation_deg) {
            return Err(QrForgeError::validation(format!(
                "sticker '{}' rotation {} is outside [0, 360]",
                self.id, self.rotation_deg
            )));
        }
        if !self.opacity.is_finite() || !(0.1..=1.0).contains(&self.opacity) {
            return Err(QrForgeError::validation(format!(
                "sticker '{}' opacity {} is outside [0.1, 1.0]",
                self.id, self.opacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo(size: f64, margin: f64) -> LogoConfig {
        LogoConfig {
            url: "logo.png".to_string(),
            size,
            margin,
            shape: LogoShape::Square,
            background_color: None,
            border_color: None,
            border_width: 0.0,
        }
    }

    #[test]
    fn test_clearance_passes_at_high_ec() {
        // 0.35^2 = 12.25% obscured vs 30% * 0.8 = 24% budget.
        assert!(logo(0.30, 0.05).clearance_check(EcLevel::H).is_none());
    }

    #[test]
    fn test_clearance_violated_at_low_ec() {
        // 12.25% obscured vs 7% * 0.8 = 5.6% budget.
        let warning = logo(0.30, 0.05).clearance_check(EcLevel::L).unwrap();
        match warning {
            RenderWarning::ClearanceViolation {
                obscured_ratio,
                budget_ratio,
            } => {
                assert!((obscured_ratio - 0.1225).abs() < 1e-9);
                assert!((budget_ratio - 0.056).abs() < 1e-9);
            }
            other => panic!("unexpected warning: {other:?}"),
        }
    }

    #[test]
    fn test_logo_validation_ranges() {
        assert!(logo(0.0, 0.0).validate().is_err());
        assert!(logo(0.6, 0.0).validate().is_err());
        assert!(logo(0.3, 0.4).validate().is_err());
        assert!(logo(0.3, 0.05).validate().is_ok());
    }

    #[test]
    fn test_anchor_resolution_table() {
        assert_eq!(StickerPosition::Top.resolve(), (0.5, 0.0));
        assert_eq!(StickerPosition::Bottom.resolve(), (0.5, 1.0));
        assert_eq!(StickerPosition::Left.resolve(), (0.0, 0.5));
        assert_eq!(StickerPosition::Right.resolve(), (1.0, 0.5));
        assert_eq!(StickerPosition::BottomRight.resolve(), (1.0, 1.0));
        assert_eq!(
            StickerPosition::Custom { x: 1.7, y: -0.3 }.resolve(),
            (1.0, 0.0)
        );
    }

    #[test]
    fn test_sticker_validation_ranges() {
        let mut sticker = StickerConfig {
            id: "badge".to_string(),
            url: "badge.png".to_string(),
            position: StickerPosition::Top,
            size: 0.2,
            rotation_deg: 15.0,
            opacity: 0.9,
        };
        assert!(sticker.validate().is_ok());

        sticker.size = 0.01;
        assert!(sticker.validate().is_err());
        sticker.size = 0.2;

        sticker.opacity = 0.05;
        assert!(sticker.validate().is_err());
        sticker.opacity = 0.9;

        sticker.rotation_deg = 400.0;
        assert!(sticker.validate().is_err());
    }

    #[test]
    fn test_sticker_position_serde() {
        let position = StickerPosition::Custom { x: 0.25, y: 0.75 };
        let json = serde_json::to_string(&position).unwrap();
        assert!(json.contains("\"preset\":\"custom\""));
        let parsed: StickerPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(position, parsed);
    }
}
