//! Non-fatal render warnings.
//!
//! Warnings accumulate on the rendered scene and export reports. They are
//! surfaced to the caller (the CLI prints them, UI consumers are expected
//! to show them) but never block rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three finder-pattern corners of a QR symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinderCorner {
    TopLeft,
    TopRight,
    BottomLeft,
}

impl fmt::Display for FinderCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLeft => write!(f, "top-left"),
            Self::TopRight => write!(f, "top-right"),
            Self::BottomLeft => write!(f, "bottom-left"),
        }
    }
}

/// A non-fatal condition detected while composing or exporting a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RenderWarning {
    /// The logo obscures more of the symbol than the error-correction
    /// level can reconstruct (with a 0.8 safety factor applied).
    ClearanceViolation {
        obscured_ratio: f64,
        budget_ratio: f64,
    },

    /// The planned clearance area is smaller than the logo's rendered
    /// footprint. Scan reliability is void until the grid is replanned.
    ClearanceMismatch {
        clearance_px: f64,
        footprint_px: f64,
    },

    /// A sticker's bounding box overlaps a finder-pattern corner region.
    FinderOverlap {
        sticker_id: String,
        corner: FinderCorner,
    },

    /// Outline stroke wider than 5% of the canvas risks scan failure.
    OutlineTooThick { width: f64, max: f64 },

    /// An image layer was skipped because its asset failed to load.
    AssetSkipped { url: String, reason: String },

    /// A non-solid fill was flattened to a solid color for EPS output.
    EpsFillDowngraded { element: String },

    /// The artwork could not be embedded as PDF vectors and was
    /// rasterized instead.
    PdfRasterFallback { reason: String },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClearanceViolation {
                obscured_ratio,
                budget_ratio,
            } => write!(
                f,
                "logo obscures {:.1}% of the symbol, above the {:.1}% recovery budget",
                obscured_ratio * 100.0,
                budget_ratio * 100.0
            ),
            Self::ClearanceMismatch {
                clearance_px,
                footprint_px,
            } => write!(
                f,
                "planned clearance ({clearance_px:.0}px) is smaller than the logo footprint ({footprint_px:.0}px)"
            ),
            Self::FinderOverlap { sticker_id, corner } => {
                write!(f, "sticker '{sticker_id}' overlaps the {corner} finder pattern")
            }
            Self::OutlineTooThick { width, max } => {
                write!(f, "outline width {width:.0}px exceeds {max:.0}px (5% of canvas)")
            }
            Self::AssetSkipped { url, reason } => {
                write!(f, "skipped image layer '{url}': {reason}")
            }
            Self::EpsFillDowngraded { element } => {
                write!(f, "EPS output flattened a non-solid fill on {element}")
            }
            Self::PdfRasterFallback { reason } => {
                write!(f, "PDF fell back to raster embedding: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_serde_roundtrip() {
        let warning = RenderWarning::FinderOverlap {
            sticker_id: "badge".to_string(),
            corner: FinderCorner::TopRight,
        };
        let json = serde_json::to_string(&warning).unwrap();
        let parsed: RenderWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(warning, parsed);
    }

    #[test]
    fn test_warning_display_mentions_budget() {
        let warning = RenderWarning::ClearanceViolation {
            obscured_ratio: 0.1225,
            budget_ratio: 0.056,
        };
        let text = warning.to_string();
        assert!(text.contains("12.2"));
        assert!(text.contains("5.6"));
    }
}
