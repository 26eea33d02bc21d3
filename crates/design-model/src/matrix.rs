//! The QR matrix encoding boundary.
//!
//! Reed-Solomon error correction and bit placement are delegated to the
//! `qrcode` crate; this module owns only the result: a square boolean
//! module grid plus its side length and the chosen error-correction
//! level. The matrix is immutable once produced and regenerated whenever
//! payload or level changes.

use serde::{Deserialize, Serialize};

use qrforge_common::{QrForgeError, QrForgeResult};

/// Practical payload ceiling enforced before handing off to the encoder.
pub const MAX_PAYLOAD_LEN: usize = 2000;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    /// Fraction of the symbol the decoder can reconstruct when obscured.
    pub fn recovery_ratio(&self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }

    /// Parse a single-letter level, case-insensitive.
    pub fn parse(s: &str) -> QrForgeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l" => Ok(Self::L),
            "m" => Ok(Self::M),
            "q" => Ok(Self::Q),
            "h" => Ok(Self::H),
            other => Err(QrForgeError::validation(format!(
                "unknown error-correction level '{other}': use L, M, Q, or H"
            ))),
        }
    }
}

impl std::fmt::Display for EcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L => write!(f, "L"),
            Self::M => write!(f, "M"),
            Self::Q => write!(f, "Q"),
            Self::H => write!(f, "H"),
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// An encoded QR symbol: square boolean module grid plus side length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    module_count: usize,
    /// Row-major module states; `true` is a dark module.
    modules: Vec<bool>,
    ec_level: EcLevel,
}

impl QrMatrix {
    /// Encode a payload at the given error-correction level.
    pub fn encode(payload: &str, ec_level: EcLevel) -> QrForgeResult<Self> {
        if payload.is_empty() {
            return Err(QrForgeError::encoding("payload is empty"));
        }
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(QrForgeError::encoding(format!(
                "payload is {} bytes, above the {MAX_PAYLOAD_LEN}-byte ceiling",
                payload.len()
            )));
        }

        let code = qrcode::QrCode::with_error_correction_level(payload.as_bytes(), ec_level.into())
            .map_err(|e| QrForgeError::encoding(format!("payload not encodable: {e}")))?;

        let module_count = code.width();
        let modules = code
            .to_colors()
            .iter()
            .map(|c| *c == qrcode::Color::Dark)
            .collect();

        Ok(Self {
            module_count,
            modules,
            ec_level,
        })
    }

    /// Build a matrix from a raw module grid (external encoders, tests).
    pub fn from_modules(
        module_count: usize,
        modules: Vec<bool>,
        ec_level: EcLevel,
    ) -> QrForgeResult<Self> {
        if modules.len() != module_count * module_count {
            return Err(QrForgeError::encoding(format!(
                "module grid length {} does not match {module_count}x{module_count}",
                modules.len()
            )));
        }
        Ok(Self {
            module_count,
            modules,
            ec_level,
        })
    }

    /// Side length of the symbol in modules.
    pub fn module_count(&self) -> usize {
        self.module_count
    }

    pub fn ec_level(&self) -> EcLevel {
        self.ec_level
    }

    /// Whether the module at `(row, col)` is dark. Out-of-range is light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.module_count || col >= self.module_count {
            return false;
        }
        self.modules[row * self.module_count + col]
    }

    /// Number of dark modules in the symbol.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }
}
