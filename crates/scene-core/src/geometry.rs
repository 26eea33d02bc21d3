//! Module-grid geometry planning.
//!
//! Converts module count, target canvas size, and quiet-zone margin into
//! per-module pixel coordinates and a role classification. Classification
//! is a pure function of indices and configuration; it never inspects
//! module bit values.

use serde::{Deserialize, Serialize};

/// Side length of a finder pattern in modules.
pub const FINDER_SIZE: usize = 7;

/// Role of one module cell in the rendered scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleRole {
    /// Part of one of the three 7×7 finder patterns.
    Finder,
    /// Reserved for the logo; skipped during data rendering.
    LogoClearance,
    /// Ordinary data module.
    Data,
}

/// Clearance request derived from a logo configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearanceSpec {
    /// Edge of the obscured square as a fraction of the canvas
    /// (logo size + logo margin).
    pub extent: f64,
}

/// One classified cell with its pixel rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedCell {
    pub row: usize,
    pub col: usize,
    pub role: ModuleRole,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Pixel-space placement of the module grid on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    module_count: usize,
    canvas_size: f64,
    margin_modules: f64,
    module_size: f64,
    offset: f64,
    /// Half-edge of the clearance box, in module units from the matrix
    /// center, when a logo is configured.
    clearance_half_modules: Option<f64>,
}

impl GridGeometry {
    /// Plan the grid for a canvas.
    ///
    /// `module_size = size / (module_count + margin * 2)` and the grid
    /// starts at `offset = margin * module_size`.
    pub fn plan(
        module_count: usize,
        size: u32,
        margin: u32,
        clearance: Option<ClearanceSpec>,
    ) -> Self {
        let canvas_size = size as f64;
        let margin_modules = margin as f64;
        let total_modules = module_count as f64 + margin_modules * 2.0;
        let module_size = canvas_size / total_modules;
        let offset = margin_modules * module_size;

        let clearance_half_modules = clearance.map(|c| c.extent / 2.0 * total_modules);

        Self {
            module_count,
            canvas_size,
            margin_modules,
            module_size,
            offset,
            clearance_half_modules,
        }
    }

    pub fn module_count(&self) -> usize {
        self.module_count
    }

    pub fn canvas_size(&self) -> f64 {
        self.canvas_size
    }

    pub fn module_size(&self) -> f64 {
        self.module_size
    }

    /// Pixel offset of the matrix origin (quiet zone width).
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Pixel edge of the planned clearance box, if a logo is configured.
    pub fn clearance_px(&self) -> Option<f64> {
        self.clearance_half_modules
            .map(|half| half * 2.0 * self.module_size)
    }

    /// Pixel rect of the cell at `(row, col)`.
    pub fn cell_rect(&self, row: usize, col: usize) -> (f64, f64, f64) {
        (
            self.offset + col as f64 * self.module_size,
            self.offset + row as f64 * self.module_size,
            self.module_size,
        )
    }

    /// Anchors of the three finder blocks as `(row, col)`:
    /// top-left, top-right, bottom-left.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.module_count - FINDER_SIZE;
        [(0, 0), (0, far), (far, 0)]
    }

    /// Classify the cell at `(row, col)`.
    pub fn classify(&self, row: usize, col: usize) -> ModuleRole {
        let far = self.module_count - FINDER_SIZE;
        let in_finder = (row < FINDER_SIZE && col < FINDER_SIZE)
            || (row < FINDER_SIZE && col >= far)
            || (row >= far && col < FINDER_SIZE);
        if in_finder {
            return ModuleRole::Finder;
        }

        if let Some(half) = self.clearance_half_modules {
            let center = self.module_count as f64 / 2.0;
            let dx = (col as f64 + 0.5 - center).abs();
            let dy = (row as f64 + 0.5 - center).abs();
            // Chebyshev distance: the clearance box covers both square
            // and circular logo footprints.
            if dx.max(dy) < half {
                return ModuleRole::LogoClearance;
            }
        }

        ModuleRole::Data
    }

    /// Iterate every cell of the grid, classified, with pixel rects.
    pub fn cells(&self) -> impl Iterator<Item = PlannedCell> + '_ {
        let count = self.module_count;
        (0..count).flat_map(move |row| {
            (0..count).map(move |col| {
                let (x, y, size) = self.cell_rect(row, col);
                PlannedCell {
                    row,
                    col,
                    role: self.classify(row, col),
                    x,
                    y,
                    size,
                }
            })
        })
    }
}
