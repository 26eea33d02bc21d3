//! Data-module shape rendering.
//!
//! Emits one vector primitive per dark data module. Cells classified as
//! finder-pattern or logo-clearance are never shape-wrapped here; the
//! corner renderer and logo layer own those regions.

use qrforge_design_model::{ModuleShape, QrMatrix};

use crate::geometry::{GridGeometry, ModuleRole, PlannedCell};
use crate::scene::{Paint, PathData, SceneNode};

/// Presence of the four edge-adjacent neighbors of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborMask {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// Which corners of a module round, named by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CornerFlags {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
}

/// Corner-rounding rule for the contextual shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingRule {
    /// A corner rounds only when both adjacent neighbors are absent.
    BothAbsent,
    /// A corner rounds when either adjacent neighbor is absent.
    EitherAbsent,
}

/// Decide which corners round, from neighbor presence alone.
///
/// Pure and backend-independent so the rounding behavior is testable
/// without any SVG or canvas machinery.
pub fn corner_rounding(neighbors: NeighborMask, rule: RoundingRule) -> CornerFlags {
    let decide = |a: bool, b: bool| match rule {
        RoundingRule::BothAbsent => !a && !b,
        RoundingRule::EitherAbsent => !a || !b,
    };
    CornerFlags {
        top_left: decide(neighbors.top, neighbors.left),
        top_right: decide(neighbors.top, neighbors.right),
        bottom_right: decide(neighbors.bottom, neighbors.right),
        bottom_left: decide(neighbors.bottom, neighbors.left),
    }
}

/// Emit primitives for every dark data module of the matrix.
pub fn render_modules(
    matrix: &QrMatrix,
    geometry: &GridGeometry,
    shape: ModuleShape,
    fill: &Paint,
) -> Vec<SceneNode> {
    geometry
        .cells()
        .filter(|cell| cell.role == ModuleRole::Data && matrix.is_dark(cell.row, cell.col))
        .map(|cell| module_node(matrix, &cell, shape, fill.clone()))
        .collect()
}

fn module_node(matrix: &QrMatrix, cell: &PlannedCell, shape: ModuleShape, fill: Paint) -> SceneNode {
    let PlannedCell { x, y, size: s, .. } = *cell;
    match shape {
        ModuleShape::Square => SceneNode::Rect {
            x,
            y,
            w: s,
            h: s,
            rx: 0.0,
            fill,
            stroke: None,
        },
        ModuleShape::Rounded => SceneNode::Rect {
            x,
            y,
            w: s,
            h: s,
            rx: s * 0.25,
            fill,
            stroke: None,
        },
        ModuleShape::Dots => SceneNode::Circle {
            cx: x + s / 2.0,
            cy: y + s / 2.0,
            r: s / 2.0,
            fill,
            stroke: None,
        },
        // Slightly undersized so adjacent dots read as separate.
        ModuleShape::Circular => SceneNode::Circle {
            cx: x + s / 2.0,
            cy: y + s / 2.0,
            r: s / 2.2,
            fill,
            stroke: None,
        },
        ModuleShape::Diamond => {
            let mut data = PathData::new();
            data.move_to(x + s / 2.0, y)
                .line_to(x + s, y + s / 2.0)
                .line_to(x + s / 2.0, y + s)
                .line_to(x, y + s / 2.0)
                .close();
            SceneNode::Path {
                data,
                fill,
                even_odd: false,
                stroke: None,
            }
        }
        ModuleShape::Classy => {
            let flags = corner_rounding(
                neighbor_mask(matrix, cell.row, cell.col),
                RoundingRule::BothAbsent,
            );
            SceneNode::Path {
                data: contextual_path(x, y, s, flags, 0.35),
                fill,
                even_odd: false,
                stroke: None,
            }
        }
        ModuleShape::ClassyRounded => {
            let flags = corner_rounding(
                neighbor_mask(matrix, cell.row, cell.col),
                RoundingRule::EitherAbsent,
            );
            SceneNode::Path {
                data: contextual_path(x, y, s, flags, 0.5),
                fill,
                even_odd: false,
                stroke: None,
            }
        }
    }
}

/// Neighbor presence for the module at `(row, col)`. Cells outside the
/// grid read as absent.
fn neighbor_mask(matrix: &QrMatrix, row: usize, col: usize) -> NeighborMask {
    NeighborMask {
        top: row > 0 && matrix.is_dark(row - 1, col),
        right: matrix.is_dark(row, col + 1),
        bottom: matrix.is_dark(row + 1, col),
        left: col > 0 && matrix.is_dark(row, col - 1),
    }
}

/// Explicit M/L/Q/Z path for a module square with selectively rounded
/// corners. Built by hand because only some corners round; a generic
/// rounded rect cannot express that.
fn contextual_path(x: f64, y: f64, s: f64, flags: CornerFlags, radius_ratio: f64) -> PathData {
    let r = s * radius_ratio;
    let tl = if flags.top_left { r } else { 0.0 };
    let tr = if flags.top_right { r } else { 0.0 };
    let br = if flags.bottom_right { r } else { 0.0 };
    let bl = if flags.bottom_left { r } else { 0.0 };

    let mut path = PathData::new();
    path.move_to(x + tl, y);
    path.line_to(x + s - tr, y);
    if flags.top_right {
        path.quad_to(x + s, y, x + s, y + tr);
    }
    path.line_to(x + s, y + s - br);
    if flags.bottom_right {
        path.quad_to(x + s, y + s, x + s - br, y + s);
    }
    path.line_to(x + bl, y + s);
    if flags.bottom_left {
        path.quad_to(x, y + s, x, y + s - bl);
    }
    path.line_to(x, y + tl);
    if flags.top_left {
        path.quad_to(x, y, x + tl, y);
    }
    path.close();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrforge_design_model::EcLevel;

    fn all_dark_matrix(count: usize) -> QrMatrix {
        QrMatrix::from_modules(count, vec![true; count * count], EcLevel::M).unwrap()
    }

    #[test]
    fn test_corner_rounding_both_absent_rule() {
        // Isolated module: everything rounds.
        let flags = corner_rounding(NeighborMask::default(), RoundingRule::BothAbsent);
        assert!(flags.top_left && flags.top_right && flags.bottom_right && flags.bottom_left);

        // A left neighbor keeps the left corners square.
        let flags = corner_rounding(
            NeighborMask {
                left: true,
                ..NeighborMask::default()
            },
            RoundingRule::BothAbsent,
        );
        assert!(!flags.top_left && !flags.bottom_left);
        assert!(flags.top_right && flags.bottom_right);
    }

    #[test]
    fn test_corner_rounding_either_absent_rule() {
        // With both top and left present, the top-left corner stays
        // square even under the looser rule.
        let neighbors = NeighborMask {
            top: true,
            left: true,
            ..NeighborMask::default()
        };
        let flags = corner_rounding(neighbors, RoundingRule::EitherAbsent);
        assert!(!flags.top_left);
        assert!(flags.top_right && flags.bottom_left && flags.bottom_right);
    }

    #[test]
    fn test_never_wraps_finder_or_clearance_cells() {
        let matrix = all_dark_matrix(25);
        for shape in [
            ModuleShape::Square,
            ModuleShape::Rounded,
            ModuleShape::Dots,
            ModuleShape::Circular,
            ModuleShape::Diamond,
            ModuleShape::Classy,
            ModuleShape::ClassyRounded,
        ] {
            let geometry = GridGeometry::plan(
                25,
                1000,
                4,
                Some(crate::geometry::ClearanceSpec { extent: 0.3 }),
            );
            let nodes = render_modules(&matrix, &geometry, shape, &Paint::None);
            let expected = geometry
                .cells()
                .filter(|c| c.role == ModuleRole::Data)
                .count();
            assert_eq!(nodes.len(), expected, "shape {shape:?}");
        }
    }

    #[test]
    fn test_square_module_covers_cell() {
        let matrix = all_dark_matrix(21);
        let geometry = GridGeometry::plan(21, 290, 4, None);
        let nodes = render_modules(&matrix, &geometry, ModuleShape::Square, &Paint::None);
        let in_bounds = nodes.iter().all(|n| match n {
            SceneNode::Rect { x, y, w, h, .. } => {
                *w == 10.0 && *h == 10.0 && *x >= 40.0 && *y >= 40.0
            }
            _ => false,
        });
        assert!(in_bounds);
    }

    #[test]
    fn test_classy_connected_module_has_no_quads() {
        // A module surrounded on all four sides keeps every corner
        // square, so its path is straight segments only.
        let matrix = all_dark_matrix(21);
        let geometry = GridGeometry::plan(21, 290, 0, None);
        let nodes = render_modules(&matrix, &geometry, ModuleShape::Classy, &Paint::None);
        let center_cell = geometry.cell_rect(10, 10);
        let center_node = nodes.iter().find(|n| match n {
            SceneNode::Path { data, .. } => matches!(
                data.commands.first(),
                Some(crate::scene::PathCommand::MoveTo { x, y })
                    if *x == center_cell.0 && *y == center_cell.1
            ),
            _ => false,
        });
        match center_node {
            Some(SceneNode::Path { data, .. }) => {
                assert!(!data
                    .commands
                    .iter()
                    .any(|c| matches!(c, crate::scene::PathCommand::QuadTo { .. })));
            }
            other => panic!("expected a path node, got {other:?}"),
        }
    }

    #[test]
    fn test_diamond_touches_edge_midpoints() {
        let matrix = all_dark_matrix(21);
        let geometry = GridGeometry::plan(21, 210, 0, None);
        let nodes = render_modules(&matrix, &geometry, ModuleShape::Diamond, &Paint::None);
        match &nodes[0] {
            SceneNode::Path { data, .. } => {
                // First data cell in row-major order is (0, 7); the
                // diamond starts at the top edge midpoint.
                assert!(matches!(
                    data.commands[0],
                    crate::scene::PathCommand::MoveTo { x, y } if x == 75.0 && y == 0.0
                ));
            }
            other => panic!("expected a path node, got {other:?}"),
        }
    }
}
