//! Print a QR code to the terminal.
//!
//! Uses Unicode half blocks so each character covers two module rows.

use qrforge_design_model::{EcLevel, QrMatrix};

pub fn run(payload: String, ec: String) -> anyhow::Result<()> {
    let ec_level = EcLevel::parse(&ec).map_err(|e| anyhow::anyhow!("{e}"))?;
    let matrix = QrMatrix::encode(&payload, ec_level)
        .map_err(|e| anyhow::anyhow!("Encoding failed: {e}"))?;

    let count = matrix.module_count();
    let quiet = 2;

    println!();
    let mut row = -quiet;
    while row < count as i64 + quiet {
        let mut line = String::from("  ");
        let mut col = -quiet;
        while col < count as i64 + quiet {
            let top = cell(&matrix, row, col);
            let bottom = cell(&matrix, row + 1, col);
            line.push(match (top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
            col += 1;
        }
        println!("{line}");
        row += 2;
    }
    println!();

    Ok(())
}

fn cell(matrix: &QrMatrix, row: i64, col: i64) -> bool {
    if row < 0 || col < 0 {
        return false;
    }
    matrix.is_dark(row as usize, col as usize)
}
