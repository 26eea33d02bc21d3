//! Show matrix information for a payload.

use qrforge_design_model::{EcLevel, QrMatrix, MAX_PAYLOAD_LEN};

pub fn run(payload: String, ec: String) -> anyhow::Result<()> {
    let ec_level = EcLevel::parse(&ec).map_err(|e| anyhow::anyhow!("{e}"))?;
    let matrix = QrMatrix::encode(&payload, ec_level)
        .map_err(|e| anyhow::anyhow!("Encoding failed: {e}"))?;

    let count = matrix.module_count();
    let version = (count - 17) / 4;
    let total = count * count;
    let dark = matrix.dark_count();

    println!("Payload: {} bytes (ceiling {MAX_PAYLOAD_LEN})", payload.len());
    println!("  Version: {version} ({count}x{count} modules)");
    println!("  Error correction: {ec_level}");
    println!(
        "  Recovery budget: {:.0}% of the symbol",
        ec_level.recovery_ratio() * 100.0
    );
    println!(
        "  Dark modules: {dark} / {total} ({:.1}%)",
        dark as f64 / total as f64 * 100.0
    );

    Ok(())
}
