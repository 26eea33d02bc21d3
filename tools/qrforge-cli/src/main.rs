//! QRForge CLI — Command-line interface for rendering and exporting QR designs.
//!
//! Usage:
//!   qrforge render <PAYLOAD> [OPTIONS]   Render one code to SVG/PNG/PDF/EPS
//!   qrforge batch <MANIFEST> [OPTIONS]   Render a manifest into a ZIP archive
//!   qrforge validate <DESIGN>            Validate a design file
//!   qrforge info <PAYLOAD>               Show matrix information
//!   qrforge preview <PAYLOAD>            Print the code to the terminal

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "qrforge",
    about = "Customizable QR code rendering and export",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one QR code to a file
    Render {
        /// Payload text (URL, vCard body, plain text)
        payload: String,

        /// Output file path; extension defaults from --format
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: svg, png, pdf, eps
        #[arg(long, default_value = "svg")]
        format: String,

        /// Design file (JSON) to style the code
        #[arg(short, long)]
        design: Option<PathBuf>,

        /// Canvas size in pixels (overrides the design file)
        #[arg(long)]
        size: Option<u32>,

        /// Quiet-zone margin in modules (overrides the design file)
        #[arg(long)]
        margin: Option<u32>,

        /// Error-correction level: L, M, Q, H
        #[arg(long, default_value = "m")]
        ec: String,

        /// PNG export scale (2.0 for retina)
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Minify SVG output
        #[arg(long)]
        optimized: bool,

        /// Document title for metadata blocks
        #[arg(long)]
        title: Option<String>,
    },

    /// Render a batch manifest into a ZIP archive
    Batch {
        /// Manifest file (JSON)
        manifest: PathBuf,

        /// Output archive path
        #[arg(short, long, default_value = "qrforge-batch.zip")]
        output: PathBuf,
    },

    /// Validate a design file
    Validate {
        /// Design file (JSON)
        design: PathBuf,

        /// Error-correction level to check clearance against
        #[arg(long, default_value = "m")]
        ec: String,
    },

    /// Show matrix information for a payload
    Info {
        /// Payload text
        payload: String,

        /// Error-correction level: L, M, Q, H
        #[arg(long, default_value = "m")]
        ec: String,
    },

    /// Print the QR code to the terminal
    Preview {
        /// Payload text
        payload: String,

        /// Error-correction level: L, M, Q, H
        #[arg(long, default_value = "m")]
        ec: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    qrforge_common::logging::init_logging(&qrforge_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Render {
            payload,
            output,
            format,
            design,
            size,
            margin,
            ec,
            scale,
            optimized,
            title,
        } => {
            commands::render::run(
                payload, output, format, design, size, margin, ec, scale, optimized, title,
            )
            .await
        }
        Commands::Batch { manifest, output } => commands::batch::run(manifest, output).await,
        Commands::Validate { design, ec } => commands::validate::run(design, ec),
        Commands::Info { payload, ec } => commands::info::run(payload, ec),
        Commands::Preview { payload, ec } => commands::preview::run(payload, ec),
    }
}
