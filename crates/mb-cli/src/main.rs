//! monoblit: composite a scene file and print the display buffer.
//!
//! Reads a scene (see `mb_core::scene`), copies every canvas into the
//! composite within its dirty area, then writes the composite as ASCII,
//! PBM or a JSON report. Set `RUST_LOG=info` to see per-canvas decisions.

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use std::fs;
use std::io::{self, Write};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.scene)
        .with_context(|| format!("failed to read {}", cli.scene.display()))?;
    let mut scene = mb_core::parse_scene(&text)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("invalid scene {}", cli.scene.display()))?;

    let canvases = report::composite_scene(&mut scene).map_err(anyhow::Error::msg)?;
    let config = cli.dump_config();

    let output = match cli.format {
        OutputFormat::Ascii => mb_render::to_ascii(&scene.composite.bitmap, &config).into_bytes(),
        OutputFormat::Pbm => {
            mb_render::to_pbm(&scene.composite.bitmap).map_err(anyhow::Error::msg)?
        }
        OutputFormat::Json => {
            let report = report::build_report(&scene, canvases, &config);
            let mut json = serde_json::to_vec_pretty(&report)?;
            json.push(b'\n');
            json
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().write_all(&output)?,
    }

    Ok(())
}
