use clap::{Parser, ValueEnum};
use mb_render::DumpConfig;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "monoblit")]
#[command(about = "Composite scene canvases into a display buffer", long_about = None)]
pub struct Cli {
    /// Scene file to composite
    pub scene: PathBuf,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Glyph for set monochrome pixels
    #[arg(long = "set", default_value_t = '#')]
    pub set_glyph: char,

    /// Glyph for clear monochrome pixels
    #[arg(long = "clear", default_value_t = '.')]
    pub clear_glyph: char,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One text line per row
    Ascii,
    /// Binary PBM (1bpp scenes only)
    Pbm,
    /// Copy report with rows, as JSON
    Json,
}

impl Cli {
    pub fn dump_config(&self) -> DumpConfig {
        DumpConfig {
            set_glyph: self.set_glyph,
            clear_glyph: self.clear_glyph,
        }
    }
}
