//! Bitmap → text and PBM dumps.
//!
//! Used by the CLI and by tests to eyeball composite contents.

use mb_core::{Bitmap, PixelDepth};

// ─── Config ──────────────────────────────────────────────────────────────

/// Glyphs for monochrome ASCII dumps.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Glyph for a set pixel. Default: `#`.
    pub set_glyph: char,
    /// Glyph for a clear pixel. Default: `.`.
    pub clear_glyph: char,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            set_glyph: '#',
            clear_glyph: '.',
        }
    }
}

// ─── ASCII ───────────────────────────────────────────────────────────────

/// One string per bitmap row.
///
/// Monochrome rows use the configured glyphs; deeper formats print each
/// pixel as zero-padded hex separated by spaces.
pub fn ascii_rows(bitmap: &Bitmap, config: &DumpConfig) -> Vec<String> {
    let depth = bitmap.depth();
    let digits = (depth.bits() as usize).div_ceil(4);

    (0..bitmap.height())
        .map(|y| {
            let pixels = (0..bitmap.width()).map(|x| bitmap.pixel(x, y).unwrap_or(0));
            if depth == PixelDepth::Mono1 {
                pixels
                    .map(|p| {
                        if p == 1 {
                            config.set_glyph
                        } else {
                            config.clear_glyph
                        }
                    })
                    .collect::<String>()
            } else {
                pixels
                    .map(|p| format!("{p:0digits$x}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        })
        .collect()
}

/// The whole bitmap as newline-terminated rows.
pub fn to_ascii(bitmap: &Bitmap, config: &DumpConfig) -> String {
    let mut out = String::new();
    for row in ascii_rows(bitmap, config) {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

// ─── PBM ─────────────────────────────────────────────────────────────────

/// Encode a monochrome bitmap as binary PBM (`P4`).
///
/// P4 rows are MSB-first and padded to whole bytes with 1 meaning black,
/// which is the monochrome row layout as-is.
///
/// # Errors
/// Returns an error for bitmaps deeper than 1 bpp.
pub fn to_pbm(bitmap: &Bitmap) -> Result<Vec<u8>, String> {
    if bitmap.depth() != PixelDepth::Mono1 {
        return Err(format!("PBM needs a 1bpp bitmap, got {}", bitmap.depth()));
    }
    let header = format!("P4\n{} {}\n", bitmap.width(), bitmap.height());
    let mut out = Vec::with_capacity(header.len() + bitmap.as_bytes().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(bitmap.as_bytes());
    Ok(out)
}
