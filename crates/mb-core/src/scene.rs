//! Parser for the scene text format → [`Scene`].
//!
//! A scene declares one composite, any number of dirty marks and a list of
//! canvases with their pixel rows:
//!
//! ```text
//! # comment
//! composite 16x2 depth=1
//! dirty 0,0 5,1
//! canvas @badge 10x2 at 3,0 {
//!   ##########
//!   ##########
//! }
//! ```
//!
//! Monochrome rows are glyph strings (`#`/`1` set, `.`/`0` clear). Deeper
//! formats list one hex value per pixel, whitespace-separated. Missing rows
//! and trailing pixels stay 0. When no `dirty` line is present the whole
//! composite is dirty.

use crate::geometry::{Rectangle, combine};
use crate::pixel::PixelDepth;
use crate::surface::{Bitmap, Canvas, Composite};
use winnow::ascii::{dec_int, dec_uint, space0, space1};
use winnow::combinator::{delimited, opt, preceded, separated_pair};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Largest buffer a scene file may declare for one surface (64 MiB).
pub const MAX_SCENE_BITMAP_BYTES: usize = 64 * 1024 * 1024;

/// A composite plus the canvases to merge into it, in declaration order.
#[derive(Debug, Clone)]
pub struct Scene {
    pub composite: Composite,
    pub canvases: Vec<SceneCanvas>,
}

#[derive(Debug, Clone)]
pub struct SceneCanvas {
    pub name: String,
    pub canvas: Canvas,
}

impl Scene {
    pub fn canvas(&self, name: &str) -> Option<&Canvas> {
        self.canvases
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.canvas)
    }
}

/// Parse a scene document.
#[must_use = "parsing result should be used"]
pub fn parse_scene(input: &str) -> Result<Scene, String> {
    let mut composite: Option<Composite> = None;
    let mut dirty: Option<Rectangle> = None;
    let mut canvases: Vec<SceneCanvas> = Vec::new();
    let mut rest = input;

    skip_ws_and_comments(&mut rest);

    while !rest.is_empty() {
        if rest.starts_with("composite") {
            if composite.is_some() {
                return Err("Duplicate composite declaration".to_string());
            }
            let decl = parse_composite_decl
                .parse_next(&mut rest)
                .map_err(|e| format!("Composite parse error: {e}"))?;
            composite = Some(build_composite(decl)?);
        } else if rest.starts_with("dirty") {
            let area = parse_dirty_line
                .parse_next(&mut rest)
                .map_err(|e| format!("Dirty parse error: {e}"))?;
            dirty = Some(dirty.map_or(area, |d| combine(d, area)));
        } else if rest.starts_with("canvas") {
            let Some(comp) = composite.as_ref() else {
                return Err("Canvas declared before composite".to_string());
            };
            let decl = parse_canvas_decl
                .parse_next(&mut rest)
                .map_err(|e| format!("Canvas parse error: {e}"))?;
            if canvases.iter().any(|c| c.name == decl.name) {
                return Err(format!("Duplicate canvas @{}", decl.name));
            }
            let name = decl.name.to_string();
            let canvas = build_canvas(decl, comp.bitmap.depth())?;
            log::debug!("scene canvas @{name} at {}", canvas.on_screen());
            canvases.push(SceneCanvas { name, canvas });
        } else {
            let line = rest.lines().next().unwrap_or_default();
            return Err(format!("Unexpected line: {line}"));
        }

        skip_ws_and_comments(&mut rest);
    }

    let mut composite = composite.ok_or("Missing composite declaration")?;
    match dirty {
        Some(area) => composite.set_dirty_area(area),
        None => composite.mark_all_dirty(),
    }

    Ok(Scene {
        composite,
        canvases,
    })
}

// ─── Declarations ────────────────────────────────────────────────────────

#[derive(Debug)]
struct CompositeDecl<'a> {
    width: u32,
    height: u32,
    depth_bits: Option<u32>,
    rows: Vec<&'a str>,
}

#[derive(Debug)]
struct CanvasDecl<'a> {
    name: &'a str,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rows: Vec<&'a str>,
}

fn parse_composite_decl<'a>(input: &mut &'a str) -> ModalResult<CompositeDecl<'a>> {
    let _ = "composite".parse_next(input)?;
    let _ = space1.parse_next(input)?;
    let (width, height) = parse_size.parse_next(input)?;
    let depth_bits: Option<u32> = opt(preceded((space1, "depth="), dec_uint)).parse_next(input)?;
    skip_space(input);
    let rows = opt(parse_rows_block).parse_next(input)?.unwrap_or_default();
    Ok(CompositeDecl {
        width,
        height,
        depth_bits,
        rows,
    })
}

fn parse_canvas_decl<'a>(input: &mut &'a str) -> ModalResult<CanvasDecl<'a>> {
    let _ = "canvas".parse_next(input)?;
    let _ = space1.parse_next(input)?;
    let name = preceded('@', parse_identifier).parse_next(input)?;
    let _ = space1.parse_next(input)?;
    let (width, height) = parse_size.parse_next(input)?;
    let _ = (space1, "at", space1).parse_next(input)?;
    let (x, y) = parse_point.parse_next(input)?;
    skip_space(input);
    let rows = opt(parse_rows_block).parse_next(input)?.unwrap_or_default();
    Ok(CanvasDecl {
        name,
        width,
        height,
        x,
        y,
        rows,
    })
}

/// `dirty L,T R,B` with inclusive corners.
fn parse_dirty_line(input: &mut &str) -> ModalResult<Rectangle> {
    let _ = "dirty".parse_next(input)?;
    let _ = space1.parse_next(input)?;
    let (left, top) = parse_point.parse_next(input)?;
    let _ = space1.parse_next(input)?;
    let (right, bottom) = parse_point.parse_next(input)?;
    Ok(Rectangle::new(left, top, right, bottom))
}

// ─── Low-level parsers ───────────────────────────────────────────────────

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with('#') {
            if let Some(pos) = input.find('\n') {
                *input = &input[pos + 1..];
            } else {
                *input = "";
            }
            continue;
        }
        if *input == before {
            break;
        }
    }
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    let _: Result<&str, winnow::error::ErrMode<ContextError>> = space0.parse_next(input);
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// `WxH`
fn parse_size(input: &mut &str) -> ModalResult<(u32, u32)> {
    separated_pair(dec_uint, 'x', dec_uint).parse_next(input)
}

/// `X,Y`, either coordinate may be negative.
fn parse_point(input: &mut &str) -> ModalResult<(i32, i32)> {
    separated_pair(dec_int, (space0, ',', space0), dec_int).parse_next(input)
}

/// `{ row* }`, one non-blank line per pixel row.
fn parse_rows_block<'a>(input: &mut &'a str) -> ModalResult<Vec<&'a str>> {
    let body: &str = delimited('{', take_till(0.., '}'), '}').parse_next(input)?;
    Ok(body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect())
}

// ─── Building surfaces ───────────────────────────────────────────────────

fn build_composite(decl: CompositeDecl<'_>) -> Result<Composite, String> {
    let depth = match decl.depth_bits {
        Some(bits) => {
            PixelDepth::from_bits(bits).ok_or_else(|| format!("Unsupported depth: {bits}"))?
        }
        None => PixelDepth::Mono1,
    };
    let mut bitmap = scene_bitmap(decl.width, decl.height, depth)
        .map_err(|e| format!("composite: {e}"))?;
    decode_rows(&mut bitmap, &decl.rows).map_err(|e| format!("composite: {e}"))?;
    Ok(Composite::from_bitmap(bitmap))
}

fn build_canvas(decl: CanvasDecl<'_>, depth: PixelDepth) -> Result<Canvas, String> {
    let mut bitmap = scene_bitmap(decl.width, decl.height, depth)
        .map_err(|e| format!("@{}: {e}", decl.name))?;
    decode_rows(&mut bitmap, &decl.rows).map_err(|e| format!("@{}: {e}", decl.name))?;
    Ok(Canvas::from_bitmap(bitmap).with_offset(decl.x, decl.y))
}

/// Allocate a bitmap for a scene declaration, capped at [`MAX_SCENE_BITMAP_BYTES`].
fn scene_bitmap(width: u32, height: u32, depth: PixelDepth) -> Result<Bitmap, String> {
    let len = Bitmap::checked_len(width, height, depth)?;
    if len > MAX_SCENE_BITMAP_BYTES {
        return Err(format!("{width}x{height} {depth} bitmap is too large ({len} bytes)"));
    }
    Bitmap::try_new(width, height, depth)
}

fn decode_rows(bitmap: &mut Bitmap, rows: &[&str]) -> Result<(), String> {
    if rows.len() > bitmap.height() as usize {
        return Err(format!(
            "{} rows given for height {}",
            rows.len(),
            bitmap.height()
        ));
    }

    let depth = bitmap.depth();
    for (y, line) in rows.iter().enumerate() {
        let values = decode_row(line, depth).map_err(|e| format!("row {y}: {e}"))?;
        if values.len() > bitmap.width() as usize {
            return Err(format!(
                "row {y}: {} pixels given for width {}",
                values.len(),
                bitmap.width()
            ));
        }
        for (x, value) in values.into_iter().enumerate() {
            bitmap.set_pixel(x as u32, y as u32, value);
        }
    }
    Ok(())
}

fn decode_row(line: &str, depth: PixelDepth) -> Result<Vec<u32>, String> {
    if depth == PixelDepth::Mono1 {
        return line
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '#' | '1' => Ok(1),
                '.' | '0' => Ok(0),
                other => Err(format!("invalid pixel glyph {other:?}")),
            })
            .collect();
    }

    line.split_whitespace()
        .map(|token| {
            let value = u32::from_str_radix(token, 16)
                .map_err(|_| format!("invalid hex pixel {token:?}"))?;
            if value > depth.max_value() {
                return Err(format!("pixel {token} exceeds {depth}"));
            }
            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_minimal_scene() {
        let input = r#"
composite 16x2
canvas @bar 10x2 at 3,0 {
  ##########
  ##########
}
"#;
        let scene = parse_scene(input).expect("parse failed");
        assert_eq!(scene.composite.bitmap.width(), 16);
        assert_eq!(scene.composite.bitmap.depth(), PixelDepth::Mono1);
        assert_eq!(scene.composite.dirty_area(), Rectangle::new(0, 0, 15, 1));
        assert_eq!(scene.canvases.len(), 1);

        let bar = scene.canvas("bar").expect("@bar missing");
        assert_eq!(bar.on_screen(), Rectangle::new(3, 0, 12, 1));
        assert_eq!(bar.bitmap.as_bytes(), &[0xFF, 0xC0, 0xFF, 0xC0]);
    }

    #[test]
    fn parse_negative_offset() {
        let input = "composite 8x8\ncanvas @c 4x4 at -2, -3\n";
        let scene = parse_scene(input).expect("parse failed");
        let c = scene.canvas("c").unwrap();
        assert_eq!((c.offset_x, c.offset_y), (-2, -3));
    }

    #[test]
    fn dirty_lines_combine() {
        let input = r#"
composite 32x32
dirty 0,0 3,3
dirty 10,10 12,11
"#;
        let scene = parse_scene(input).expect("parse failed");
        assert_eq!(scene.composite.dirty_area(), Rectangle::new(0, 0, 12, 11));
    }

    #[test]
    fn comments_are_skipped() {
        let input = "# header\ncomposite 8x1 # trailing\n";
        // Trailing comments after a declaration are comments too.
        let scene = parse_scene(input).expect("parse failed");
        assert_eq!(scene.composite.bitmap.height(), 1);
    }

    #[test]
    fn composite_with_initial_rows() {
        let input = "composite 8x1 {\n  #......#\n}\n";
        let scene = parse_scene(input).expect("parse failed");
        assert_eq!(scene.composite.bitmap.as_bytes(), &[0b1000_0001]);
    }

    #[test]
    fn deeper_depth_uses_hex_rows() {
        let input = r#"
composite 4x1 depth=4
canvas @g 3x1 at 0,0 {
  f a 0
}
"#;
        let scene = parse_scene(input).expect("parse failed");
        let g = scene.canvas("g").unwrap();
        assert_eq!(g.bitmap.depth(), PixelDepth::Gray4);
        assert_eq!(g.bitmap.as_bytes(), &[0xFA, 0x00]);
    }

    #[test]
    fn missing_composite_is_error() {
        let err = parse_scene("dirty 0,0 1,1\n").unwrap_err();
        assert!(err.contains("Missing composite"), "{err}");
    }

    #[test]
    fn canvas_before_composite_is_error() {
        let err = parse_scene("canvas @a 1x1 at 0,0\ncomposite 4x4\n").unwrap_err();
        assert!(err.contains("before composite"), "{err}");
    }

    #[test]
    fn duplicate_canvas_is_error() {
        let input = "composite 4x4\ncanvas @a 1x1 at 0,0\ncanvas @a 1x1 at 1,1\n";
        let err = parse_scene(input).unwrap_err();
        assert!(err.contains("Duplicate canvas @a"), "{err}");
    }

    #[test]
    fn too_many_pixels_is_error() {
        let input = "composite 4x4\ncanvas @a 2x1 at 0,0 {\n ###\n}\n";
        let err = parse_scene(input).unwrap_err();
        assert!(err.contains("3 pixels given for width 2"), "{err}");
    }

    #[test]
    fn unsupported_depth_is_error() {
        let err = parse_scene("composite 4x4 depth=3\n").unwrap_err();
        assert!(err.contains("Unsupported depth: 3"), "{err}");
    }

    #[test]
    fn hex_pixel_out_of_range_is_error() {
        let input = "composite 4x1 depth=2\ncanvas @a 2x1 at 0,0 {\n 1 4\n}\n";
        let err = parse_scene(input).unwrap_err();
        assert!(err.contains("exceeds 2bpp"), "{err}");
    }

    #[test]
    fn oversized_composite_is_error() {
        let err = parse_scene("composite 4294967295x4294967295 depth=32\n").unwrap_err();
        assert!(err.starts_with("composite:"), "{err}");
        assert!(err.contains("too large"), "{err}");

        let err = parse_scene("composite 65536x65536 depth=32\n").unwrap_err();
        assert!(err.contains("too large"), "{err}");
    }

    #[test]
    fn oversized_canvas_is_error() {
        let input = "composite 8x8\ncanvas @huge 4294967295x4294967295 at 0,0\n";
        let err = parse_scene(input).unwrap_err();
        assert!(err.starts_with("@huge:"), "{err}");
        assert!(err.contains("too large"), "{err}");
    }

    #[test]
    fn unknown_line_is_error() {
        let err = parse_scene("composite 4x4\nsprite @a\n").unwrap_err();
        assert!(err.contains("Unexpected line: sprite @a"), "{err}");
    }
}
