//! Canvas → composite copy, restricted to the composite's dirty rectangle.
//!
//! The canvas footprint is translated by its display offset, intersected
//! with the dirty rectangle, and only the overlap is transferred. Pixels
//! outside the overlap are never written, even when they share a byte with
//! a copied pixel.
//!
//! Geometry that leaves nothing to copy is a silent no-op, not an error:
//! callers routinely pass canvases that are off-screen or outside the
//! current dirty area. The engine does no locking; callers serialize copies
//! into the same composite.

use mb_core::pixel::{Argb8888, Gray2, Gray4, Gray8, Mono1, PixelFormat, Rgb565, Rgb888};
use mb_core::{Canvas, Composite, PixelDepth, Rectangle, intersect};

/// The composite-space rectangle a copy of `canvas` would write.
///
/// `None` when the canvas misses the dirty rectangle. The result is also
/// clipped to the composite's own bounds, so a dirty rectangle reaching past
/// the buffer never produces an out-of-range row or column.
pub fn copy_region(canvas: &Canvas, composite: &Composite) -> Option<Rectangle> {
    let on_screen = canvas.on_screen();
    let overlap = intersect(on_screen, composite.dirty_area())?;
    intersect(overlap, composite.bitmap.footprint())
}

/// Merge `canvas` into `composite` within the dirty rectangle.
///
/// Dispatches on the composite's pixel depth. A canvas of a different depth
/// is a caller bug; it is logged and skipped. Use
/// [`checked_composite_copy`] to have it reported instead.
pub fn composite_copy(canvas: &Canvas, composite: &mut Composite) {
    let depth = composite.bitmap.depth();
    if canvas.bitmap.depth() != depth {
        log::warn!(
            "skipping copy: canvas is {} but composite is {depth}",
            canvas.bitmap.depth()
        );
        return;
    }

    match depth {
        PixelDepth::Mono1 => copy_with::<Mono1>(canvas, composite),
        PixelDepth::Gray2 => copy_with::<Gray2>(canvas, composite),
        PixelDepth::Gray4 => copy_with::<Gray4>(canvas, composite),
        PixelDepth::Gray8 => copy_with::<Gray8>(canvas, composite),
        PixelDepth::Rgb565 => copy_with::<Rgb565>(canvas, composite),
        PixelDepth::Rgb888 => copy_with::<Rgb888>(canvas, composite),
        PixelDepth::Argb8888 => copy_with::<Argb8888>(canvas, composite),
    }
}

/// Copy loop for a statically known format `F`.
///
/// Rows are addressed by stride multiplication per buffer, so canvas and
/// composite strides are independent. Both surfaces must be of `F::DEPTH`.
pub fn copy_with<F: PixelFormat>(canvas: &Canvas, composite: &mut Composite) {
    if canvas.bitmap.depth() != F::DEPTH || composite.bitmap.depth() != F::DEPTH {
        log::warn!("skipping copy: surfaces are not {}", F::DEPTH);
        return;
    }

    let Some(overlap) = copy_region(canvas, composite) else {
        log::debug!(
            "nothing to copy: canvas {} misses dirty area {}",
            canvas.on_screen(),
            composite.dirty_area()
        );
        return;
    };

    let on_screen = canvas.on_screen();
    // Both differences are non-negative: the overlap lies inside the
    // on-screen rectangle and inside the composite footprint.
    let column_offset = (overlap.left - on_screen.left) as usize;
    let read_top = (overlap.top - on_screen.top) as usize;
    let write_left = overlap.left as usize;
    let write_top = overlap.top as usize;
    let columns = overlap.width() as usize;

    log::trace!(
        "COPY {} canvas {on_screen} → overlap {overlap} (src col {column_offset})",
        F::DEPTH
    );

    for row in 0..overlap.height() as usize {
        let (Some(read), Some(write)) = (
            canvas.bitmap.row(read_top + row),
            composite.bitmap.row_mut(write_top + row),
        ) else {
            log::warn!("copy stopped at overlap row {row}: buffer too short");
            return;
        };
        F::copy_span(read, column_offset, write, write_left, columns);
    }
}

/// Validate preconditions, then run [`composite_copy`].
///
/// Geometry that leaves nothing to copy is still `Ok`.
///
/// # Errors
/// Returns an error if either surface has a zero dimension or the two
/// surfaces have different pixel depths.
pub fn checked_composite_copy(canvas: &Canvas, composite: &mut Composite) -> Result<(), String> {
    let (cw, ch) = (canvas.bitmap.width(), canvas.bitmap.height());
    if cw == 0 || ch == 0 {
        return Err(format!("canvas resolution {cw}x{ch} is empty"));
    }
    let (dw, dh) = (composite.bitmap.width(), composite.bitmap.height());
    if dw == 0 || dh == 0 {
        return Err(format!("composite resolution {dw}x{dh} is empty"));
    }
    if canvas.bitmap.depth() != composite.bitmap.depth() {
        return Err(format!(
            "canvas depth {} does not match composite depth {}",
            canvas.bitmap.depth(),
            composite.bitmap.depth()
        ));
    }

    composite_copy(canvas, composite);
    Ok(())
}
