//! Pixel surfaces: the off-screen [`Canvas`] and the on-screen [`Composite`].
//!
//! Both wrap a [`Bitmap`], an owned byte buffer whose length always equals
//! `stride * height`. Buffers are sized once at construction and never
//! reallocated by the compositing engine.

use crate::geometry::{Rectangle, combine, translate};
use crate::pixel::PixelDepth;

// ─── Bitmap ──────────────────────────────────────────────────────────────

/// A row-major, byte-packed pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    memory: Vec<u8>,
    width: u32,
    height: u32,
    depth: PixelDepth,
}

impl Bitmap {
    /// Allocate a zero-filled bitmap.
    ///
    /// # Panics
    /// Panics if the buffer size overflows `usize`. Use [`Bitmap::try_new`]
    /// for sizes that come from untrusted input.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Self {
        match Self::try_new(width, height, depth) {
            Ok(bitmap) => bitmap,
            Err(e) => panic!("{e}"),
        }
    }

    /// Allocate a zero-filled bitmap, rejecting sizes that overflow `usize`.
    ///
    /// # Errors
    /// Returns an error when `stride * height` is not representable.
    pub fn try_new(width: u32, height: u32, depth: PixelDepth) -> Result<Self, String> {
        let len = Self::checked_len(width, height, depth)?;
        Ok(Self {
            memory: vec![0; len],
            width,
            height,
            depth,
        })
    }

    /// Buffer length `stride * height` for the given shape.
    ///
    /// # Errors
    /// Returns an error when the length overflows `usize`.
    pub fn checked_len(width: u32, height: u32, depth: PixelDepth) -> Result<usize, String> {
        depth
            .checked_stride(width)
            .and_then(|stride| stride.checked_mul(height as usize))
            .ok_or_else(|| format!("{width}x{height} {depth} bitmap is too large"))
    }

    /// Wrap an existing buffer.
    ///
    /// # Errors
    /// Returns an error if `memory` is not exactly `stride * height` bytes.
    pub fn from_bytes(
        memory: Vec<u8>,
        width: u32,
        height: u32,
        depth: PixelDepth,
    ) -> Result<Self, String> {
        let expected = Self::checked_len(width, height, depth)?;
        if memory.len() != expected {
            return Err(format!(
                "{width}x{height} {depth} bitmap needs {expected} bytes, got {}",
                memory.len()
            ));
        }
        Ok(Self {
            memory,
            width,
            height,
            depth,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.depth.stride(self.width)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Local footprint `(0, 0, width - 1, height - 1)`; empty for a 0 dimension.
    pub fn footprint(&self) -> Rectangle {
        Rectangle::from_size(self.width, self.height)
    }

    /// Bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height as usize {
            return None;
        }
        let stride = self.stride();
        self.memory.get(y * stride..(y + 1) * stride)
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height as usize {
            return None;
        }
        let stride = self.stride();
        self.memory.get_mut(y * stride..(y + 1) * stride)
    }

    /// Pixel value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y as usize)?;
        Some(self.depth.read(row, x as usize))
    }

    /// Set the pixel at `(x, y)`. Coordinates outside the bitmap are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        if x >= self.width {
            return;
        }
        let depth = self.depth;
        if let Some(row) = self.row_mut(y as usize) {
            depth.write(row, x as usize, value);
        }
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u32) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, value);
            }
        }
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// An off-screen drawing surface placed onto a composite at a display offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub bitmap: Bitmap,
    /// Composite column of this canvas's pixel (0, 0).
    pub offset_x: i32,
    /// Composite row of this canvas's pixel (0, 0).
    pub offset_y: i32,
}

impl Canvas {
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Self {
        Self {
            bitmap: Bitmap::new(width, height, depth),
            offset_x: 0,
            offset_y: 0,
        }
    }

    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            offset_x: 0,
            offset_y: 0,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// The canvas footprint expressed in composite coordinates.
    pub fn on_screen(&self) -> Rectangle {
        translate(self.bitmap.footprint(), self.offset_x, self.offset_y)
    }
}

// ─── Composite ───────────────────────────────────────────────────────────

/// The display buffer canvases are merged into.
///
/// The dirty rectangle is owned by whoever schedules redraws; the
/// compositing engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    pub bitmap: Bitmap,
    dirty: Rectangle,
}

impl Composite {
    /// A zero-filled composite with nothing marked dirty.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Self {
        Self::from_bitmap(Bitmap::new(width, height, depth))
    }

    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            dirty: Rectangle::EMPTY,
        }
    }

    pub fn dirty_area(&self) -> Rectangle {
        self.dirty
    }

    /// Replace the dirty rectangle.
    pub fn set_dirty_area(&mut self, area: Rectangle) {
        self.dirty = area;
    }

    /// Grow the dirty rectangle to also cover `area`.
    pub fn mark_dirty(&mut self, area: Rectangle) {
        self.dirty = combine(self.dirty, area);
    }

    /// Mark the whole composite dirty.
    pub fn mark_all_dirty(&mut self) {
        self.dirty = self.bitmap.footprint();
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = Rectangle::EMPTY;
    }
}
