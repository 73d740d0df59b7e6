//! Packed pixel formats.
//!
//! Rows are byte-packed with no padding beyond rounding the row up to a
//! whole byte. Sub-byte depths store the leftmost pixel in the most
//! significant bits; multi-byte depths store each pixel little-endian.
//!
//! Each depth is a zero-sized [`PixelFormat`] so the compositing loop can be
//! written once and monomorphised per format, with [`PixelDepth`] as the
//! runtime tag carried by bitmaps.

use serde::Serialize;
use std::fmt;

pub const BITS_PER_BYTE: usize = 8;

/// Mask of the leftmost pixel in a monochrome byte.
pub const MSB_MASK: u8 = 0x80;

// ─── Pure address helpers ────────────────────────────────────────────────

/// Bytes per row for `width` pixels of `bits_per_pixel` each.
///
/// Only call this for shapes already validated by [`checked_stride`].
pub fn stride(width: u32, bits_per_pixel: u32) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(BITS_PER_BYTE)
}

/// [`stride`], or `None` when `width * bits_per_pixel` overflows `usize`.
pub fn checked_stride(width: u32, bits_per_pixel: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(bits_per_pixel as usize)
        .map(|bits| bits.div_ceil(BITS_PER_BYTE))
}

/// Byte holding monochrome pixel `x` within its row.
pub const fn mono_byte_index(x: usize) -> usize {
    x >> 3
}

/// Bit selecting monochrome pixel `x` within its byte.
pub const fn mono_bit_mask(x: usize) -> u8 {
    MSB_MASK >> (x & 7)
}

// ─── Runtime depth tag ───────────────────────────────────────────────────

/// Bits-per-pixel encoding of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelDepth {
    /// 1 bpp, eight pixels per byte, MSB first.
    #[default]
    Mono1,
    /// 2 bpp, four pixels per byte.
    Gray2,
    /// 4 bpp, two pixels per byte.
    Gray4,
    Gray8,
    Rgb565,
    Rgb888,
    Argb8888,
}

impl PixelDepth {
    pub const ALL: [PixelDepth; 7] = [
        PixelDepth::Mono1,
        PixelDepth::Gray2,
        PixelDepth::Gray4,
        PixelDepth::Gray8,
        PixelDepth::Rgb565,
        PixelDepth::Rgb888,
        PixelDepth::Argb8888,
    ];

    pub const fn bits(self) -> u32 {
        match self {
            PixelDepth::Mono1 => 1,
            PixelDepth::Gray2 => 2,
            PixelDepth::Gray4 => 4,
            PixelDepth::Gray8 => 8,
            PixelDepth::Rgb565 => 16,
            PixelDepth::Rgb888 => 24,
            PixelDepth::Argb8888 => 32,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.bits() == bits)
    }

    /// Largest pixel value representable at this depth.
    pub const fn max_value(self) -> u32 {
        match self {
            PixelDepth::Argb8888 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }

    pub fn stride(self, width: u32) -> usize {
        stride(width, self.bits())
    }

    pub fn checked_stride(self, width: u32) -> Option<usize> {
        checked_stride(width, self.bits())
    }

    /// Read pixel `x` of `row`, dispatching to the matching format.
    pub fn read(self, row: &[u8], x: usize) -> u32 {
        match self {
            PixelDepth::Mono1 => Mono1::read(row, x),
            PixelDepth::Gray2 => Gray2::read(row, x),
            PixelDepth::Gray4 => Gray4::read(row, x),
            PixelDepth::Gray8 => Gray8::read(row, x),
            PixelDepth::Rgb565 => Rgb565::read(row, x),
            PixelDepth::Rgb888 => Rgb888::read(row, x),
            PixelDepth::Argb8888 => Argb8888::read(row, x),
        }
    }

    /// Write pixel `x` of `row`; bits above the depth are discarded.
    pub fn write(self, row: &mut [u8], x: usize, value: u32) {
        match self {
            PixelDepth::Mono1 => Mono1::write(row, x, value),
            PixelDepth::Gray2 => Gray2::write(row, x, value),
            PixelDepth::Gray4 => Gray4::write(row, x, value),
            PixelDepth::Gray8 => Gray8::write(row, x, value),
            PixelDepth::Rgb565 => Rgb565::write(row, x, value),
            PixelDepth::Rgb888 => Rgb888::write(row, x, value),
            PixelDepth::Argb8888 => Argb8888::write(row, x, value),
        }
    }
}

impl fmt::Display for PixelDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bpp", self.bits())
    }
}

// ─── Format strategy ─────────────────────────────────────────────────────

/// Per-format pixel access used by the compositing loop.
///
/// `copy_span` moves `count` pixels from `src[src_x..]` to `dst[dst_x..]`
/// and must leave every other pixel of `dst` untouched, including pixels
/// sharing a byte with the span.
pub trait PixelFormat {
    const DEPTH: PixelDepth;

    fn read(row: &[u8], x: usize) -> u32;

    fn write(row: &mut [u8], x: usize, value: u32);

    fn copy_span(src: &[u8], src_x: usize, dst: &mut [u8], dst_x: usize, count: usize) {
        for i in 0..count {
            Self::write(dst, dst_x + i, Self::read(src, src_x + i));
        }
    }
}

/// 1 bpp monochrome.
#[derive(Debug, Clone, Copy)]
pub struct Mono1;

impl PixelFormat for Mono1 {
    const DEPTH: PixelDepth = PixelDepth::Mono1;

    fn read(row: &[u8], x: usize) -> u32 {
        u32::from(row[mono_byte_index(x)] & mono_bit_mask(x) != 0)
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        let mask = mono_bit_mask(x);
        let byte = &mut row[mono_byte_index(x)];
        if value & 1 == 1 {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Walks a read mask and a write mask independently, so source and
    /// destination may start at different bit positions within their bytes.
    fn copy_span(src: &[u8], src_x: usize, dst: &mut [u8], dst_x: usize, count: usize) {
        let mut read_pos = mono_byte_index(src_x);
        let mut read_mask = mono_bit_mask(src_x);
        let mut write_pos = mono_byte_index(dst_x);
        let mut write_mask = mono_bit_mask(dst_x);

        for _ in 0..count {
            if src[read_pos] & read_mask == read_mask {
                dst[write_pos] |= write_mask;
            } else {
                dst[write_pos] &= !write_mask;
            }

            read_mask >>= 1;
            write_mask >>= 1;
            if read_mask == 0 {
                read_pos += 1;
                read_mask = MSB_MASK;
            }
            if write_mask == 0 {
                write_pos += 1;
                write_mask = MSB_MASK;
            }
        }
    }
}

/// 2 bpp, four pixels per byte.
#[derive(Debug, Clone, Copy)]
pub struct Gray2;

impl PixelFormat for Gray2 {
    const DEPTH: PixelDepth = PixelDepth::Gray2;

    fn read(row: &[u8], x: usize) -> u32 {
        read_sub_byte(row, x, 2)
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        write_sub_byte(row, x, 2, value);
    }
}

/// 4 bpp, two pixels per byte, left pixel in the high nibble.
#[derive(Debug, Clone, Copy)]
pub struct Gray4;

impl PixelFormat for Gray4 {
    const DEPTH: PixelDepth = PixelDepth::Gray4;

    fn read(row: &[u8], x: usize) -> u32 {
        read_sub_byte(row, x, 4)
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        write_sub_byte(row, x, 4, value);
    }
}

/// 8 bpp, one byte per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Gray8;

impl PixelFormat for Gray8 {
    const DEPTH: PixelDepth = PixelDepth::Gray8;

    fn read(row: &[u8], x: usize) -> u32 {
        u32::from(row[x])
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        row[x] = value as u8;
    }

    fn copy_span(src: &[u8], src_x: usize, dst: &mut [u8], dst_x: usize, count: usize) {
        copy_whole_bytes(src, src_x, dst, dst_x, count, 1);
    }
}

/// 16 bpp, 5-6-5 packed, little-endian.
#[derive(Debug, Clone, Copy)]
pub struct Rgb565;

impl PixelFormat for Rgb565 {
    const DEPTH: PixelDepth = PixelDepth::Rgb565;

    fn read(row: &[u8], x: usize) -> u32 {
        read_le(row, x, 2)
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        write_le(row, x, 2, value);
    }

    fn copy_span(src: &[u8], src_x: usize, dst: &mut [u8], dst_x: usize, count: usize) {
        copy_whole_bytes(src, src_x, dst, dst_x, count, 2);
    }
}

/// 24 bpp, three bytes per pixel, little-endian.
#[derive(Debug, Clone, Copy)]
pub struct Rgb888;

impl PixelFormat for Rgb888 {
    const DEPTH: PixelDepth = PixelDepth::Rgb888;

    fn read(row: &[u8], x: usize) -> u32 {
        read_le(row, x, 3)
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        write_le(row, x, 3, value);
    }

    fn copy_span(src: &[u8], src_x: usize, dst: &mut [u8], dst_x: usize, count: usize) {
        copy_whole_bytes(src, src_x, dst, dst_x, count, 3);
    }
}

/// 32 bpp, little-endian.
#[derive(Debug, Clone, Copy)]
pub struct Argb8888;

impl PixelFormat for Argb8888 {
    const DEPTH: PixelDepth = PixelDepth::Argb8888;

    fn read(row: &[u8], x: usize) -> u32 {
        read_le(row, x, 4)
    }

    fn write(row: &mut [u8], x: usize, value: u32) {
        write_le(row, x, 4, value);
    }

    fn copy_span(src: &[u8], src_x: usize, dst: &mut [u8], dst_x: usize, count: usize) {
        copy_whole_bytes(src, src_x, dst, dst_x, count, 4);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Byte index and right shift of pixel `x` at a sub-byte depth.
fn sub_byte_position(x: usize, bits: usize) -> (usize, usize) {
    let bit = x * bits;
    (bit / BITS_PER_BYTE, BITS_PER_BYTE - bits - bit % BITS_PER_BYTE)
}

fn read_sub_byte(row: &[u8], x: usize, bits: usize) -> u32 {
    let (index, shift) = sub_byte_position(x, bits);
    let mask = (1u8 << bits) - 1;
    u32::from((row[index] >> shift) & mask)
}

fn write_sub_byte(row: &mut [u8], x: usize, bits: usize, value: u32) {
    let (index, shift) = sub_byte_position(x, bits);
    let mask = ((1u8 << bits) - 1) << shift;
    let bits_in = ((value as u8) << shift) & mask;
    row[index] = (row[index] & !mask) | bits_in;
}

fn read_le(row: &[u8], x: usize, bytes: usize) -> u32 {
    row[x * bytes..][..bytes]
        .iter()
        .rev()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn write_le(row: &mut [u8], x: usize, bytes: usize, value: u32) {
    let le = value.to_le_bytes();
    row[x * bytes..][..bytes].copy_from_slice(&le[..bytes]);
}

fn copy_whole_bytes(
    src: &[u8],
    src_x: usize,
    dst: &mut [u8],
    dst_x: usize,
    count: usize,
    bytes_per_pixel: usize,
) {
    let len = count * bytes_per_pixel;
    dst[dst_x * bytes_per_pixel..][..len].copy_from_slice(&src[src_x * bytes_per_pixel..][..len]);
}
