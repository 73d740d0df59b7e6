//! Integration tests: canvas → composite copy properties.
//!
//! Sweeps offsets and dirty rectangles over every pixel depth and checks
//! each composite pixel against a per-pixel reference model.

use mb_core::{Canvas, Composite, PixelDepth, Rectangle, intersect};
use mb_render::{composite_copy, copy_region};
use pretty_assertions::assert_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pixel noise so tests do not need an RNG crate.
fn noise(seed: u32, x: u32, y: u32) -> u32 {
    let mut h = seed ^ x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h
}

fn noisy_canvas(width: u32, height: u32, depth: PixelDepth, seed: u32) -> Canvas {
    let mut canvas = Canvas::new(width, height, depth);
    for y in 0..height {
        for x in 0..width {
            canvas
                .bitmap
                .set_pixel(x, y, noise(seed, x, y) & depth.max_value());
        }
    }
    canvas
}

fn noisy_composite(width: u32, height: u32, depth: PixelDepth, seed: u32) -> Composite {
    let mut comp = Composite::new(width, height, depth);
    for y in 0..height {
        for x in 0..width {
            comp.bitmap
                .set_pixel(x, y, noise(seed, x, y) & depth.max_value());
        }
    }
    comp
}

/// Check every composite pixel: inside the overlap it must equal the
/// canvas pixel, outside it must equal the value before the copy.
fn assert_copy_matches_model(canvas: &Canvas, before: &Composite, after: &Composite) {
    let overlap = intersect(canvas.on_screen(), before.dirty_area())
        .and_then(|o| intersect(o, before.bitmap.footprint()));

    for y in 0..after.bitmap.height() {
        for x in 0..after.bitmap.width() {
            let (xi, yi) = (x as i32, y as i32);
            let expected = match overlap {
                Some(o) if o.contains_point(xi, yi) => canvas
                    .bitmap
                    .pixel((xi - canvas.offset_x) as u32, (yi - canvas.offset_y) as u32)
                    .expect("overlap pixel outside canvas"),
                _ => before.bitmap.pixel(x, y).unwrap(),
            };
            assert_eq!(
                after.bitmap.pixel(x, y).unwrap(),
                expected,
                "pixel ({x}, {y}) {} canvas at ({}, {}) dirty {}",
                after.bitmap.depth(),
                canvas.offset_x,
                canvas.offset_y,
                before.dirty_area()
            );
        }
    }
}

// ─── Bit fidelity and containment ────────────────────────────────────────

#[test]
fn mono_copy_matches_model_for_every_bit_alignment() {
    init_logger();
    let canvas_template = noisy_canvas(13, 5, PixelDepth::Mono1, 7);
    let before_template = noisy_composite(29, 9, PixelDepth::Mono1, 99);

    let dirties = [
        Rectangle::new(0, 0, 28, 8),
        Rectangle::new(3, 1, 17, 6),
        Rectangle::new(9, 0, 9, 8),
        Rectangle::new(-4, -4, 40, 40),
    ];

    for dirty in dirties {
        for dy in -6..=10 {
            for dx in -14..=30 {
                let canvas = canvas_template.clone().with_offset(dx, dy);
                let mut before = before_template.clone();
                before.set_dirty_area(dirty);
                let mut after = before.clone();

                composite_copy(&canvas, &mut after);
                assert_copy_matches_model(&canvas, &before, &after);
            }
        }
    }
}

#[test]
fn every_depth_matches_model() {
    init_logger();
    for depth in PixelDepth::ALL {
        let canvas_template = noisy_canvas(7, 4, depth, 3);
        let mut before = noisy_composite(11, 6, depth, 5);
        before.set_dirty_area(Rectangle::new(1, 1, 8, 4));

        for dy in -4..=6 {
            for dx in -7..=11 {
                let canvas = canvas_template.clone().with_offset(dx, dy);
                let mut after = before.clone();
                composite_copy(&canvas, &mut after);
                assert_copy_matches_model(&canvas, &before, &after);
            }
        }
    }
}

// ─── No-op cases ─────────────────────────────────────────────────────────

#[test]
fn disjoint_canvas_leaves_composite_unchanged() {
    let canvas = noisy_canvas(8, 8, PixelDepth::Mono1, 1).with_offset(20, 0);
    let mut comp = noisy_composite(32, 8, PixelDepth::Mono1, 2);
    comp.set_dirty_area(Rectangle::new(0, 0, 15, 7));
    let before = comp.bitmap.as_bytes().to_vec();

    assert_eq!(copy_region(&canvas, &comp), None);
    composite_copy(&canvas, &mut comp);
    assert_eq!(comp.bitmap.as_bytes(), &before[..]);
}

#[test]
fn canvas_fully_off_screen_is_noop() {
    let canvas = noisy_canvas(8, 8, PixelDepth::Mono1, 1).with_offset(-8, -8);
    let mut comp = noisy_composite(16, 16, PixelDepth::Mono1, 2);
    comp.mark_all_dirty();
    let before = comp.bitmap.as_bytes().to_vec();

    composite_copy(&canvas, &mut comp);
    assert_eq!(comp.bitmap.as_bytes(), &before[..]);
}

#[test]
fn empty_dirty_area_is_noop() {
    let canvas = noisy_canvas(8, 8, PixelDepth::Mono1, 1);
    let mut comp = noisy_composite(16, 16, PixelDepth::Mono1, 2);
    let before = comp.bitmap.as_bytes().to_vec();

    composite_copy(&canvas, &mut comp);
    assert_eq!(comp.bitmap.as_bytes(), &before[..]);
}

// ─── Partial bytes ───────────────────────────────────────────────────────

#[test]
fn partial_byte_neighbours_survive() {
    // Four-pixel canvas landing on bits 6..=7 of byte 0 and 0..=1 of byte 1.
    let mut canvas = Canvas::new(4, 1, PixelDepth::Mono1).with_offset(6, 0);
    canvas.bitmap.set_pixel(0, 0, 1);
    canvas.bitmap.set_pixel(3, 0, 1);

    let mut comp = Composite::new(16, 1, PixelDepth::Mono1);
    comp.bitmap.as_bytes_mut().copy_from_slice(&[0b1010_1001, 0b1101_0101]);
    comp.mark_all_dirty();

    composite_copy(&canvas, &mut comp);

    // Bits 6..=9 become 1,0,0,1; bits 0..=5 and 10..=15 keep their values.
    assert_eq!(comp.bitmap.as_bytes(), &[0b1010_1010, 0b0101_0101]);
}

#[test]
fn canvas_larger_than_composite_copies_dirty_part() {
    let mut canvas = Canvas::new(64, 64, PixelDepth::Mono1).with_offset(-10, -10);
    canvas.bitmap.fill(1);
    let mut comp = Composite::new(16, 4, PixelDepth::Mono1);
    comp.set_dirty_area(Rectangle::new(4, 1, 11, 2));

    composite_copy(&canvas, &mut comp);

    assert_eq!(
        comp.bitmap.as_bytes(),
        &[0x00, 0x00, 0x0F, 0xF0, 0x0F, 0xF0, 0x00, 0x00]
    );
}

// ─── Idempotence ─────────────────────────────────────────────────────────

#[test]
fn repeated_copy_is_idempotent() {
    for depth in PixelDepth::ALL {
        let canvas = noisy_canvas(9, 5, depth, 11).with_offset(3, 2);
        let mut comp = noisy_composite(17, 9, depth, 13);
        comp.set_dirty_area(Rectangle::new(2, 1, 10, 6));

        composite_copy(&canvas, &mut comp);
        let once = comp.clone();
        composite_copy(&canvas, &mut comp);
        assert_eq!(comp, once, "{depth}");
    }
}

#[test]
fn different_strides_advance_independently() {
    // Canvas stride 3 bytes, composite stride 5 bytes; rows must not drift.
    let mut canvas = Canvas::new(20, 3, PixelDepth::Mono1).with_offset(11, 1);
    for y in 0..3 {
        canvas.bitmap.set_pixel(y, y, 1);
    }
    let mut comp = Composite::new(40, 5, PixelDepth::Mono1);
    comp.mark_all_dirty();

    composite_copy(&canvas, &mut comp);

    for y in 0..5 {
        for x in 0..40 {
            let expected = u32::from((1..=3).contains(&y) && x == 11 + (y - 1));
            assert_eq!(comp.bitmap.pixel(x, y), Some(expected), "({x}, {y})");
        }
    }
}
