//! Run a scene's copies and describe what happened.

use mb_core::{PixelDepth, Rectangle, Scene};
use mb_render::{DumpConfig, ascii_rows, checked_composite_copy, copy_region};
use serde::Serialize;

/// One canvas as seen by the copy pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasReport {
    pub name: String,
    pub on_screen: Rectangle,
    /// `None` when the canvas missed the dirty area.
    pub overlap: Option<Rectangle>,
}

/// Everything the `json` output format prints.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeReport {
    pub width: u32,
    pub height: u32,
    pub depth: PixelDepth,
    pub dirty: Rectangle,
    pub canvases: Vec<CanvasReport>,
    pub rows: Vec<String>,
}

/// Copy every canvas into the scene composite, in declaration order.
///
/// # Errors
/// Returns the first precondition failure, naming the canvas.
pub fn composite_scene(scene: &mut Scene) -> Result<Vec<CanvasReport>, String> {
    let mut reports = Vec::with_capacity(scene.canvases.len());
    for entry in &scene.canvases {
        let overlap = copy_region(&entry.canvas, &scene.composite);
        checked_composite_copy(&entry.canvas, &mut scene.composite)
            .map_err(|e| format!("@{}: {e}", entry.name))?;
        match overlap {
            Some(area) => log::info!("@{} copied {area}", entry.name),
            None => log::info!("@{} skipped: outside dirty area", entry.name),
        }
        reports.push(CanvasReport {
            name: entry.name.clone(),
            on_screen: entry.canvas.on_screen(),
            overlap,
        });
    }
    Ok(reports)
}

pub fn build_report(
    scene: &Scene,
    canvases: Vec<CanvasReport>,
    config: &DumpConfig,
) -> CompositeReport {
    let bitmap = &scene.composite.bitmap;
    CompositeReport {
        width: bitmap.width(),
        height: bitmap.height(),
        depth: bitmap.depth(),
        dirty: scene.composite.dirty_area(),
        canvases,
        rows: ascii_rows(bitmap, config),
    }
}
