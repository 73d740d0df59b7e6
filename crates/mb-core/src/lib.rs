pub mod geometry;
pub mod pixel;
pub mod scene;
pub mod surface;

pub use geometry::{Rectangle, combine, intersect, translate};
pub use pixel::{PixelDepth, PixelFormat};
pub use scene::{Scene, SceneCanvas, parse_scene};
pub use surface::{Bitmap, Canvas, Composite};
