//! Screen-space rendering: pixel targets, depth, and triangle fill.

pub mod barycentric;
mod depth;
mod rasterizer;
mod surface;

pub use depth::DepthBuffer;
pub use rasterizer::{rasterize_triangle, RasterOutcome, ScreenTriangle};
pub use surface::{PixelBuffer, Surface};
