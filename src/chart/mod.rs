pub mod animation;
pub mod drag;
pub mod geometry;
pub mod scene;

pub use drag::{AutoSelect, DragController};
pub use geometry::ChartGeometry;
pub use scene::{build_scene, ValueScale};
