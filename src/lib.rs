pub mod camera;
pub mod config;
pub mod layout;
pub mod model;
pub mod snapshot;

// Angle / vector helpers shared by layout and camera
pub mod fast_math;

pub use camera::{CameraChoreographer, OrbitConfig, OrbitControls};
pub use config::AtlasConfig;
pub use layout::{LayoutPattern, PatternError};
pub use model::{AtlasData, CategoryTree, ExpansionState};
pub use snapshot::AtlasSnapshot;
