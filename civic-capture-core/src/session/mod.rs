pub mod camera;
pub mod recorder;
