pub mod camera;
pub mod state;
