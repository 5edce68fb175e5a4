pub mod camera;
pub mod exclusive_camera;
