#[cfg(feature = "webcam")]
pub mod nokhwa_camera;

use crate::capture::domain::camera::{CameraSource, CaptureError};

/// Camera source for the device at `index`.
///
/// Builds without the `webcam` feature return [`CaptureError::Unsupported`].
pub fn default_camera_source(index: u32) -> Result<Box<dyn CameraSource>, CaptureError> {
    #[cfg(feature = "webcam")]
    {
        Ok(Box::new(nokhwa_camera::NokhwaCameraSource::new(index)))
    }
    #[cfg(not(feature = "webcam"))]
    {
        let _ = index;
        Err(CaptureError::Unsupported)
    }
}
