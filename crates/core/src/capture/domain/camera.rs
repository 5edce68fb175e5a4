use crate::shared::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to open camera: {0}")]
    Open(String),
    #[error("Failed to capture image: {0}")]
    Read(String),
    #[error("Camera is already in use")]
    Busy,
    #[error("Camera support is not available in this build")]
    Unsupported,
}

/// An opened camera device yielding RGB frames.
///
/// Implementations need not be `Send`: a camera is opened, read and released
/// on the same thread.
pub trait Camera {
    /// Reads the next frame. A failure here ends the current acquisition.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the device. Called exactly once per opened camera.
    fn release(&mut self);
}

/// Opens the camera device configured for this session.
pub trait CameraSource: Send {
    fn open(&mut self) -> Result<Box<dyn Camera>, CaptureError>;
}
