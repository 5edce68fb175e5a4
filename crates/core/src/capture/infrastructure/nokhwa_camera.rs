use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

use crate::capture::domain::camera::{Camera, CameraSource, CaptureError};
use crate::shared::frame::Frame;

/// Opens a local webcam through nokhwa's native backend.
pub struct NokhwaCameraSource {
    index: u32,
}

impl NokhwaCameraSource {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

impl CameraSource for NokhwaCameraSource {
    fn open(&mut self) -> Result<Box<dyn Camera>, CaptureError> {
        let format =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = nokhwa::Camera::new(CameraIndex::Index(self.index), format)
            .map_err(|e| CaptureError::Open(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| CaptureError::Open(e.to_string()))?;

        let resolution = camera.resolution();
        log::info!(
            "Opened camera {} ({}x{})",
            self.index,
            resolution.width(),
            resolution.height()
        );
        Ok(Box::new(NokhwaCamera {
            camera,
            frame_index: 0,
        }))
    }
}

struct NokhwaCamera {
    camera: nokhwa::Camera,
    frame_index: usize,
}

impl Camera for NokhwaCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::Read(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Read(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        let frame = Frame::new(decoded.into_raw(), width, height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("Failed to stop camera stream: {e}");
        }
    }
}
