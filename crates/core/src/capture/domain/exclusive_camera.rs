use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::camera::{Camera, CameraSource, CaptureError};
use crate::shared::frame::Frame;

/// Sole-owner access to the camera device.
///
/// At most one [`CameraGuard`] exists at a time; a second acquisition while
/// one is held fails with [`CaptureError::Busy`]. Cloning shares the same
/// device.
#[derive(Clone)]
pub struct ExclusiveCamera {
    source: Arc<Mutex<Box<dyn CameraSource>>>,
    in_use: Arc<AtomicBool>,
}

impl ExclusiveCamera {
    pub fn new(source: Box<dyn CameraSource>) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            in_use: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn acquire(&self) -> Result<CameraGuard, CaptureError> {
        if self
            .in_use
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CaptureError::Busy);
        }

        let opened = match self.source.lock() {
            Ok(mut source) => source.open(),
            Err(_) => Err(CaptureError::Open("camera source poisoned".into())),
        };

        match opened {
            Ok(camera) => Ok(CameraGuard {
                camera,
                in_use: self.in_use.clone(),
                released: false,
            }),
            Err(e) => {
                self.in_use.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    pub fn is_in_use(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }
}

/// An opened camera that is released when the guard is released or dropped,
/// whichever comes first.
pub struct CameraGuard {
    camera: Box<dyn Camera>,
    in_use: Arc<AtomicBool>,
    released: bool,
}

impl CameraGuard {
    pub fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.camera.read_frame()
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.camera.release();
        self.in_use.store(false, Ordering::Release);
        log::debug!("Camera released");
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        self.release_once();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{CameraCounters, StubCameraSource};
    use super::*;

    #[test]
    fn test_drop_releases_once() {
        let counters = CameraCounters::default();
        let camera = ExclusiveCamera::new(Box::new(StubCameraSource::working(counters.clone())));
        {
            let mut guard = camera.acquire().unwrap();
            guard.read_frame().unwrap();
            assert!(camera.is_in_use());
        }
        assert_eq!(counters.releases(), 1);
        assert!(!camera.is_in_use());
    }

    #[test]
    fn test_explicit_release_does_not_double_release() {
        let counters = CameraCounters::default();
        let camera = ExclusiveCamera::new(Box::new(StubCameraSource::working(counters.clone())));
        let guard = camera.acquire().unwrap();
        guard.release();
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn test_second_acquire_is_busy() {
        let counters = CameraCounters::default();
        let camera = ExclusiveCamera::new(Box::new(StubCameraSource::working(counters.clone())));
        let _guard = camera.acquire().unwrap();
        assert!(matches!(camera.clone().acquire(), Err(CaptureError::Busy)));
        assert_eq!(counters.opens(), 1);
    }

    #[test]
    fn test_reacquire_after_release() {
        let counters = CameraCounters::default();
        let camera = ExclusiveCamera::new(Box::new(StubCameraSource::working(counters.clone())));
        camera.acquire().unwrap().release();
        camera.acquire().unwrap().release();
        assert_eq!(counters.opens(), 2);
        assert_eq!(counters.releases(), 2);
    }

    #[test]
    fn test_failed_open_frees_device() {
        let counters = CameraCounters::default();
        let camera = ExclusiveCamera::new(Box::new(StubCameraSource {
            counters: counters.clone(),
            fail_open: true,
            fail_after: None,
        }));
        assert!(matches!(camera.acquire(), Err(CaptureError::Open(_))));
        assert!(!camera.is_in_use());
        assert_eq!(counters.releases(), 0);
    }
}
