use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use facemood_core::detection::infrastructure::model_resolver::{
    self, ModelSpec, EMOTION_MODEL, FACE_MODEL,
};

/// Resolves both models in the background at startup.
/// Workers grab the paths once ready, or wait while a download runs.
pub struct ModelCache {
    face: Arc<ModelSlot>,
    emotion: Arc<ModelSlot>,
}

struct ModelSlot {
    result: Mutex<Option<Result<PathBuf, String>>>,
    ready: Condvar,
    progress: Arc<Mutex<(u64, u64)>>,
}

impl ModelCache {
    pub fn new() -> Arc<Self> {
        let cache = Arc::new(Self {
            face: Arc::new(ModelSlot::new()),
            emotion: Arc::new(ModelSlot::new()),
        });

        let face_slot = cache.face.clone();
        let emotion_slot = cache.emotion.clone();
        thread::spawn(move || {
            face_slot.resolve(FACE_MODEL);
            emotion_slot.resolve(EMOTION_MODEL);
        });

        cache
    }

    /// Waits for the face model path, forwarding download progress.
    pub fn wait_for_face(
        &self,
        on_progress: &dyn Fn(u64, u64),
        cancelled: &AtomicBool,
    ) -> Result<PathBuf, String> {
        self.face.wait(on_progress, cancelled)
    }

    pub fn wait_for_emotion(
        &self,
        on_progress: &dyn Fn(u64, u64),
        cancelled: &AtomicBool,
    ) -> Result<PathBuf, String> {
        self.emotion.wait(on_progress, cancelled)
    }
}

impl ModelSlot {
    fn new() -> Self {
        Self {
            result: Mutex::new(None),
            ready: Condvar::new(),
            progress: Arc::new(Mutex::new((0, 0))),
        }
    }

    fn resolve(&self, model: ModelSpec) {
        let progress = self.progress.clone();
        let result = model_resolver::resolve(
            model,
            None,
            Some(Box::new(move |downloaded, total| {
                *progress.lock().unwrap_or_else(PoisonError::into_inner) = (downloaded, total);
            })),
        );
        if let Err(e) = &result {
            log::error!("Failed to resolve {}: {e}", model.name);
        }
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(result.map_err(|e| e.to_string()));
        self.ready.notify_all();
    }

    fn wait(&self, on_progress: &dyn Fn(u64, u64), cancelled: &AtomicBool) -> Result<PathBuf, String> {
        let mut guard = self.result.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if cancelled.load(Ordering::Relaxed) {
                return Err("Cancelled".into());
            }
            if let Some(result) = guard.as_ref() {
                return result.clone();
            }
            if let Ok(progress) = self.progress.try_lock() {
                let (downloaded, total) = *progress;
                if total > 0 {
                    on_progress(downloaded, total);
                }
            }
            guard = self
                .ready
                .wait_timeout(guard, Duration::from_millis(100))
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
