use std::sync::Arc;

use crate::error::ReadingTimeError;
use crate::ports::PostWatchService;

#[derive(Clone)]
pub struct WatchPostUseCase {
    watch_service: Arc<dyn PostWatchService>,
}

impl WatchPostUseCase {
    pub fn new(watch_service: Arc<dyn PostWatchService>) -> Self {
        Self { watch_service }
    }

    pub fn start(
        &self,
        post_ref: &str,
        on_changed: Arc<dyn Fn(String) + Send + Sync>,
    ) -> Result<(), ReadingTimeError> {
        self.watch_service.start(post_ref, on_changed)
    }

    pub fn stop(&self) {
        self.watch_service.stop();
    }
}
