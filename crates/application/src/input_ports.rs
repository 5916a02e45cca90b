use std::sync::Arc;

use crate::error::ReadingTimeError;
use crate::models::{
    PostMetaInput, PostMetaOutput, ReadingTimeOutput, SettingsOutput, SettingsPatch,
};
use crate::use_cases::{
    EstimateReadingTimeUseCase, ManageSettingsUseCase, UpdatePostMetaUseCase, WatchPostUseCase,
};

pub trait EstimateReadingTimeInputPort: Send + Sync {
    fn execute(&self, post_ref: &str) -> Result<ReadingTimeOutput, ReadingTimeError>;
}

impl EstimateReadingTimeInputPort for EstimateReadingTimeUseCase {
    fn execute(&self, post_ref: &str) -> Result<ReadingTimeOutput, ReadingTimeError> {
        EstimateReadingTimeUseCase::execute(self, post_ref)
    }
}

pub trait UpdatePostMetaInputPort: Send + Sync {
    fn execute(
        &self,
        post_ref: &str,
        input: PostMetaInput,
    ) -> Result<PostMetaOutput, ReadingTimeError>;
}

impl UpdatePostMetaInputPort for UpdatePostMetaUseCase {
    fn execute(
        &self,
        post_ref: &str,
        input: PostMetaInput,
    ) -> Result<PostMetaOutput, ReadingTimeError> {
        UpdatePostMetaUseCase::execute(self, post_ref, input)
    }
}

pub trait ManageSettingsInputPort: Send + Sync {
    fn current(&self) -> SettingsOutput;

    fn update(&self, patch: SettingsPatch) -> Result<SettingsOutput, ReadingTimeError>;

    fn reset(&self) -> Result<SettingsOutput, ReadingTimeError>;
}

impl ManageSettingsInputPort for ManageSettingsUseCase {
    fn current(&self) -> SettingsOutput {
        ManageSettingsUseCase::current(self)
    }

    fn update(&self, patch: SettingsPatch) -> Result<SettingsOutput, ReadingTimeError> {
        ManageSettingsUseCase::update(self, patch)
    }

    fn reset(&self) -> Result<SettingsOutput, ReadingTimeError> {
        ManageSettingsUseCase::reset(self)
    }
}

pub trait WatchPostInputPort: Send + Sync {
    fn start(
        &self,
        post_ref: &str,
        on_changed: Arc<dyn Fn(String) + Send + Sync>,
    ) -> Result<(), ReadingTimeError>;

    fn stop(&self);
}

impl WatchPostInputPort for WatchPostUseCase {
    fn start(
        &self,
        post_ref: &str,
        on_changed: Arc<dyn Fn(String) + Send + Sync>,
    ) -> Result<(), ReadingTimeError> {
        WatchPostUseCase::start(self, post_ref, on_changed)
    }

    fn stop(&self) {
        WatchPostUseCase::stop(self);
    }
}
