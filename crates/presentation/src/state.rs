use std::sync::Arc;

use reading_time_application::input_ports::{
    EstimateReadingTimeInputPort, ManageSettingsInputPort, UpdatePostMetaInputPort,
    WatchPostInputPort,
};

use crate::badge::BadgeHooks;

pub struct AppState {
    pub estimate_reading_time: Arc<dyn EstimateReadingTimeInputPort>,
    pub update_post_meta: Arc<dyn UpdatePostMetaInputPort>,
    pub manage_settings: Arc<dyn ManageSettingsInputPort>,
    pub watch_post: Arc<dyn WatchPostInputPort>,
    pub badge_hooks: BadgeHooks,
}

impl AppState {
    pub fn new(
        estimate_reading_time: Arc<dyn EstimateReadingTimeInputPort>,
        update_post_meta: Arc<dyn UpdatePostMetaInputPort>,
        manage_settings: Arc<dyn ManageSettingsInputPort>,
        watch_post: Arc<dyn WatchPostInputPort>,
    ) -> Self {
        Self {
            estimate_reading_time,
            update_post_meta,
            manage_settings,
            watch_post,
            badge_hooks: BadgeHooks::default(),
        }
    }

    pub fn with_badge_hooks(mut self, hooks: BadgeHooks) -> Self {
        self.badge_hooks = hooks;
        self
    }
}
