mod estimate_reading_time;
mod manage_settings;
mod update_post_meta;
mod watch_post;

pub use estimate_reading_time::EstimateReadingTimeUseCase;
pub use manage_settings::ManageSettingsUseCase;
pub use update_post_meta::{parse_override, UpdatePostMetaUseCase};
pub use watch_post::WatchPostUseCase;

#[cfg(test)]
pub(crate) mod test_support;
