pub mod comrak_renderer;
pub mod file_repository;
pub mod file_watcher;
pub mod markup;
pub mod meta_store;
pub mod settings_store;
pub mod shortcodes;
