use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use reading_time_application::error::ReadingTimeError;
use reading_time_application::ports::PostWatchService;

use crate::file_repository::resolve_path_input;
use crate::meta_store::sidecar_path;

#[cfg(test)]
const POLL_INTERVAL_MS: u64 = 40;
#[cfg(not(test))]
const POLL_INTERVAL_MS: u64 = 1200;

type ChangeCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Reports changes to a post file or its meta sidecar.
pub struct PostFileWatchService {
    active_watch: Mutex<Option<ActiveWatch>>,
}

struct ActiveWatch {
    _watcher: Option<RecommendedWatcher>,
    poll_stop_sender: Option<Sender<()>>,
    poll_thread: Option<JoinHandle<()>>,
}

impl PostFileWatchService {
    pub fn new() -> Self {
        Self {
            active_watch: Mutex::new(None),
        }
    }

    fn try_start_native_watcher(
        &self,
        post_path: &Path,
        watched_dir: &Path,
        on_changed: ChangeCallback,
    ) -> Option<RecommendedWatcher> {
        let post_for_event = post_path.to_path_buf();
        let watched_files = watched_files(post_path);
        let callback = move |result: notify::Result<notify::Event>| {
            let event = match result {
                Ok(event) => event,
                Err(error) => {
                    warn!("post watcher error: {error}");
                    return;
                }
            };
            if !should_emit_change(&event) {
                return;
            }
            if affects_watched_files(&event.paths, &watched_files) {
                on_changed(post_for_event.to_string_lossy().into_owned());
            }
        };

        let mut watcher = match notify::recommended_watcher(callback) {
            Ok(watcher) => watcher,
            Err(error) => {
                debug!("native watcher unavailable: {error}");
                return None;
            }
        };

        if let Err(error) = watcher.watch(watched_dir, RecursiveMode::NonRecursive) {
            debug!("cannot watch {}: {error}", watched_dir.display());
            return None;
        }

        Some(watcher)
    }

    fn start_poll_fallback(
        &self,
        post_path: PathBuf,
        on_changed: ChangeCallback,
    ) -> (Sender<()>, JoinHandle<()>) {
        let (stop_sender, stop_receiver) = mpsc::channel::<()>();
        let files_for_thread = watched_files(&post_path);

        let thread = thread::spawn(move || {
            let mut last_signature = read_signatures(&files_for_thread);
            loop {
                match stop_receiver.recv_timeout(Duration::from_millis(POLL_INTERVAL_MS)) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {
                        let current_signature = read_signatures(&files_for_thread);
                        if current_signature != last_signature {
                            last_signature = current_signature;
                            on_changed(post_path.to_string_lossy().into_owned());
                        }
                    }
                }
            }
        });

        (stop_sender, thread)
    }

    fn start_poll_fallback_if_needed(
        &self,
        native_watcher_started: bool,
        post_path: PathBuf,
        on_changed: ChangeCallback,
    ) -> (Option<Sender<()>>, Option<JoinHandle<()>>) {
        if native_watcher_started {
            return (None, None);
        }

        debug!("polling {} for changes", post_path.display());
        let (stop_sender, poll_thread) = self.start_poll_fallback(post_path, on_changed);
        (Some(stop_sender), Some(poll_thread))
    }
}

impl Default for PostFileWatchService {
    fn default() -> Self {
        Self::new()
    }
}

impl PostWatchService for PostFileWatchService {
    fn start(&self, post_ref: &str, on_changed: ChangeCallback) -> Result<(), ReadingTimeError> {
        let post_path = resolve_path_input(post_ref)?;
        let watched_dir = post_path
            .parent()
            .ok_or_else(|| ReadingTimeError::Watch {
                path: post_path.clone(),
                reason: "cannot watch a post without a parent directory".to_string(),
            })?
            .to_path_buf();

        self.stop();

        let watcher =
            self.try_start_native_watcher(&post_path, &watched_dir, Arc::clone(&on_changed));
        let (poll_stop_sender, poll_thread) =
            self.start_poll_fallback_if_needed(watcher.is_some(), post_path.clone(), on_changed);

        let mut slot = self
            .active_watch
            .lock()
            .map_err(|_| ReadingTimeError::Watch {
                path: post_path.clone(),
                reason: "internal watcher state is poisoned".to_string(),
            })?;

        *slot = Some(ActiveWatch {
            _watcher: watcher,
            poll_stop_sender,
            poll_thread,
        });
        debug!("watching {}", post_path.display());

        Ok(())
    }

    fn stop(&self) {
        let active = match self.active_watch.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };

        if let Some(mut active) = active {
            if let Some(stop_sender) = active.poll_stop_sender.take() {
                let _ = stop_sender.send(());
            }
            if let Some(handle) = active.poll_thread.take() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for PostFileWatchService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn watched_files(post_path: &Path) -> Vec<PathBuf> {
    vec![post_path.to_path_buf(), sidecar_path(post_path)]
}

type FileSignature = Option<(u64, u128)>;

fn read_signatures(paths: &[PathBuf]) -> Vec<FileSignature> {
    paths.iter().map(|path| read_metadata_signature(path)).collect()
}

fn read_metadata_signature(path: &Path) -> FileSignature {
    let metadata = fs::metadata(path).ok()?;
    let size = metadata.len();
    let modified = metadata.modified().ok()?;
    let modified_nanos = modified
        .duration_since(std::time::UNIX_EPOCH)
        .ok()?
        .as_nanos();

    Some((size, modified_nanos))
}

fn affects_watched_files(paths: &[PathBuf], watched_files: &[PathBuf]) -> bool {
    watched_files
        .iter()
        .any(|watched| affects_watched_file(paths, watched))
}

fn affects_watched_file(paths: &[PathBuf], watched_file: &Path) -> bool {
    let watched_parent = watched_file.parent();
    let watched_name = watched_file.file_name();

    paths.iter().any(|candidate| {
        if paths_equal_for_watch(candidate, watched_file) {
            return true;
        }

        match (
            candidate.parent(),
            candidate.file_name(),
            watched_parent,
            watched_name,
        ) {
            (Some(candidate_parent), Some(candidate_name), Some(parent), Some(name)) => {
                paths_equal_for_watch(candidate_parent, parent)
                    && file_names_equal_for_watch(candidate_name, name)
            }
            _ => false,
        }
    })
}

fn paths_equal_for_watch(left: &Path, right: &Path) -> bool {
    #[cfg(windows)]
    {
        case_insensitive_os_str_eq(left.as_os_str(), right.as_os_str())
    }
    #[cfg(not(windows))]
    {
        left == right
    }
}

fn file_names_equal_for_watch(left: &OsStr, right: &OsStr) -> bool {
    #[cfg(windows)]
    {
        case_insensitive_os_str_eq(left, right)
    }
    #[cfg(not(windows))]
    {
        left == right
    }
}

#[cfg(windows)]
fn case_insensitive_os_str_eq(left: &OsStr, right: &OsStr) -> bool {
    left.to_string_lossy().to_lowercase() == right.to_string_lossy().to_lowercase()
}

fn should_emit_change(event: &notify::Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
    )
}
