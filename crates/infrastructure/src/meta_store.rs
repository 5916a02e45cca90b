use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use reading_time_application::error::ReadingTimeError;
use reading_time_application::ports::PostMetaStore;
use reading_time_domain::document::PostMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SIDECAR_SUFFIX: &str = ".meta.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoredMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    reading_time_override: Option<Value>,
    #[serde(skip_serializing_if = "is_false")]
    disable_badge: bool,
    #[serde(skip_serializing_if = "is_false")]
    disable_progress: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl From<StoredMeta> for PostMeta {
    fn from(stored: StoredMeta) -> Self {
        Self {
            override_minutes: stored.reading_time_override.as_ref().and_then(whole_minutes),
            disable_badge: stored.disable_badge,
            disable_progress: stored.disable_progress,
        }
    }
}

impl From<&PostMeta> for StoredMeta {
    fn from(meta: &PostMeta) -> Self {
        Self {
            reading_time_override: meta.override_minutes.map(Value::from),
            disable_badge: meta.disable_badge,
            disable_progress: meta.disable_progress,
        }
    }
}

/// Hand-edited sidecars may carry the override as a number or a numeric string.
/// Anything that is not a positive whole number reads as no override.
fn whole_minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(number) => number.as_i64()?,
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u32::try_from(minutes).ok().filter(|minutes| *minutes > 0)
}

/// Keeps per-post meta in a JSON file next to the post.
pub struct SidecarPostMetaStore;

impl SidecarPostMetaStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SidecarPostMetaStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn sidecar_path(post_path: &Path) -> PathBuf {
    let mut file_name = post_path.as_os_str().to_os_string();
    file_name.push(SIDECAR_SUFFIX);
    PathBuf::from(file_name)
}

impl PostMetaStore for SidecarPostMetaStore {
    fn read(&self, post_path: &Path) -> Result<PostMeta, ReadingTimeError> {
        let path = sidecar_path(post_path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Ok(PostMeta::default());
            }
            Err(source) => {
                return Err(ReadingTimeError::Read {
                    path,
                    reason: source.to_string(),
                })
            }
        };

        let stored: StoredMeta =
            serde_json::from_str(&content).map_err(|source| ReadingTimeError::Malformed {
                path: path.clone(),
                reason: source.to_string(),
            })?;
        Ok(stored.into())
    }

    fn write(&self, post_path: &Path, meta: &PostMeta) -> Result<(), ReadingTimeError> {
        let path = sidecar_path(post_path);

        if *meta == PostMeta::default() {
            return match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("removed empty post meta {}", path.display());
                    Ok(())
                }
                Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(ReadingTimeError::Write {
                    path,
                    reason: source.to_string(),
                }),
            };
        }

        let json = serde_json::to_string_pretty(&StoredMeta::from(meta)).map_err(|source| {
            ReadingTimeError::Write {
                path: path.clone(),
                reason: source.to_string(),
            }
        })?;
        fs::write(&path, json + "\n").map_err(|source| ReadingTimeError::Write {
            path,
            reason: source.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use reading_time_application::error::ReadingTimeError;
    use reading_time_application::ports::PostMetaStore;
    use reading_time_domain::document::PostMeta;

    use super::{sidecar_path, SidecarPostMetaStore};

    fn temp_post(prefix: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}-{suffix}.html"))
    }

    #[test]
    fn sidecar_sits_next_to_post() {
        assert_eq!(
            sidecar_path(PathBuf::from("/posts/intro.html").as_path()),
            PathBuf::from("/posts/intro.html.meta.json")
        );
    }

    #[test]
    fn missing_sidecar_reads_as_default_meta() {
        let post = temp_post("rtb-meta-missing");
        let meta = SidecarPostMetaStore::new()
            .read(&post)
            .expect("missing sidecar should not fail");

        assert_eq!(meta, PostMeta::default());
    }

    #[test]
    fn written_meta_is_read_back() {
        let post = temp_post("rtb-meta-write");
        let store = SidecarPostMetaStore::new();
        let meta = PostMeta {
            override_minutes: Some(12),
            disable_badge: false,
            disable_progress: true,
        };

        store.write(&post, &meta).expect("meta should be writable");
        let json = fs::read_to_string(sidecar_path(&post)).expect("sidecar should exist");
        assert!(json.contains("\"reading_time_override\": 12"));
        assert!(!json.contains("disable_badge"));
        assert_eq!(store.read(&post).expect("meta should be readable"), meta);

        let _ = fs::remove_file(sidecar_path(&post));
    }

    #[test]
    fn numeric_string_overrides_are_accepted() {
        let post = temp_post("rtb-meta-lenient");
        let store = SidecarPostMetaStore::new();

        fs::write(sidecar_path(&post), r#"{"reading_time_override": " 7 "}"#)
            .expect("sidecar should be writable");
        assert_eq!(store.read(&post).expect("meta").override_minutes, Some(7));

        fs::write(sidecar_path(&post), r#"{"reading_time_override": "soon"}"#)
            .expect("sidecar should be writable");
        assert_eq!(store.read(&post).expect("meta").override_minutes, None);

        let _ = fs::remove_file(sidecar_path(&post));
    }

    #[test]
    fn negative_or_zero_overrides_read_as_absent() {
        let post = temp_post("rtb-meta-negative");
        let store = SidecarPostMetaStore::new();

        for raw in [r#"-5"#, r#""-3""#, r#"0"#, r#"2.5"#] {
            fs::write(
                sidecar_path(&post),
                format!(r#"{{"reading_time_override": {raw}}}"#),
            )
            .expect("sidecar should be writable");

            let meta = store.read(&post).expect("meta should be readable");
            assert_eq!(meta.override_minutes, None, "override {raw}");
            assert_eq!(meta.effective_override(), None, "override {raw}");
        }

        let _ = fs::remove_file(sidecar_path(&post));
    }

    #[test]
    fn malformed_sidecar_is_reported() {
        let post = temp_post("rtb-meta-malformed");
        fs::write(sidecar_path(&post), "{not json").expect("sidecar should be writable");

        let error = SidecarPostMetaStore::new()
            .read(&post)
            .expect_err("malformed sidecar should fail");

        match error {
            ReadingTimeError::Malformed { path, .. } => assert_eq!(path, sidecar_path(&post)),
            other => panic!("unexpected error variant: {other:?}"),
        }
        let _ = fs::remove_file(sidecar_path(&post));
    }

    #[test]
    fn writing_default_meta_removes_sidecar() {
        let post = temp_post("rtb-meta-clear");
        let store = SidecarPostMetaStore::new();
        store
            .write(
                &post,
                &PostMeta {
                    disable_badge: true,
                    ..PostMeta::default()
                },
            )
            .expect("meta should be writable");
        assert!(sidecar_path(&post).exists());

        store
            .write(&post, &PostMeta::default())
            .expect("clearing meta should succeed");

        assert!(!sidecar_path(&post).exists());
    }
}
