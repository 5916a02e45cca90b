use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reading_time_application::error::ReadingTimeError;
use reading_time_application::ports::PostRepository;
use reading_time_domain::document::{ContentFormat, PostDocument};
use reading_time_domain::settings::sanitize_key;

const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];
const FRONT_MATTER_DELIMITER: &str = "---";
const POST_TYPE_KEYS: &[&str] = &["post_type", "type"];

pub struct LocalPostRepository;

impl LocalPostRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PostRepository for LocalPostRepository {
    fn read(&self, post_ref: &str) -> Result<(PathBuf, PostDocument), ReadingTimeError> {
        let canonical_path = resolve_path_input(post_ref)?;
        let format = post_format(&canonical_path)
            .ok_or_else(|| ReadingTimeError::UnsupportedPost(canonical_path.clone()))?;

        let content =
            fs::read_to_string(&canonical_path).map_err(|source| ReadingTimeError::Read {
                path: canonical_path.clone(),
                reason: source.to_string(),
            })?;

        Ok((canonical_path, parse_post(&content, format)))
    }
}

pub fn resolve_path_input(path_input: &str) -> Result<PathBuf, ReadingTimeError> {
    if let Ok(uri) = url::Url::parse(path_input) {
        if uri.scheme() == "file" {
            let as_path = uri
                .to_file_path()
                .map_err(|_| ReadingTimeError::PostNotFound(PathBuf::from(path_input)))?;
            return canonicalize_existing_path(&as_path);
        }
    }

    canonicalize_existing_path(Path::new(path_input))
}

pub fn canonicalize_existing_path(path: &Path) -> Result<PathBuf, ReadingTimeError> {
    let canonical_path = path.canonicalize().map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ReadingTimeError::PostNotFound(path.to_path_buf())
        } else {
            ReadingTimeError::Read {
                path: path.to_path_buf(),
                reason: source.to_string(),
            }
        }
    })?;

    if !canonical_path.is_file() {
        return Err(ReadingTimeError::PostNotFound(path.to_path_buf()));
    }

    Ok(canonical_path)
}

pub fn post_format(path: &Path) -> Option<ContentFormat> {
    let extension = path.extension()?.to_str()?;
    let matches = |candidates: &[&str]| {
        candidates
            .iter()
            .any(|candidate| extension.eq_ignore_ascii_case(candidate))
    };

    if matches(HTML_EXTENSIONS) {
        Some(ContentFormat::Html)
    } else if matches(MARKDOWN_EXTENSIONS) {
        Some(ContentFormat::Markdown)
    } else {
        None
    }
}

/// Splits an optional `---` front matter block off the body. Only the post
/// type is read from it.
fn parse_post(content: &str, format: ContentFormat) -> PostDocument {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (front_matter, body) = split_front_matter(content);

    let document = match format {
        ContentFormat::Html => PostDocument::html(body),
        ContentFormat::Markdown => PostDocument::markdown(body),
    };

    match front_matter.and_then(front_matter_post_type) {
        Some(post_type) => document.with_post_type(post_type),
        None => document,
    }
}

fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix(FRONT_MATTER_DELIMITER)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, content)
}

fn front_matter_post_type(front_matter: &str) -> Option<String> {
    front_matter.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if !POST_TYPE_KEYS.contains(&key.trim()) {
            return None;
        }
        let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
        let post_type = sanitize_key(value);
        (!post_type.is_empty()).then_some(post_type)
    })
}
