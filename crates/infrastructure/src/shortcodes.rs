use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use log::debug;
use reading_time_application::ports::ShortcodeProcessor;
use regex::Regex;

static OPENING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Za-z0-9_-]+)((?:\s[^\[\]]*?)?)\s*(/)?\]").expect("OPENING_TAG regex")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))|"([^"]*)"|'([^']*)'|(\S+)"#)
        .expect("ATTRIBUTE regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeCall<'a> {
    pub tag: &'a str,
    pub attributes: BTreeMap<String, String>,
    pub positional: Vec<String>,
    pub content: Option<&'a str>,
}

pub type ShortcodeHandler = Arc<dyn Fn(&ShortcodeCall<'_>) -> String + Send + Sync>;

#[derive(Clone, Copy)]
enum Mode {
    Expand,
    Strip,
}

/// Only registered tags are touched; anything else in brackets stays text.
#[derive(Clone, Default)]
pub struct ShortcodeRegistry {
    handlers: BTreeMap<String, ShortcodeHandler>,
}

impl ShortcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tag: impl Into<String>, handler: ShortcodeHandler) -> Self {
        self.handlers.insert(tag.into(), handler);
        self
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    fn process(&self, content: &str, mode: Mode) -> String {
        if self.handlers.is_empty() || !content.contains('[') {
            return content.to_string();
        }

        let mut output = String::with_capacity(content.len());
        let mut cursor = 0;

        while let Some(caps) = OPENING_TAG.captures_at(content, cursor) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let tag = caps.get(1).map_or("", |tag| tag.as_str());
            output.push_str(&content[cursor..whole.start()]);

            let Some(handler) = self.handlers.get(tag) else {
                output.push_str(whole.as_str());
                cursor = whole.end();
                continue;
            };

            let self_closing = caps.get(3).is_some();
            let closing_tag = format!("[/{tag}]");
            let (inner, end) = match content[whole.end()..].find(&closing_tag) {
                Some(offset) if !self_closing => {
                    let inner_end = whole.end() + offset;
                    (
                        Some(&content[whole.end()..inner_end]),
                        inner_end + closing_tag.len(),
                    )
                }
                _ => (None, whole.end()),
            };

            let escaped = whole.start() > cursor
                && content[..whole.start()].ends_with('[')
                && content[end..].starts_with(']');
            if escaped {
                output.pop();
                output.push_str(&content[whole.start()..end]);
                cursor = end + 1;
                continue;
            }

            match mode {
                Mode::Expand => {
                    let raw_attributes = caps.get(2).map_or("", |attrs| attrs.as_str());
                    let call = parse_call(tag, raw_attributes, inner);
                    debug!("expanding [{tag}] shortcode");
                    output.push_str(&handler(&call));
                }
                Mode::Strip => {}
            }
            cursor = end;
        }

        output.push_str(&content[cursor..]);
        output
    }
}

impl ShortcodeProcessor for ShortcodeRegistry {
    fn expand(&self, content: &str) -> String {
        self.process(content, Mode::Expand)
    }

    fn strip(&self, content: &str) -> String {
        self.process(content, Mode::Strip)
    }
}

fn parse_call<'a>(
    tag: &'a str,
    raw_attributes: &str,
    content: Option<&'a str>,
) -> ShortcodeCall<'a> {
    let mut call = ShortcodeCall {
        tag,
        attributes: BTreeMap::new(),
        positional: Vec::new(),
        content,
    };
    // Markdown rendering escapes quotes inside shortcode text.
    let raw = raw_attributes.replace("&quot;", "\"").replace("&#39;", "'");

    for caps in ATTRIBUTE.captures_iter(&raw) {
        if let Some(name) = caps.get(1) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |value| value.as_str());
            call.attributes
                .insert(name.as_str().to_ascii_lowercase(), value.to_string());
        } else if let Some(value) = caps
            .get(5)
            .or_else(|| caps.get(6))
            .or_else(|| caps.get(7))
        {
            call.positional.push(value.as_str().to_string());
        }
    }

    call
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reading_time_application::ports::ShortcodeProcessor;

    use super::{ShortcodeCall, ShortcodeRegistry};

    fn registry() -> ShortcodeRegistry {
        ShortcodeRegistry::new()
            .register(
                "note",
                Arc::new(|call: &ShortcodeCall<'_>| {
                    format!("Note: {}", call.content.unwrap_or_default())
                }),
            )
            .register(
                "gallery",
                Arc::new(|call: &ShortcodeCall<'_>| {
                    let count = call
                        .attributes
                        .get("count")
                        .and_then(|count| count.parse::<usize>().ok())
                        .unwrap_or(1);
                    vec!["caption"; count].join(" ")
                }),
            )
    }

    #[test]
    fn expands_registered_enclosing_and_self_closing_shortcodes() {
        let expanded =
            registry().expand("Intro [note]read this[/note] then [gallery count=\"3\" /] end");

        assert_eq!(
            expanded,
            "Intro Note: read this then caption caption caption end"
        );
    }

    #[test]
    fn unknown_shortcodes_are_left_as_text() {
        let content = "Prices [in brackets] and [unknown id=2] stay";

        assert_eq!(registry().expand(content), content);
        assert_eq!(registry().strip(content), content);
        assert!(!registry().is_registered("unknown"));
        assert!(registry().is_registered("gallery"));
    }

    #[test]
    fn strip_removes_registered_shortcodes_with_their_content() {
        let stripped = registry().strip("A [note]hidden words[/note]B [gallery count=2]C");

        assert_eq!(stripped, "A B C");
    }

    #[test]
    fn escaped_shortcodes_render_literally() {
        let expanded = registry().expand("Write [[gallery]] to embed");

        assert_eq!(expanded, "Write [gallery] to embed");
    }

    #[test]
    fn attributes_survive_markdown_quote_escaping() {
        let expanded = registry().expand("[gallery count=&quot;2&quot;]");

        assert_eq!(expanded, "caption caption");
    }

    #[test]
    fn parses_named_and_positional_attributes() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let sink = Arc::clone(&seen);
        let registry = ShortcodeRegistry::new().register(
            "embed",
            Arc::new(move |call: &ShortcodeCall<'_>| {
                sink.lock()
                    .expect("capture should be lockable")
                    .replace((call.attributes.clone(), call.positional.clone()));
                String::new()
            }),
        );

        registry.expand("[embed https://example.com Width='640' title=\"A b\"]");

        let (attributes, positional) = seen
            .lock()
            .expect("capture should be lockable")
            .clone()
            .expect("handler should run");
        assert_eq!(attributes.get("width").map(String::as_str), Some("640"));
        assert_eq!(attributes.get("title").map(String::as_str), Some("A b"));
        assert_eq!(positional, vec!["https://example.com".to_string()]);
    }
}
