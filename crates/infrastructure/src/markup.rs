use std::sync::LazyLock;

use reading_time_application::ports::MarkupProcessor;
use reading_time_domain::adjustment::StructureStats;
use reading_time_domain::counting::count_latin_words;
use reading_time_domain::document::{ContentFormat, PostDocument};
use regex::{Captures, Regex};
use scraper::{Html, Node};

use crate::comrak_renderer::ComrakMarkdownRenderer;

const BLOCK_TAGS: &str = "(?:table|thead|tfoot|caption|col|colgroup|tbody|tr|td|th|div|dl|dd|dt|ul|ol|li|pre|form|map|area|blockquote|address|math|style|p|h[1-6]|hr|fieldset|legend|section|article|aside|hgroup|header|footer|nav|figure|figcaption|details|menu|summary)";
const INLINE_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "span", "small", "abbr", "mark", "sup", "sub", "code",
];
const INLINE_ATTRIBUTES: &[&str] = &["class", "title", "lang", "dir"];
const BREAKING_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "nav", "ol", "p", "pre", "section", "summary", "table", "td", "th", "tr", "ul",
];

static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre(?:\s[^>]*)?>.*?</pre>").expect("PRE_BLOCK regex")
});
static PRE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<pre data-rtb-pre="(\d+)"></pre>"#).expect("PRE_PLACEHOLDER regex")
});
static BLOCK_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(<{BLOCK_TAGS}[\s/>])")).expect("BLOCK_OPEN regex")
});
static BLOCK_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(</{BLOCK_TAGS}>)")).expect("BLOCK_CLOSE regex")
});
static STARTS_WITH_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^</?{BLOCK_TAGS}[\s/>]")).expect("STARTS_WITH_BLOCK regex")
});
static ENDS_WITH_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)</?{BLOCK_TAGS}[^>]*>$")).expect("ENDS_WITH_BLOCK regex")
});
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("PARAGRAPH_BREAK regex"));
static EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*</p>\n?").expect("EMPTY_PARAGRAPH regex"));
static PARAGRAPH_AROUND_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)<p>\s*(</?{BLOCK_TAGS}[^>]*>)\s*</p>"))
        .expect("PARAGRAPH_AROUND_BLOCK regex")
});
static PARAGRAPH_OPENING_BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p><blockquote([^>]*)>").expect("PARAGRAPH_OPENING_BLOCKQUOTE regex")
});
static PARAGRAPH_BEFORE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)<p>\s*(</?{BLOCK_TAGS}[^>]*>)"))
        .expect("PARAGRAPH_BEFORE_BLOCK regex")
});
static PARAGRAPH_AFTER_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(</?{BLOCK_TAGS}[^>]*>)\s*</p>"))
        .expect("PARAGRAPH_AFTER_BLOCK regex")
});
static LINE_BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>$").expect("LINE_BREAK_TAG regex"));

static CODE_PRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>.*?</pre>").expect("CODE_PRE regex"));
static CODE_INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code[^>]*>.*?</code>").expect("CODE_INLINE regex"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h[2-6][^>]*>").expect("HEADING regex"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li(?:\s[^>]*)?>").expect("LIST_ITEM regex"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<blockquote(?:\s[^>]*)?>").expect("BLOCKQUOTE regex"));
static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").expect("PARAGRAPH regex"));
static PARAGRAPH_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").expect("PARAGRAPH_BODY regex")
});

static SCRIPT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("SCRIPT_ELEMENT regex")
});
static STYLE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("STYLE_ELEMENT regex")
});
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([A-Za-z][A-Za-z0-9-]*)([^>]*)>").expect("TAG regex")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("ATTRIBUTE regex")
});

pub struct HtmlMarkupProcessor {
    markdown: ComrakMarkdownRenderer,
}

impl HtmlMarkupProcessor {
    pub fn new() -> Self {
        Self {
            markdown: ComrakMarkdownRenderer::new(),
        }
    }
}

impl Default for HtmlMarkupProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupProcessor for HtmlMarkupProcessor {
    fn to_html(&self, document: &PostDocument) -> String {
        match document.format {
            ContentFormat::Html => document.body.clone(),
            ContentFormat::Markdown => self.markdown.render(&document.body),
        }
    }

    fn auto_paragraph(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        let mut preserved = Vec::new();
        let text = PRE_BLOCK.replace_all(html, |caps: &Captures| {
            preserved.push(caps[0].to_string());
            format!("<pre data-rtb-pre=\"{}\"></pre>", preserved.len() - 1)
        });
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = BLOCK_OPEN.replace_all(&text, "\n\n$1");
        let text = BLOCK_CLOSE.replace_all(&text, "$1\n\n");

        let mut wrapped = String::with_capacity(text.len() + 16);
        for chunk in PARAGRAPH_BREAK.split(&text) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            wrapped.push_str("<p>");
            wrapped.push_str(&join_lines(chunk));
            wrapped.push_str("</p>\n");
        }

        let wrapped = EMPTY_PARAGRAPH.replace_all(&wrapped, "");
        let wrapped = PARAGRAPH_AROUND_BLOCK.replace_all(&wrapped, "$1");
        // Bare quote text gets its own paragraph inside the blockquote.
        let wrapped = PARAGRAPH_OPENING_BLOCKQUOTE.replace_all(&wrapped, "<blockquote$1><p>");
        let wrapped = wrapped.replace("</blockquote></p>", "</p></blockquote>");
        let wrapped = PARAGRAPH_BEFORE_BLOCK.replace_all(&wrapped, "$1");
        let wrapped = PARAGRAPH_AFTER_BLOCK.replace_all(&wrapped, "$1");

        PRE_PLACEHOLDER
            .replace_all(&wrapped, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| preserved.get(index))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }

    fn remove_code_blocks(&self, html: &str) -> String {
        let without_pre = CODE_PRE.replace_all(html, " ");
        CODE_INLINE.replace_all(&without_pre, " ").into_owned()
    }

    fn plain_text(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut text = String::with_capacity(html.len());

        for node in fragment.tree.root().descendants() {
            match node.value() {
                Node::Element(element) if BREAKING_ELEMENTS.contains(&element.name()) => {
                    text.push('\n');
                }
                Node::Text(chunk) => {
                    let hidden = node.ancestors().any(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .is_some_and(|element| matches!(element.name(), "script" | "style"))
                    });
                    if !hidden {
                        text.push_str(chunk);
                    }
                }
                _ => {}
            }
        }

        text.trim().to_string()
    }

    fn structure(&self, html: &str) -> StructureStats {
        let paragraph_word_counts = PARAGRAPH_BODY
            .captures_iter(html)
            .map(|caps| count_latin_words(&self.plain_text(&caps[1])))
            .collect();

        StructureStats {
            word_estimate: count_latin_words(&self.plain_text(html)).max(1),
            headings: count_matches(&HEADING, html),
            list_items: count_matches(&LIST_ITEM, html),
            paragraphs: count_matches(&PARAGRAPH, html),
            blockquotes: count_matches(&BLOCKQUOTE, html),
            paragraph_word_counts,
        }
    }

    fn sanitize_inline(&self, html: &str) -> String {
        let cleaned = SCRIPT_ELEMENT.replace_all(html, "");
        let cleaned = STYLE_ELEMENT.replace_all(&cleaned, "");
        let cleaned = HTML_COMMENT.replace_all(&cleaned, "");

        TAG.replace_all(&cleaned, |caps: &Captures| {
            let name = caps[2].to_ascii_lowercase();
            if !INLINE_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            if &caps[1] == "/" {
                return format!("</{name}>");
            }

            let mut tag = format!("<{name}");
            for attribute in ATTRIBUTE.captures_iter(&caps[3]) {
                let key = attribute[1].to_ascii_lowercase();
                if !INLINE_ATTRIBUTES.contains(&key.as_str()) {
                    continue;
                }
                let value = attribute
                    .get(2)
                    .or_else(|| attribute.get(3))
                    .or_else(|| attribute.get(4))
                    .map_or("", |value| value.as_str());
                tag.push_str(&format!(" {key}=\"{}\"", value.replace('"', "&quot;")));
            }
            tag.push('>');
            tag
        })
        .into_owned()
    }
}

fn count_matches(pattern: &Regex, html: &str) -> u32 {
    u32::try_from(pattern.find_iter(html).count()).unwrap_or(u32::MAX)
}

/// Single newlines inside a paragraph become `<br />` unless a block tag or
/// an explicit break already sits on that boundary.
fn join_lines(chunk: &str) -> String {
    let mut joined = String::with_capacity(chunk.len());
    let mut previous: Option<&str> = None;

    for line in chunk.lines().map(str::trim_end) {
        if let Some(previous) = previous {
            let keeps_plain_newline = ENDS_WITH_BLOCK.is_match(previous)
                || LINE_BREAK_TAG.is_match(previous)
                || STARTS_WITH_BLOCK.is_match(line.trim_start());
            if !keeps_plain_newline {
                joined.push_str("<br />");
            }
            joined.push('\n');
        }
        joined.push_str(line);
        previous = Some(line);
    }

    joined
}
