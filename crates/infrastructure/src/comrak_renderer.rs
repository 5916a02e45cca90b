use comrak::{markdown_to_html, Options};

const HEADING_ID_PREFIX: &str = "rtb-";

/// Renders Markdown-authored posts to the HTML the rest of the pipeline expects.
pub struct ComrakMarkdownRenderer {
    options: Options<'static>,
}

impl ComrakMarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: markdown_options(),
        }
    }

    pub fn render(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.options)
    }
}

impl Default for ComrakMarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn markdown_options() -> Options<'static> {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.tagfilter = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.header_ids = Some(HEADING_ID_PREFIX.to_string());
    options.extension.footnotes = true;
    options.extension.description_lists = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options.extension.multiline_block_quotes = true;
    options.extension.underline = true;
    options.extension.subscript = true;

    options.parse.smart = false;
    // Posts may embed shortcodes and inline HTML that must survive rendering.
    options.render.r#unsafe = true;

    options
}
