use std::sync::Arc;

use html_escape::{encode_double_quoted_attribute, encode_text};
use reading_time_application::models::{BadgePlacement, ReadingTimeOutput};

const CLOCK_ICON: &str = concat!(
    r#"<span class="rtb-badge__icon" aria-hidden="true">"#,
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="14" height="14" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" focusable="false">"#,
    r#"<circle cx="12" cy="12" r="10"/>"#,
    r#"<polyline points="12 6 12 12 16 14"/>"#,
    "</svg></span>",
);
const ADJUSTED_NOTE: &str = r#"<span class="rtb-badge__ai-note" aria-hidden="true">AI-adjusted</span>"#;

/// Last-chance veto on a badge that settings and post meta allow.
pub type BadgeVisibilityFilter = Arc<dyn Fn(&ReadingTimeOutput) -> bool + Send + Sync>;

/// Rewrites rendered badge markup before it is injected.
pub type BadgeHtmlFilter = Arc<dyn Fn(String, &ReadingTimeOutput) -> String + Send + Sync>;

/// Embedder hooks around badge rendering. The default runs none.
#[derive(Clone, Default)]
pub struct BadgeHooks {
    pub show: Option<BadgeVisibilityFilter>,
    pub html: Option<BadgeHtmlFilter>,
}

impl BadgeHooks {
    pub fn with_visibility(mut self, filter: BadgeVisibilityFilter) -> Self {
        self.show = Some(filter);
        self
    }

    pub fn with_html(mut self, filter: BadgeHtmlFilter) -> Self {
        self.html = Some(filter);
        self
    }
}

/// Badge markup for an estimate, or `None` when the badge is suppressed or
/// there is nothing to report.
pub fn render_badge(output: &ReadingTimeOutput) -> Option<String> {
    render_badge_with(output, &BadgeHooks::default())
}

pub fn render_badge_with(output: &ReadingTimeOutput, hooks: &BadgeHooks) -> Option<String> {
    let badge = output.badge.as_ref()?;
    if output.minutes == 0 {
        return None;
    }
    if let Some(show) = &hooks.show {
        if !show(output) {
            return None;
        }
    }

    let word_note = match output.words {
        0 => String::new(),
        1 => "1 word".to_string(),
        words => format!("{words} words"),
    };
    let aria_label = format!(
        "Estimated reading time: {} minute(s). {word_note}.",
        output.minutes
    );
    let adjusted_attribute = if output.adjusted {
        r#" data-rtb-ai-adjusted="true""#
    } else {
        ""
    };

    let mut html = format!(
        r#"<div class="rtb-badge" role="note" aria-label="{}"{adjusted_attribute} data-rtb-minutes="{}">"#,
        encode_double_quoted_attribute(&aria_label),
        output.minutes
    );
    if badge.show_icon {
        html.push_str(CLOCK_ICON);
    }
    html.push_str(r#"<span class="rtb-badge__label">"#);
    html.push_str(&encode_text(&output.label));
    html.push_str("</span>");
    if output.adjusted {
        html.push_str(ADJUSTED_NOTE);
    }
    html.push_str("</div>");

    Some(match &hooks.html {
        Some(filter) => filter(html, output),
        None => html,
    })
}

pub fn inject_badge(content: &str, badge_html: &str, placement: BadgePlacement) -> String {
    match placement {
        BadgePlacement::Before => format!("{badge_html}{content}"),
        BadgePlacement::After => format!("{content}{badge_html}"),
        BadgePlacement::Both => format!("{badge_html}{content}{badge_html}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reading_time_application::models::{BadgeOutput, BadgePlacement, ReadingTimeOutput};

    use super::{inject_badge, render_badge, render_badge_with, BadgeHooks};

    fn output(minutes: u32, words: u32) -> ReadingTimeOutput {
        ReadingTimeOutput {
            path: "/posts/a.html".to_string(),
            post_type: "post".to_string(),
            html: "<p>Body</p>".to_string(),
            minutes,
            words,
            adjusted: false,
            is_override: false,
            label: format!("{minutes} min read"),
            badge: Some(BadgeOutput {
                placement: BadgePlacement::Before,
                show_icon: false,
            }),
            progress_bar: None,
        }
    }

    #[test]
    fn renders_accessible_badge() {
        let html = render_badge(&output(3, 612)).expect("badge should render");

        assert_eq!(
            html,
            concat!(
                r#"<div class="rtb-badge" role="note" aria-label="Estimated reading time: 3 minute(s). 612 words." data-rtb-minutes="3">"#,
                r#"<span class="rtb-badge__label">3 min read</span></div>"#
            )
        );
    }

    #[test]
    fn word_note_is_singular_or_omitted() {
        let one = render_badge(&output(1, 1)).expect("badge should render");
        assert!(one.contains("1 minute(s). 1 word."));

        let none = render_badge(&output(4, 0)).expect("badge should render");
        assert!(none.contains(r#"aria-label="Estimated reading time: 4 minute(s). .""#));
    }

    #[test]
    fn adjusted_estimates_carry_marker_and_note() {
        let mut estimate = output(2, 400);
        estimate.adjusted = true;

        let html = render_badge(&estimate).expect("badge should render");

        assert!(html.contains(r#" data-rtb-ai-adjusted="true" data-rtb-minutes="2""#));
        assert!(html.ends_with(
            r#"<span class="rtb-badge__ai-note" aria-hidden="true">AI-adjusted</span></div>"#
        ));
        assert!(!render_badge(&output(2, 400))
            .expect("badge should render")
            .contains("data-rtb-ai-adjusted"));
    }

    #[test]
    fn icon_is_inlined_before_label() {
        let mut estimate = output(5, 1200);
        if let Some(badge) = estimate.badge.as_mut() {
            badge.show_icon = true;
        }

        let html = render_badge(&estimate).expect("badge should render");

        let icon = html.find("rtb-badge__icon").expect("icon should render");
        let label = html.find("rtb-badge__label").expect("label should render");
        assert!(icon < label);
        assert!(html.contains(r#"<polyline points="12 6 12 12 16 14"/>"#));
    }

    #[test]
    fn label_markup_is_escaped() {
        let mut estimate = output(3, 10);
        estimate.label = "<strong>3</strong> min & more".to_string();

        let html = render_badge(&estimate).expect("badge should render");

        assert!(html.contains("&lt;strong&gt;3&lt;/strong&gt; min &amp; more"));
    }

    #[test]
    fn label_text_keeps_quotes_literal() {
        let mut estimate = output(3, 10);
        estimate.label = r#"3 "quick" min"#.to_string();

        let html = render_badge(&estimate).expect("badge should render");

        assert!(html.contains(r#"<span class="rtb-badge__label">3 "quick" min</span>"#));
    }

    #[test]
    fn visibility_hook_can_veto_the_badge() {
        let hooks = BadgeHooks::default()
            .with_visibility(Arc::new(|estimate: &ReadingTimeOutput| estimate.minutes > 5));

        assert!(render_badge_with(&output(3, 700), &hooks).is_none());
        assert!(render_badge_with(&output(6, 1400), &hooks).is_some());
    }

    #[test]
    fn html_hook_rewrites_rendered_markup() {
        let hooks = BadgeHooks::default().with_html(Arc::new(
            |html: String, estimate: &ReadingTimeOutput| {
                format!(r#"<aside data-words="{}">{html}</aside>"#, estimate.words)
            },
        ));

        let html = render_badge_with(&output(2, 450), &hooks).expect("badge should render");

        assert!(html.starts_with(r#"<aside data-words="450"><div class="rtb-badge""#));
        assert!(html.ends_with("</div></aside>"));

        let mut suppressed = output(2, 450);
        suppressed.badge = None;
        assert!(render_badge_with(&suppressed, &hooks).is_none());
    }

    #[test]
    fn empty_or_suppressed_estimates_render_nothing() {
        assert!(render_badge(&output(0, 0)).is_none());

        let mut suppressed = output(3, 500);
        suppressed.badge = None;
        assert!(render_badge(&suppressed).is_none());
    }

    #[test]
    fn injection_honours_placement() {
        assert_eq!(inject_badge("C", "B", BadgePlacement::Before), "BC");
        assert_eq!(inject_badge("C", "B", BadgePlacement::After), "CB");
        assert_eq!(inject_badge("C", "B", BadgePlacement::Both), "BCB");
    }
}
