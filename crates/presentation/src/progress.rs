use html_escape::encode_double_quoted_attribute;
use reading_time_application::models::{ProgressBarOutput, ProgressPlacement};

fn placement_name(placement: ProgressPlacement) -> &'static str {
    match placement {
        ProgressPlacement::Top => "top",
        ProgressPlacement::Bottom => "bottom",
    }
}

/// Fixed-position reading progress bar. The page script only updates
/// `aria-valuenow` and `--rtb-progress` while the reader scrolls.
pub fn render_progress_bar(bar: &ProgressBarOutput) -> String {
    let style = format!(
        "--rtb-progress:0%;--rtb-progress-color:{};--rtb-progress-bg:{};--rtb-progress-height:{}px;",
        bar.color, bar.background_color, bar.height
    );

    let mut html = format!(
        concat!(
            r#"<div id="rtb-progress-bar" role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow="0" aria-label="Reading progress""#,
            r#" data-position="{}" data-tooltip="{}" data-reduce-motion="{}" style="{}">"#,
            r#"<div id="rtb-progress-bar__fill"></div>"#
        ),
        placement_name(bar.placement),
        bar.show_tooltip,
        bar.respect_reduced_motion,
        encode_double_quoted_attribute(&style),
    );
    if bar.show_tooltip {
        html.push_str(r#"<span id="rtb-progress-bar__tooltip" aria-hidden="true"></span>"#);
    }
    html.push_str("</div>");
    html
}
