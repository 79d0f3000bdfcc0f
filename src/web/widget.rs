use crate::models::{CounterEntry, WidgetPayload, WidgetPreference, WidgetTemplate};

const WIDGET_SCRIPT: &str = include_str!("widget.js");

/// Text shown by the widget for `count` under the given preference.
pub fn render_text(preference: &WidgetPreference, count: u64) -> String {
    let count = format_count(count);
    match preference.template {
        WidgetTemplate::Enrolled => format!("{} people already enrolled", count),
        WidgetTemplate::Waitlist => format!("{} people on the waitlist", count),
        WidgetTemplate::Custom if preference.custom_text.trim().is_empty() => count,
        WidgetTemplate::Custom => preference.custom_text.replace("{count}", &count),
    }
}

pub fn payload(id: &str, counter: &CounterEntry, preference: Option<&WidgetPreference>) -> WidgetPayload {
    let fallback = WidgetPreference::default();
    let preference = preference.unwrap_or(&fallback);
    WidgetPayload {
        id: id.to_string(),
        count: counter.count,
        text: render_text(preference, counter.count),
        animate: preference.animate,
    }
}

/// Embed script with the service base URL baked in.
pub fn script(base_url: &str) -> String {
    let base = serde_json::to_string(base_url).unwrap_or_else(|_| "\"\"".to_string());
    WIDGET_SCRIPT.replace("__BASE_URL__", &base)
}

/// HTML to paste into a page to show the counter of group `id`.
pub fn embed_snippet(base_url: &str, id: &str) -> String {
    format!(
        "<span data-counter-id=\"{}\"></span>\n<script src=\"{}/widget.js\" async></script>",
        escape_html(id),
        escape_html(base_url)
    )
}

/// Thousands separated by a space, e.g. `12 345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
