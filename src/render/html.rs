//! HTML table view of a tenant log.

use chrono::SecondsFormat;
use std::borrow::Cow;

use crate::config::RenderConfig;
use crate::store::LogRecord;

const STYLE: &str = "<style>
\tbody { font-family: Arial, sans-serif; padding: 20px; }
\ttable { width: 100%; border-collapse: collapse; }
\tth, td { border: 1px solid #ccc; padding: 8px; text-align: left; }
\tth { background-color: #f5f5f5; }
\t</style>";

const TABLE_HEAD: &str = "<table><thead><tr><th>Время</th><th>Метод</th><th>Путь</th>\
<th>Тело запроса</th></tr></thead><tbody>";

/// Renders records as a self-contained HTML page.
///
/// Output depends only on the inputs: no clock, no I/O.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    escape: bool,
}

impl HtmlRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            escape: config.escape_html,
        }
    }

    /// Build the page for `tenant`, one table row per record in input order.
    pub fn render(&self, tenant: &str, records: &[LogRecord]) -> String {
        let tenant = self.text(tenant);
        let mut html = String::with_capacity(1024 + records.len() * 256);

        html.push_str("<html><head><title>Логи магазина ");
        html.push_str(&tenant);
        html.push_str("</title>");
        html.push_str(STYLE);
        html.push_str("</head><body>");
        html.push_str("<h1>Логи магазина ");
        html.push_str(&tenant);
        html.push_str("</h1>");
        html.push_str(TABLE_HEAD);

        for record in records {
            let time = record
                .timestamp
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_default();

            html.push_str("<tr>");
            push_cell(&mut html, &self.text(&time));
            push_cell(&mut html, &self.text(&record.method));
            push_cell(&mut html, &self.text(&record.path));
            html.push_str("<td><pre style='white-space: pre-wrap;'>");
            html.push_str(&self.text(&record.body));
            html.push_str("</pre></td>");
            html.push_str("</tr>");
        }

        html.push_str("</tbody></table>");
        html.push_str("</body></html>");
        html
    }

    fn text<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.escape {
            escape_html(value)
        } else {
            Cow::Borrowed(value)
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

fn push_cell(html: &mut String, value: &str) {
    html.push_str("<td>");
    html.push_str(value);
    html.push_str("</td>");
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
