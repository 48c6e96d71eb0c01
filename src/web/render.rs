//! HTML rendering for the web UI.
//!
//! Pages are small enough to assemble with `format!`. Every user-controlled
//! string (file names, model output, error messages) goes through [`escape`].

use super::ServerSettings;
use crate::export::{EXPORT_FILE_NAME, XLSX_MIME};
use crate::output::{ResultSet, COLUMNS};
use crate::pipeline::decode::ACCEPTED_EXTENSIONS;
use base64::{engine::general_purpose::STANDARD, Engine as _};

const TITLE: &str = "Image OCR &amp; Translation";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 20rem; padding: 1.5rem; background: #f3f4f6; }
main { flex: 1; padding: 1.5rem 2rem; overflow-x: auto; }
label { display: block; margin: 1rem 0 .25rem; font-weight: 600; }
input[type=password], input[type=file] { width: 100%; }
button { margin-top: 1.25rem; padding: .5rem 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #d1d5db; padding: .5rem; vertical-align: top; text-align: left; white-space: pre-wrap; }
th { background: #e5e7eb; }
tr.failed td { color: #b91c1c; }
.warning { padding: 1rem; background: #fef3c7; border: 1px solid #f59e0b; }
.download { display: inline-block; margin: 1rem 0; }
"#;

/// Escape text for HTML element content and quoted attribute values.
pub(super) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn layout(settings: &ServerSettings, main: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         {sidebar}\n<main>\n<h1>{TITLE}</h1>\n{main}\n</main>\n</body>\n</html>\n",
        sidebar = sidebar(settings),
    )
}

fn sidebar(settings: &ServerSettings) -> String {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "<aside>\n<h2>Settings</h2>\n\
         <form method=\"post\" action=\"/process\" enctype=\"multipart/form-data\">\n\
         <label for=\"api_key\">🔑 OpenAI API key</label>\n\
         <input type=\"password\" id=\"api_key\" name=\"api_key\" autocomplete=\"off\">\n\
         <label for=\"files\">📂 Images (multiple allowed)</label>\n\
         <input type=\"file\" id=\"files\" name=\"files\" accept=\"{accept}\" multiple>\n\
         <button type=\"submit\">Extract &amp; translate</button>\n\
         </form>\n<hr>\n<p><small>Model: {model}<br>{source} → {target}</small></p>\n</aside>",
        model = escape(&settings.model),
        source = escape(&settings.languages.source),
        target = escape(&settings.languages.target),
    )
}

/// Landing page: the upload form and nothing else.
pub(super) fn index_page(settings: &ServerSettings) -> String {
    layout(
        settings,
        "<p>Enter your API key, choose one or more PNG/JPEG images, and submit.</p>",
    )
}

/// Blocking warning, used for every request-level error.
pub(super) fn warning_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n\
         <h1>{TITLE}</h1>\n<div class=\"warning\">⚠ {msg}</div>\n\
         <p><a href=\"/\">Back</a></p>\n</main>\n</body>\n</html>\n",
        msg = escape(message).replace('\n', "<br>"),
    )
}

/// Result table plus a download link carrying the workbook as a data URI.
pub(super) fn results_page(settings: &ServerSettings, results: &ResultSet, xlsx: &[u8]) -> String {
    if results.is_empty() {
        return layout(settings, "<p>No images were uploaded.</p>");
    }

    let mut table = String::from("<table>\n<thead><tr>");
    for col in COLUMNS {
        table.push_str(&format!("<th>{}</th>", escape(col)));
    }
    table.push_str("</tr></thead>\n<tbody>\n");
    for record in results {
        let class = if record.is_success() { "" } else { " class=\"failed\"" };
        table.push_str(&format!("<tr{class}>"));
        for cell in record.row() {
            table.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        table.push_str("</tr>\n");
    }
    table.push_str("</tbody>\n</table>");

    let stats = results.stats();
    let main = format!(
        "<h3>🔍 OCR results</h3>\n<p>{ok}/{total} images extracted in {ms} ms</p>\n{table}\n\
         <a class=\"download\" download=\"{EXPORT_FILE_NAME}\" href=\"data:{XLSX_MIME};base64,{b64}\">\
         📥 Download Excel</a>",
        ok = stats.succeeded,
        total = stats.total_images,
        ms = stats.total_duration_ms,
        b64 = STANDARD.encode(xlsx),
    );
    layout(settings, &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use crate::output::{ExtractionResult, ResultRecord};

    #[test]
    fn escape_handles_markup() {
        assert_eq!(
            escape(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn index_offers_png_and_jpeg() {
        let html = index_page(&ServerSettings::default());
        assert!(html.contains("accept=\".png,.jpg,.jpeg\""));
        assert!(html.contains("type=\"password\""));
        assert!(html.contains("name=\"files\""));
    }

    #[test]
    fn results_page_escapes_model_output() {
        let mut set = ResultSet::new();
        set.push(ResultRecord::succeeded(
            "<script>.png",
            ExtractionResult::new("a < b", "가 > 나"),
            1,
        ));
        set.push(ResultRecord::failed("b.png", ItemError::NoMatch, 1));
        let html = results_page(&ServerSettings::default(), &set, b"PK");
        assert!(html.contains("&lt;script&gt;.png"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<td>a &lt; b</td>"));
        assert!(html.contains("<tr class=\"failed\">"));
        assert!(html.contains("download=\"ocr_translation_results.xlsx\""));
        assert!(html.contains("1/2 images extracted"));
    }

    #[test]
    fn warning_page_shows_message() {
        let html = warning_page("API key is missing.\nEnter it.");
        assert!(html.contains("class=\"warning\""));
        assert!(html.contains("API key is missing.<br>Enter it."));
    }
}
