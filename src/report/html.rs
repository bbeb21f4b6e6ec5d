//! HTML serialization of report tables.
//!
//! GitHub comments accept a subset of HTML, which is the only way to get
//! column spans into a Markdown body.

use crate::report::tables::Table;

/// HTML-escape a string for safe insertion into HTML content.
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render a table as an HTML `<table>`, one line per row.
pub fn render_table(table: &Table) -> String {
    let mut html = String::with_capacity(64 * (table.rows.len() + 2));
    html.push_str("<table>\n");

    for header_row in &table.header {
        html.push_str("<tr>");
        for cell in header_row {
            if cell.span > 1 {
                html.push_str(&format!(
                    "<th colspan='{}'>{}</th>",
                    cell.span,
                    html_escape(&cell.text)
                ));
            } else {
                html.push_str(&format!("<th>{}</th>", html_escape(&cell.text)));
            }
        }
        html.push_str("</tr>\n");
    }

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n");
    html
}
