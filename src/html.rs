// File: ./src/html.rs
// Renders a year's raw rows as an HTML table for the club website.
use crate::source::RawEventRow;
use std::fmt::Write;

pub const COLUMN_TITLES: [&str; 4] = ["Datum", "Uhrzeit", "OV", "Veranstaltung"];

/// Cells are written verbatim: the listing's markup is meant for the page.
pub fn render_table(rows: &[RawEventRow]) -> String {
    let mut out = String::with_capacity(256 + rows.len() * 128);

    out.push_str("<table>\n<thead>\n  <tr>\n");
    for title in COLUMN_TITLES {
        let _ = writeln!(out, "    <th scope=\"col\">{}</th>", title);
    }
    out.push_str("  </tr>\n</thead>\n<tbody>\n");

    for row in rows {
        out.push_str("  <tr>\n");
        for cell in row.cells() {
            let _ = writeln!(out, "    <td>{}</td>", cell);
        }
        out.push_str("  </tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let rows = vec![RawEventRow {
            date: Some("3. Januar".to_string()),
            time: None,
            organizer: Some("<b>M21</b>".to_string()),
            description: Some("Clubabend".to_string()),
            line: 1,
        }];
        let html = render_table(&rows);
        assert!(html.starts_with("<table>\n<thead>\n"));
        assert!(html.contains("    <th scope=\"col\">Veranstaltung</th>\n"));
        assert!(html.contains(
            "  <tr>\n    <td>3. Januar</td>\n    <td></td>\n    <td><b>M21</b></td>\n    <td>Clubabend</td>\n  </tr>\n"
        ));
        assert!(html.ends_with("</tbody>\n</table>\n"));
    }
}
