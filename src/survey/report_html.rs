//! Self-contained HTML report: the tables of the aggregate and the chart, inlined.

use std::fmt::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use survey_tally::{Aggregate, VoteTable};

pub const TITLE: &str = "Aggregated Survey Results";

const STYLE: &str = r#"
        body { font-family: Arial, Helvetica, sans-serif; margin: 2rem; color: #222; }
        h1 { border-bottom: 1px solid #ccc; padding-bottom: 0.5rem; }
        table { border-collapse: collapse; margin-bottom: 2rem; }
        th, td { border: 1px solid #ccc; padding: 0.3rem 0.6rem; }
        th { background: #f0f0f0; }
        td { text-align: right; }
        td:first-child { text-align: left; }
        img { max-width: 100%; }
"#;

pub fn escape_html(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&#39;"),
            _ => res.push(c),
        }
    }
    res
}

fn header_row(out: &mut String, first: &str, labels: &[String]) {
    out.push_str("<tr>");
    for l in std::iter::once(first).chain(labels.iter().map(|s| s.as_str())) {
        let _ = write!(out, "<th>{}</th>", escape_html(l));
    }
    out.push_str("</tr>\n");
}

fn counts_table(out: &mut String, heading: &str, table: &VoteTable) {
    let _ = writeln!(out, "<h2>{}</h2>\n<table>", escape_html(heading));
    header_row(out, "Question", table.labels());
    for (question, counts) in table.rows() {
        let _ = write!(out, "<tr><td>{}</td>", escape_html(question));
        for c in counts {
            let _ = write!(out, "<td>{}</td>", c);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn percentages_table(out: &mut String, heading: &str, table: &VoteTable) {
    let _ = writeln!(out, "<h2>{}</h2>\n<table>", escape_html(heading));
    header_row(out, "Question", table.labels());
    for (question, pcts) in table.percentage_rows() {
        let _ = write!(out, "<tr><td>{}</td>", escape_html(&question));
        for p in pcts {
            let _ = write!(out, "<td>{:.1}</td>", p);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

/// The full document. The chart is embedded as a data URI.
pub fn render_html(aggregate: &Aggregate, png: &[u8]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{style}    </style>
</head>
<body>
<h1>{title}</h1>
"#,
        title = TITLE,
        style = STYLE
    );

    let _ = writeln!(
        out,
        "<p>{} survey file(s) aggregated:</p>\n<ul>",
        aggregate.sources.len()
    );
    for source in aggregate.sources.iter() {
        let _ = writeln!(out, "<li>{}</li>", escape_html(source));
    }
    out.push_str("</ul>\n");

    if let Some(regular) = &aggregate.regular {
        counts_table(&mut out, "Regular Votes", regular);
    }
    if let Some(scale) = &aggregate.scale {
        counts_table(&mut out, "Integer Votes", scale);
        percentages_table(&mut out, "Integer Votes Percentages", scale);
    }

    if !aggregate.comments.is_empty() {
        out.push_str("<h2>Comments</h2>\n<table>\n<tr><th>Comment</th></tr>\n");
        for c in aggregate.comments.iter() {
            let _ = writeln!(out, "<tr><td>{}</td></tr>", escape_html(c));
        }
        out.push_str("</table>\n");
    }

    let _ = write!(
        out,
        "<h2>Votes Plot</h2>\n<img src=\"data:image/png;base64,{}\" alt=\"Votes Plot\">\n</body>\n</html>\n",
        STANDARD.encode(png)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(labels: &[&str], rows: &[(&str, Vec<u64>)]) -> VoteTable {
        let mut t = VoteTable::new(labels.iter().map(|s| s.to_string()).collect());
        for (q, counts) in rows {
            t.push_row(q, counts.clone()).unwrap();
        }
        t
    }

    fn aggregate() -> Aggregate {
        Aggregate {
            regular: Some(table(
                &["D'accord", "Indécis"],
                &[("Rythme <adapté>", vec![3, 1])],
            )),
            scale: Some(table(&["0", "1", "2"], &[("Note", vec![1, 2, 0])])),
            comments: vec!["A & B".to_string()],
            sources: vec!["session_a.xlsx".to_string()],
        }
    }

    #[test]
    fn escaping() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Très bien"), "Très bien");
    }

    #[test]
    fn sections() {
        let html = render_html(&aggregate(), b"\x89PNG");
        assert!(html.contains("<title>Aggregated Survey Results</title>"));
        assert!(html.contains("<h2>Regular Votes</h2>"));
        assert!(html.contains("<h2>Integer Votes</h2>"));
        assert!(html.contains("<h2>Integer Votes Percentages</h2>"));
        assert!(html.contains("<tr><th>Question</th><th>0</th><th>1</th><th>2</th></tr>"));
        assert!(html.contains("<tr><td>Note</td><td>33.3</td><td>66.7</td><td>0.0</td></tr>"));
        assert!(html.contains("<td>Rythme &lt;adapté&gt;</td><td>3</td><td>1</td>"));
        assert!(html.contains("<td>A &amp; B</td>"));
        assert!(html.contains("<li>session_a.xlsx</li>"));
        assert!(html.contains("data:image/png;base64,iVBORw=="));
    }

    #[test]
    fn optional_sections() {
        let mut agg = aggregate();
        agg.scale = None;
        agg.comments.clear();
        let html = render_html(&agg, b"");
        assert!(!html.contains("Integer Votes"));
        assert!(!html.contains("<h2>Comments</h2>"));
        assert!(html.contains("<h2>Votes Plot</h2>"));
    }
}
