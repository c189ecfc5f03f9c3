use crate::types::{Snippet, SummaryRow};

/// Flatten snippets into plain text, one snippet per line
pub fn format_transcript_plain(snippets: &[Snippet]) -> String {
    snippets
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format summary rows as a human-readable markdown digest
pub fn format_summary_readable(rows: &[SummaryRow]) -> String {
    let mut output = String::new();

    let count = |label: &str| {
        rows.iter()
            .filter(|r| r.overall_sentiment.eq_ignore_ascii_case(label))
            .count()
    };
    let ads = rows
        .iter()
        .filter(|r| r.is_advertisement.eq_ignore_ascii_case("yes"))
        .count();

    output.push_str("# Review sentiment\n\n");
    output.push_str(&format!(
        "**Videos:** {} | **Positive:** {} | **Neutral:** {} | **Negative:** {} | **Sponsored:** {}\n\n",
        rows.len(),
        count("positive"),
        count("neutral"),
        count("negative"),
        ads
    ));

    for row in rows {
        output.push_str(&format!("### {}\n\n", row.filename));
        output.push_str(&format!(
            "{} (polarity {}, subjectivity {}) | ad: {}\n",
            if row.overall_sentiment.is_empty() {
                "unknown"
            } else {
                row.overall_sentiment.as_str()
            },
            or_dash(&row.polarity),
            or_dash(&row.subjectivity),
            or_dash(&row.is_advertisement)
        ));
        if !row.highlighted_phrases.is_empty() {
            output.push_str(&format!("• {}\n", row.highlighted_phrases));
        }
        output.push('\n');
    }

    output
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
