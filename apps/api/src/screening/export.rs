//! CSV rendering of a ranked shortlist.

use crate::models::screening::ShortlistRow;

pub const CSV_HEADER: [&str; 11] = [
    "Rank",
    "Candidate",
    "Score",
    "Recommend",
    "Matches",
    "Gaps",
    "Experience",
    "Education",
    "Recent Title",
    "Chars",
    "Notes",
];

/// Renders `rows` in their given order; rank is the 1-based position.
/// Every cell is quoted, embedded quotes are doubled.
pub fn to_csv(rows: &[ShortlistRow]) -> String {
    let header = CSV_HEADER.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
    let body = rows.iter().enumerate().map(|(i, row)| {
        let b = &row.breakdown;
        [
            (i + 1).to_string(),
            row.filename.clone(),
            format!("{:.1}%", b.score * 100.0),
            if b.recommend { "Yes" } else { "No" }.to_string(),
            b.matches.join("; "),
            b.gaps.join("; "),
            b.years.to_string(),
            b.education.to_string(),
            b.recent_title.clone(),
            row.char_count.to_string(),
            b.notes.clone(),
        ]
        .iter()
        .map(|cell| quote(cell))
        .collect::<Vec<_>>()
        .join(",")
    });

    std::iter::once(header).chain(body).collect::<Vec<_>>().join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
