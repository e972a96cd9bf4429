use crate::calc;
use crate::dom::{Document, NodeId};
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

pub const DEFAULT_EXPORT_FILENAME: &str = "export.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Text,
    Number,
    Date,
}

impl SortKind {
    /// Anything that is not `number` or `date` sorts as text.
    pub fn parse(s: &str) -> SortKind {
        match s {
            "number" => SortKind::Number,
            "date" => SortKind::Date,
            _ => SortKind::Text,
        }
    }
}

/// Rows of the table's first `tbody`, in document order.
pub fn body_rows(doc: &Document, table: NodeId) -> Vec<NodeId> {
    let Some(tbody) = doc.first_by_tag(table, "tbody") else {
        return Vec::new();
    };
    doc.children(tbody)
        .iter()
        .copied()
        .filter(|&n| doc.tag(n) == "tr")
        .collect()
}

fn cells(doc: &Document, row: NodeId) -> Vec<NodeId> {
    doc.children(row)
        .iter()
        .copied()
        .filter(|&n| matches!(doc.tag(n), "td" | "th"))
        .collect()
}

fn cell_text(doc: &Document, row: NodeId, column: usize) -> String {
    cells(doc, row)
        .get(column)
        .map(|&c| doc.text_content(c).trim().to_string())
        .unwrap_or_default()
}

/// Case-insensitive substring filter over the body rows: non-matching rows
/// get an inline `display: none`, matching rows have the override cleared.
pub fn search_rows(doc: &mut Document, table: NodeId, filter: &str) -> (usize, usize) {
    let needle = filter.to_lowercase();
    let mut shown = 0usize;
    let mut hidden = 0usize;
    for row in body_rows(doc, table) {
        let haystack = doc.text_content(row).to_lowercase();
        if haystack.contains(&needle) {
            doc.set_display(row, None);
            shown += 1;
        } else {
            doc.set_display(row, Some("none"));
            hidden += 1;
        }
    }
    (shown, hidden)
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}

/// Ascending comparison of two trimmed cell values. Unparseable numbers and
/// dates compare equal, so the stable sort leaves their relative order alone.
pub fn compare_cells(kind: SortKind, a: &str, b: &str) -> Ordering {
    match kind {
        SortKind::Number => {
            let left = calc::parse_number(a);
            let right = calc::parse_number(b);
            match (left, right) {
                (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        SortKind::Date => match (parse_date(a), parse_date(b)) {
            (Some(l), Some(r)) => l.cmp(&r),
            _ => Ordering::Equal,
        },
        SortKind::Text => a.cmp(b),
    }
}

/// Reorders the body rows ascending on one column, in place. Rows are
/// reinserted after any non-row children of the `tbody`, the same order a
/// sequence of re-appends would produce.
pub fn sort_rows(doc: &mut Document, table: NodeId, column: usize, kind: SortKind) {
    let Some(tbody) = doc.first_by_tag(table, "tbody") else {
        return;
    };
    let mut rows: Vec<NodeId> = Vec::new();
    let mut rest: Vec<NodeId> = Vec::new();
    for &child in doc.children(tbody) {
        if doc.tag(child) == "tr" {
            rows.push(child);
        } else {
            rest.push(child);
        }
    }
    let mut keyed: Vec<(NodeId, String)> = rows
        .into_iter()
        .map(|row| {
            let key = cell_text(doc, row, column);
            (row, key)
        })
        .collect();
    keyed.sort_by(|a, b| compare_cells(kind, &a.1, &b.1));
    rest.extend(keyed.into_iter().map(|(row, _)| row));
    doc.set_children(tbody, rest);
}

/// One CSV field: embedded quotes are doubled, and the value is wrapped in
/// quotes when the original contains a comma or a quote.
pub fn csv_field(s: &str) -> String {
    let escaped = s.replace('"', "\"\"");
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

/// Serializes every row of the table (header and body) to CSV text.
pub fn table_to_csv(doc: &Document, table: NodeId) -> String {
    let mut lines: Vec<String> = Vec::new();
    for row in doc.all_by_tag(table, "tr") {
        let fields: Vec<String> = cells(doc, row)
            .into_iter()
            .map(|c| csv_field(doc.text_content(c).trim()))
            .collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSnapshot};

    fn table_doc(rows: &[&[&str]]) -> Document {
        let body_rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|cols| {
                serde_json::json!({
                    "tag": "tr",
                    "children": cols
                        .iter()
                        .map(|c| serde_json::json!({"tag": "td", "text": c}))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let snapshot: ElementSnapshot = serde_json::from_value(serde_json::json!({
            "tag": "body",
            "children": [
                {
                    "tag": "table",
                    "id": "roster",
                    "children": [
                        {
                            "tag": "thead",
                            "children": [
                                {
                                    "tag": "tr",
                                    "children": [
                                        {"tag": "th", "text": "Name"},
                                        {"tag": "th", "text": "Score"}
                                    ]
                                }
                            ]
                        },
                        {"tag": "tbody", "children": body_rows}
                    ]
                }
            ]
        }))
        .expect("snapshot");
        Document::from_snapshot(&snapshot)
    }

    fn first_column(doc: &Document, table: NodeId) -> Vec<String> {
        body_rows(doc, table)
            .into_iter()
            .map(|row| cell_text(doc, row, 0))
            .collect()
    }

    #[test]
    fn search_hides_non_matching_rows() {
        let mut doc = table_doc(&[&["Alice Smith", "90"], &["Bob Jones", "80"]]);
        let table = doc.by_id("roster").expect("table");
        let (shown, hidden) = search_rows(&mut doc, table, "smith");
        assert_eq!((shown, hidden), (1, 1));
        let rows = body_rows(&doc, table);
        assert_eq!(doc.display(rows[0]), None);
        assert_eq!(doc.display(rows[1]), Some("none"));
    }

    #[test]
    fn clearing_the_filter_shows_everything() {
        let mut doc = table_doc(&[&["Alice Smith", "90"], &["Bob Jones", "80"]]);
        let table = doc.by_id("roster").expect("table");
        search_rows(&mut doc, table, "smith");
        let (shown, hidden) = search_rows(&mut doc, table, "");
        assert_eq!((shown, hidden), (2, 0));
        for row in body_rows(&doc, table) {
            assert_eq!(doc.display(row), None);
        }
    }

    #[test]
    fn search_is_case_insensitive_across_cells() {
        let mut doc = table_doc(&[&["Alice", "Smith"], &["Bob", "Jones"]]);
        let table = doc.by_id("roster").expect("table");
        search_rows(&mut doc, table, "ALICE SMITH");
        let rows = body_rows(&doc, table);
        assert_eq!(doc.display(rows[0]), None);
        assert_eq!(doc.display(rows[1]), Some("none"));
    }

    #[test]
    fn numeric_sort_orders_by_value_not_text() {
        let mut doc = table_doc(&[&["30", "c"], &["5", "a"], &["100", "b"]]);
        let table = doc.by_id("roster").expect("table");
        sort_rows(&mut doc, table, 0, SortKind::Number);
        assert_eq!(first_column(&doc, table), vec!["5", "30", "100"]);
    }

    #[test]
    fn text_sort_is_lexicographic() {
        let mut doc = table_doc(&[&["30"], &["5"], &["100"]]);
        let table = doc.by_id("roster").expect("table");
        sort_rows(&mut doc, table, 0, SortKind::Text);
        assert_eq!(first_column(&doc, table), vec!["100", "30", "5"]);
    }

    #[test]
    fn date_sort_parses_both_common_forms() {
        let mut doc = table_doc(&[&["2024-03-01"], &["01/15/2024"], &["2023-12-31"]]);
        let table = doc.by_id("roster").expect("table");
        sort_rows(&mut doc, table, 0, SortKind::Date);
        assert_eq!(
            first_column(&doc, table),
            vec!["2023-12-31", "01/15/2024", "2024-03-01"]
        );
    }

    #[test]
    fn unparseable_keys_keep_their_relative_order() {
        let mut doc = table_doc(&[&["x"], &["y"], &["z"]]);
        let table = doc.by_id("roster").expect("table");
        sort_rows(&mut doc, table, 0, SortKind::Number);
        assert_eq!(first_column(&doc, table), vec!["x", "y", "z"]);
    }

    #[test]
    fn csv_wraps_commas_and_doubles_quotes() {
        assert_eq!(csv_field("Doe, John"), "\"Doe, John\"");
        assert_eq!(csv_field("She said \"hi\""), "\"She said \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn export_covers_header_and_body() {
        let doc = table_doc(&[&["Doe, John", "90"]]);
        let table = doc.by_id("roster").expect("table");
        assert_eq!(table_to_csv(&doc, table), "Name,Score\n\"Doe, John\",90");
    }

    #[test]
    fn sort_kind_defaults_to_text() {
        assert_eq!(SortKind::parse("number"), SortKind::Number);
        assert_eq!(SortKind::parse("date"), SortKind::Date);
        assert_eq!(SortKind::parse("string"), SortKind::Text);
        assert_eq!(SortKind::parse("anything"), SortKind::Text);
    }
}
