use crate::dom::Document;

pub const MARKS_OBTAINED_ID: &str = "id_marks_obtained";
pub const TOTAL_MARKS_ID: &str = "id_total_marks";
pub const PERCENTAGE_DISPLAY_ID: &str = "percentage-display";

/// Browser-style float parse: the longest leading numeric prefix counts,
/// so "85.5 pts" parses as 85.5 and "abc" parses as nothing.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut end = 0usize;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    t[..end].parse::<f64>().ok()
}

/// Reads a numeric field by element id, falling back to `default` when the
/// element is absent or its value does not parse.
pub fn read_number_or(doc: &Document, id: &str, default: f64) -> f64 {
    doc.by_id(id)
        .and_then(|node| parse_number(doc.value(node)))
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Positive,
    Warning,
    Negative,
}

impl Tier {
    pub fn class_name(self) -> &'static str {
        match self {
            Tier::Positive => "bg-success",
            Tier::Warning => "bg-warning",
            Tier::Negative => "bg-danger",
        }
    }
}

/// Closed at the bottom of each band: 75 is positive, 50 is warning.
pub fn tier_for(percent: f64) -> Tier {
    if percent >= 75.0 {
        Tier::Positive
    } else if percent >= 50.0 {
        Tier::Warning
    } else {
        Tier::Negative
    }
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Renders a marks ceiling the way users typed it: no trailing ".0" on whole
/// numbers.
pub fn format_limit(max: f64) -> String {
    if max.fract() == 0.0 {
        format!("{:.0}", max)
    } else {
        format!("{}", max)
    }
}

/// Recomputes the percentage display from the two marks fields.
///
/// Marks default to 0 and the total to 100 when a field is absent or
/// unparseable. A total of zero or below skips the update entirely, leaving
/// whatever the display held before.
pub fn recalc_percentage(doc: &mut Document) -> Option<f64> {
    let marks = read_number_or(doc, MARKS_OBTAINED_ID, 0.0);
    let total = read_number_or(doc, TOTAL_MARKS_ID, 100.0);
    if total <= 0.0 {
        return None;
    }
    let percent = marks / total * 100.0;
    let display = doc.by_id(PERCENTAGE_DISPLAY_ID)?;
    doc.set_text(display, &format_percent(percent));
    doc.set_classes(
        display,
        vec![
            "badge".to_string(),
            tier_for(percent).class_name().to_string(),
        ],
    );
    Some(percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSnapshot};

    fn marks_doc(marks: &str, total: &str) -> Document {
        let snapshot: ElementSnapshot = serde_json::from_value(serde_json::json!({
            "tag": "body",
            "children": [
                {"tag": "span", "id": "percentage-display", "classes": ["badge"], "text": "—"},
                {"tag": "input", "id": "id_marks_obtained", "value": marks},
                {"tag": "input", "id": "id_total_marks", "value": total}
            ]
        }))
        .expect("snapshot");
        Document::from_snapshot(&snapshot)
    }

    #[test]
    fn parse_number_takes_leading_prefix() {
        assert_eq!(parse_number("85.5 pts"), Some(85.5));
        assert_eq!(parse_number("  -3"), Some(-3.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("1e"), Some(1.0));
        assert_eq!(parse_number("12.5.9"), Some(12.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("."), None);
    }

    #[test]
    fn tier_boundaries_are_closed_at_the_bottom() {
        assert_eq!(tier_for(75.0), Tier::Positive);
        assert_eq!(tier_for(74.9), Tier::Warning);
        assert_eq!(tier_for(50.0), Tier::Warning);
        assert_eq!(tier_for(49.9), Tier::Negative);
    }

    #[test]
    fn recalc_updates_text_and_tier_class() {
        let mut doc = marks_doc("75", "100");
        let percent = recalc_percentage(&mut doc).expect("computed");
        assert!((percent - 75.0).abs() < 1e-9);
        let display = doc.by_id(PERCENTAGE_DISPLAY_ID).expect("display");
        assert_eq!(doc.text_content(display), "75.0%");
        assert!(doc.has_class(display, "badge"));
        assert!(doc.has_class(display, "bg-success"));

        let marks = doc.by_id(MARKS_OBTAINED_ID).expect("marks");
        doc.set_value(marks, "40");
        recalc_percentage(&mut doc).expect("computed");
        assert!(doc.has_class(display, "bg-danger"));
        assert!(!doc.has_class(display, "bg-success"));
    }

    #[test]
    fn zero_total_leaves_display_untouched() {
        let mut doc = marks_doc("75", "0");
        assert_eq!(recalc_percentage(&mut doc), None);
        let display = doc.by_id(PERCENTAGE_DISPLAY_ID).expect("display");
        assert_eq!(doc.text_content(display), "—");
    }

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let snapshot: ElementSnapshot = serde_json::from_value(serde_json::json!({
            "tag": "body",
            "children": [
                {"tag": "span", "id": "percentage-display"}
            ]
        }))
        .expect("snapshot");
        let mut doc = Document::from_snapshot(&snapshot);
        let percent = recalc_percentage(&mut doc).expect("computed");
        assert_eq!(percent, 0.0);
        let display = doc.by_id(PERCENTAGE_DISPLAY_ID).expect("display");
        assert_eq!(doc.text_content(display), "0.0%");
        assert!(doc.has_class(display, "bg-danger"));
    }

    #[test]
    fn format_limit_drops_whole_number_decimals() {
        assert_eq!(format_limit(100.0), "100");
        assert_eq!(format_limit(85.5), "85.5");
    }
}
