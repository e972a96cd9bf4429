use crate::calc;
use crate::dom::{Document, NodeId};

pub const INVALID_CLASS: &str = "is-invalid";
pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";

const NOT_POSITIVE_MESSAGE: &str = "Marks must be a positive number";

pub fn is_form_field(tag: &str) -> bool {
    matches!(tag, "input" | "select" | "textarea")
}

/// Required-field validation over one form.
///
/// Every required `input`/`select`/`textarea` descendant with an empty
/// post-trim value is marked `is-invalid`; fields that pass have the marker
/// cleared, so repeated calls converge on the same marker state. A missing
/// form validates as true; callers treat that as "nothing to validate".
pub fn validate_form(doc: &mut Document, form_id: &str) -> bool {
    let Some(form) = doc.by_id(form_id) else {
        return true;
    };
    let mut valid = true;
    for node in doc.descendants(form) {
        let Some(el) = doc.get(node) else {
            continue;
        };
        if !is_form_field(&el.tag) || !el.attrs.contains_key("required") {
            continue;
        }
        if el.value.trim().is_empty() {
            doc.add_class(node, INVALID_CLASS);
            valid = false;
        } else {
            doc.remove_class(node, INVALID_CLASS);
        }
    }
    valid
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarksCheck {
    pub valid: bool,
    pub message: Option<String>,
}

impl MarksCheck {
    fn pass() -> Self {
        MarksCheck {
            valid: true,
            message: None,
        }
    }
}

/// Marks-range validation for one numeric input.
///
/// The ceiling comes from `#id_total_marks`, defaulting to 100 when the field
/// is absent or unparseable. The verdict lands in the input's custom validity
/// slot so the host's native constraint UI can surface the reason text.
pub fn validate_marks(doc: &mut Document, input_id: &str) -> MarksCheck {
    let Some(input) = doc.by_id(input_id) else {
        return MarksCheck::pass();
    };
    let ceiling = doc
        .by_id(calc::TOTAL_MARKS_ID)
        .and_then(|node| calc::parse_number(doc.value(node)))
        .unwrap_or(100.0);

    let message = match calc::parse_number(doc.value(input)) {
        None => Some(NOT_POSITIVE_MESSAGE.to_string()),
        Some(v) if v < 0.0 => Some(NOT_POSITIVE_MESSAGE.to_string()),
        Some(v) if v > ceiling => Some(format!(
            "Marks cannot exceed {}",
            calc::format_limit(ceiling)
        )),
        Some(_) => None,
    };

    match &message {
        Some(m) => {
            doc.set_custom_validity(input, m);
            doc.add_class(input, INVALID_CLASS);
        }
        None => {
            doc.set_custom_validity(input, "");
            doc.remove_class(input, INVALID_CLASS);
        }
    }
    MarksCheck {
        valid: message.is_none(),
        message,
    }
}

/// Serializes a form to name/value pairs with form-data semantics: named
/// fields only, checkboxes and radios only when checked (value defaulting
/// to "on").
pub fn serialize_form(doc: &Document, form: NodeId) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for node in doc.descendants(form) {
        let Some(el) = doc.get(node) else {
            continue;
        };
        if !is_form_field(&el.tag) {
            continue;
        }
        let Some(name) = el.attrs.get("name") else {
            continue;
        };
        let input_type = el.attrs.get("type").map(|t| t.as_str()).unwrap_or("");
        if matches!(input_type, "checkbox" | "radio") {
            if el.checked {
                let value = if el.value.is_empty() { "on" } else { &el.value };
                fields.push((name.clone(), value.to_string()));
            }
            continue;
        }
        fields.push((name.clone(), el.value.clone()));
    }
    fields
}

/// The CSRF token the server planted in the page, if any.
pub fn csrf_token(doc: &Document) -> Option<String> {
    let node = doc
        .all_with_attr_eq(doc.root(), "name", CSRF_FIELD_NAME)
        .into_iter()
        .next()?;
    Some(doc.value(node).to_string())
}
