use crate::calc;
use crate::dom::{Document, NodeId};

#[derive(Debug, Clone)]
pub struct PercentageBinding {
    pub marks_input: NodeId,
    pub total_input: NodeId,
}

#[derive(Debug, Clone)]
pub struct SearchBinding {
    pub input: NodeId,
    pub table_id: String,
}

#[derive(Debug, Clone)]
pub struct AutoSaveBinding {
    pub form: NodeId,
    pub endpoint: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InitReport {
    pub tooltips: usize,
    pub popovers: usize,
    pub searches: usize,
    pub validated_forms: usize,
    pub percentage_bound: bool,
}

/// Everything registered against the current page. Each entry is an
/// independent listener; nothing here depends on registration order.
#[derive(Debug, Default)]
pub struct Bindings {
    pub tooltips: Vec<NodeId>,
    pub popovers: Vec<NodeId>,
    pub percentage: Option<PercentageBinding>,
    pub searches: Vec<SearchBinding>,
    pub validated_forms: Vec<NodeId>,
    pub autosaves: Vec<AutoSaveBinding>,
}

impl Bindings {
    /// The initializer's scan: tooltip/popover targets, the percentage pair
    /// when both fields exist, search inputs, and validated forms. Replaces
    /// what a previous scan registered; auto-save registrations are made
    /// explicitly and survive a rescan.
    pub fn rewire(&mut self, doc: &Document) -> InitReport {
        let root = doc.root();
        self.tooltips = doc.all_with_attr_eq(root, "data-bs-toggle", "tooltip");
        self.popovers = doc.all_with_attr_eq(root, "data-bs-toggle", "popover");

        self.percentage = match (
            doc.by_id(calc::MARKS_OBTAINED_ID),
            doc.by_id(calc::TOTAL_MARKS_ID),
        ) {
            (Some(marks_input), Some(total_input)) => Some(PercentageBinding {
                marks_input,
                total_input,
            }),
            _ => None,
        };

        self.searches = doc
            .all_with_attr(root, "data-search-table")
            .into_iter()
            .filter_map(|input| {
                doc.attr(input, "data-search-table").map(|table_id| SearchBinding {
                    input,
                    table_id: table_id.to_string(),
                })
            })
            .collect();

        self.validated_forms = doc
            .all_with_attr(root, "data-validate")
            .into_iter()
            .filter(|&n| doc.tag(n) == "form")
            .collect();

        InitReport {
            tooltips: self.tooltips.len(),
            popovers: self.popovers.len(),
            searches: self.searches.len(),
            validated_forms: self.validated_forms.len(),
            percentage_bound: self.percentage.is_some(),
        }
    }

    /// Binds a form to an auto-save endpoint, replacing any earlier binding
    /// for the same form.
    pub fn register_autosave(&mut self, form: NodeId, endpoint: &str) {
        self.autosaves.retain(|b| b.form != form);
        self.autosaves.push(AutoSaveBinding {
            form,
            endpoint: endpoint.to_string(),
        });
    }

    /// Binds a search input to a table by id, replacing any earlier binding
    /// for the same input.
    pub fn register_search(&mut self, input: NodeId, table_id: &str) {
        self.searches.retain(|b| b.input != input);
        self.searches.push(SearchBinding {
            input,
            table_id: table_id.to_string(),
        });
    }

    pub fn search_for(&self, input: NodeId) -> Option<&SearchBinding> {
        self.searches.iter().find(|b| b.input == input)
    }

    pub fn percentage_watches(&self, target: NodeId) -> bool {
        self.percentage
            .as_ref()
            .map(|b| b.marks_input == target || b.total_input == target)
            .unwrap_or(false)
    }

    pub fn validates_on_submit(&self, form: NodeId) -> bool {
        self.validated_forms.contains(&form)
    }

    /// The auto-save binding whose form contains `target`, if any. The target
    /// itself may be the form.
    pub fn autosave_for(&self, doc: &Document, target: NodeId) -> Option<&AutoSaveBinding> {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if let Some(binding) = self.autosaves.iter().find(|b| b.form == node) {
                return Some(binding);
            }
            cursor = doc.parent(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSnapshot};

    fn page() -> Document {
        let snapshot: ElementSnapshot = serde_json::from_value(serde_json::json!({
            "tag": "body",
            "children": [
                {"tag": "button", "attrs": {"data-bs-toggle": "tooltip"}},
                {"tag": "button", "attrs": {"data-bs-toggle": "tooltip"}},
                {"tag": "a", "attrs": {"data-bs-toggle": "popover"}},
                {"tag": "input", "id": "rosterSearch", "attrs": {"data-search-table": "roster"}},
                {"tag": "input", "id": "id_marks_obtained"},
                {"tag": "input", "id": "id_total_marks"},
                {
                    "tag": "form",
                    "id": "attendanceForm",
                    "attrs": {"data-validate": "true"},
                    "children": [
                        {"tag": "div", "children": [
                            {"tag": "input", "id": "status", "attrs": {"name": "status"}}
                        ]}
                    ]
                }
            ]
        }))
        .expect("snapshot");
        Document::from_snapshot(&snapshot)
    }

    #[test]
    fn rewire_collects_every_marker() {
        let doc = page();
        let mut bindings = Bindings::default();
        let report = bindings.rewire(&doc);
        assert_eq!(report.tooltips, 2);
        assert_eq!(report.popovers, 1);
        assert_eq!(report.searches, 1);
        assert_eq!(report.validated_forms, 1);
        assert!(report.percentage_bound);

        let search = &bindings.searches[0];
        assert_eq!(search.table_id, "roster");
        let marks = doc.by_id("id_marks_obtained").expect("marks");
        assert!(bindings.percentage_watches(marks));
    }

    #[test]
    fn rescan_replaces_scan_owned_entries_but_keeps_autosaves() {
        let doc = page();
        let mut bindings = Bindings::default();
        bindings.rewire(&doc);
        let form = doc.by_id("attendanceForm").expect("form");
        bindings.register_autosave(form, "/api/attendance/save/");
        bindings.rewire(&doc);
        assert_eq!(bindings.autosaves.len(), 1);
        assert_eq!(bindings.tooltips.len(), 2);
    }

    #[test]
    fn autosave_lookup_walks_ancestors() {
        let doc = page();
        let mut bindings = Bindings::default();
        let form = doc.by_id("attendanceForm").expect("form");
        bindings.register_autosave(form, "/api/attendance/save/");

        let field = doc.by_id("status").expect("nested field");
        let hit = bindings.autosave_for(&doc, field).expect("binding");
        assert_eq!(hit.endpoint, "/api/attendance/save/");

        let outside = doc.by_id("rosterSearch").expect("outside field");
        assert!(bindings.autosave_for(&doc, outside).is_none());
    }

    #[test]
    fn rebinding_a_form_replaces_the_endpoint() {
        let doc = page();
        let mut bindings = Bindings::default();
        let form = doc.by_id("attendanceForm").expect("form");
        bindings.register_autosave(form, "/api/v1/save/");
        bindings.register_autosave(form, "/api/v2/save/");
        assert_eq!(bindings.autosaves.len(), 1);
        assert_eq!(bindings.autosaves[0].endpoint, "/api/v2/save/");
    }
}
