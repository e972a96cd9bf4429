use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable handle into the document arena. Removing a node tombstones its
/// slot, so handles held by bindings and timers never dangle.
pub type NodeId = usize;

/// Wire shape of a page snapshot as the host sends and receives it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_validity: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub value: String,
    pub checked: bool,
    pub display: Option<String>,
    pub custom_validity: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            display: None,
            custom_validity: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// The element tree of one loaded page. Slots are never reused within a
/// page's lifetime.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    root: NodeId,
}

impl Document {
    pub fn from_snapshot(snapshot: &ElementSnapshot) -> Document {
        let mut doc = Document {
            nodes: Vec::new(),
            root: 0,
        };
        doc.root = doc.build(snapshot, None);
        doc
    }

    fn build(&mut self, snapshot: &ElementSnapshot, parent: Option<NodeId>) -> NodeId {
        let node = self.alloc(Element {
            tag: snapshot.tag.clone(),
            id: snapshot.id.clone(),
            classes: snapshot.classes.clone(),
            attrs: snapshot.attrs.clone(),
            text: snapshot.text.clone().unwrap_or_default(),
            value: snapshot.value.clone().unwrap_or_default(),
            checked: snapshot.checked,
            display: snapshot.display.clone(),
            custom_validity: snapshot.custom_validity.clone().unwrap_or_default(),
            children: Vec::new(),
            parent,
        });
        for child in &snapshot.children {
            let child_id = self.build(child, Some(node));
            if let Some(el) = self.get_mut(node) {
                el.children.push(child_id);
            }
        }
        node
    }

    pub fn to_snapshot(&self) -> ElementSnapshot {
        self.snapshot_of(self.root)
    }

    fn snapshot_of(&self, node: NodeId) -> ElementSnapshot {
        let Some(el) = self.get(node) else {
            return ElementSnapshot::default();
        };
        ElementSnapshot {
            tag: el.tag.clone(),
            id: el.id.clone(),
            classes: el.classes.clone(),
            attrs: el.attrs.clone(),
            text: if el.text.is_empty() {
                None
            } else {
                Some(el.text.clone())
            },
            value: if el.value.is_empty() {
                None
            } else {
                Some(el.value.clone())
            },
            checked: el.checked,
            display: el.display.clone(),
            custom_validity: if el.custom_validity.is_empty() {
                None
            } else {
                Some(el.custom_validity.clone())
            },
            children: self
                .children(node)
                .iter()
                .map(|&c| self.snapshot_of(c))
                .collect(),
        }
    }

    fn alloc(&mut self, el: Element) -> NodeId {
        self.nodes.push(Some(el));
        self.nodes.len() - 1
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node).and_then(|slot| slot.as_mut())
    }

    pub fn alive(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Element::new(tag))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
    }

    /// Detaches the node from its parent and tombstones the whole subtree.
    pub fn remove(&mut self, node: NodeId) {
        let parent = self.get(node).and_then(|el| el.parent);
        if let Some(parent) = parent {
            if let Some(el) = self.get_mut(parent) {
                el.children.retain(|&c| c != node);
            }
        }
        let mut stack = vec![node];
        while let Some(next) = stack.pop() {
            if let Some(slot) = self.nodes.get_mut(next) {
                if let Some(el) = slot.take() {
                    stack.extend(el.children);
                }
            }
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|el| el.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Replaces the child order of `parent`. Used by the table sorter to
    /// reinsert rows; callers pass a permutation of the existing children.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        if let Some(el) = self.get_mut(parent) {
            el.children = children;
        }
    }

    /// All live descendants of `from` in document order, excluding `from`.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(from, &mut out);
        out
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(node) {
            if self.alive(child) {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }

    /// First element with the given id, in document order from the root.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        if self.get(self.root).and_then(|el| el.id.as_deref()) == Some(id) {
            return Some(self.root);
        }
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.get(n).and_then(|el| el.id.as_deref()) == Some(id))
    }

    pub fn all_with_class(&self, from: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    pub fn all_by_tag(&self, from: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&n| self.get(n).map(|el| el.tag == tag).unwrap_or(false))
            .collect()
    }

    pub fn first_by_tag(&self, from: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(from)
            .into_iter()
            .find(|&n| self.get(n).map(|el| el.tag == tag).unwrap_or(false))
    }

    pub fn all_with_attr_eq(&self, from: NodeId, name: &str, value: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&n| self.attr(n, name) == Some(value))
            .collect()
    }

    pub fn all_with_attr(&self, from: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&n| self.attr(n, name).is_some())
            .collect()
    }

    /// Insertion point for created banners: the first `body` element, or the
    /// root when the snapshot is a bare fragment.
    pub fn body(&self) -> NodeId {
        if self.get(self.root).map(|el| el.tag == "body").unwrap_or(false) {
            return self.root;
        }
        self.first_by_tag(self.root, "body").unwrap_or(self.root)
    }

    /// Own text plus descendant text in document order, single-space joined.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(el) = self.get(node) {
            if !el.text.is_empty() {
                parts.push(&el.text);
            }
        }
        for desc in self.descendants(node) {
            if let Some(el) = self.get(desc) {
                if !el.text.is_empty() {
                    parts.push(&el.text);
                }
            }
        }
        parts.join(" ")
    }

    pub fn tag(&self, node: NodeId) -> &str {
        self.get(node).map(|el| el.tag.as_str()).unwrap_or("")
    }

    pub fn value(&self, node: NodeId) -> &str {
        self.get(node).map(|el| el.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.get_mut(node) {
            el.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(el) = self.get_mut(node) {
            el.checked = checked;
        }
    }

    #[allow(dead_code)]
    pub fn checked(&self, node: NodeId) -> bool {
        self.get(node).map(|el| el.checked).unwrap_or(false)
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.get_mut(node) {
            el.text = text.to_string();
        }
    }

    pub fn set_display(&mut self, node: NodeId, display: Option<&str>) {
        if let Some(el) = self.get_mut(node) {
            el.display = display.map(|d| d.to_string());
        }
    }

    #[allow(dead_code)]
    pub fn display(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(|el| el.display.as_deref())
    }

    pub fn set_custom_validity(&mut self, node: NodeId, message: &str) {
        if let Some(el) = self.get_mut(node) {
            el.custom_validity = message.to_string();
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)
            .and_then(|el| el.attrs.get(name))
            .map(|v| v.as_str())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(node) {
            el.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.get_mut(node) {
            el.attrs.remove(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .map(|el| el.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        if let Some(el) = self.get_mut(node) {
            el.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.get_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    pub fn set_classes(&mut self, node: NodeId, classes: Vec<String>) {
        if let Some(el) = self.get_mut(node) {
            el.classes = classes;
        }
    }
}
