//! The lazy tree: one level per [`Inspector::view`] call, deeper levels on
//! demand.
//!
//! A [`Mount`] is whatever container the presentation layer owns.  `view`
//! clears it and appends one [`TreeNode`] per record.  Expandable records
//! become [`BranchNode`]s that hold their value and an empty child
//! [`NodeList`]; [`BranchNode::expand`] fills it exactly once.  Nothing
//! deeper than the requested level is ever built, so a value that contains
//! itself costs one level of work per expansion.

use thiserror::Error;
use tracing::trace;

use super::Inspector;
use super::classify::{Classification, ValueClass};
use super::format::{Label, format_classified};
use super::introspect::{PropertyRecord, RecordKey};
use crate::objects::value::JsValue;

/// A container the tree builder renders into.
pub trait Mount {
    /// Removes all previously appended nodes and any summary.
    fn clear(&mut self);

    /// Appends a rendered node.
    fn append(&mut self, node: TreeNode);

    /// Receives the label of an expandable root value, shown above its
    /// records.  Ignored by default.
    fn set_summary(&mut self, _label: Label) {}
}

/// Expansion state of a branch.  `Expanded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    Collapsed,
    Expanded,
}

/// A rendered node.
#[derive(Debug)]
pub enum TreeNode {
    /// A primitive value; no children.
    Leaf(Label),
    /// An expandable value.
    Branch(BranchNode),
}

impl TreeNode {
    /// The node's label (a branch's header).
    pub fn label(&self) -> &Label {
        match self {
            Self::Leaf(label) => label,
            Self::Branch(branch) => branch.header(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn as_branch(&self) -> Option<&BranchNode> {
        match self {
            Self::Branch(branch) => Some(branch),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_branch_mut(&mut self) -> Option<&mut BranchNode> {
        match self {
            Self::Branch(branch) => Some(branch),
            Self::Leaf(_) => None,
        }
    }
}

/// A collapsible node: always-visible header, captured value, and a child
/// list populated on first expansion.
#[derive(Debug)]
pub struct BranchNode {
    header: Label,
    value: JsValue,
    state: ExpansionState,
    children: NodeList,
}

impl BranchNode {
    fn new(header: Label, value: JsValue) -> Self {
        Self {
            header,
            value,
            state: ExpansionState::Collapsed,
            children: NodeList::default(),
        }
    }

    pub fn header(&self) -> &Label {
        &self.header
    }

    /// The value this branch expands into.
    pub fn value(&self) -> &JsValue {
        &self.value
    }

    pub fn state(&self) -> ExpansionState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == ExpansionState::Expanded
    }

    /// Child nodes.  Empty until the first [`expand`][Self::expand].
    pub fn children(&self) -> &NodeList {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut NodeList {
        &mut self.children
    }

    /// Renders the captured value into the child list.
    ///
    /// Returns `true` on the Collapsed to Expanded transition.  Later calls
    /// leave the children (and any expansion below them) untouched and
    /// return `false`.
    pub fn expand(&mut self, inspector: &Inspector) -> bool {
        if self.state == ExpansionState::Expanded {
            return false;
        }
        inspector.view(&self.value, &mut self.children);
        self.state = ExpansionState::Expanded;
        true
    }
}

/// An invalid path passed to [`NodeList::expand_path`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreePathError {
    #[error("empty expansion path")]
    Empty,

    #[error("no node {index} at depth {depth} (level has {len} nodes)")]
    OutOfRange {
        depth: usize,
        index: usize,
        len: usize,
    },

    #[error("node {index} at depth {depth} is a leaf")]
    NotABranch { depth: usize, index: usize },
}

/// The in-memory [`Mount`]: an ordered list of nodes plus an optional
/// summary label for an expandable root.
#[derive(Debug, Default)]
pub struct NodeList {
    summary: Option<Label>,
    nodes: Vec<TreeNode>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root label published by [`Inspector::view`] for an expandable
    /// value.
    pub fn summary(&self) -> Option<&Label> {
        self.summary.as_ref()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TreeNode> {
        self.nodes.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeNode> {
        self.nodes.iter()
    }

    /// Expands every branch along `path` (node indices, one per level) and
    /// returns the last one.  Branches already expanded are left as is.
    pub fn expand_path(
        &mut self,
        inspector: &Inspector,
        path: &[usize],
    ) -> Result<&mut BranchNode, TreePathError> {
        self.expand_path_at(inspector, path, 0)
    }

    fn expand_path_at(
        &mut self,
        inspector: &Inspector,
        path: &[usize],
        depth: usize,
    ) -> Result<&mut BranchNode, TreePathError> {
        let Some((&index, rest)) = path.split_first() else {
            return Err(TreePathError::Empty);
        };
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(TreePathError::OutOfRange { depth, index, len })?;
        let TreeNode::Branch(branch) = node else {
            return Err(TreePathError::NotABranch { depth, index });
        };
        branch.expand(inspector);
        if rest.is_empty() {
            Ok(branch)
        } else {
            branch.children.expand_path_at(inspector, rest, depth + 1)
        }
    }
}

impl Mount for NodeList {
    fn clear(&mut self) {
        self.summary = None;
        self.nodes.clear();
    }

    fn append(&mut self, node: TreeNode) {
        self.nodes.push(node);
    }

    fn set_summary(&mut self, label: Label) {
        self.summary = Some(label);
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a TreeNode;
    type IntoIter = std::slice::Iter<'a, TreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl Inspector {
    /// Replaces the contents of `mount` with the first level of `value`.
    ///
    /// A primitive renders as one leaf with an empty key.  An expandable
    /// value publishes its own label via [`Mount::set_summary`], then one
    /// node per record: enumerable records first, each group in
    /// introspection order.
    pub fn view<M: Mount + ?Sized>(&self, value: &JsValue, mount: &mut M) {
        mount.clear();
        let class = ValueClass::of(value);
        let root = format_classified(&RecordKey::Root, value, class, true);
        let obj = match (Classification::from(class), value.as_object()) {
            (Classification::Expandable, Some(obj)) => obj,
            _ => {
                mount.append(TreeNode::Leaf(root));
                return;
            }
        };

        mount.set_summary(root);
        let records = self.introspect(obj);
        trace!(records = records.len(), "rendering level");
        let (shown, hidden): (Vec<PropertyRecord>, Vec<PropertyRecord>) =
            records.into_iter().partition(|record| record.enumerable);
        for record in shown.into_iter().chain(hidden) {
            mount.append(render_record(record));
        }
    }
}

fn render_record(record: PropertyRecord) -> TreeNode {
    let class = ValueClass::of(&record.value);
    let label = format_classified(&record.key, &record.value, class, record.enumerable);
    match Classification::from(class) {
        Classification::Primitive => TreeNode::Leaf(label),
        Classification::Expandable => TreeNode::Branch(BranchNode::new(label, record.value)),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::inspect::options::{InspectorOptions, PrototypePolicy};
    use crate::objects::property::PropertyAttributes;
    use crate::realm::Realm;

    fn inspector(realm: &Realm) -> Inspector {
        Inspector::new(realm, InspectorOptions::default())
    }

    fn texts(list: &NodeList) -> Vec<String> {
        list.iter().map(|node| node.label().to_string()).collect()
    }

    #[derive(Default)]
    struct CountingMount {
        clears: usize,
        appended: usize,
    }

    impl Mount for CountingMount {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn append(&mut self, _node: TreeNode) {
            self.appended += 1;
        }
    }

    // ── view ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_primitive_renders_single_leaf() {
        let realm = Realm::new();
        let mut list = NodeList::new();
        inspector(&realm).view(&JsValue::from("hi"), &mut list);
        assert_eq!(list.len(), 1);
        assert!(list.get(0).unwrap().is_leaf());
        assert_eq!(list.get(0).unwrap().label().key, "");
        assert!(list.summary().is_none());
    }

    #[test]
    fn test_record_nodes_follow_value_class() {
        let realm = Realm::new();
        let obj = realm.new_object();
        {
            let mut o = obj.borrow_mut();
            o.set_property("arr", JsValue::Object(realm.new_array([JsValue::Smi(1)])))
                .unwrap();
            o.set_property("d", JsValue::Object(realm.new_date(0.0))).unwrap();
            o.set_property("f", JsValue::Object(realm.new_function("f", 0)))
                .unwrap();
            o.set_property("n", JsValue::Smi(1)).unwrap();
        }
        let mut list = NodeList::new();
        inspector(&realm).view(&JsValue::Object(obj), &mut list);

        let kinds: Vec<(String, bool, &str)> = list
            .iter()
            .map(|node| {
                let label = node.label();
                (label.key.clone(), node.is_leaf(), label.type_tag.as_str())
            })
            .collect();
        assert_eq!(
            kinds,
            [
                ("arr".to_string(), false, "object"),
                ("d".to_string(), true, "object"),
                ("f".to_string(), false, "function"),
                ("n".to_string(), true, "number"),
            ]
        );
        let arr = list.get(0).unwrap().as_branch().unwrap();
        assert_eq!(arr.header().value, "Array[1]");
    }

    #[test]
    fn test_view_clears_previous_content() {
        let realm = Realm::new();
        let insp = inspector(&realm);
        let mut list = NodeList::new();
        let obj = realm.new_object();
        obj.borrow_mut().set_property("a", JsValue::Smi(1)).unwrap();
        insp.view(&JsValue::Object(obj), &mut list);
        assert!(list.summary().is_some());
        insp.view(&JsValue::Smi(7), &mut list);
        assert_eq!(texts(&list), ["7"]);
        assert!(list.summary().is_none());
    }

    #[test]
    fn test_custom_mount_without_summary() {
        let realm = Realm::new();
        let obj = realm.new_object();
        obj.borrow_mut().set_property("a", JsValue::Smi(1)).unwrap();
        obj.borrow_mut().set_property("b", JsValue::Smi(2)).unwrap();
        let mut mount = CountingMount::default();
        inspector(&realm).view(&JsValue::Object(obj), &mut mount);
        assert_eq!((mount.clears, mount.appended), (1, 2));
    }

    #[test]
    fn test_enumerable_records_render_first() {
        let realm = Realm::new();
        let obj = realm.new_object();
        {
            let mut o = obj.borrow_mut();
            o.define_own_property("a", JsValue::Smi(1), PropertyAttributes::HIDDEN)
                .unwrap();
            o.set_property("b", JsValue::Smi(2)).unwrap();
            o.define_own_property("c", JsValue::Smi(3), PropertyAttributes::HIDDEN)
                .unwrap();
            o.set_property("d", JsValue::Smi(4)).unwrap();
        }
        let mut list = NodeList::new();
        inspector(&realm).view(&JsValue::Object(obj), &mut list);
        assert_eq!(texts(&list), ["b: 2", "d: 4", "a: 1", "c: 3"]);
    }

    #[test]
    fn test_expandable_records_become_collapsed_branches() {
        let realm = Realm::new();
        let obj = realm.new_object();
        let inner = realm.new_array([JsValue::Smi(1)]);
        obj.borrow_mut()
            .set_property("items", JsValue::Object(inner))
            .unwrap();
        let mut list = NodeList::new();
        inspector(&realm).view(&JsValue::Object(obj), &mut list);
        let branch = list.get(0).unwrap().as_branch().unwrap();
        assert_eq!(branch.header().to_string(), "items: Array[1]");
        assert_eq!(branch.state(), ExpansionState::Collapsed);
        assert!(branch.children().is_empty());
    }

    // ── Expansion ─────────────────────────────────────────────────────────────

    #[test]
    fn test_expand_is_one_shot() {
        let realm = Realm::new();
        let insp = inspector(&realm);
        let obj = realm.new_object();
        let inner = realm.new_object();
        inner.borrow_mut().set_property("x", JsValue::Smi(1)).unwrap();
        obj.borrow_mut()
            .set_property("inner", JsValue::Object(Rc::clone(&inner)))
            .unwrap();
        let mut list = NodeList::new();
        insp.view(&JsValue::Object(obj), &mut list);

        let branch = list.get_mut(0).unwrap().as_branch_mut().unwrap();
        assert!(branch.expand(&insp));
        assert!(branch.is_expanded());
        assert_eq!(texts(branch.children()), ["x: 1"]);

        inner.borrow_mut().set_property("y", JsValue::Smi(2)).unwrap();
        assert!(!branch.expand(&insp));
        assert_eq!(texts(branch.children()), ["x: 1"]);
    }

    #[test]
    fn test_expand_path() {
        let realm = Realm::new();
        let insp = inspector(&realm);
        let leaf_holder = realm.new_object();
        leaf_holder
            .borrow_mut()
            .set_property("deep", JsValue::Smi(3))
            .unwrap();
        let middle = realm.new_object();
        middle
            .borrow_mut()
            .set_property("next", JsValue::Object(leaf_holder))
            .unwrap();
        let root = realm.new_object();
        root.borrow_mut()
            .set_property("next", JsValue::Object(middle))
            .unwrap();
        let mut list = NodeList::new();
        insp.view(&JsValue::Object(root), &mut list);

        let branch = list.expand_path(&insp, &[0, 0]).unwrap();
        assert_eq!(texts(branch.children()), ["deep: 3"]);
        assert!(list.get(0).unwrap().as_branch().unwrap().is_expanded());
    }

    #[test]
    fn test_expand_path_errors() {
        let realm = Realm::new();
        let insp = inspector(&realm);
        let obj = realm.new_object();
        obj.borrow_mut().set_property("n", JsValue::Smi(1)).unwrap();
        let mut list = NodeList::new();
        insp.view(&JsValue::Object(obj), &mut list);

        assert_eq!(list.expand_path(&insp, &[]).unwrap_err(), TreePathError::Empty);
        assert_eq!(
            list.expand_path(&insp, &[4]).unwrap_err(),
            TreePathError::OutOfRange {
                depth: 0,
                index: 4,
                len: 1
            }
        );
        assert_eq!(
            list.expand_path(&insp, &[0]).unwrap_err(),
            TreePathError::NotABranch { depth: 0, index: 0 }
        );
    }

    #[test]
    fn test_prototype_branch_expands_into_prototype() {
        let realm = Realm::new();
        let options =
            InspectorOptions::default().with_prototype_policy(PrototypePolicy::Always);
        let insp = Inspector::new(&realm, options);
        let mut list = NodeList::new();
        insp.view(&JsValue::Object(realm.new_object()), &mut list);
        assert_eq!(texts(&list), ["[[Prototype]]: Object"]);
        let proto = list.expand_path(&insp, &[0]).unwrap();
        let children = texts(proto.children());
        assert!(children.contains(&"constructor: ƒ Object()".to_string()));
        assert!(children.contains(&"__proto__: null".to_string()));
    }
}
