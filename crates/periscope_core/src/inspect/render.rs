//! Presentation of a [`NodeList`] as indented text or as HTML markup.
//!
//! Only branches that have been expanded show their children; a collapsed
//! branch renders its header alone.

use super::format::Label;
use super::tree::{NodeList, TreeNode};

const INDENT: &str = "  ";

/// Renders the tree as indented text, one label per line.
///
/// Branches are marked `▸` (collapsed) or `▾` (expanded).  An expandable
/// root's summary label comes first, with its records indented below it.
///
/// ```text
/// Object
///   a: 2
///   ▾ inner: Object
///     x: 1
///   ▸ list: Array[3]
/// ```
pub fn render_text(list: &NodeList) -> String {
    let mut out = String::new();
    let depth = match list.summary() {
        Some(summary) => {
            out.push_str(&summary.to_string());
            out.push('\n');
            1
        }
        None => 0,
    };
    text_level(list, depth, &mut out);
    out
}

fn text_level(list: &NodeList, depth: usize, out: &mut String) {
    for node in list {
        out.push_str(&INDENT.repeat(depth));
        match node {
            TreeNode::Leaf(label) => out.push_str(&label.to_string()),
            TreeNode::Branch(branch) => {
                out.push_str(if branch.is_expanded() { "▾ " } else { "▸ " });
                out.push_str(&branch.header().to_string());
            }
        }
        out.push('\n');
        if let TreeNode::Branch(branch) = node
            && branch.is_expanded()
        {
            text_level(branch.children(), depth + 1, out);
        }
    }
}

/// Renders the tree as HTML using the `tree`, `tree-head`, `tree-body`,
/// `tree-child`, `label-key`, `noenum` and `label-value <type>` classes.
///
/// Leaves become `<div class="tree-child">`; branches become
/// `<details class="tree">` with a `<summary class="tree-head">` header and
/// a `<div class="tree-body">` holding the children (`open` once expanded).
/// A root summary is emitted as `<div class="tree-summary">`.
pub fn render_markup(list: &NodeList) -> String {
    let mut out = String::new();
    if let Some(summary) = list.summary() {
        out.push_str("<div class=\"tree-summary\">");
        out.push_str(&label_markup(summary));
        out.push_str("</div>");
    }
    markup_level(list, &mut out);
    out
}

fn markup_level(list: &NodeList, out: &mut String) {
    for node in list {
        match node {
            TreeNode::Leaf(label) => {
                out.push_str("<div class=\"tree-child\">");
                out.push_str(&label_markup(label));
                out.push_str("</div>");
            }
            TreeNode::Branch(branch) => {
                out.push_str(if branch.is_expanded() {
                    "<details class=\"tree\" open>"
                } else {
                    "<details class=\"tree\">"
                });
                out.push_str("<summary class=\"tree-head\">");
                out.push_str(&label_markup(branch.header()));
                out.push_str("</summary><div class=\"tree-body\">");
                markup_level(branch.children(), out);
                out.push_str("</div></details>");
            }
        }
    }
}

fn label_markup(label: &Label) -> String {
    let value = format!(
        "<span class=\"{}\">{}</span>",
        label.value_class(),
        escape(&label.value)
    );
    if label.is_anonymous() {
        return value;
    }
    format!(
        "<span class=\"{}\">{}</span>: {value}",
        label.key_class(),
        escape(&label.key)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{Inspector, InspectorOptions};
    use crate::objects::property::PropertyAttributes;
    use crate::objects::value::JsValue;
    use crate::realm::Realm;

    fn sample(realm: &Realm) -> JsValue {
        let obj = realm.new_object();
        let inner = realm.new_object();
        inner.borrow_mut().set_property("x", JsValue::Smi(1)).unwrap();
        {
            let mut o = obj.borrow_mut();
            o.set_property("a", JsValue::Smi(2)).unwrap();
            o.set_property("inner", JsValue::Object(inner)).unwrap();
            o.set_property(
                "list",
                JsValue::Object(realm.new_array([JsValue::Null, JsValue::Null, JsValue::Null])),
            )
            .unwrap();
        }
        JsValue::Object(obj)
    }

    #[test]
    fn test_render_text() {
        let realm = Realm::new();
        let insp = Inspector::new(&realm, InspectorOptions::default());
        let mut tree = NodeList::new();
        insp.view(&sample(&realm), &mut tree);
        tree.expand_path(&insp, &[1]).unwrap();
        assert_eq!(
            render_text(&tree),
            "Object\n  a: 2\n  ▾ inner: Object\n    x: 1\n  ▸ list: Array[3]\n"
        );
    }

    #[test]
    fn test_render_text_primitive() {
        let realm = Realm::new();
        let insp = Inspector::new(&realm, InspectorOptions::default());
        let mut tree = NodeList::new();
        insp.view(&JsValue::Smi(42), &mut tree);
        assert_eq!(render_text(&tree), "42\n");
    }

    #[test]
    fn test_render_markup_leaf() {
        let realm = Realm::new();
        let insp = Inspector::new(&realm, InspectorOptions::default());
        let mut tree = NodeList::new();
        insp.view(&JsValue::from("<b>"), &mut tree);
        assert_eq!(
            render_markup(&tree),
            "<div class=\"tree-child\"><span class=\"label-value string\">&quot;&lt;b&gt;&quot;</span></div>"
        );
    }

    #[test]
    fn test_render_markup_branches_and_noenum() {
        let realm = Realm::new();
        let insp = Inspector::new(&realm, InspectorOptions::default());
        let obj = realm.new_object();
        let inner = realm.new_object();
        obj.borrow_mut()
            .define_own_property("h", JsValue::Object(inner), PropertyAttributes::HIDDEN)
            .unwrap();
        let mut tree = NodeList::new();
        insp.view(&JsValue::Object(obj), &mut tree);
        let collapsed = render_markup(&tree);
        assert_eq!(
            collapsed,
            "<div class=\"tree-summary\"><span class=\"label-value object\">Object</span></div>\
             <details class=\"tree\"><summary class=\"tree-head\">\
             <span class=\"label-key noenum\">h</span>: <span class=\"label-value object\">Object</span>\
             </summary><div class=\"tree-body\"></div></details>"
        );
        tree.expand_path(&insp, &[0]).unwrap();
        assert!(render_markup(&tree).contains("<details class=\"tree\" open>"));
    }
}
