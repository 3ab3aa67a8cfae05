//! The inspector: introspection, labels and the lazy tree.
//!
//! An [`Inspector`] is an immutable value holding its [`InspectorOptions`]
//! and the realm's baseline root prototype (`Object.prototype`).  It carries
//! no other state; the only mutable state in a rendered tree is each
//! [`BranchNode`]'s own expansion flag.
//!
//! ```
//! use periscope_core::inspect::{Inspector, InspectorOptions, NodeList};
//! use periscope_core::objects::value::JsValue;
//! use periscope_core::realm::Realm;
//!
//! let realm = Realm::new();
//! let obj = realm.new_object();
//! obj.borrow_mut().set_property("b", JsValue::Smi(1)).unwrap();
//! obj.borrow_mut().set_property("a", JsValue::Smi(2)).unwrap();
//!
//! let inspector = Inspector::new(&realm, InspectorOptions::default());
//! let mut tree = NodeList::new();
//! inspector.view(&JsValue::Object(obj), &mut tree);
//!
//! let lines: Vec<String> = tree.iter().map(|n| n.label().to_string()).collect();
//! assert_eq!(lines, ["a: 2", "b: 1"]);
//! ```

pub mod classify;
pub mod fallback;
pub mod format;
pub mod introspect;
pub mod options;
pub mod render;
pub mod tree;

use std::rc::Rc;

pub use classify::{Classification, ValueClass, classify};
pub use fallback::DisplayFallback;
pub use format::{Label, TypeTag, format};
pub use introspect::{PropertyRecord, RecordKey};
pub use options::{AccessorPolicy, InspectorOptions, OptionsError, PrototypePolicy};
pub use tree::{BranchNode, ExpansionState, Mount, NodeList, TreeNode, TreePathError};

use crate::objects::js_object::JsObjectRef;
use crate::realm::Realm;

/// Entry point for inspecting values of one realm.
#[derive(Debug, Clone)]
pub struct Inspector {
    baseline: Option<JsObjectRef>,
    options: InspectorOptions,
}

impl Inspector {
    /// Creates an inspector whose baseline root prototype is the realm's
    /// `Object.prototype`.
    pub fn new(realm: &Realm, options: InspectorOptions) -> Self {
        Self {
            baseline: Some(Rc::clone(realm.object_prototype())),
            options,
        }
    }

    /// Creates an inspector with no baseline: every accessor is shown and
    /// every prototype link gets a record.
    pub fn without_baseline(options: InspectorOptions) -> Self {
        Self {
            baseline: None,
            options,
        }
    }

    pub fn options(&self) -> &InspectorOptions {
        &self.options
    }

    /// The baseline root prototype, if any.
    pub fn baseline(&self) -> Option<&JsObjectRef> {
        self.baseline.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::value::JsValue;

    #[test]
    fn test_inspector_holds_realm_baseline() {
        let realm = Realm::new();
        let inspector = Inspector::new(&realm, InspectorOptions::default());
        assert!(Rc::ptr_eq(inspector.baseline().unwrap(), realm.object_prototype()));
        assert_eq!(*inspector.options(), InspectorOptions::default());
    }

    #[test]
    fn test_without_baseline_shows_every_prototype() {
        let realm = Realm::new();
        let obj = realm.new_object();
        obj.borrow_mut().set_property("a", JsValue::Smi(1)).unwrap();
        let records = Inspector::without_baseline(InspectorOptions::default()).introspect(&obj);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].key, RecordKey::Prototype);
    }
}
