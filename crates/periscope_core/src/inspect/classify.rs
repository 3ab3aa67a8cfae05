//! Value classification: which values render as leaves and which expand.
//!
//! [`ValueClass::of`] walks an ordered chain of predicates and stops at the
//! first match.  Predicates that need to look inside an object (through a
//! proxy, say) are fallible; a failing check counts as `false` and the chain
//! moves on, so a revoked proxy lands in [`ValueClass::Object`].

use crate::objects::js_object::{JsObjectRef, ObjectClass};
use crate::objects::js_proxy;
use crate::objects::value::JsValue;

/// The closed set of value shapes the formatter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Callable,
    /// A Date object.  Composite, but rendered as a single timestamp.
    Date,
    /// A RegExp object.  Composite, but rendered as `/source/flags`.
    Pattern,
    /// An array.
    List,
    /// Any other object, including revoked proxies and errors.
    Object,
}

/// Leaf-or-branch decision for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Rendered as a single leaf; never introspected.
    Primitive,
    /// Rendered as a collapsible branch.
    Expandable,
}

type Predicate = fn(&JsValue) -> bool;

/// Evaluated top to bottom; the first predicate that holds wins.
const CHAIN: &[(ValueClass, Predicate)] = &[
    (ValueClass::Undefined, JsValue::is_undefined),
    (ValueClass::Null, JsValue::is_null),
    (ValueClass::String, JsValue::is_string),
    (ValueClass::Number, JsValue::is_number),
    (ValueClass::Boolean, JsValue::is_boolean),
    (ValueClass::BigInt, JsValue::is_bigint),
    (ValueClass::Symbol, JsValue::is_symbol),
    (ValueClass::Callable, is_callable),
    (ValueClass::Date, is_date),
    (ValueClass::Pattern, is_pattern),
    (ValueClass::List, is_list),
];

impl ValueClass {
    /// Classifies `value`.  Total and side-effect free.
    pub fn of(value: &JsValue) -> Self {
        CHAIN
            .iter()
            .find(|(_, holds)| holds(value))
            .map_or(Self::Object, |(class, _)| *class)
    }

    /// Returns `true` for classes rendered as leaves.
    pub fn is_primitive(self) -> bool {
        !matches!(self, Self::Callable | Self::List | Self::Object)
    }
}

impl From<ValueClass> for Classification {
    fn from(class: ValueClass) -> Self {
        if class.is_primitive() {
            Self::Primitive
        } else {
            Self::Expandable
        }
    }
}

/// Decides whether `value` renders as a leaf or as an expandable branch.
pub fn classify(value: &JsValue) -> Classification {
    Classification::from(ValueClass::of(value))
}

/// Runs `check` against the class of the object behind `value`, looking
/// through live proxies.  Any failure on the way yields `false`.
fn object_class_is(value: &JsValue, check: fn(&ObjectClass) -> bool) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    with_target_class(obj, check).unwrap_or(false)
}

fn with_target_class<R>(obj: &JsObjectRef, f: impl FnOnce(&ObjectClass) -> R) -> Option<R> {
    let target = js_proxy::resolve_target(obj).ok()?;
    let borrowed = target.try_borrow().ok()?;
    Some(f(borrowed.class()))
}

fn is_callable(value: &JsValue) -> bool {
    object_class_is(value, |class| matches!(class, ObjectClass::Function(_)))
}

fn is_date(value: &JsValue) -> bool {
    object_class_is(value, |class| matches!(class, ObjectClass::Date(_)))
}

fn is_pattern(value: &JsValue) -> bool {
    object_class_is(value, |class| matches!(class, ObjectClass::RegExp(_)))
}

fn is_list(value: &JsValue) -> bool {
    object_class_is(value, |class| matches!(class, ObjectClass::Array))
}
