//! Type-tagged display labels.
//!
//! [`format`] is total: every step that can fail goes through a
//! `Result<String, DisplayFallback>` helper and the fallback text is shown
//! instead.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::classify::ValueClass;
use super::fallback::{DisplayFallback, or_fallback};
use super::introspect::RecordKey;
use crate::objects::js_object::{self, JsObjectRef, ObjectClass};
use crate::objects::js_proxy;
use crate::objects::property::PropertyKey;
use crate::objects::value::{JsValue, number_to_string};

/// The `typeof`-style tag attached to every label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Function,
    /// Every non-callable object, arrays and dates included.
    Object,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Function => "function",
            Self::Object => "object",
        }
    }
}

impl From<ValueClass> for TypeTag {
    fn from(class: ValueClass) -> Self {
        match class {
            ValueClass::Undefined => Self::Undefined,
            ValueClass::Null => Self::Null,
            ValueClass::String => Self::String,
            ValueClass::Number => Self::Number,
            ValueClass::Boolean => Self::Boolean,
            ValueClass::BigInt => Self::BigInt,
            ValueClass::Symbol => Self::Symbol,
            ValueClass::Callable => Self::Function,
            ValueClass::Date | ValueClass::Pattern | ValueClass::List | ValueClass::Object => {
                Self::Object
            }
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered record: key text, value text, type tag and enumerability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub key: String,
    pub value: String,
    pub type_tag: TypeTag,
    /// `false` marks the key for muted styling.  The record is still shown.
    pub enumerable: bool,
}

impl Label {
    /// Style classes for the key text: `label-key`, plus `noenum` when the
    /// record is not enumerable.
    pub fn key_class(&self) -> &'static str {
        if self.enumerable {
            "label-key"
        } else {
            "label-key noenum"
        }
    }

    /// Style classes for the value text: `label-value <type-tag>`.
    pub fn value_class(&self) -> String {
        format!("label-value {}", self.type_tag)
    }

    /// `true` when the label has no key (a view's root).
    pub fn is_anonymous(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            f.write_str(&self.value)
        } else {
            write!(f, "{}: {}", self.key, self.value)
        }
    }
}

/// Builds the label for one record.  Never fails and never recurses into
/// the contents of a composite value.
pub fn format(key: &RecordKey, value: &JsValue, enumerable: bool) -> Label {
    format_classified(key, value, ValueClass::of(value), enumerable)
}

/// [`format`] for a value whose class the caller already holds.
pub(crate) fn format_classified(
    key: &RecordKey,
    value: &JsValue,
    class: ValueClass,
    enumerable: bool,
) -> Label {
    Label {
        key: or_fallback(key.display()),
        value: value_text(class, value),
        type_tag: TypeTag::from(class),
        enumerable,
    }
}

fn value_text(class: ValueClass, value: &JsValue) -> String {
    match (class, value) {
        (ValueClass::Undefined, _) => "undefined".to_string(),
        (ValueClass::Null, _) => "null".to_string(),
        (ValueClass::String, JsValue::String(s)) => format!("\"{s}\""),
        (ValueClass::Callable, JsValue::Object(obj)) => format!("ƒ {}()", function_name(obj)),
        (ValueClass::Date, JsValue::Object(obj)) => or_fallback(date_text(obj)),
        (ValueClass::Pattern, JsValue::Object(obj)) => or_fallback(pattern_text(obj)),
        (ValueClass::List, JsValue::Object(obj)) => format!("Array[{}]", list_length(obj)),
        (_, JsValue::Object(obj)) => or_fallback(type_name(obj)),
        (_, other) => primitive_text(other),
    }
}

/// Default string conversion of a primitive.
fn primitive_text(value: &JsValue) -> String {
    match value {
        JsValue::Smi(n) => n.to_string(),
        JsValue::HeapNumber(n) => number_to_string(*n),
        JsValue::Symbol(sym) => sym.descriptive_string_lossy(),
        other => other.to_js_string().unwrap_or_default(),
    }
}

fn receiver_of(obj: &JsObjectRef) -> JsValue {
    JsValue::Object(Rc::clone(obj))
}

/// The function's `name` property, or `anonymous` when it is missing, empty,
/// not a string, or unreadable.
fn function_name(obj: &JsObjectRef) -> String {
    match js_object::get(obj, &PropertyKey::from("name"), &receiver_of(obj)) {
        Ok(JsValue::String(name)) if !name.is_empty() => name,
        Ok(_) => "anonymous".to_string(),
        Err(err) => {
            debug!(error = %err, "cannot read function name");
            "anonymous".to_string()
        }
    }
}

fn date_text(obj: &JsObjectRef) -> Result<String, DisplayFallback> {
    let target = js_proxy::resolve_target(obj).map_err(|_| DisplayFallback::InvalidDate)?;
    let date = match target.try_borrow().map(|o| o.class().clone()) {
        Ok(ObjectClass::Date(date)) => date,
        _ => return Err(DisplayFallback::InvalidDate),
    };
    date.to_iso_string().map_err(|_| DisplayFallback::InvalidDate)
}

fn pattern_text(obj: &JsObjectRef) -> Result<String, DisplayFallback> {
    let target = js_proxy::resolve_target(obj).map_err(|_| DisplayFallback::InvalidRegex)?;
    let regexp = match target.try_borrow().map(|o| o.class().clone()) {
        Ok(ObjectClass::RegExp(regexp)) => regexp,
        _ => return Err(DisplayFallback::InvalidRegex),
    };
    regexp
        .to_pattern_string()
        .map_err(|_| DisplayFallback::InvalidRegex)
}

fn list_length(obj: &JsObjectRef) -> usize {
    js_proxy::resolve_target(obj)
        .ok()
        .and_then(|target| target.try_borrow().ok().map(|o| o.array_length()))
        .unwrap_or(0)
}

/// `value.constructor.name`, read through the prototype chain with getters
/// invoked.
fn type_name(obj: &JsObjectRef) -> Result<String, DisplayFallback> {
    let receiver = receiver_of(obj);
    let ctor = js_object::get(obj, &PropertyKey::from("constructor"), &receiver)
        .map_err(|_| DisplayFallback::Object)?;
    let JsValue::Object(ctor) = ctor else {
        return Err(DisplayFallback::Object);
    };
    match js_object::get(&ctor, &PropertyKey::from("name"), &receiver_of(&ctor)) {
        Ok(JsValue::String(name)) if !name.is_empty() => Ok(name),
        _ => Err(DisplayFallback::Object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, EngineResult};
    use crate::objects::property::PropertyAttributes;
    use crate::realm::Realm;

    fn root(value: &JsValue) -> Label {
        format(&RecordKey::Root, value, true)
    }

    fn named(key: &str, value: &JsValue) -> Label {
        format(&RecordKey::Property(PropertyKey::from(key)), value, true)
    }

    fn boom(_args: &[JsValue]) -> EngineResult<JsValue> {
        Err(EngineError::Thrown("boom".to_string()))
    }

    // ── Dispatch table ────────────────────────────────────────────────────────

    #[test]
    fn test_undefined_and_null() {
        let label = root(&JsValue::Undefined);
        assert_eq!((label.value.as_str(), label.type_tag), ("undefined", TypeTag::Undefined));
        let label = root(&JsValue::Null);
        assert_eq!((label.value.as_str(), label.type_tag), ("null", TypeTag::Null));
    }

    #[test]
    fn test_string_is_quoted_verbatim() {
        let label = root(&JsValue::from("say \"hi\""));
        assert_eq!(label.value, "\"say \"hi\"\"");
        assert_eq!(label.type_tag, TypeTag::String);
    }

    #[test]
    fn test_numbers_booleans_bigints() {
        assert_eq!(root(&JsValue::Smi(42)).value, "42");
        assert_eq!(root(&JsValue::Smi(42)).type_tag, TypeTag::Number);
        assert_eq!(root(&JsValue::HeapNumber(1.5)).value, "1.5");
        assert_eq!(root(&JsValue::HeapNumber(f64::NEG_INFINITY)).value, "-Infinity");
        assert_eq!(root(&JsValue::Boolean(true)).value, "true");
        assert_eq!(root(&JsValue::BigInt(-9)).value, "-9");
        assert_eq!(root(&JsValue::BigInt(-9)).type_tag, TypeTag::BigInt);
    }

    #[test]
    fn test_symbol_value() {
        let realm = Realm::new();
        let label = root(&JsValue::Symbol(realm.new_symbol(Some("id"))));
        assert_eq!(label.value, "Symbol(id)");
        assert_eq!(label.type_tag, TypeTag::Symbol);
        let lone = root(&JsValue::Symbol(realm.new_symbol_utf16(&[0xDC00])));
        assert_eq!(lone.value, "Symbol(\u{FFFD})");
    }

    #[test]
    fn test_functions() {
        let realm = Realm::new();
        let named_fn = root(&JsValue::Object(realm.new_function("greet", 1)));
        assert_eq!(named_fn.value, "ƒ greet()");
        assert_eq!(named_fn.type_tag, TypeTag::Function);
        let anon = root(&JsValue::Object(realm.new_function("", 0)));
        assert_eq!(anon.value, "ƒ anonymous()");
    }

    #[test]
    fn test_function_with_throwing_name_getter() {
        let realm = Realm::new();
        let f = realm.new_function("hidden", 0);
        let getter = realm.new_native_function("get name", 0, boom);
        f.borrow_mut()
            .define_accessor("name", Some(getter), None, PropertyAttributes::CONFIGURABLE)
            .unwrap();
        assert_eq!(root(&JsValue::Object(f)).value, "ƒ anonymous()");
    }

    #[test]
    fn test_dates() {
        let realm = Realm::new();
        let date = root(&JsValue::Object(realm.new_date(1_614_834_367_089.0)));
        assert_eq!(date.value, "2021-03-04T05:06:07.089Z");
        assert_eq!(date.type_tag, TypeTag::Object);
        let invalid = root(&JsValue::Object(realm.new_date(f64::NAN)));
        assert_eq!(invalid.value, "Invalid Date");
    }

    #[test]
    fn test_dates_at_time_clip_limits() {
        let realm = Realm::new();
        let latest = root(&JsValue::Object(realm.new_date(8.64e15)));
        assert_eq!(latest.value, "+275760-09-13T00:00:00.000Z");
        let earliest = root(&JsValue::Object(realm.new_date(-8.64e15)));
        assert_eq!(earliest.value, "-271821-04-20T00:00:00.000Z");
    }

    #[test]
    fn test_patterns() {
        let realm = Realm::new();
        let re = root(&JsValue::Object(realm.new_regexp("a/b", "gi")));
        assert_eq!(re.value, "/a\\/b/gi");
        assert_eq!(re.type_tag, TypeTag::Object);
        let bad = root(&JsValue::Object(realm.new_regexp("a", "gg")));
        assert_eq!(bad.value, "/invalid_regex/");
    }

    #[test]
    fn test_arrays() {
        let realm = Realm::new();
        let arr = realm.new_array([JsValue::Smi(1), JsValue::Smi(2), JsValue::Smi(3)]);
        let label = root(&JsValue::Object(arr));
        assert_eq!(label.value, "Array[3]");
        assert_eq!(label.type_tag, TypeTag::Object);
    }

    #[test]
    fn test_composite_type_names() {
        let realm = Realm::new();
        assert_eq!(root(&JsValue::Object(realm.new_object())).value, "Object");
        assert_eq!(root(&JsValue::Object(realm.new_error("x"))).value, "Error");
        let (_, proto) = realm.define_class("Point", None);
        let point = realm.new_object_with_prototype(Some(&proto));
        assert_eq!(root(&JsValue::Object(point)).value, "Point");
    }

    #[test]
    fn test_type_name_fallbacks() {
        let realm = Realm::new();
        let bare = realm.new_object_with_prototype(None);
        assert_eq!(root(&JsValue::Object(bare)).value, "Object");

        let hostile = realm.new_object();
        let getter = realm.new_native_function("get constructor", 0, boom);
        hostile
            .borrow_mut()
            .define_accessor("constructor", Some(getter), None, PropertyAttributes::DEFAULT)
            .unwrap();
        assert_eq!(root(&JsValue::Object(hostile)).value, "Object");

        let odd = realm.new_object();
        odd.borrow_mut()
            .set_property("constructor", JsValue::Smi(3))
            .unwrap();
        assert_eq!(root(&JsValue::Object(odd)).value, "Object");
    }

    #[test]
    fn test_revoked_proxy_label() {
        let realm = Realm::new();
        let target = realm.new_array([]);
        let proxy = realm.new_proxy(&target);
        Realm::revoke_proxy(&proxy).unwrap();
        let label = root(&JsValue::Object(proxy));
        assert_eq!(label.value, "Object");
        assert_eq!(label.type_tag, TypeTag::Object);
    }

    // ── Keys and styling ──────────────────────────────────────────────────────

    #[test]
    fn test_display_omits_separator_for_root() {
        assert_eq!(root(&JsValue::Smi(1)).to_string(), "1");
        assert_eq!(named("a", &JsValue::Smi(1)).to_string(), "a: 1");
    }

    #[test]
    fn test_non_enumerable_key_class() {
        let key = RecordKey::Property(PropertyKey::from("length"));
        let label = format(&key, &JsValue::Smi(0), false);
        assert!(!label.enumerable);
        assert_eq!(label.key_class(), "label-key noenum");
        assert_eq!(label.value_class(), "label-value number");
        assert_eq!(named("x", &JsValue::Null).key_class(), "label-key");
    }

    #[test]
    fn test_unsafe_key_label() {
        let realm = Realm::new();
        let sym = realm.new_symbol_utf16(&[0xD800, 0x41]);
        let key = RecordKey::Getter(PropertyKey::Symbol(sym));
        let label = format(&key, &JsValue::Smi(1), true);
        assert_eq!(label.key, "[UnsafeKey]");
        assert_eq!(label.value, "1");
    }
}
