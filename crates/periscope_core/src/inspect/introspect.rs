//! One-level introspection of a composite value into property records.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::Inspector;
use super::fallback::DisplayFallback;
use super::options::{AccessorPolicy, PrototypePolicy};
use crate::objects::js_function;
use crate::objects::js_object::JsObjectRef;
use crate::objects::js_proxy;
use crate::objects::property::{Property, PropertyKey, PropertySlot};
use crate::objects::value::JsValue;

/// Identifies what a [`PropertyRecord`] stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    /// The anonymous root of a view.  Displays as the empty string.
    Root,
    /// An own property.
    Property(PropertyKey),
    /// The getter function of an own accessor property (`get <key>`).
    Getter(PropertyKey),
    /// The setter function of an own accessor property (`set <key>`).
    Setter(PropertyKey),
    /// The prototype link (`[[Prototype]]`).
    Prototype,
}

impl RecordKey {
    /// Converts the key to display text.
    ///
    /// Symbol keys become `Symbol(<description>)`.  A description that is
    /// not well-formed UTF-16 fails with [`DisplayFallback::UnsafeKey`].
    pub fn display(&self) -> Result<String, DisplayFallback> {
        match self {
            Self::Root => Ok(String::new()),
            Self::Property(key) => key_text(key),
            Self::Getter(key) => key_text(key).map(|text| format!("get {text}")),
            Self::Setter(key) => key_text(key).map(|text| format!("set {text}")),
            Self::Prototype => Ok("[[Prototype]]".to_string()),
        }
    }

    /// Returns `true` for the anonymous root key.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display() {
            Ok(text) => f.write_str(&text),
            Err(fallback) => write!(f, "{fallback}"),
        }
    }
}

fn key_text(key: &PropertyKey) -> Result<String, DisplayFallback> {
    match key {
        PropertyKey::String(s) => Ok(s.clone()),
        PropertyKey::Symbol(sym) => sym
            .descriptive_string()
            .map_err(|_| DisplayFallback::UnsafeKey),
    }
}

/// One row of an introspected value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub key: RecordKey,
    /// The resolved value.  For a throwing getter this is the error message.
    pub value: JsValue,
    /// Drives ordering and styling only; never inclusion.
    pub enumerable: bool,
}

impl PropertyRecord {
    pub fn new(key: RecordKey, value: JsValue, enumerable: bool) -> Self {
        Self {
            key,
            value,
            enumerable,
        }
    }
}

/// Orders string keys by UTF-16 code units, the host language's default
/// sort order.  Not the same as `str::cmp` outside the BMP.
pub fn compare_string_keys(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

impl Inspector {
    /// Lists the own properties of `obj`, one level deep.
    ///
    /// String keys come first in UTF-16 order, then symbol keys in
    /// definition order, then (per [`PrototypePolicy`]) the `[[Prototype]]`
    /// record.  Accessors are invoked with `obj` as receiver; a getter that
    /// fails contributes its error message as the value.  This never fails:
    /// an object that cannot be read (a revoked proxy) yields no records.
    pub fn introspect(&self, obj: &JsObjectRef) -> Vec<PropertyRecord> {
        let target = match js_proxy::resolve_target(obj) {
            Ok(target) => target,
            Err(err) => {
                debug!(error = %err, "cannot introspect proxy");
                return Vec::new();
            }
        };

        // Snapshot first: getters may touch the object they live on.
        let (mut strings, symbols, prototype) = match target.try_borrow() {
            Ok(borrowed) => {
                let (symbols, strings): (Vec<Property>, Vec<Property>) = borrowed
                    .own_property_keys()
                    .iter()
                    .filter_map(|key| borrowed.get_own_property(key))
                    .partition(|prop| prop.key().is_symbol());
                (strings, symbols, borrowed.prototype().map(Rc::clone))
            }
            Err(_) => {
                debug!("object is mutably borrowed; skipping introspection");
                return Vec::new();
            }
        };
        strings.sort_by(|a, b| match (a.key().as_str(), b.key().as_str()) {
            (Some(a), Some(b)) => compare_string_keys(a, b),
            _ => Ordering::Equal,
        });

        let receiver = JsValue::Object(Rc::clone(obj));
        let is_baseline = self
            .baseline
            .as_ref()
            .is_some_and(|baseline| Rc::ptr_eq(baseline, &target));

        let mut records = Vec::with_capacity(strings.len() + symbols.len() + 1);
        for prop in strings.into_iter().chain(symbols) {
            let enumerable = prop.is_enumerable();
            match prop.slot() {
                PropertySlot::Data(value) => records.push(PropertyRecord::new(
                    RecordKey::Property(prop.key().clone()),
                    value.clone(),
                    enumerable,
                )),
                PropertySlot::Accessor { getter, setter } => {
                    if !is_baseline && self.is_baseline_accessor(prop.key(), getter, setter) {
                        continue;
                    }
                    let value = resolve_getter(prop.key(), getter.as_ref(), &receiver);
                    records.push(PropertyRecord::new(
                        RecordKey::Property(prop.key().clone()),
                        value,
                        enumerable,
                    ));
                    if self.options.accessor_policy == AccessorPolicy::Split {
                        if let Some(getter) = getter {
                            records.push(PropertyRecord::new(
                                RecordKey::Getter(prop.key().clone()),
                                JsValue::Object(Rc::clone(getter)),
                                enumerable,
                            ));
                        }
                        if let Some(setter) = setter {
                            records.push(PropertyRecord::new(
                                RecordKey::Setter(prop.key().clone()),
                                JsValue::Object(Rc::clone(setter)),
                                enumerable,
                            ));
                        }
                    }
                }
            }
        }

        if let Some(proto) = prototype {
            let skip = self.options.prototype_policy == PrototypePolicy::SkipBaseline
                && self
                    .baseline
                    .as_ref()
                    .is_some_and(|baseline| Rc::ptr_eq(baseline, &proto));
            if !skip {
                records.push(PropertyRecord::new(
                    RecordKey::Prototype,
                    JsValue::Object(proto),
                    false,
                ));
            }
        }
        records
    }

    /// `true` when the baseline root prototype owns an accessor under `key`
    /// whose getter and setter are both the very same function objects.
    fn is_baseline_accessor(
        &self,
        key: &PropertyKey,
        getter: &Option<JsObjectRef>,
        setter: &Option<JsObjectRef>,
    ) -> bool {
        if !self.options.filter_baseline_accessors {
            return false;
        }
        let Some(baseline) = &self.baseline else {
            return false;
        };
        let Ok(baseline) = baseline.try_borrow() else {
            return false;
        };
        match baseline.get_own_property(key).as_ref().map(Property::slot) {
            Some(PropertySlot::Accessor {
                getter: base_getter,
                setter: base_setter,
            }) => same_function(getter, base_getter) && same_function(setter, base_setter),
            _ => false,
        }
    }
}

fn same_function(a: &Option<JsObjectRef>, b: &Option<JsObjectRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn resolve_getter(key: &PropertyKey, getter: Option<&JsObjectRef>, receiver: &JsValue) -> JsValue {
    let Some(getter) = getter else {
        return JsValue::Undefined;
    };
    match js_function::call(getter, receiver, &[]) {
        Ok(value) => value,
        Err(err) => {
            debug!(%key, error = %err, "getter failed; showing its message");
            JsValue::String(err.message().to_string())
        }
    }
}
