//! JavaScript objects with ordered, attribute-carrying property storage.
//!
//! # Storage model
//!
//! Named properties (string and symbol keys) live in a [`SmallVec`] in
//! definition order; the first [`MAX_INLINE_PROPERTIES`] are stored inline
//! and larger objects spill to the heap.  Definition order matters: it is the
//! order in which symbol-keyed properties are reported.
//!
//! Arrays additionally keep their indexed elements in a separate sparse
//! backing store keyed by index, next to an explicit `length`.  Holes are
//! simply absent from the store, so they are not own properties, and the
//! non-enumerable `length` property is synthesised from the stored length.
//!
//! # Prototype chain
//!
//! Each `JsObject` optionally holds a reference-counted pointer to a prototype
//! object ([`JsObjectRef`]).  Lookups that may run user code ([`get`]) are
//! free functions over `JsObjectRef` so that no `RefCell` borrow is held
//! while a getter executes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::{EngineError, EngineResult};
use crate::objects::js_date::JsDate;
use crate::objects::js_function::{self, JsFunction};
use crate::objects::js_proxy::{self, JsProxy};
use crate::objects::js_regexp::JsRegExp;
use crate::objects::property::{Property, PropertyAttributes, PropertyKey, PropertySlot};
use crate::objects::value::JsValue;

/// Number of named properties stored inline before the property list spills
/// to the heap.
pub const MAX_INLINE_PROPERTIES: usize = 8;

/// Longest prototype chain [`get`] will walk before giving up.
pub const MAX_PROTOTYPE_CHAIN: usize = 4096;

/// Largest valid array length (ECMAScript §10.4.2): 2³² − 1.
pub const MAX_ARRAY_LENGTH: usize = u32::MAX as usize;

/// Shared, mutable handle to an object.
pub type JsObjectRef = Rc<RefCell<JsObject>>;

/// The internal slots that make an object more than an ordinary object.
#[derive(Debug, Clone)]
pub enum ObjectClass {
    /// An ordinary object.
    Ordinary,
    /// An Array exotic object; elements live in the element store.
    Array,
    /// A callable object.
    Function(JsFunction),
    /// A Date object.
    Date(JsDate),
    /// A RegExp object.
    RegExp(JsRegExp),
    /// An Error object (carries `[[ErrorData]]`).
    Error,
    /// A proxy exotic object.
    Proxy(JsProxy),
}

impl ObjectClass {
    /// The builtin tag used by `Object.prototype.toString`.
    pub fn builtin_tag(&self) -> &'static str {
        match self {
            Self::Ordinary | Self::Proxy(_) => "Object",
            Self::Array => "Array",
            Self::Function(_) => "Function",
            Self::Date(_) => "Date",
            Self::RegExp(_) => "RegExp",
            Self::Error => "Error",
        }
    }
}

/// A JavaScript object.
///
/// Holds its internal class, its own named properties, the array element
/// store and the prototype link.
#[derive(Debug)]
pub struct JsObject {
    class: ObjectClass,
    properties: SmallVec<[Property; MAX_INLINE_PROPERTIES]>,
    elements: BTreeMap<usize, JsValue>,
    length: usize,
    prototype: Option<JsObjectRef>,
}

impl JsObject {
    /// Creates an empty ordinary object with no prototype and no properties.
    pub fn new() -> Self {
        Self::new_with_class(ObjectClass::Ordinary)
    }

    /// Creates an empty object of the given class with no prototype.
    pub fn new_with_class(class: ObjectClass) -> Self {
        Self {
            class,
            properties: SmallVec::new(),
            elements: BTreeMap::new(),
            length: 0,
            prototype: None,
        }
    }

    /// Creates an empty ordinary object with the given prototype.
    pub fn with_prototype(prototype: JsObjectRef) -> Self {
        let mut obj = Self::new();
        obj.prototype = Some(prototype);
        obj
    }

    /// Wraps this object into a shared [`JsObjectRef`].
    pub fn into_ref(self) -> JsObjectRef {
        Rc::new(RefCell::new(self))
    }

    /// Returns this object's internal class.
    pub fn class(&self) -> &ObjectClass {
        &self.class
    }

    /// Returns this object's internal class mutably.
    pub fn class_mut(&mut self) -> &mut ObjectClass {
        &mut self.class
    }

    /// Returns `true` if this is an Array exotic object.
    pub fn is_array(&self) -> bool {
        matches!(self.class, ObjectClass::Array)
    }

    /// Returns `true` if this object has a `[[Call]]` internal method.
    ///
    /// Proxies are not looked through; see [`js_proxy::resolve_target`].
    pub fn is_callable(&self) -> bool {
        matches!(self.class, ObjectClass::Function(_))
    }

    /// Returns the prototype of this object, if any.
    pub fn prototype(&self) -> Option<&JsObjectRef> {
        self.prototype.as_ref()
    }

    /// Sets (or removes) the prototype of this object without any cycle
    /// check.  Prefer [`set_prototype_of`].
    pub fn set_prototype(&mut self, prototype: Option<JsObjectRef>) {
        self.prototype = prototype;
    }

    // ── Own property operations ───────────────────────────────────────────────

    /// ECMAScript §10.1.11.1 **OrdinaryOwnPropertyKeys**.
    ///
    /// Array-index keys in ascending order, then the remaining string keys in
    /// definition order, then symbol keys in definition order.
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut indices: Vec<usize> = self.elements.keys().copied().collect();
        let mut strings = Vec::new();
        let mut symbols = Vec::new();
        for prop in &self.properties {
            match prop.key() {
                key @ PropertyKey::Symbol(_) => symbols.push(key.clone()),
                key => match key.as_index() {
                    Some(idx) => indices.push(idx),
                    None => strings.push(key.clone()),
                },
            }
        }
        indices.sort_unstable();
        indices.dedup();

        let mut keys: Vec<PropertyKey> = indices
            .into_iter()
            .map(|idx| PropertyKey::String(idx.to_string()))
            .collect();
        if self.is_array() {
            keys.push(PropertyKey::from("length"));
        }
        keys.extend(strings);
        keys.extend(symbols);
        keys
    }

    /// ECMAScript §10.1.5 `[[GetOwnProperty]]`.
    ///
    /// Returns a snapshot of the own property named `key`, or `None`.
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<Property> {
        if self.is_array() {
            if let Some(idx) = key.as_index()
                && let Some(value) = self.elements.get(&idx)
            {
                return Some(Property::new(
                    key.clone(),
                    PropertySlot::Data(value.clone()),
                    PropertyAttributes::DEFAULT,
                ));
            }
            if key.as_str() == Some("length") {
                return Some(Property::new(
                    key.clone(),
                    PropertySlot::Data(length_value(self.length)),
                    PropertyAttributes::WRITABLE,
                ));
            }
        }
        self.properties.iter().find(|p| p.key() == key).cloned()
    }

    /// Returns `true` if this object has an own property named `key`.
    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        self.get_own_property(key).is_some()
    }

    /// Defines or redefines an own data property with explicit attributes.
    ///
    /// Array-index data keys on arrays go to the element store and always
    /// carry default attributes; indices past the end grow `length` and
    /// leave holes.  Redefining a
    /// non-configurable property, or an array's `length`, is a `TypeError`.
    pub fn define_own_property(
        &mut self,
        key: impl Into<PropertyKey>,
        value: JsValue,
        attributes: PropertyAttributes,
    ) -> EngineResult<()> {
        self.define_slot(key.into(), PropertySlot::Data(value), attributes)
    }

    /// Defines or redefines an own accessor property.
    pub fn define_accessor(
        &mut self,
        key: impl Into<PropertyKey>,
        getter: Option<JsObjectRef>,
        setter: Option<JsObjectRef>,
        attributes: PropertyAttributes,
    ) -> EngineResult<()> {
        self.define_slot(
            key.into(),
            PropertySlot::Accessor { getter, setter },
            attributes,
        )
    }

    fn define_slot(
        &mut self,
        key: PropertyKey,
        slot: PropertySlot,
        attributes: PropertyAttributes,
    ) -> EngineResult<()> {
        if self.is_array() {
            if key.as_str() == Some("length") {
                return Err(EngineError::TypeError(
                    "Cannot redefine property: length".to_string(),
                ));
            }
            if let Some(idx) = key.as_index() {
                if let PropertySlot::Data(value) = &slot {
                    if let Some(pos) = self.properties.iter().position(|p| p.key() == &key) {
                        if !self.properties[pos]
                            .attributes()
                            .contains(PropertyAttributes::CONFIGURABLE)
                        {
                            return Err(EngineError::TypeError(format!(
                                "Cannot redefine property: {key}"
                            )));
                        }
                        self.properties.remove(pos);
                    }
                    self.set_element(idx, value.clone());
                    return Ok(());
                }
                self.elements.remove(&idx);
                self.length = self.length.max(idx + 1);
            }
        }
        match self.properties.iter_mut().find(|p| p.key() == &key) {
            Some(existing) => {
                if !existing
                    .attributes()
                    .contains(PropertyAttributes::CONFIGURABLE)
                {
                    return Err(EngineError::TypeError(format!(
                        "Cannot redefine property: {key}"
                    )));
                }
                existing.set_slot(slot, attributes);
            }
            None => self.properties.push(Property::new(key, slot, attributes)),
        }
        Ok(())
    }

    /// Appends a property known not to exist yet.  Used while building
    /// fresh intrinsic objects, where redefinition checks cannot fail.
    pub(crate) fn init_property(
        &mut self,
        key: impl Into<PropertyKey>,
        slot: PropertySlot,
        attributes: PropertyAttributes,
    ) {
        self.properties.push(Property::new(key.into(), slot, attributes));
    }

    /// Simplified `[[Set]]` on an own property.
    ///
    /// Updates an existing writable data property or creates a new one with
    /// default attributes.  Setters are not invoked: assigning to an accessor
    /// or a read-only property is a `TypeError`.
    pub fn set_property(&mut self, key: impl Into<PropertyKey>, value: JsValue) -> EngineResult<()> {
        let key = key.into();
        if let Some(existing) = self.get_own_property(&key) {
            if existing.slot().is_accessor() {
                return Err(EngineError::TypeError(format!(
                    "Cannot assign to accessor property '{key}'"
                )));
            }
            if !existing.attributes().contains(PropertyAttributes::WRITABLE) {
                return Err(EngineError::TypeError(format!(
                    "Cannot assign to read only property '{key}'"
                )));
            }
            if self.is_array() {
                if let Some(idx) = key.as_index() {
                    self.set_element(idx, value);
                    return Ok(());
                }
                if key.as_str() == Some("length") {
                    return self.set_length(&value);
                }
            }
            if let Some(prop) = self.properties.iter_mut().find(|p| p.key() == &key) {
                prop.set_slot(PropertySlot::Data(value), existing.attributes());
            }
            return Ok(());
        }
        self.define_slot(key, PropertySlot::Data(value), PropertyAttributes::DEFAULT)
    }

    /// ECMAScript §10.1.10 `[[Delete]]`.
    ///
    /// Returns `false` if the property exists and is non-configurable.
    pub fn delete_own_property(&mut self, key: &PropertyKey) -> bool {
        if self.is_array()
            && let Some(idx) = key.as_index()
            && self.elements.remove(&idx).is_some()
        {
            return true;
        }
        match self.properties.iter().position(|p| p.key() == key) {
            None => true,
            Some(pos)
                if !self.properties[pos]
                    .attributes()
                    .contains(PropertyAttributes::CONFIGURABLE) =>
            {
                false
            }
            Some(pos) => {
                self.properties.remove(pos);
                true
            }
        }
    }

    /// Array `length` assignment (§10.4.2.4 ArraySetLength).
    ///
    /// Shrinking deletes the elements at or past the new length.  A
    /// non-configurable index property in the way stops the truncation just
    /// above it and is a `TypeError`.
    fn set_length(&mut self, value: &JsValue) -> EngineResult<()> {
        let new_len = match value {
            JsValue::Smi(n) => usize::try_from(*n).ok(),
            JsValue::HeapNumber(n)
                if n.fract() == 0.0 && (0.0..=MAX_ARRAY_LENGTH as f64).contains(n) =>
            {
                Some(*n as usize)
            }
            _ => None,
        }
        .ok_or_else(|| EngineError::RangeError("Invalid array length".to_string()))?;

        if new_len < self.length {
            let pinned = self
                .properties
                .iter()
                .filter(|p| !p.attributes().contains(PropertyAttributes::CONFIGURABLE))
                .filter_map(|p| p.key().as_index())
                .filter(|&idx| idx >= new_len)
                .max();
            let floor = pinned.map_or(new_len, |idx| idx + 1);
            self.properties
                .retain(|p| p.key().as_index().is_none_or(|idx| idx < floor));
            self.elements.retain(|&idx, _| idx < floor);
            self.length = floor;
            if let Some(idx) = pinned {
                return Err(EngineError::TypeError(format!(
                    "Cannot delete property '{idx}' of [object Array]"
                )));
            }
        } else {
            self.length = new_len;
        }
        Ok(())
    }

    // ── Indexed element operations ────────────────────────────────────────────

    /// Returns the element at `index`, or [`JsValue::Undefined`] for a hole.
    pub fn get_element(&self, index: usize) -> JsValue {
        self.elements
            .get(&index)
            .cloned()
            .unwrap_or(JsValue::Undefined)
    }

    /// Stores the element at `index`.  Writing past the end grows `length`
    /// and leaves the skipped indices as holes.
    ///
    /// Callers pass array indices (below [`MAX_ARRAY_LENGTH`]).
    pub fn set_element(&mut self, index: usize, value: JsValue) {
        self.elements.insert(index, value);
        self.length = self.length.max(index + 1);
    }

    /// Appends `value` at `length` and returns the new length.
    pub fn push_element(&mut self, value: JsValue) -> usize {
        self.set_element(self.length, value);
        self.length
    }

    /// Returns the array's `length`, holes included.
    pub fn array_length(&self) -> usize {
        self.length
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

fn length_value(len: usize) -> JsValue {
    match i32::try_from(len) {
        Ok(n) => JsValue::Smi(n),
        Err(_) => JsValue::HeapNumber(len as f64),
    }
}

fn busy() -> EngineError {
    EngineError::Internal("object is being mutated".to_string())
}

// ──────────────────────────────────────────────────────────────────────────────
// Operations that may run user code
// ──────────────────────────────────────────────────────────────────────────────

/// ECMAScript §10.1.8 `[[Get]]`.
///
/// Walks the prototype chain from `obj` (looking through live proxies) and
/// returns the value of `key`.  Accessors are invoked with `receiver` as
/// `this`; a missing getter yields `undefined`.  Errors raised by a getter,
/// or by a revoked proxy on the way, are returned unchanged.
pub fn get(obj: &JsObjectRef, key: &PropertyKey, receiver: &JsValue) -> EngineResult<JsValue> {
    let mut current = Rc::clone(obj);
    for _ in 0..MAX_PROTOTYPE_CHAIN {
        let target = js_proxy::resolve_target(&current)?;
        let (own, next) = {
            let borrowed = target.try_borrow().map_err(|_| busy())?;
            (
                borrowed.get_own_property(key),
                borrowed.prototype().map(Rc::clone),
            )
        };
        match own.as_ref().map(Property::slot) {
            Some(PropertySlot::Data(value)) => return Ok(value.clone()),
            Some(PropertySlot::Accessor { getter, .. }) => {
                return match getter {
                    Some(getter) => js_function::call(getter, receiver, &[]),
                    None => Ok(JsValue::Undefined),
                };
            }
            None => {}
        }
        match next {
            Some(proto) => current = proto,
            None => return Ok(JsValue::Undefined),
        }
    }
    Err(EngineError::RangeError(
        "Maximum prototype chain length exceeded".to_string(),
    ))
}

/// ECMAScript §10.1.1 `[[GetPrototypeOf]]`, looking through proxies.
pub fn get_prototype_of(obj: &JsObjectRef) -> EngineResult<Option<JsObjectRef>> {
    let target = js_proxy::resolve_target(obj)?;
    let borrowed = target.try_borrow().map_err(|_| busy())?;
    Ok(borrowed.prototype().map(Rc::clone))
}

/// ECMAScript §10.1.2 `[[SetPrototypeOf]]`.
///
/// Rejects a prototype whose own chain already reaches `obj`.
pub fn set_prototype_of(obj: &JsObjectRef, proto: Option<JsObjectRef>) -> EngineResult<()> {
    let mut cursor = proto.as_ref().map(Rc::clone);
    while let Some(p) = cursor {
        if Rc::ptr_eq(&p, obj) {
            return Err(EngineError::TypeError("Cyclic __proto__ value".to_string()));
        }
        cursor = p.try_borrow().map_err(|_| busy())?.prototype().map(Rc::clone);
    }
    obj.try_borrow_mut().map_err(|_| busy())?.set_prototype(proto);
    Ok(())
}
