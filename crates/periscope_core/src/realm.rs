//! The realm: intrinsic prototypes and the factory for inspectable values.
//!
//! A [`Realm`] owns the handful of intrinsics the inspector cares about:
//! `Object.prototype` (the *baseline root prototype*, carrying the shared
//! `__proto__` accessor), and the prototypes of functions, arrays, dates,
//! regular expressions and errors, each wired to a named constructor so that
//! `value.constructor.name` resolves the way it does in a browser.
//!
//! Realms are single-threaded: objects are `Rc<RefCell<_>>` and symbol
//! identities are drawn from a `Cell` counter.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{EngineError, EngineResult};
use crate::objects::js_date::JsDate;
use crate::objects::js_function::{JsFunction, NativeFn, SharedFunctionInfo};
use crate::objects::js_object::{self, JsObject, JsObjectRef, ObjectClass};
use crate::objects::js_proxy::{self, JsProxy};
use crate::objects::js_regexp::JsRegExp;
use crate::objects::property::{PropertyAttributes, PropertyKey, PropertySlot};
use crate::objects::value::{JsSymbol, JsValue};

/// The set of intrinsic objects shared by every value created in it.
pub struct Realm {
    object_prototype: JsObjectRef,
    function_prototype: JsObjectRef,
    array_prototype: JsObjectRef,
    date_prototype: JsObjectRef,
    regexp_prototype: JsObjectRef,
    error_prototype: JsObjectRef,
    next_symbol_id: Cell<u64>,
}

impl Realm {
    /// Creates a realm with freshly built intrinsics.
    pub fn new() -> Self {
        let object_prototype = JsObject::new().into_ref();

        let mut function_prototype = JsObject::new_with_class(ObjectClass::Function(
            JsFunction::new_native(SharedFunctionInfo::new("", 0), return_undefined),
        ));
        function_prototype.set_prototype(Some(Rc::clone(&object_prototype)));
        let function_prototype = function_prototype.into_ref();

        let realm = Self {
            array_prototype: JsObject::with_prototype(Rc::clone(&object_prototype)).into_ref(),
            date_prototype: JsObject::with_prototype(Rc::clone(&object_prototype)).into_ref(),
            regexp_prototype: JsObject::with_prototype(Rc::clone(&object_prototype)).into_ref(),
            error_prototype: JsObject::with_prototype(Rc::clone(&object_prototype)).into_ref(),
            object_prototype,
            function_prototype,
            next_symbol_id: Cell::new(1),
        };
        realm.install_intrinsics();
        realm
    }

    fn install_intrinsics(&self) {
        // Function.prototype is itself a function and needs its own name/length.
        init_function_properties(&self.function_prototype, "", 0);

        self.install_constructor("Object", &self.object_prototype);
        self.install_constructor("Function", &self.function_prototype);
        self.install_constructor("Array", &self.array_prototype);
        self.install_constructor("Date", &self.date_prototype);
        self.install_constructor("RegExp", &self.regexp_prototype);
        self.install_constructor("Error", &self.error_prototype);

        let proto_getter = self.new_native_function("get __proto__", 0, proto_get);
        let proto_setter = self.new_native_function("set __proto__", 1, proto_set);
        self.install_method(&self.object_prototype, "hasOwnProperty", 1, has_own_property);
        self.install_method(&self.object_prototype, "toString", 0, object_to_string);
        self.object_prototype.borrow_mut().init_property(
            "__proto__",
            PropertySlot::Accessor {
                getter: Some(proto_getter),
                setter: Some(proto_setter),
            },
            PropertyAttributes::CONFIGURABLE,
        );

        self.install_method(&self.date_prototype, "toISOString", 0, date_to_iso_string);
        self.install_method(&self.regexp_prototype, "toString", 0, regexp_to_string);

        let mut error_proto = self.error_prototype.borrow_mut();
        error_proto.init_property(
            "message",
            PropertySlot::Data(JsValue::from("")),
            PropertyAttributes::HIDDEN,
        );
        error_proto.init_property(
            "name",
            PropertySlot::Data(JsValue::from("Error")),
            PropertyAttributes::HIDDEN,
        );
    }

    fn install_constructor(&self, name: &str, prototype: &JsObjectRef) {
        let ctor = self.new_function(name, 1);
        ctor.borrow_mut().init_property(
            "prototype",
            PropertySlot::Data(JsValue::Object(Rc::clone(prototype))),
            PropertyAttributes::empty(),
        );
        prototype.borrow_mut().init_property(
            "constructor",
            PropertySlot::Data(JsValue::Object(ctor)),
            PropertyAttributes::HIDDEN,
        );
    }

    fn install_method(&self, target: &JsObjectRef, name: &str, params: u32, native: NativeFn) {
        let method = self.new_native_function(name, params, native);
        target.borrow_mut().init_property(
            name,
            PropertySlot::Data(JsValue::Object(method)),
            PropertyAttributes::HIDDEN,
        );
    }

    // ── Intrinsics ────────────────────────────────────────────────────────────

    /// `Object.prototype`, the baseline root prototype.
    pub fn object_prototype(&self) -> &JsObjectRef {
        &self.object_prototype
    }

    /// `Function.prototype`.
    pub fn function_prototype(&self) -> &JsObjectRef {
        &self.function_prototype
    }

    /// `Array.prototype`.
    pub fn array_prototype(&self) -> &JsObjectRef {
        &self.array_prototype
    }

    /// `Date.prototype`.
    pub fn date_prototype(&self) -> &JsObjectRef {
        &self.date_prototype
    }

    /// `RegExp.prototype`.
    pub fn regexp_prototype(&self) -> &JsObjectRef {
        &self.regexp_prototype
    }

    /// `Error.prototype`.
    pub fn error_prototype(&self) -> &JsObjectRef {
        &self.error_prototype
    }

    // ── Value factory ─────────────────────────────────────────────────────────

    /// `{}`: an empty object inheriting from `Object.prototype`.
    pub fn new_object(&self) -> JsObjectRef {
        JsObject::with_prototype(Rc::clone(&self.object_prototype)).into_ref()
    }

    /// `Object.create(proto)`.
    pub fn new_object_with_prototype(&self, proto: Option<&JsObjectRef>) -> JsObjectRef {
        let mut obj = JsObject::new();
        obj.set_prototype(proto.map(Rc::clone));
        obj.into_ref()
    }

    /// An array literal holding `values`.
    pub fn new_array(&self, values: impl IntoIterator<Item = JsValue>) -> JsObjectRef {
        let mut arr = JsObject::new_with_class(ObjectClass::Array);
        arr.set_prototype(Some(Rc::clone(&self.array_prototype)));
        for value in values {
            arr.push_element(value);
        }
        arr.into_ref()
    }

    /// A script function declared as `function name(p1, ..., pn) {}`.
    ///
    /// An empty `name` creates an anonymous function.
    pub fn new_function(&self, name: &str, param_count: u32) -> JsObjectRef {
        self.function_object(JsFunction::new_script(SharedFunctionInfo::new(
            name,
            param_count,
        )))
    }

    /// A function backed by a Rust callback.
    pub fn new_native_function(&self, name: &str, param_count: u32, native: NativeFn) -> JsObjectRef {
        self.function_object(JsFunction::new_native(
            SharedFunctionInfo::new(name, param_count),
            native,
        ))
    }

    fn function_object(&self, function: JsFunction) -> JsObjectRef {
        let name = function.name().to_string();
        let params = function.param_count();
        let mut obj = JsObject::new_with_class(ObjectClass::Function(function));
        obj.set_prototype(Some(Rc::clone(&self.function_prototype)));
        let obj = obj.into_ref();
        init_function_properties(&obj, &name, params);
        obj
    }

    /// `new Date(time)`, with `time` in milliseconds since the epoch.
    pub fn new_date(&self, time: f64) -> JsObjectRef {
        let mut obj = JsObject::new_with_class(ObjectClass::Date(JsDate::new(time)));
        obj.set_prototype(Some(Rc::clone(&self.date_prototype)));
        obj.into_ref()
    }

    /// `/source/flags`.  Flags are validated only when displayed.
    pub fn new_regexp(&self, source: &str, flags: &str) -> JsObjectRef {
        let mut obj = JsObject::new_with_class(ObjectClass::RegExp(JsRegExp::new(source, flags)));
        obj.set_prototype(Some(Rc::clone(&self.regexp_prototype)));
        obj.init_property(
            "lastIndex",
            PropertySlot::Data(JsValue::Smi(0)),
            PropertyAttributes::WRITABLE,
        );
        obj.into_ref()
    }

    /// `new Error(message)`.
    pub fn new_error(&self, message: &str) -> JsObjectRef {
        let mut obj = JsObject::new_with_class(ObjectClass::Error);
        obj.set_prototype(Some(Rc::clone(&self.error_prototype)));
        obj.init_property(
            "message",
            PropertySlot::Data(JsValue::from(message)),
            PropertyAttributes::HIDDEN,
        );
        obj.into_ref()
    }

    /// `new Proxy(target, {})`.
    pub fn new_proxy(&self, target: &JsObjectRef) -> JsObjectRef {
        JsObject::new_with_class(ObjectClass::Proxy(JsProxy::new(Rc::clone(target)))).into_ref()
    }

    /// Revokes a proxy created by [`new_proxy`][Self::new_proxy].
    pub fn revoke_proxy(proxy: &JsObjectRef) -> EngineResult<()> {
        let mut obj = proxy
            .try_borrow_mut()
            .map_err(|_| EngineError::Internal("proxy is being inspected".to_string()))?;
        match obj.class_mut() {
            ObjectClass::Proxy(p) => {
                p.revoke();
                Ok(())
            }
            _ => Err(EngineError::TypeError("value is not a proxy".to_string())),
        }
    }

    /// `Symbol(description)`.
    pub fn new_symbol(&self, description: Option<&str>) -> JsSymbol {
        let units = description.map(|d| d.encode_utf16().collect::<Vec<u16>>().into());
        JsSymbol::new(self.next_symbol_id(), units)
    }

    /// `Symbol(description)` from raw UTF-16, lone surrogates allowed.
    pub fn new_symbol_utf16(&self, description: &[u16]) -> JsSymbol {
        JsSymbol::new(self.next_symbol_id(), Some(Rc::from(description)))
    }

    fn next_symbol_id(&self) -> u64 {
        let id = self.next_symbol_id.get();
        self.next_symbol_id.set(id + 1);
        id
    }

    /// `class Name extends Parent {}`: returns `(constructor, prototype)`.
    ///
    /// Without a parent the prototype inherits from `Object.prototype`.
    pub fn define_class(&self, name: &str, parent: Option<&JsObjectRef>) -> (JsObjectRef, JsObjectRef) {
        let proto = JsObject::with_prototype(Rc::clone(
            parent.unwrap_or(&self.object_prototype),
        ))
        .into_ref();
        let ctor = self.new_function(name, 0);
        ctor.borrow_mut().init_property(
            "prototype",
            PropertySlot::Data(JsValue::Object(Rc::clone(&proto))),
            PropertyAttributes::empty(),
        );
        proto.borrow_mut().init_property(
            "constructor",
            PropertySlot::Data(JsValue::Object(Rc::clone(&ctor))),
            PropertyAttributes::HIDDEN,
        );
        (ctor, proto)
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

fn init_function_properties(function: &JsObjectRef, name: &str, params: u32) {
    let mut obj = function.borrow_mut();
    obj.init_property(
        "length",
        PropertySlot::Data(JsValue::Smi(params.min(i32::MAX as u32) as i32)),
        PropertyAttributes::CONFIGURABLE,
    );
    obj.init_property(
        "name",
        PropertySlot::Data(JsValue::from(name)),
        PropertyAttributes::CONFIGURABLE,
    );
}

// ──────────────────────────────────────────────────────────────────────────────
// Native built-ins
// ──────────────────────────────────────────────────────────────────────────────

fn this_object(args: &[JsValue]) -> Option<&JsObjectRef> {
    args.first().and_then(JsValue::as_object)
}

fn return_undefined(_args: &[JsValue]) -> EngineResult<JsValue> {
    Ok(JsValue::Undefined)
}

fn proto_get(args: &[JsValue]) -> EngineResult<JsValue> {
    let Some(this) = this_object(args) else {
        return Ok(JsValue::Null);
    };
    Ok(js_object::get_prototype_of(this)?.map_or(JsValue::Null, JsValue::Object))
}

fn proto_set(args: &[JsValue]) -> EngineResult<JsValue> {
    let Some(this) = this_object(args) else {
        return Ok(JsValue::Undefined);
    };
    match args.get(1) {
        Some(JsValue::Object(proto)) => js_object::set_prototype_of(this, Some(Rc::clone(proto)))?,
        Some(JsValue::Null) => js_object::set_prototype_of(this, None)?,
        _ => {}
    }
    Ok(JsValue::Undefined)
}

fn has_own_property(args: &[JsValue]) -> EngineResult<JsValue> {
    let key = match args.get(1).cloned().unwrap_or_default() {
        JsValue::Symbol(sym) => PropertyKey::Symbol(sym),
        other => PropertyKey::String(other.to_js_string()?),
    };
    let Some(this) = this_object(args) else {
        return Err(EngineError::TypeError(
            "Cannot convert undefined or null to object".to_string(),
        ));
    };
    let target = js_proxy::resolve_target(this)?;
    let found = target
        .try_borrow()
        .map_err(|_| EngineError::Internal("object is being mutated".to_string()))?
        .has_own_property(&key);
    Ok(JsValue::Boolean(found))
}

fn object_to_string(args: &[JsValue]) -> EngineResult<JsValue> {
    let tag = match args.first().cloned().unwrap_or_default() {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        JsValue::Boolean(_) => "Boolean",
        JsValue::Smi(_) | JsValue::HeapNumber(_) => "Number",
        JsValue::String(_) => "String",
        JsValue::Symbol(_) => "Symbol",
        JsValue::BigInt(_) => "BigInt",
        JsValue::Object(obj) => {
            let target = js_proxy::resolve_target(&obj)?;
            let tag = target
                .try_borrow()
                .map_err(|_| EngineError::Internal("object is being mutated".to_string()))?
                .class()
                .builtin_tag();
            tag
        }
    };
    Ok(JsValue::String(format!("[object {tag}]")))
}

fn date_to_iso_string(args: &[JsValue]) -> EngineResult<JsValue> {
    let date = this_object(args).and_then(|obj| match obj.try_borrow().ok()?.class() {
        ObjectClass::Date(date) => Some(*date),
        _ => None,
    });
    match date {
        Some(date) => date.to_iso_string().map(JsValue::String),
        None => Err(EngineError::TypeError("this is not a Date object.".to_string())),
    }
}

fn regexp_to_string(args: &[JsValue]) -> EngineResult<JsValue> {
    let regexp = this_object(args).and_then(|obj| match obj.try_borrow().ok()?.class() {
        ObjectClass::RegExp(re) => Some(re.clone()),
        _ => None,
    });
    match regexp {
        Some(re) => re.to_pattern_string().map(JsValue::String),
        None => Err(EngineError::TypeError(
            "RegExp.prototype.toString requires a RegExp receiver".to_string(),
        )),
    }
}
