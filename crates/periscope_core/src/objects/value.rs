//! JavaScript value representation.
//!
//! This module provides [`JsValue`], the top-level enum that can hold any
//! ECMAScript value, together with [`JsSymbol`], type-checking predicates and
//! the ECMAScript §7.1.17 [`to_js_string`][JsValue::to_js_string] conversion
//! used when a value is displayed.

use std::fmt;
use std::rc::Rc;

use crate::error::{EngineError, EngineResult};
use crate::objects::js_object::JsObjectRef;

// ──────────────────────────────────────────────────────────────────────────────
// JsSymbol
// ──────────────────────────────────────────────────────────────────────────────

/// A unique JavaScript symbol.
///
/// Identity is the opaque `id` handed out by the owning
/// [`Realm`][crate::realm::Realm].  The optional description is kept as raw
/// UTF-16 code units because `Symbol("\uD800")` is legal JavaScript: a
/// description may contain lone surrogates that have no `String`
/// representation in Rust.
#[derive(Clone)]
pub struct JsSymbol {
    id: u64,
    description: Option<Rc<[u16]>>,
}

impl JsSymbol {
    /// Creates a symbol with the given identity and UTF-16 description.
    pub fn new(id: u64, description: Option<Rc<[u16]>>) -> Self {
        Self { id, description }
    }

    /// Returns the opaque identity of this symbol.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the raw UTF-16 description, if any.
    pub fn description(&self) -> Option<&[u16]> {
        self.description.as_deref()
    }

    /// ECMAScript §20.4.3.3.1 **SymbolDescriptiveString**, strictly decoded.
    ///
    /// Returns `Symbol(<description>)`, or `Symbol()` when there is no
    /// description.  Fails with a `TypeError` when the description is not
    /// well-formed UTF-16.
    pub fn descriptive_string(&self) -> EngineResult<String> {
        match &self.description {
            None => Ok("Symbol()".to_string()),
            Some(units) => String::from_utf16(units)
                .map(|desc| format!("Symbol({desc})"))
                .map_err(|_| {
                    EngineError::TypeError(
                        "Symbol description is not well-formed UTF-16".to_string(),
                    )
                }),
        }
    }

    /// Like [`descriptive_string`][Self::descriptive_string], replacing lone
    /// surrogates with `U+FFFD` instead of failing.
    pub fn descriptive_string_lossy(&self) -> String {
        match &self.description {
            None => "Symbol()".to_string(),
            Some(units) => format!("Symbol({})", String::from_utf16_lossy(units)),
        }
    }
}

impl PartialEq for JsSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for JsSymbol {}

impl fmt::Debug for JsSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.descriptive_string_lossy(), self.id)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// JsValue
// ──────────────────────────────────────────────────────────────────────────────

/// Any ECMAScript value.
///
/// Primitive variants carry their data inline; `Object` holds a shared
/// reference to a [`JsObject`][crate::objects::js_object::JsObject].  Objects
/// compare by identity, so a value that (transitively) contains itself is
/// perfectly representable.
#[derive(Clone, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    /// Integral number that fits an `i32`.
    Smi(i32),
    /// Any other number, including `NaN`, infinities and `-0`.
    HeapNumber(f64),
    String(String),
    Symbol(JsSymbol),
    /// Shared handle: functions, arrays, dates, patterns, proxies, ...
    Object(JsObjectRef),
    /// `BigInt` literals beyond 128 bits are not representable.
    BigInt(i128),
}

// ──────────────────────────────────────────────────────────────────────────────
// Shape tests
// ──────────────────────────────────────────────────────────────────────────────

// Plain `fn(&JsValue) -> bool` so the classifier can chain them.
impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    /// Either numeric representation.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Smi(_) | Self::HeapNumber(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    pub fn is_bigint(&self) -> bool {
        matches!(self, Self::BigInt(_))
    }

    /// Borrows the object handle, if any.
    pub fn as_object(&self) -> Option<&JsObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Abstract type-conversion operations (ECMAScript §7.1)
// ──────────────────────────────────────────────────────────────────────────────

impl JsValue {
    /// ECMAScript §7.1.17 **ToString** restricted to primitives.
    ///
    /// Symbols are a `TypeError`, as in the language.  Objects are a
    /// `TypeError` too since `ToPrimitive` would have to run user code.
    pub fn to_js_string(&self) -> EngineResult<String> {
        match self {
            Self::Undefined => Ok("undefined".to_string()),
            Self::Null => Ok("null".to_string()),
            Self::Boolean(b) => Ok(b.to_string()),
            Self::Smi(n) => Ok(n.to_string()),
            Self::BigInt(n) => Ok(n.to_string()),
            Self::HeapNumber(n) => Ok(number_to_string(*n)),
            Self::String(s) => Ok(s.clone()),
            Self::Symbol(_) => Err(EngineError::TypeError(
                "Cannot convert a Symbol value to a string".to_string(),
            )),
            Self::Object(_) => Err(EngineError::TypeError(
                "Cannot convert an Object to a string without ToPrimitive".to_string(),
            )),
        }
    }
}

impl PartialEq for JsValue {
    /// Primitive values compare by content, objects by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Smi(a), Self::Smi(b)) => a == b,
            (Self::HeapNumber(a), Self::HeapNumber(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for JsValue {
    // Objects are printed shallowly: a value may reach itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Null => write!(f, "Null"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Smi(n) => write!(f, "Smi({n})"),
            Self::HeapNumber(n) => write!(f, "HeapNumber({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Symbol(sym) => write!(f, "Symbol({sym:?})"),
            Self::Object(obj) => write!(f, "Object({:p})", Rc::as_ptr(obj)),
            Self::BigInt(n) => write!(f, "BigInt({n})"),
        }
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for JsValue {
    fn from(n: i32) -> Self {
        Self::Smi(n)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        Self::HeapNumber(n)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<JsObjectRef> for JsValue {
    fn from(obj: JsObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl From<JsSymbol> for JsValue {
    fn from(sym: JsSymbol) -> Self {
        Self::Symbol(sym)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────────────────────────

/// Formats an `f64` as a JavaScript number string (ECMAScript §7.1.12.1).
///
/// Special cases: `NaN → "NaN"`, `+∞ → "Infinity"`, `-∞ → "-Infinity"`,
/// and both `+0.0` and `-0.0` → `"0"`.  All other values use Rust's default
/// `f64` `Display` formatting, which agrees with ECMAScript for common values.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        // Both +0.0 and -0.0 produce "0".
        "0".to_string()
    } else {
        format!("{n}")
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::objects::js_object::JsObject;

    fn symbol(id: u64, desc: Option<&[u16]>) -> JsSymbol {
        JsSymbol::new(id, desc.map(Rc::from))
    }

    // ── shape tests ──────────────────────────────────────────────────────────

    #[test]
    fn test_numbers_have_two_representations() {
        assert!(JsValue::Smi(0).is_number());
        assert!(JsValue::HeapNumber(f64::NAN).is_number());
        assert!(!JsValue::BigInt(0).is_number());
        assert!(!JsValue::from("1").is_number());
    }

    #[test]
    fn test_as_object() {
        let obj = Rc::new(RefCell::new(JsObject::new()));
        assert!(JsValue::Object(obj).as_object().is_some());
        assert!(JsValue::Null.as_object().is_none());
    }

    // ── equality ─────────────────────────────────────────────────────────────

    #[test]
    fn test_objects_compare_by_identity() {
        let a = Rc::new(RefCell::new(JsObject::new()));
        let b = Rc::new(RefCell::new(JsObject::new()));
        assert_eq!(JsValue::Object(Rc::clone(&a)), JsValue::Object(Rc::clone(&a)));
        assert_ne!(JsValue::Object(a), JsValue::Object(b));
    }

    #[test]
    fn test_symbols_compare_by_id() {
        let units: Vec<u16> = "tag".encode_utf16().collect();
        assert_eq!(symbol(1, Some(&units)), symbol(1, None));
        assert_ne!(symbol(1, Some(&units)), symbol(2, Some(&units)));
    }

    // ── symbol descriptions ──────────────────────────────────────────────────

    #[test]
    fn test_symbol_descriptive_string() {
        let units: Vec<u16> = "tag".encode_utf16().collect();
        assert_eq!(symbol(1, Some(&units)).descriptive_string().unwrap(), "Symbol(tag)");
        assert_eq!(symbol(2, None).descriptive_string().unwrap(), "Symbol()");
    }

    #[test]
    fn test_symbol_with_lone_surrogate_fails_strict_conversion() {
        let sym = symbol(1, Some(&[0xD800]));
        assert!(matches!(
            sym.descriptive_string(),
            Err(EngineError::TypeError(_))
        ));
        assert_eq!(sym.descriptive_string_lossy(), "Symbol(\u{FFFD})");
    }

    // ── to_js_string ─────────────────────────────────────────────────────────

    #[test]
    fn test_to_js_string_primitives() {
        let cases = [
            (JsValue::Undefined, "undefined"),
            (JsValue::Null, "null"),
            (JsValue::Boolean(false), "false"),
            (JsValue::Smi(-7), "-7"),
            (JsValue::BigInt(-(1 << 70)), "-1180591620717411303424"),
            (JsValue::from("text"), "text"),
        ];
        for (value, expected) in cases {
            assert_eq!(value.to_js_string().unwrap(), expected);
        }
    }

    #[test]
    fn test_heap_number_strings() {
        assert_eq!(JsValue::HeapNumber(f64::NAN).to_js_string().unwrap(), "NaN");
        assert_eq!(
            JsValue::HeapNumber(f64::NEG_INFINITY).to_js_string().unwrap(),
            "-Infinity"
        );
        assert_eq!(JsValue::HeapNumber(-0.0).to_js_string().unwrap(), "0");
        assert_eq!(JsValue::HeapNumber(0.25).to_js_string().unwrap(), "0.25");
    }

    #[test]
    fn test_to_js_string_symbol_and_object_are_type_errors() {
        assert!(matches!(
            JsValue::Symbol(symbol(1, None)).to_js_string(),
            Err(EngineError::TypeError(_))
        ));
        let obj = Rc::new(RefCell::new(JsObject::new()));
        assert!(matches!(
            JsValue::Object(obj).to_js_string(),
            Err(EngineError::TypeError(_))
        ));
    }
}
