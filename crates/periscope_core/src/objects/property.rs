//! Property keys, attribute flags and property slots.

use std::fmt;

use bitflags::bitflags;

use crate::objects::js_object::JsObjectRef;
use crate::objects::value::{JsSymbol, JsValue};

bitflags! {
    /// ECMAScript property attributes (§6.1.7.1).
    ///
    /// `WRITABLE` is meaningless for accessor properties and is ignored
    /// there.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyAttributes: u8 {
        /// `[[Writable]]`: the value may be changed by assignment.
        const WRITABLE = 0b001;
        /// `[[Enumerable]]`: the property shows up in `for-in` and
        /// `Object.keys`.
        const ENUMERABLE = 0b010;
        /// `[[Configurable]]`: the property may be deleted or redefined.
        const CONFIGURABLE = 0b100;
    }
}

impl PropertyAttributes {
    /// The attributes given to properties created by plain assignment.
    pub const DEFAULT: Self = Self::all();

    /// The attributes of built-in methods and internal bookkeeping
    /// properties such as `length` and `constructor`.
    pub const HIDDEN: Self = Self::WRITABLE.union(Self::CONFIGURABLE);
}

/// A property key: a string or a symbol.
///
/// Array indices are ordinary string keys (`"0"`, `"1"`, ...), as in the
/// language itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    /// A string-keyed property.
    String(String),
    /// A symbol-keyed property.
    Symbol(JsSymbol),
}

impl PropertyKey {
    /// Returns `true` for symbol keys.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// Returns the key text for string keys.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }

    /// Parses this key as an array index, if it is one.
    ///
    /// Only canonical decimal forms qualify: `"01"` is an ordinary key.
    pub fn as_index(&self) -> Option<usize> {
        let s = self.as_str()?;
        let idx: u32 = s.parse().ok()?;
        (idx != u32::MAX && idx.to_string() == s).then_some(idx as usize)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => f.write_str(&sym.descriptive_string_lossy()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<JsSymbol> for PropertyKey {
    fn from(sym: JsSymbol) -> Self {
        Self::Symbol(sym)
    }
}

/// The storage behind a property: a plain value or a getter/setter pair.
#[derive(Debug, Clone)]
pub enum PropertySlot {
    /// A data property holding a value.
    Data(JsValue),
    /// An accessor property.  Either half may be absent.
    Accessor {
        /// The `get` function, if any.
        getter: Option<JsObjectRef>,
        /// The `set` function, if any.
        setter: Option<JsObjectRef>,
    },
}

impl PropertySlot {
    /// Returns `true` for accessor slots.
    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }
}

/// An own property: key, storage and attribute flags.
#[derive(Debug, Clone)]
pub struct Property {
    key: PropertyKey,
    slot: PropertySlot,
    attributes: PropertyAttributes,
}

impl Property {
    /// Creates a property with the given key, slot and attributes.
    pub fn new(key: PropertyKey, slot: PropertySlot, attributes: PropertyAttributes) -> Self {
        Self {
            key,
            slot,
            attributes,
        }
    }

    /// Returns the property key.
    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    /// Returns the property storage.
    pub fn slot(&self) -> &PropertySlot {
        &self.slot
    }

    /// Returns the attribute flags.
    pub fn attributes(&self) -> PropertyAttributes {
        self.attributes
    }

    /// Returns `true` if `[[Enumerable]]` is set.
    pub fn is_enumerable(&self) -> bool {
        self.attributes.contains(PropertyAttributes::ENUMERABLE)
    }

    pub(crate) fn set_slot(&mut self, slot: PropertySlot, attributes: PropertyAttributes) {
        self.slot = slot;
        self.attributes = attributes;
    }
}
