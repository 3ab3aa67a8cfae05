//! Callable payloads of function objects.
//!
//! A [`JsFunction`] is either a Rust callback ([`FunctionKind::Native`]),
//! used for built-ins and hostile getters, or a placeholder for a function
//! declared by user code ([`FunctionKind::Script`]).  Nothing here evaluates
//! script bodies: calling a script function is a `TypeError`.

use std::fmt;
use std::rc::Rc;

use crate::error::{EngineError, EngineResult};
use crate::objects::js_object::{JsObjectRef, ObjectClass};
use crate::objects::value::JsValue;

// ──────────────────────────────────────────────────────────────────────────────
// SharedFunctionInfo
// ──────────────────────────────────────────────────────────────────────────────

/// Name and arity, shared by every clone of a [`JsFunction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFunctionInfo {
    name: String,
    param_count: u32,
}

impl SharedFunctionInfo {
    /// Creates metadata for a function named `name` (empty for anonymous).
    pub fn new(name: impl Into<String>, param_count: u32) -> Self {
        Self {
            name: name.into(),
            param_count,
        }
    }

    /// Empty for anonymous functions.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_count(&self) -> u32 {
        self.param_count
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// NativeFn / FunctionKind
// ──────────────────────────────────────────────────────────────────────────────

/// Signature of a Rust callback: `args[0]` is the receiver, the positional
/// arguments follow.
pub type NativeFn = fn(&[JsValue]) -> EngineResult<JsValue>;

/// What runs when a [`JsFunction`] is called.
#[derive(Clone, Copy)]
pub enum FunctionKind {
    /// A function declared by script.  Its body is never evaluated here.
    Script,
    Native(NativeFn),
}

impl fmt::Debug for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Script => "Script",
            Self::Native(_) => "Native",
        })
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// JsFunction
// ──────────────────────────────────────────────────────────────────────────────

/// The callable payload of a function object.
///
/// ```
/// use periscope_core::objects::js_function::{JsFunction, SharedFunctionInfo};
/// use periscope_core::objects::value::JsValue;
///
/// fn answer(_args: &[JsValue]) -> periscope_core::error::EngineResult<JsValue> {
///     Ok(JsValue::Smi(42))
/// }
///
/// let f = JsFunction::new_native(SharedFunctionInfo::new("answer", 0), answer);
/// assert_eq!(f.name(), "answer");
/// assert_eq!(f.call(&JsValue::Undefined, &[]).unwrap(), JsValue::Smi(42));
/// ```
#[derive(Debug, Clone)]
pub struct JsFunction {
    shared: Rc<SharedFunctionInfo>,
    kind: FunctionKind,
}

impl JsFunction {
    pub fn new_script(shared: SharedFunctionInfo) -> Self {
        Self {
            shared: Rc::new(shared),
            kind: FunctionKind::Script,
        }
    }

    pub fn new_native(shared: SharedFunctionInfo, native: NativeFn) -> Self {
        Self {
            shared: Rc::new(shared),
            kind: FunctionKind::Native(native),
        }
    }

    pub fn name(&self) -> &str {
        self.shared.name()
    }

    pub fn param_count(&self) -> u32 {
        self.shared.param_count()
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Invokes the function with the given receiver and arguments.
    ///
    /// Native callbacks receive `this` as `args[0]`.  Script functions raise
    /// a `TypeError` because there is no interpreter to run their bodies.
    pub fn call(&self, this: &JsValue, args: &[JsValue]) -> EngineResult<JsValue> {
        match self.kind {
            FunctionKind::Native(native) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(this.clone());
                full.extend_from_slice(args);
                native(&full)
            }
            FunctionKind::Script => Err(EngineError::TypeError(format!(
                "{} cannot be invoked without an interpreter",
                display_name(self.name())
            ))),
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "anonymous" } else { name }
}

/// ECMAScript §7.3.14 **Call** on an object reference.
///
/// The function payload is copied out before the call so that no `RefCell`
/// borrow is held while user code runs; a getter may freely inspect or
/// mutate its own receiver.
pub fn call(callee: &JsObjectRef, this: &JsValue, args: &[JsValue]) -> EngineResult<JsValue> {
    let function = {
        let obj = callee
            .try_borrow()
            .map_err(|_| EngineError::Internal("callee is being mutated".to_string()))?;
        match obj.class() {
            ObjectClass::Function(f) => f.clone(),
            _ => {
                return Err(EngineError::TypeError("value is not a function".to_string()));
            }
        }
    };
    function.call(this, args)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::objects::js_object::JsObject;

    fn second_arg(args: &[JsValue]) -> EngineResult<JsValue> {
        Ok(args.get(1).cloned().unwrap_or_default())
    }

    fn this_arg(args: &[JsValue]) -> EngineResult<JsValue> {
        Ok(args.first().cloned().unwrap_or_default())
    }

    #[test]
    fn test_shared_function_info_accessors() {
        let sfi = SharedFunctionInfo::new("add", 2);
        assert_eq!(sfi.name(), "add");
        assert_eq!(sfi.param_count(), 2);
    }

    #[test]
    fn test_native_call_passes_this_first() {
        let f = JsFunction::new_native(SharedFunctionInfo::new("id", 1), second_arg);
        let result = f.call(&JsValue::Null, &[JsValue::Smi(5)]).unwrap();
        assert_eq!(result, JsValue::Smi(5));

        let g = JsFunction::new_native(SharedFunctionInfo::new("self", 0), this_arg);
        assert_eq!(g.call(&JsValue::Smi(9), &[]).unwrap(), JsValue::Smi(9));
    }

    #[test]
    fn test_script_call_is_type_error() {
        let f = JsFunction::new_script(SharedFunctionInfo::new("", 0));
        let err = f.call(&JsValue::Undefined, &[]).unwrap_err();
        assert_eq!(
            err,
            EngineError::TypeError("anonymous cannot be invoked without an interpreter".into())
        );
    }

    #[test]
    fn test_call_on_function_object() {
        let f = JsFunction::new_native(SharedFunctionInfo::new("id", 1), second_arg);
        let obj = Rc::new(RefCell::new(JsObject::new_with_class(ObjectClass::Function(f))));
        assert_eq!(
            call(&obj, &JsValue::Undefined, &[JsValue::from("x")]).unwrap(),
            JsValue::from("x")
        );
    }

    #[test]
    fn test_call_on_plain_object_is_type_error() {
        let obj = Rc::new(RefCell::new(JsObject::new()));
        assert!(matches!(
            call(&obj, &JsValue::Undefined, &[]),
            Err(EngineError::TypeError(_))
        ));
    }
}
