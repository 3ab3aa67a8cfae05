//! Revocable proxy objects.
//!
//! Only the trap-less form is modelled: every internal method forwards to the
//! target.  What matters to an inspector is revocation, after which every
//! operation (including `Array.isArray`) raises a `TypeError`.

use std::rc::Rc;

use crate::error::{EngineError, EngineResult};
use crate::objects::js_object::{JsObjectRef, ObjectClass};

/// Upper bound on proxy-of-proxy nesting followed by [`resolve_target`].
pub const MAX_PROXY_DEPTH: usize = 64;

/// The `[[ProxyTarget]]` slot.  `None` once revoked.
#[derive(Debug, Clone)]
pub struct JsProxy {
    target: Option<JsObjectRef>,
}

impl JsProxy {
    /// Creates a live proxy forwarding to `target`.
    pub fn new(target: JsObjectRef) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// Revokes the proxy.  Revocation is permanent.
    pub fn revoke(&mut self) {
        self.target = None;
    }

    /// Returns `true` if the proxy has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.target.is_none()
    }

    /// Returns the target, or a `TypeError` if revoked.
    pub fn target(&self) -> EngineResult<JsObjectRef> {
        self.target.as_ref().map(Rc::clone).ok_or_else(revoked_error)
    }
}

fn revoked_error() -> EngineError {
    EngineError::TypeError("Cannot perform operation on a revoked proxy".to_string())
}

/// Follows proxy links until a non-proxy object is reached.
///
/// Returns `obj` itself when it is not a proxy.  Fails when any proxy on the
/// way is revoked, or when the nesting exceeds [`MAX_PROXY_DEPTH`].
pub fn resolve_target(obj: &JsObjectRef) -> EngineResult<JsObjectRef> {
    let mut current = Rc::clone(obj);
    for _ in 0..MAX_PROXY_DEPTH {
        let next = {
            let borrowed = current
                .try_borrow()
                .map_err(|_| EngineError::Internal("object is being mutated".to_string()))?;
            match borrowed.class() {
                ObjectClass::Proxy(proxy) => proxy.target()?,
                _ => return Ok(Rc::clone(&current)),
            }
        };
        current = next;
    }
    Err(EngineError::RangeError("Proxy nesting is too deep".to_string()))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::objects::js_object::JsObject;

    fn shared(obj: JsObject) -> JsObjectRef {
        Rc::new(RefCell::new(obj))
    }

    #[test]
    fn test_resolve_plain_object_is_identity() {
        let obj = shared(JsObject::new());
        assert!(Rc::ptr_eq(&resolve_target(&obj).unwrap(), &obj));
    }

    #[test]
    fn test_resolve_nested_proxies() {
        let target = shared(JsObject::new());
        let inner = shared(JsObject::new_with_class(ObjectClass::Proxy(JsProxy::new(
            Rc::clone(&target),
        ))));
        let outer = shared(JsObject::new_with_class(ObjectClass::Proxy(JsProxy::new(
            inner,
        ))));
        assert!(Rc::ptr_eq(&resolve_target(&outer).unwrap(), &target));
    }

    #[test]
    fn test_revoked_proxy_is_type_error() {
        let mut proxy = JsProxy::new(shared(JsObject::new()));
        proxy.revoke();
        assert!(proxy.is_revoked());
        let obj = shared(JsObject::new_with_class(ObjectClass::Proxy(proxy)));
        assert!(matches!(
            resolve_target(&obj),
            Err(EngineError::TypeError(_))
        ));
    }
}
