//! Built-in sample values.

use std::rc::Rc;

use anyhow::Result;
use periscope_core::error::{EngineError, EngineResult};
use periscope_core::objects::property::{PropertyAttributes, PropertySlot};
use periscope_core::objects::value::JsValue;
use periscope_core::realm::Realm;

/// Names accepted by `--sample`, with a one-line description each.
pub const SAMPLES: &[(&str, &str)] = &[
    ("plain", "{ b: 1, a: 2 }"),
    ("nested", "an object holding objects, arrays and primitives"),
    ("array", "a mixed array"),
    ("class", "an instance of a user class with an accessor"),
    ("hostile", "throwing getter, bad pattern, invalid date, unsafe symbol key"),
    ("cycle", "an object whose `self` property points back at it"),
    ("function", "an anonymous function"),
    ("date", "a Date"),
    ("regexp", "a RegExp"),
    ("proxy", "a live and a revoked proxy"),
    ("primitive", "the number 42"),
    ("symbols", "symbol-keyed properties in declaration order"),
];

/// Builds the sample named `name`, or `None` for an unknown name.
pub fn build(realm: &Realm, name: &str) -> Result<Option<JsValue>> {
    let value = match name {
        "plain" => plain(realm)?,
        "nested" => nested(realm)?,
        "array" => array(realm),
        "class" => class(realm)?,
        "hostile" => hostile(realm)?,
        "cycle" => cycle(realm)?,
        "function" => JsValue::Object(realm.new_function("", 0)),
        "date" => JsValue::Object(realm.new_date(1_614_834_367_089.0)),
        "regexp" => JsValue::Object(realm.new_regexp("^[a-z]+/\\d+$", "gi")),
        "proxy" => proxy(realm)?,
        "primitive" => JsValue::Smi(42),
        "symbols" => symbols(realm)?,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn plain(realm: &Realm) -> Result<JsValue> {
    let obj = realm.new_object();
    let mut o = obj.borrow_mut();
    o.set_property("b", JsValue::Smi(1))?;
    o.set_property("a", JsValue::Smi(2))?;
    drop(o);
    Ok(JsValue::Object(obj))
}

fn nested(realm: &Realm) -> Result<JsValue> {
    let address = realm.new_object();
    {
        let mut a = address.borrow_mut();
        a.set_property("city", JsValue::from("Lisbon"))?;
        a.set_property("zip", JsValue::from("1100-148"))?;
    }
    let obj = realm.new_object();
    {
        let mut o = obj.borrow_mut();
        o.set_property("name", JsValue::from("Ada"))?;
        o.set_property("age", JsValue::Smi(36))?;
        o.set_property("score", JsValue::HeapNumber(97.5))?;
        o.set_property("active", JsValue::Boolean(true))?;
        o.set_property("nickname", JsValue::Null)?;
        o.set_property("middleName", JsValue::Undefined)?;
        o.set_property("id", JsValue::BigInt(9_007_199_254_740_993))?;
        o.set_property("address", JsValue::Object(address))?;
        o.set_property(
            "tags",
            JsValue::Object(realm.new_array([JsValue::from("math"), JsValue::from("engines")])),
        )?;
        o.set_property("greet", JsValue::Object(realm.new_function("greet", 1)))?;
    }
    Ok(JsValue::Object(obj))
}

fn array(realm: &Realm) -> JsValue {
    let inner = realm.new_array([JsValue::Smi(1), JsValue::Smi(2)]);
    JsValue::Object(realm.new_array([
        JsValue::Smi(10),
        JsValue::from("ten"),
        JsValue::Object(inner),
        JsValue::Object(realm.new_object()),
        JsValue::Null,
    ]))
}

fn area(args: &[JsValue]) -> EngineResult<JsValue> {
    let Some(this) = args.first().and_then(JsValue::as_object) else {
        return Ok(JsValue::Undefined);
    };
    let this = this
        .try_borrow()
        .map_err(|_| EngineError::Internal("receiver is busy".to_string()))?;
    let side = |name: &str| match this.get_own_property(&name.into()).map(|p| p.slot().clone()) {
        Some(PropertySlot::Data(JsValue::Smi(n))) => f64::from(n),
        _ => f64::NAN,
    };
    Ok(JsValue::HeapNumber(side("w") * side("h")))
}

fn class(realm: &Realm) -> Result<JsValue> {
    let (_, shape) = realm.define_class("Shape", None);
    let (_, rect) = realm.define_class("Rect", Some(&shape));
    let getter = realm.new_native_function("get area", 0, area);
    rect.borrow_mut()
        .define_accessor("area", Some(getter), None, PropertyAttributes::CONFIGURABLE)?;
    let instance = realm.new_object_with_prototype(Some(&rect));
    {
        let mut i = instance.borrow_mut();
        i.set_property("w", JsValue::Smi(3))?;
        i.set_property("h", JsValue::Smi(4))?;
    }
    Ok(JsValue::Object(instance))
}

fn boom(_args: &[JsValue]) -> EngineResult<JsValue> {
    Err(EngineError::Thrown("boom".to_string()))
}

fn hostile(realm: &Realm) -> Result<JsValue> {
    let obj = realm.new_object();
    let getter = realm.new_native_function("get x", 0, boom);
    let unsafe_key = realm.new_symbol_utf16(&[0xD800]);
    let mut o = obj.borrow_mut();
    o.define_accessor("x", Some(getter), None, PropertyAttributes::DEFAULT)?;
    o.set_property("pattern", JsValue::Object(realm.new_regexp("a", "gg")))?;
    o.set_property("when", JsValue::Object(realm.new_date(f64::NAN)))?;
    o.set_property(unsafe_key, JsValue::from("hidden"))?;
    o.set_property("orphan", JsValue::Object(realm.new_object_with_prototype(None)))?;
    drop(o);
    Ok(JsValue::Object(obj))
}

fn cycle(realm: &Realm) -> Result<JsValue> {
    let obj = realm.new_object();
    obj.borrow_mut()
        .set_property("self", JsValue::Object(Rc::clone(&obj)))?;
    obj.borrow_mut().set_property("n", JsValue::Smi(1))?;
    Ok(JsValue::Object(obj))
}

fn proxy(realm: &Realm) -> Result<JsValue> {
    let target = realm.new_object();
    target.borrow_mut().set_property("secret", JsValue::Smi(7))?;
    let live = realm.new_proxy(&target);
    let revoked = realm.new_proxy(&target);
    Realm::revoke_proxy(&revoked)?;
    let obj = realm.new_object();
    let mut o = obj.borrow_mut();
    o.set_property("live", JsValue::Object(live))?;
    o.set_property("revoked", JsValue::Object(revoked))?;
    drop(o);
    Ok(JsValue::Object(obj))
}

fn symbols(realm: &Realm) -> Result<JsValue> {
    let obj = realm.new_object();
    let mut o = obj.borrow_mut();
    o.set_property(realm.new_symbol(Some("zeta")), JsValue::Smi(1))?;
    o.set_property("plain", JsValue::Smi(2))?;
    o.set_property(realm.new_symbol(Some("alpha")), JsValue::Smi(3))?;
    o.set_property(realm.new_symbol(None), JsValue::Smi(4))?;
    drop(o);
    Ok(JsValue::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_sample_builds() {
        let realm = Realm::new();
        for (name, _) in SAMPLES {
            assert!(build(&realm, name).unwrap().is_some(), "{name}");
        }
    }

    #[test]
    fn test_unknown_sample() {
        let realm = Realm::new();
        assert!(build(&realm, "nope").unwrap().is_none());
    }
}
