#![no_main]

use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use periscope_core::error::{EngineError, EngineResult};
use periscope_core::inspect::introspect::compare_string_keys;
use periscope_core::inspect::render::{render_markup, render_text};
use periscope_core::inspect::{
    AccessorPolicy, Inspector, InspectorOptions, NodeList, PrototypePolicy, RecordKey,
};
use periscope_core::objects::js_object::{self, JsObjectRef};
use periscope_core::objects::property::{PropertyAttributes, PropertyKey};
use periscope_core::objects::value::JsValue;
use periscope_core::realm::Realm;

fn throwing(_args: &[JsValue]) -> EngineResult<JsValue> {
    Err(EngineError::Thrown("fuzz".to_string()))
}

fn returns_this(args: &[JsValue]) -> EngineResult<JsValue> {
    Ok(args.first().cloned().unwrap_or_default())
}

// Build a small graph of hostile objects from the input, then view it and
// expand random paths, checking that nothing panics and that every record
// list keeps its ordering guarantees.
//
// Each construction step is encoded in three bytes:
//   byte 0  bits [3:0] – operation selector
//           bits [7:4] – attribute bits / flags
//   byte 1            – source object index (mod pool size)
//   byte 2            – key or target index (mod pool size)
//
// After MAX_OPS steps (or when the input runs short) the remaining bytes are
// read as expansion paths.
fuzz_target!(|data: &[u8]| {
    const MAX_OPS: usize = 128;
    let realm = Realm::new();
    let mut pool: Vec<JsObjectRef> = vec![realm.new_object()];

    let (ops, tail) = data.split_at(data.len().min(MAX_OPS * 3));
    for chunk in ops.chunks_exact(3) {
        let op = chunk[0] & 0xf;
        let flags = chunk[0] >> 4;
        let obj = Rc::clone(&pool[chunk[1] as usize % pool.len()]);
        let other = Rc::clone(&pool[chunk[2] as usize % pool.len()]);
        let key = PropertyKey::from(format!("k{}", chunk[2] % 24));
        let attrs = PropertyAttributes::from_bits_truncate(flags);

        match op {
            0 => pool.push(realm.new_object()),
            1 => pool.push(realm.new_array((0..flags).map(|i| JsValue::Smi(i as i32)))),
            2 => pool.push(realm.new_function(if flags & 1 == 0 { "" } else { "f" }, 0)),
            3 => pool.push(realm.new_proxy(&other)),
            4 => {
                let _ = Realm::revoke_proxy(&obj);
            }
            5 => {
                let _ = obj
                    .borrow_mut()
                    .define_own_property(key, JsValue::Object(other), attrs);
            }
            6 => {
                let getter = realm.new_native_function("get", 0, throwing);
                let _ = obj.borrow_mut().define_accessor(key, Some(getter), None, attrs);
            }
            7 => {
                let getter = realm.new_native_function("get", 0, returns_this);
                let setter = realm.new_function("set", 1);
                let _ = obj
                    .borrow_mut()
                    .define_accessor(key, Some(getter), Some(setter), attrs);
            }
            8 => {
                let units = [0xD800 | u16::from(chunk[2]), u16::from(flags)];
                let sym = realm.new_symbol_utf16(&units[..usize::from(flags & 1) + 1]);
                let _ = obj.borrow_mut().set_property(sym, JsValue::Smi(1));
            }
            9 => {
                let _ = js_object::set_prototype_of(&obj, Some(other));
            }
            10 => {
                let _ = js_object::set_prototype_of(&obj, None);
            }
            11 => pool.push(realm.new_date(f64::from(chunk[2]) * 1e13 - 1e15)),
            12 => pool.push(realm.new_regexp("a/b", ["g", "gg", "uv", "dgimsuvy"][usize::from(flags & 3)])),
            13 => {
                let _ = obj.borrow_mut().delete_own_property(&key);
            }
            _ => {
                let _ = obj.borrow_mut().set_property(key, JsValue::HeapNumber(f64::from(flags)));
            }
        }
    }

    let options = InspectorOptions::default()
        .with_accessor_policy(if data.len() % 2 == 0 {
            AccessorPolicy::Split
        } else {
            AccessorPolicy::Resolved
        })
        .with_prototype_policy(if data.len() % 3 == 0 {
            PrototypePolicy::Always
        } else {
            PrototypePolicy::SkipBaseline
        });
    let inspector = Inspector::new(&realm, options);

    for obj in &pool {
        let records = inspector.introspect(obj);
        let mut seen_symbol = false;
        let mut last_string: Option<String> = None;
        for (i, record) in records.iter().enumerate() {
            match &record.key {
                RecordKey::Property(PropertyKey::String(s)) => {
                    assert!(!seen_symbol, "string key after symbol key");
                    if let Some(prev) = &last_string {
                        assert!(compare_string_keys(prev, s).is_le(), "unsorted keys");
                    }
                    last_string = Some(s.clone());
                }
                RecordKey::Property(PropertyKey::Symbol(_)) => seen_symbol = true,
                RecordKey::Prototype => {
                    assert_eq!(i, records.len() - 1, "prototype record not last");
                    assert!(!record.enumerable);
                }
                _ => {}
            }
        }
    }

    let mut tree = NodeList::new();
    inspector.view(&JsValue::Object(Rc::clone(&pool[0])), &mut tree);
    for path in tail.split(|&b| b == 0xff).take(16) {
        let path: Vec<usize> = path.iter().take(8).map(|&b| usize::from(b % 8)).collect();
        let _ = tree.expand_path(&inspector, &path);
    }
    let _ = render_text(&tree);
    let _ = render_markup(&tree);
});
