#![no_main]

use libfuzzer_sys::fuzz_target;
use periscope_core::inspect::{RecordKey, TypeTag, format};
use periscope_core::objects::property::PropertyKey;
use periscope_core::objects::value::JsValue;
use periscope_core::realm::Realm;

// Format arbitrary primitives, dates, patterns and symbol keys.  The
// formatter is total: it must never panic and must always produce a label
// whose type tag matches the value's shape.
//
//   byte 0       – value selector
//   bytes 1..9   – f64 / i32 payload
//   rest         – text payload (lossy UTF-8) and UTF-16 key units
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let realm = Realm::new();
    let mut payload = [0u8; 8];
    payload.copy_from_slice(&data[1..9]);
    let number = f64::from_le_bytes(payload);
    let rest = &data[9..];
    let text = String::from_utf8_lossy(rest).into_owned();
    let units: Vec<u16> = rest
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let (value, expected) = match data[0] % 7 {
        0 => (JsValue::HeapNumber(number), TypeTag::Number),
        1 => (JsValue::Smi(number.to_bits() as i32), TypeTag::Number),
        2 => (JsValue::from(text.clone()), TypeTag::String),
        3 => (JsValue::Object(realm.new_date(number)), TypeTag::Object),
        4 => {
            let mid = (0..=text.len() / 2)
                .rev()
                .find(|&i| text.is_char_boundary(i))
                .unwrap_or(0);
            let (source, flags) = text.split_at(mid);
            (JsValue::Object(realm.new_regexp(source, flags)), TypeTag::Object)
        }
        5 => (JsValue::Symbol(realm.new_symbol_utf16(&units)), TypeTag::Symbol),
        _ => (JsValue::BigInt(i128::from(number.to_bits() as i64)), TypeTag::BigInt),
    };

    let key = RecordKey::Property(PropertyKey::Symbol(realm.new_symbol_utf16(&units)));
    let label = format(&key, &value, data[0] & 0x80 == 0);
    assert_eq!(label.type_tag, expected);
    assert!(!label.key.is_empty());
    let _ = label.to_string();
});
