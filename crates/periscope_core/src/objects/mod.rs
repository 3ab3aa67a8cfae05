/// JavaScript Date objects' time value and ISO formatting.
pub mod js_date;
/// JavaScript function objects: script functions and native callbacks.
pub mod js_function;
/// JavaScript objects with ordered property storage and a prototype link.
pub mod js_object;
/// Revocable, trap-less proxy objects.
pub mod js_proxy;
/// JavaScript RegExp objects' source and flags.
pub mod js_regexp;
/// Property keys, attributes and slots.
pub mod property;
/// Top-level JavaScript value enum and symbols.
pub mod value;
