//! `periscope_core` — a lazily-expanding inspector for JavaScript-style
//! runtime values.
//!
//! # Crate layout
//!
//! - [`objects`] — the value model being inspected: tagged values, objects
//!   with string- and symbol-keyed properties, accessors, functions, arrays,
//!   dates, regular expressions and revocable proxies.
//! - [`realm`] — intrinsic prototypes and the value factory.
//! - [`inspect`] — introspection, type-tagged labels and the lazy tree.
//! - [`error`] — engine error type.

/// Engine error type and result alias.
pub mod error;
/// Introspection, formatting and the lazily-expanded view tree.
pub mod inspect;
/// JavaScript value representation and object types.
pub mod objects;
/// Intrinsic prototypes and the value factory.
pub mod realm;
