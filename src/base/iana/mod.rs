//! IANA Definitions for DNS.
//!
//! This module contains types for parameters defined in IANA registries
//! that are relevant for this crate.
//!
//! All types defined hereunder follow the same basic structure. They are
//! newtypes around the raw integer with associated constants for all
//! well-defined values. Since we cannot restrict the integer to only the
//! defined values, the full range of values is allowed.
//!
//! There are two methods `from_int()` and `to_int()` to convert from and
//! to raw integer values as well as implementations of the `From` trait
//! for these. `FromStr` and `Display` are implemented to convert from
//! the string codes to the values and back. The `parse()` function and
//! `compose()` method deal with the wire format.
//!
//! While each parameter type has a module of its own, they are all
//! re-exported here.

pub use self::class::Class;
pub use self::opcode::Opcode;
pub use self::rcode::{Rcode, TsigRcode};
pub use self::rtype::Rtype;

#[macro_use]
mod macros;

pub mod class;
pub mod opcode;
pub mod rcode;
pub mod rtype;
