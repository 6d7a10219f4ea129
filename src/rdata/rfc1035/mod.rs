//! Record data from [RFC 1035]: initial record types.
//!
//! This RFC defines the initial set of record types. Most of them share one
//! of a few shapes: a single domain name, a preference value followed by a
//! domain name, or a sequence of character strings. Each shape is one type
//! that is used for all record types of that shape.
//!
//! The MX-like shape also covers the later AFSDB, RT, and KX types and the
//! character string shape the SPF type.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

pub use self::a::A;
pub use self::name::SingleName;
pub use self::prefname::PrefName;
pub use self::soa::Soa;
pub use self::strings::Strings;

mod a;
mod name;
mod prefname;
mod soa;
mod strings;
