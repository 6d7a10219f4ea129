//! Domain names.
//!
//! This module contains the [`Name`] type for domain names, the [`Label`]
//! type for the labels they consist of, and the [`Compressor`] used for
//! name compression when composing messages.
//!
//! Names are kept in uncompressed wire format. When parsing names from a
//! message, compression pointers are resolved. When composing a message,
//! a [`Compressor`] is handed to each name composition that is allowed to
//! be compressed. Whether that is the case depends on where the name
//! appears: owner names of records can always be compressed while names
//! within record data can only be compressed for the record types defined
//! in RFC 1035.

pub use self::compress::Compressor;
pub use self::dname::{LabelIter, Name, NameError};
pub use self::label::{Label, LongLabelError};

mod compress;
mod dname;
mod label;
