//! Domain name labels.
//!
//! This is a private module. Its public types are re-exported by the parent
//! module.

use crate::base::scan::Symbol;
use core::hash::Hash;
use core::{cmp, fmt, hash};

//------------ Label ---------------------------------------------------------

/// A label within a domain name.
///
/// This type refers to the content of a normal label, i.e., without the
/// length octet. A label with an empty content is the root label.
///
/// Comparison and hashing of labels is case-insensitive for ASCII letters
/// as required by the DNS. The ordering is the canonical ordering defined
/// in section 6.1 of [RFC 4034].
///
/// [RFC 4034]: https://tools.ietf.org/html/rfc4034
#[derive(Clone, Copy)]
pub struct Label<'a>(&'a [u8]);

impl<'a> Label<'a> {
    /// The maximum length of a label’s content.
    pub const MAX_LEN: usize = 63;

    /// Creates a label from its content.
    pub fn from_slice(slice: &'a [u8]) -> Result<Self, LongLabelError> {
        if slice.len() > Self::MAX_LEN {
            Err(LongLabelError)
        } else {
            Ok(Label(slice))
        }
    }

    /// Creates a label without checking the length.
    pub(super) fn from_slice_unchecked(slice: &'a [u8]) -> Self {
        Label(slice)
    }

    /// Returns the content of the label.
    pub fn as_slice(&self) -> &'a [u8] {
        self.0
    }

    /// Returns the length of the label’s content.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether this is the root label.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether this is the wildcard label `*`.
    pub fn is_wildcard(&self) -> bool {
        self.0 == b"*"
    }

    /// Returns the length of the label in wire format.
    pub fn compose_len(&self) -> usize {
        self.0.len() + 1
    }

    /// Compares two labels in canonical order.
    ///
    /// Labels are compared as octet strings after converting ASCII
    /// letters to lowercase with absent octets sorting before all others.
    pub fn canonical_cmp(&self, other: &Self) -> cmp::Ordering {
        self.0
            .iter()
            .map(u8::to_ascii_lowercase)
            .cmp(other.0.iter().map(u8::to_ascii_lowercase))
    }
}

//--- PartialEq and Eq

impl<'a, 'b> PartialEq<Label<'b>> for Label<'a> {
    fn eq(&self, other: &Label<'b>) -> bool {
        self.0.eq_ignore_ascii_case(other.0)
    }
}

impl<'a> Eq for Label<'a> {}

//--- PartialOrd and Ord

impl<'a> PartialOrd for Label<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Label<'a> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.canonical_cmp(other)
    }
}

//--- Hash

impl<'a> hash::Hash for Label<'a> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        // Include the length in the hash so we can simply hash over the
        // labels when building a name’s hash.
        (self.len() as u8).hash(state);
        for c in self.0 {
            c.to_ascii_lowercase().hash(state)
        }
    }
}

//--- Display and Debug

impl<'a> fmt::Display for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &ch in self.0 {
            fmt::Display::fmt(
                &Symbol::display_from_octet(ch, b".\"();@$"),
                f,
            )?;
        }
        Ok(())
    }
}

impl<'a> fmt::Debug for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Label(")?;
        fmt::Display::fmt(self, f)?;
        f.write_str(")")
    }
}

//------------ LongLabelError ------------------------------------------------

/// A label was longer than the allowed 63 octets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LongLabelError;

impl fmt::Display for LongLabelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("long label")
    }
}

impl std::error::Error for LongLabelError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::cmp::Ordering;

    #[test]
    fn from_slice() {
        assert!(Label::from_slice(&[b'x'; 63]).is_ok());
        assert_eq!(
            Label::from_slice(&[b'x'; 64]).unwrap_err(),
            LongLabelError
        );
        assert!(Label::from_slice(b"").unwrap().is_root());
        assert!(Label::from_slice(b"*").unwrap().is_wildcard());
    }

    #[test]
    fn eq_and_cmp() {
        let label = |s: &'static [u8]| Label::from_slice(s).unwrap();
        assert_eq!(label(b"example"), label(b"eXAMple"));
        assert_ne!(label(b"example"), label(b"examples"));

        // Examples from RFC 4034, section 6.1.
        assert_eq!(label(b"a").cmp(&label(b"yljkjljk")), Ordering::Less);
        assert_eq!(label(b"Z").cmp(&label(b"a")), Ordering::Greater);
        assert_eq!(label(b"z").cmp(&label(b"\x01")), Ordering::Greater);
        assert_eq!(label(b"z").cmp(&label(b"*")), Ordering::Greater);
        assert_eq!(label(b"\x00").cmp(&label(b"*")), Ordering::Less);
        assert_eq!(label(b"").cmp(&label(b"\x00")), Ordering::Less);
    }

    #[test]
    fn display() {
        let label = Label::from_slice(b"a.b\\c \x7f").unwrap();
        assert_eq!(label.to_string(), "a\\.b\\\\c\\032\\127");
    }
}
