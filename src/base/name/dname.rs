//! Domain names.
//!
//! This is a private module. Its public types are re-exported by the parent
//! module.

use super::compress::Compressor;
use super::label::Label;
use crate::base::scan::{Scanner, ScanError, Symbol};
use crate::base::wire::{Composer, ParseError, Parser};
use bytes::{Bytes, BytesMut};
use core::hash::Hash;
use core::{cmp, fmt, hash, str::FromStr};
use smallvec::SmallVec;

//------------ Name ----------------------------------------------------------

/// A domain name.
///
/// The name is kept in its uncompressed wire format representation. It is
/// a sequence of labels, each preceded by its length. A name that ends in
/// the empty root label is absolute, otherwise it is relative. Relative
/// names are only ever used while processing presentation format and must
/// be made absolute before they can become part of a record.
///
/// Names are immutable. Cloning is cheap since the octets are reference
/// counted.
///
/// Comparison and hashing ignore ASCII case. Ordering follows the canonical
/// DNS name order of [RFC 4034], section 6.1: names are compared label by
/// label starting with the rightmost label, i.e., the root.
///
/// [RFC 4034]: https://tools.ietf.org/html/rfc4034
#[derive(Clone)]
pub struct Name {
    octets: Bytes,
}

/// # Creation
impl Name {
    /// The maximum length of a domain name in wire format.
    pub const MAX_LEN: usize = 255;

    /// Returns the root name.
    pub fn root() -> Self {
        Name {
            octets: Bytes::from_static(b"\0"),
        }
    }

    /// Creates a name from its uncompressed wire format.
    ///
    /// The octets must be a sequence of labels of at most 63 octets. An
    /// empty label may only appear at the very end. The total length must
    /// not exceed 255 octets.
    pub fn from_octets(octets: impl Into<Bytes>) -> Result<Self, NameError> {
        let octets = octets.into();
        Self::check_octets(&octets)?;
        Ok(Name { octets })
    }

    fn check_octets(octets: &[u8]) -> Result<(), NameError> {
        if octets.is_empty() {
            return Err(NameError::EmptyName);
        }
        if octets.len() > Self::MAX_LEN {
            return Err(NameError::LongName);
        }
        let mut pos = 0;
        while pos < octets.len() {
            let len = usize::from(octets[pos]);
            if len > Label::MAX_LEN {
                return Err(NameError::LongLabel);
            }
            if len == 0 && pos + 1 != octets.len() {
                return Err(NameError::EmptyLabel);
            }
            pos += len + 1;
        }
        if pos != octets.len() {
            return Err(NameError::ShortInput);
        }
        Ok(())
    }

    /// Creates a name from a sequence of label contents.
    ///
    /// If `absolute` is true, the root label is appended.
    pub fn from_labels<'a, I>(labels: I, absolute: bool) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut res = BytesMut::new();
        for label in labels {
            if label.is_empty() {
                return Err(NameError::EmptyLabel);
            }
            if label.len() > Label::MAX_LEN {
                return Err(NameError::LongLabel);
            }
            res.extend_from_slice(&[label.len() as u8]);
            res.extend_from_slice(label);
        }
        if absolute {
            res.extend_from_slice(b"\0");
        }
        Self::from_octets(res.freeze())
    }

    /// Takes a possibly compressed name from the beginning of a parser.
    ///
    /// Compression pointers must point to an earlier position than the
    /// pointer itself. The decompressed name must not exceed 255 octets.
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let octets = parser.octets();
        let mut res = SmallVec::<[u8; 64]>::new();

        // Once we followed a pointer, we read directly from the message
        // and leave the parser alone.
        let mut jumped: Option<usize> = None;

        loop {
            let (len_pos, len) = match jumped {
                None => (parser.pos(), parser.parse_u8()?),
                Some(pos) => {
                    let len = *octets.get(pos).ok_or(ParseError::ShortInput)?;
                    (pos, len)
                }
            };
            match len & 0xC0 {
                0x00 => {
                    let len = usize::from(len);
                    if res.len() + len + 1 > Self::MAX_LEN {
                        return Err(ParseError::form_error("long domain name"));
                    }
                    let label = match jumped {
                        None => parser.parse_octets(len)?,
                        Some(pos) => {
                            let label = octets
                                .get(pos + 1..pos + 1 + len)
                                .ok_or(ParseError::ShortInput)?;
                            jumped = Some(pos + 1 + len);
                            label
                        }
                    };
                    res.push(len as u8);
                    res.extend_from_slice(label);
                    if len == 0 {
                        break;
                    }
                }
                0xC0 => {
                    let low = match jumped {
                        None => parser.parse_u8()?,
                        Some(pos) => {
                            *octets.get(pos + 1).ok_or(ParseError::ShortInput)?
                        }
                    };
                    let target =
                        (usize::from(len & 0x3F) << 8) | usize::from(low);
                    if target >= len_pos {
                        return Err(ParseError::form_error(
                            "forward compression pointer",
                        ));
                    }
                    jumped = Some(target);
                }
                _ => return Err(ParseError::form_error("invalid label type")),
            }
        }
        Ok(Name {
            octets: Bytes::copy_from_slice(&res),
        })
    }

    /// Scans a name from the next token.
    ///
    /// A relative name is made absolute by appending `origin` if given. The
    /// token `@` stands for the origin itself.
    pub fn scan(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        let token = scanner.scan_str()?;
        let name = if token == "@" {
            match origin {
                Some(origin) => return Ok(origin.clone()),
                None => return Err(scanner.error("no origin for @")),
            }
        } else {
            Name::from_str(token).map_err(|err| scanner.error(err.as_str()))?
        };
        match origin {
            Some(origin) if !name.is_absolute() => name
                .concat(origin)
                .map_err(|err| scanner.error(err.as_str())),
            _ => Ok(name),
        }
    }

    /// Scans a name that must end up absolute.
    pub fn scan_absolute(
        scanner: &mut Scanner,
        origin: Option<&Name>,
    ) -> Result<Self, ScanError> {
        let name = Self::scan(scanner, origin)?;
        if name.is_absolute() {
            Ok(name)
        } else {
            Err(scanner.error(NameError::RelativeName.as_str()))
        }
    }
}

/// # Properties
impl Name {
    /// Returns the uncompressed wire format of the name.
    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns the underlying octets.
    pub fn as_octets(&self) -> &Bytes {
        &self.octets
    }

    /// Returns the length of the uncompressed wire format.
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    /// Returns whether the name ends in the root label.
    pub fn is_absolute(&self) -> bool {
        self.octets.last() == Some(&0)
    }

    /// Returns whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.octets.as_ref() == b"\0"
    }

    /// Returns whether the leftmost label is the wildcard label `*`.
    pub fn is_wildcard(&self) -> bool {
        self.octets.starts_with(b"\x01*")
    }

    /// Returns an iterator over the labels of the name.
    ///
    /// For absolute names, the last label is the root label.
    pub fn iter_labels(&self) -> LabelIter {
        LabelIter {
            octets: self.as_slice(),
        }
    }

    /// Returns the number of labels including the root label.
    pub fn label_count(&self) -> usize {
        self.iter_labels().count()
    }

    /// Returns the first label.
    pub fn first(&self) -> Label {
        // Every name has at least one label by construction.
        let len = usize::from(self.octets[0]);
        Label::from_slice_unchecked(&self.octets[1..=len])
    }

    /// Returns the start positions of all labels.
    fn label_starts(&self) -> SmallVec<[usize; 16]> {
        let mut res = SmallVec::new();
        let mut pos = 0;
        while pos < self.octets.len() {
            res.push(pos);
            pos += usize::from(self.octets[pos]) + 1;
        }
        res
    }

    /// Returns an iterator over the name and all its suffixes.
    ///
    /// The iterator starts with the name itself and ends with its last
    /// label alone, i.e., the root name for absolute names.
    pub fn iter_suffixes(&self) -> impl Iterator<Item = Name> + '_ {
        self.label_starts().into_iter().map(move |start| Name {
            octets: self.octets.slice(start..),
        })
    }

    /// Returns the parent of the name.
    ///
    /// Returns `None` for the root name and single-label relative names.
    pub fn parent(&self) -> Option<Name> {
        let start = usize::from(self.octets[0]) + 1;
        if start >= self.octets.len() {
            None
        } else {
            Some(Name {
                octets: self.octets.slice(start..),
            })
        }
    }

    /// Returns whether `base` is a suffix of this name.
    ///
    /// Suffixes are matched on label boundaries and without regard to
    /// ASCII case.
    pub fn ends_with(&self, base: &Name) -> bool {
        self.iter_suffixes().any(|suffix| suffix == *base)
    }

    /// Returns a new name by appending `origin` to this relative name.
    pub fn concat(&self, origin: &Name) -> Result<Name, NameError> {
        if self.is_absolute() {
            return Err(NameError::AbsoluteName);
        }
        let mut res = BytesMut::with_capacity(self.len() + origin.len());
        res.extend_from_slice(self.as_slice());
        res.extend_from_slice(origin.as_slice());
        Self::from_octets(res.freeze())
    }

    /// Returns a copy of the name with all ASCII letters lowercase.
    pub fn to_canonical(&self) -> Name {
        Name {
            octets: Bytes::from(self.octets.to_ascii_lowercase()),
        }
    }
}

/// # Composing
impl Name {
    /// Appends the name to a composer.
    ///
    /// If a compressor is given and the name is absolute, the name is
    /// compressed and all newly written suffixes are recorded for future
    /// reference.
    pub fn compose(&self, target: &mut Composer, compressor: Option<&mut Compressor>) {
        let compressor = match compressor {
            Some(compressor) if self.is_absolute() => compressor,
            _ => {
                target.append_slice(self.as_slice());
                return;
            }
        };
        for suffix in self.iter_suffixes() {
            if suffix.is_root() {
                target.append_u8(0);
                return;
            }
            if let Some(pos) = compressor.get(&suffix) {
                target.append_u16(0xC000 | pos);
                return;
            }
            compressor.insert(&suffix, target.pos());
            let label = suffix.first();
            target.append_u8(label.len() as u8);
            target.append_slice(label.as_slice());
        }
    }

    /// Appends the canonical form of the name: uncompressed and lowercase.
    pub fn compose_canonical(&self, target: &mut Composer) {
        // Length octets are below 64 and thus not affected by lowercasing.
        for &ch in self.as_slice() {
            target.append_u8(ch.to_ascii_lowercase())
        }
    }
}

//--- FromStr

impl FromStr for Name {
    type Err = NameError;

    /// Creates a name from its presentation format.
    ///
    /// A trailing dot makes the name absolute. The string `"."` is the root
    /// name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "." {
            return Ok(Name::root());
        }
        if s.is_empty() {
            return Err(NameError::EmptyName);
        }
        let mut res = BytesMut::with_capacity(s.len() + 2);
        let mut label_start = 0;
        res.extend_from_slice(b"\0");
        let mut chars = s.chars();
        let mut absolute = false;
        while let Some(sym) =
            Symbol::from_chars(&mut chars).map_err(|_| NameError::BadEscape)?
        {
            if sym.is_char('.') {
                let len = res.len() - label_start - 1;
                if len == 0 {
                    return Err(NameError::EmptyLabel);
                }
                res[label_start] = len as u8;
                if chars.as_str().is_empty() {
                    absolute = true;
                } else {
                    label_start = res.len();
                    res.extend_from_slice(b"\0");
                }
                continue;
            }
            let ch = sym.into_octet().map_err(|_| NameError::BadEscape)?;
            res.extend_from_slice(&[ch]);
            if res.len() - label_start - 1 > Label::MAX_LEN {
                return Err(NameError::LongLabel);
            }
        }
        if absolute {
            res.extend_from_slice(b"\0");
        } else {
            res[label_start] = (res.len() - label_start - 1) as u8;
        }
        Self::from_octets(res.freeze())
    }
}

//--- PartialEq and Eq

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.octets.eq_ignore_ascii_case(&other.octets)
    }
}

impl Eq for Name {}

//--- PartialOrd and Ord

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Compares names in canonical order.
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let left: SmallVec<[Label; 16]> = self.iter_labels().collect();
        let right: SmallVec<[Label; 16]> = other.iter_labels().collect();
        for (l, r) in left.iter().rev().zip(right.iter().rev()) {
            match l.canonical_cmp(r) {
                cmp::Ordering::Equal => {}
                res => return res,
            }
        }
        left.len().cmp(&right.len())
    }
}

//--- Hash

impl hash::Hash for Name {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for label in self.iter_labels() {
            label.hash(state)
        }
    }
}

//--- Display and Debug

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        let mut first = true;
        for label in self.iter_labels() {
            if label.is_root() {
                f.write_str(".")?;
                break;
            }
            if !first {
                f.write_str(".")?;
            }
            first = false;
            fmt::Display::fmt(&label, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

//------------ LabelIter -----------------------------------------------------

/// An iterator over the labels of a name.
#[derive(Clone, Debug)]
pub struct LabelIter<'a> {
    octets: &'a [u8],
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = Label<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.octets.split_first()?;
        let (label, rest) = rest.split_at(usize::from(len));
        self.octets = rest;
        Some(Label::from_slice_unchecked(label))
    }
}

//------------ NameError -----------------------------------------------------

/// An error happened while creating a domain name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameError {
    /// The name would have been longer than 255 octets.
    LongName,

    /// A label was longer than 63 octets.
    LongLabel,

    /// An empty label appeared somewhere other than at the end.
    EmptyLabel,

    /// The name had no labels at all.
    EmptyName,

    /// The wire format ended in the middle of a label.
    ShortInput,

    /// An illegal escape sequence was encountered.
    BadEscape,

    /// A relative name was given where an absolute one is required.
    RelativeName,

    /// An absolute name was given where a relative one is required.
    AbsoluteName,
}

impl NameError {
    /// Returns a static description of the error.
    pub fn as_str(self) -> &'static str {
        match self {
            NameError::LongName => "long domain name",
            NameError::LongLabel => "long label",
            NameError::EmptyLabel => "empty label",
            NameError::EmptyName => "empty domain name",
            NameError::ShortInput => "unexpected end of input",
            NameError::BadEscape => "illegal escape sequence",
            NameError::RelativeName => "relative domain name",
            NameError::AbsoluteName => "absolute domain name",
        }
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for NameError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use core::cmp::Ordering;
    use rstest::rstest;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(name(".").as_slice(), b"\0");
        assert_eq!(name("www.example.com.").as_slice(), b"\x03www\x07example\x03com\0");
        assert_eq!(name("www.example").as_slice(), b"\x03www\x07example");
        assert_eq!(name("a\\.b.c.").as_slice(), b"\x03a.b\x01c\0");
        assert_eq!(name("\\065.").as_slice(), b"\x01A\0");
        assert!(name("example.com.").is_absolute());
        assert!(!name("example.com").is_absolute());
    }

    #[rstest]
    #[case("", NameError::EmptyName)]
    #[case("a..b.", NameError::EmptyLabel)]
    #[case(".a", NameError::EmptyLabel)]
    #[case("a\\", NameError::BadEscape)]
    #[case("a\\300.", NameError::BadEscape)]
    fn from_str_errors(#[case] input: &str, #[case] err: NameError) {
        assert_eq!(Name::from_str(input), Err(err));
    }

    #[test]
    fn long_names() {
        let label = "x".repeat(64);
        assert_eq!(Name::from_str(&label), Err(NameError::LongLabel));
        let long = format!("{0}.{0}.{0}.{0}.", "x".repeat(63));
        assert_eq!(Name::from_str(&long), Err(NameError::LongName));
        let fits = format!("{0}.{0}.{0}.{1}.", "x".repeat(63), "x".repeat(61));
        assert_eq!(name(&fits).len(), 255);
    }

    #[test]
    fn display() {
        assert_eq!(name(".").to_string(), ".");
        assert_eq!(name("www.example.com.").to_string(), "www.example.com.");
        assert_eq!(name("www.example").to_string(), "www.example");
        assert_eq!(name("a\\.b.c.").to_string(), "a\\.b.c.");
        assert_eq!(
            Name::from_octets(&b"\x02a\x01\0"[..]).unwrap().to_string(),
            "a\\001."
        );
    }

    #[test]
    fn eq_and_hash() {
        use std::collections::HashSet;

        assert_eq!(name("WWW.Example.COM."), name("www.example.com."));
        assert_ne!(name("www.example.com."), name("www.example.com"));
        let mut set = HashSet::new();
        set.insert(name("Example.Com."));
        assert!(set.contains(&name("example.com.")));
    }

    #[test]
    fn canonical_order() {
        // The example from RFC 4034, section 6.1.
        let ordered = [
            "example.",
            "a.example.",
            "yljkjljk.a.example.",
            "Z.a.example.",
            "zABC.a.EXAMPLE.",
            "z.example.",
            "\\001.z.example.",
            "*.z.example.",
            "\\200.z.example.",
        ];
        for pair in ordered.windows(2) {
            assert_eq!(
                name(pair[0]).cmp(&name(pair[1])),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn suffixes() {
        let n = name("www.Example.com.");
        let suffixes: Vec<_> = n.iter_suffixes().map(|s| s.to_string()).collect();
        assert_eq!(suffixes, ["www.Example.com.", "Example.com.", "com.", "."]);
        assert!(n.ends_with(&name("example.COM.")));
        assert!(!n.ends_with(&name("ample.com.")));
        assert_eq!(n.parent(), Some(name("example.com.")));
        assert_eq!(Name::root().parent(), None);
        assert_eq!(n.label_count(), 4);
        assert_eq!(n.to_canonical().as_slice(), b"\x03www\x07example\x03com\0");
        assert!(name("*.example.").is_wildcard());
        assert!(!name("a.*.example.").is_wildcard());
    }

    #[test]
    fn concat() {
        assert_eq!(
            name("www").concat(&name("example.com.")),
            Ok(name("www.example.com."))
        );
        assert_eq!(
            name("www.").concat(&name("example.com.")),
            Err(NameError::AbsoluteName)
        );
    }

    #[test]
    fn from_octets() {
        assert!(Name::from_octets(&b"\x03www\x07example\x03com\0"[..]).is_ok());
        assert_eq!(
            Name::from_octets(&b"\x03www\0\x03com\0"[..]),
            Err(NameError::EmptyLabel)
        );
        assert_eq!(
            Name::from_octets(&b"\x05www\0"[..]),
            Err(NameError::ShortInput)
        );
        assert_eq!(
            Name::from_octets(&b"\x40"[..]),
            Err(NameError::LongLabel)
        );
    }

    #[test]
    fn parse_compressed() {
        // "example.com." at 2, "www" + pointer to 2 at 15.
        let msg = b"\xff\xff\x07example\x03com\x00\x03www\xc0\x02\x01x";
        let mut parser = Parser::from_ref(msg);
        parser.advance(2).unwrap();
        assert_eq!(Name::parse(&mut parser).unwrap(), name("example.com."));
        assert_eq!(Name::parse(&mut parser).unwrap(), name("www.example.com."));
        assert_eq!(parser.pos(), 21);
    }

    #[test]
    fn parse_bad_pointers() {
        // Pointer to itself.
        let mut parser = Parser::from_ref(b"\x03www\xc0\x04");
        assert_eq!(
            Name::parse(&mut parser),
            Err(ParseError::form_error("forward compression pointer"))
        );

        // Pointer forward.
        let mut parser = Parser::from_ref(b"\xc0\x02\x00");
        assert_eq!(
            Name::parse(&mut parser),
            Err(ParseError::form_error("forward compression pointer"))
        );

        // Label types 01 and 10.
        let mut parser = Parser::from_ref(b"\x41\x00");
        assert_eq!(
            Name::parse(&mut parser),
            Err(ParseError::form_error("invalid label type"))
        );

        // Missing root label.
        let mut parser = Parser::from_ref(b"\x03www");
        assert_eq!(Name::parse(&mut parser), Err(ParseError::ShortInput));
    }

    #[test]
    fn parse_pointer_loop() {
        // A label followed by a pointer back to it would loop forever if
        // not for the length limit.
        let mut parser = Parser::from_ref(b"\x01a\xc0\x00");
        parser.advance(2).unwrap();
        assert_eq!(
            Name::parse(&mut parser),
            Err(ParseError::form_error("long domain name"))
        );
    }

    #[test]
    fn compose_canonical() {
        let mut target = Composer::new();
        name("WWW.Example.").compose_canonical(&mut target);
        assert_eq!(target.as_slice(), b"\x03www\x07example\x00");
    }
}
