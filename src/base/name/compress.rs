//! Name compression.
//!
//! This is a private module. Its public types are re-exported by the parent
//! module.

use super::dname::Name;
use std::collections::HashMap;

//------------ Compressor ----------------------------------------------------

/// The compression table for composing a single message.
///
/// The table maps domain names to the position in the message where they
/// have first been written. Since a compression pointer only has 14 bits
/// for the position, names written at or beyond position 0x4000 are never
/// recorded.
///
/// A new compressor needs to be used for each message. If a message is
/// truncated during composition, [`truncate`][Self::truncate] needs to be
/// called so that no name refers to a discarded part of the message.
#[derive(Clone, Debug, Default)]
pub struct Compressor {
    /// The names written so far and their positions.
    ///
    /// Since names compare ignoring ASCII case, so does the map.
    names: HashMap<Name, u16>,
}

impl Compressor {
    /// The largest position a compression pointer can refer to.
    pub const MAX_POS: usize = 0x3FFF;

    /// Creates a new, empty compressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position of a previous occurrence of `name`.
    pub fn get(&self, name: &Name) -> Option<u16> {
        self.names.get(name).copied()
    }

    /// Records that `name` has been written at `pos`.
    ///
    /// If the name already is in the table or `pos` cannot be reached by a
    /// compression pointer, nothing happens.
    pub fn insert(&mut self, name: &Name, pos: usize) {
        if pos > Self::MAX_POS {
            return;
        }
        self.names.entry(name.clone()).or_insert(pos as u16);
    }

    /// Forgets all names written at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.names.retain(|_, pos| usize::from(*pos) < len)
    }

    /// Returns the number of names in the table.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::wire::Composer;
    use core::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn compress_names() {
        let mut target = Composer::new();
        let mut compressor = Compressor::new();
        name("www.example.com.").compose(&mut target, Some(&mut compressor));
        name("mail.EXAMPLE.com.").compose(&mut target, Some(&mut compressor));
        name("example.org.").compose(&mut target, Some(&mut compressor));
        name("www.example.com.").compose(&mut target, Some(&mut compressor));
        name(".").compose(&mut target, Some(&mut compressor));
        assert_eq!(
            target.as_slice(),
            b"\x03www\x07example\x03com\x00\
              \x04mail\xc0\x04\
              \x07example\x03org\x00\
              \xc0\x00\
              \x00"
        );
    }

    #[test]
    fn no_pointers_beyond_limit() {
        let mut target = Composer::new();
        let mut compressor = Compressor::new();
        target.append_slice(&[0; 0x4000]);
        name("example.com.").compose(&mut target, Some(&mut compressor));
        assert!(compressor.is_empty());
        name("example.com.").compose(&mut target, Some(&mut compressor));
        assert_eq!(
            &target.as_slice()[0x4000..],
            b"\x07example\x03com\x00\x07example\x03com\x00"
        );
    }

    #[test]
    fn truncate() {
        let mut compressor = Compressor::new();
        compressor.insert(&name("example.com."), 12);
        compressor.insert(&name("com."), 20);
        compressor.insert(&name("example.com."), 40);
        assert_eq!(compressor.get(&name("EXAMPLE.com.")), Some(12));
        compressor.truncate(20);
        assert_eq!(compressor.get(&name("com.")), None);
        assert_eq!(compressor.len(), 1);
    }
}
