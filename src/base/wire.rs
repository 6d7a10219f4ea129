//! Creating and consuming data in wire format.
//!
//! The [`Parser`] walks over a complete DNS message, the [`Composer`]
//! assembles one. Both keep an explicit position and a stack of saved
//! positions so that code can step back and forth within the message, which
//! is needed for following compression pointers when parsing and for
//! patching lengths and counts after the fact when composing.

use bytes::{Bytes, BytesMut};
use core::fmt;

//------------ Parser --------------------------------------------------------

/// A parser for a complete wire-format DNS message.
///
/// The parser always has access to the full message so that compression
/// pointers can be followed. Reading, however, is limited to an active
/// window. Initially, the window covers the whole message. It can be
/// narrowed via [`enter_window`][Self::enter_window] to the extent of a
/// single record’s data. Trying to read beyond the end of the window
/// results in [`ParseError::ShortInput`] and leaving the window with
/// unread data left in it is a form error.
#[derive(Clone, Debug)]
pub struct Parser<'a> {
    /// The complete message.
    octets: &'a [u8],

    /// The current read position.
    pos: usize,

    /// The end of the active window.
    limit: usize,

    /// Positions stored via `save`.
    saved: Vec<usize>,

    /// The limits to return to when leaving a window.
    windows: Vec<usize>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser atop a message.
    pub fn from_ref(octets: &'a [u8]) -> Self {
        Parser {
            octets,
            pos: 0,
            limit: octets.len(),
            saved: Vec::new(),
            windows: Vec::new(),
        }
    }

    /// Returns the complete underlying message.
    pub fn octets(&self) -> &'a [u8] {
        self.octets
    }

    /// Returns the current read position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the number of octets left in the active window.
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// Moves the read position to `pos`.
    ///
    /// The new position must lie within the active window.
    pub fn seek(&mut self, pos: usize) -> Result<(), ParseError> {
        if pos > self.limit {
            return Err(ParseError::ShortInput);
        }
        self.pos = pos;
        Ok(())
    }

    /// Skips over `len` octets.
    pub fn advance(&mut self, len: usize) -> Result<(), ParseError> {
        self.check_len(len)?;
        self.pos += len;
        Ok(())
    }

    /// Returns an error if fewer than `len` octets are left in the window.
    pub fn check_len(&self, len: usize) -> Result<(), ParseError> {
        if self.remaining() < len {
            Err(ParseError::ShortInput)
        } else {
            Ok(())
        }
    }

    /// Takes the next `len` octets.
    pub fn parse_octets(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        self.check_len(len)?;
        let res = &self.octets[self.pos..self.pos + len];
        self.pos += len;
        Ok(res)
    }

    /// Takes everything left in the active window.
    pub fn parse_remaining(&mut self) -> &'a [u8] {
        let res = &self.octets[self.pos..self.limit];
        self.pos = self.limit;
        res
    }

    /// Takes an octet sized length followed by that many octets.
    pub fn parse_u8_prefixed(&mut self) -> Result<&'a [u8], ParseError> {
        let len = self.parse_u8()?;
        self.parse_octets(usize::from(len))
    }

    /// Takes a 16 bit length followed by that many octets.
    pub fn parse_u16_prefixed(&mut self) -> Result<&'a [u8], ParseError> {
        let len = self.parse_u16()?;
        self.parse_octets(usize::from(len))
    }

    pub fn parse_u8(&mut self) -> Result<u8, ParseError> {
        let res = self.parse_octets(1)?;
        Ok(res[0])
    }

    pub fn parse_u16(&mut self) -> Result<u16, ParseError> {
        let res = self.parse_octets(2)?;
        Ok(u16::from_be_bytes([res[0], res[1]]))
    }

    pub fn parse_u32(&mut self) -> Result<u32, ParseError> {
        let res = self.parse_octets(4)?;
        Ok(u32::from_be_bytes([res[0], res[1], res[2], res[3]]))
    }

    /// Takes a 48 bit unsigned integer.
    pub fn parse_u48(&mut self) -> Result<u64, ParseError> {
        let res = self.parse_octets(6)?;
        let mut buf = [0u8; 8];
        buf[2..].copy_from_slice(res);
        Ok(u64::from_be_bytes(buf))
    }

    /// Pushes the current position onto the stack of saved positions.
    pub fn save(&mut self) {
        self.saved.push(self.pos)
    }

    /// Returns to the most recently saved position.
    ///
    /// # Panics
    ///
    /// The method panics if there is no saved position.
    pub fn restore(&mut self) {
        let pos = self.saved.pop().expect("restore without save");
        self.pos = pos;
    }

    /// Narrows the active window to the next `len` octets.
    pub fn enter_window(&mut self, len: usize) -> Result<(), ParseError> {
        self.check_len(len)?;
        self.windows.push(self.limit);
        self.limit = self.pos + len;
        Ok(())
    }

    /// Leaves the active window and returns to the previous one.
    ///
    /// Returns a form error if data is left in the window. In this case,
    /// the read position stays where it is.
    ///
    /// # Panics
    ///
    /// The method panics if no window has been entered.
    pub fn exit_window(&mut self) -> Result<(), ParseError> {
        let leftover = self.remaining();
        self.limit = self.windows.pop().expect("exit_window without window");
        if leftover != 0 {
            return Err(ParseError::form_error("invalid record length"));
        }
        Ok(())
    }
}

//------------ Composer ------------------------------------------------------

/// A buffer for assembling wire-format data.
///
/// Data is written at the current position which normally is the end of
/// the buffer. Using [`jump`][Self::jump], the position can be moved back
/// to overwrite data that has already been written, typically to fill in
/// a length or count once it is known. [`save`][Self::save] and
/// [`restore`][Self::restore] allow returning to the previous position
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct Composer {
    /// The data assembled so far.
    buf: BytesMut,

    /// The current write position.
    pos: usize,

    /// Positions stored via `save`.
    saved: Vec<usize>,
}

impl Composer {
    /// Creates a new, empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new composer with room for `capacity` octets.
    pub fn with_capacity(capacity: usize) -> Self {
        Composer {
            buf: BytesMut::with_capacity(capacity),
            pos: 0,
            saved: Vec::new(),
        }
    }

    /// Returns the current write position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the length of the data assembled so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Moves the write position to `pos`.
    ///
    /// # Panics
    ///
    /// The method panics if `pos` is beyond the end of the data.
    pub fn jump(&mut self, pos: usize) {
        assert!(pos <= self.buf.len(), "jump beyond end of data");
        self.pos = pos;
    }

    /// Pushes the current position onto the stack of saved positions.
    pub fn save(&mut self) {
        self.saved.push(self.pos)
    }

    /// Returns to the most recently saved position.
    ///
    /// # Panics
    ///
    /// The method panics if there is no saved position.
    pub fn restore(&mut self) {
        let pos = self.saved.pop().expect("restore without save");
        self.pos = pos;
    }

    /// Drops all data from `len` on.
    ///
    /// If the write position was beyond `len`, it is moved to the new end.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
        if self.pos > len {
            self.pos = len
        }
    }

    /// Writes a slice of octets at the current position.
    pub fn append_slice(&mut self, data: &[u8]) {
        let end = self.pos + data.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
    }

    pub fn append_u8(&mut self, value: u8) {
        self.append_slice(&[value])
    }

    pub fn append_u16(&mut self, value: u16) {
        self.append_slice(&value.to_be_bytes())
    }

    pub fn append_u32(&mut self, value: u32) {
        self.append_slice(&value.to_be_bytes())
    }

    /// Writes the lower 48 bits of `value`.
    ///
    /// # Panics
    ///
    /// The method panics if the upper 16 bits of `value` are not zero.
    pub fn append_u48(&mut self, value: u64) {
        assert!(value >> 48 == 0, "value exceeds 48 bits");
        self.append_slice(&value.to_be_bytes()[2..])
    }

    /// Writes a length value as a 16 bit integer.
    pub fn append_u16_len(&mut self, len: usize) -> Result<(), ComposeError> {
        let len = u16::try_from(len).map_err(|_| ComposeError::LongData)?;
        self.append_u16(len);
        Ok(())
    }

    /// Writes a 16 bit value at `pos` and returns to the current position.
    pub fn patch_u16(&mut self, pos: usize, value: u16) {
        self.save();
        self.jump(pos);
        self.append_u16(value);
        self.restore();
    }

    /// Writes data produced by `op` prefixed by its 16 bit length.
    ///
    /// If `op` fails or the data is longer than 65535 octets, everything
    /// written by the call is dropped again.
    pub fn compose_len_prefixed<F>(&mut self, op: F) -> Result<(), ComposeError>
    where
        F: FnOnce(&mut Self) -> Result<(), ComposeError>,
    {
        let start = self.pos;
        self.append_u16(0);
        let res = op(self).and_then(|_| {
            u16::try_from(self.pos - start - 2)
                .map_err(|_| ComposeError::LongData)
        });
        match res {
            Ok(len) => {
                self.patch_u16(start, len);
                Ok(())
            }
            Err(err) => {
                self.truncate(start);
                Err(err)
            }
        }
    }

    /// Returns the data assembled so far.
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Returns the data assembled so far for modification.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// Converts the composer into the assembled data.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl AsRef<[u8]> for Composer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

//============ Error Types ===================================================

//------------ ComposeError --------------------------------------------------

/// An error happened while composing data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComposeError {
    /// A length-prefixed field grew beyond its maximum size.
    LongData,

    /// The available space is too small for even the required data.
    ShortBuf,
}

//--- Display and Error

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ComposeError::LongData => f.write_str("long data"),
            ComposeError::ShortBuf => f.write_str("short buffer"),
        }
    }
}

impl std::error::Error for ComposeError {}

//------------ ParseError ----------------------------------------------------

/// An error happened while parsing data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An attempt was made to go beyond the end of the parser.
    ShortInput,

    /// A formatting error occurred.
    Form(FormError),
}

impl ParseError {
    /// Creates a new parse error as a form error with the given message.
    pub fn form_error(msg: &'static str) -> Self {
        FormError::new(msg).into()
    }
}

//--- From

impl From<FormError> for ParseError {
    fn from(err: FormError) -> Self {
        ParseError::Form(err)
    }
}

//--- Display and Error

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::ShortInput => f.write_str("unexpected end of input"),
            ParseError::Form(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ParseError {}

//------------ FormError -----------------------------------------------------

/// A formatting error occured.
///
/// This is a generic error for all kinds of error cases that result in data
/// not being accepted. For diagnostics, the error is being given a static
/// string describing the error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormError(&'static str);

impl FormError {
    /// Creates a new form error value with the given diagnostics string.
    pub fn new(msg: &'static str) -> Self {
        FormError(msg)
    }
}

//--- Display and Error

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FormError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_integers() {
        let data = b"\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d";
        let mut parser = Parser::from_ref(data);
        assert_eq!(parser.parse_u8(), Ok(1));
        assert_eq!(parser.parse_u16(), Ok(0x0203));
        assert_eq!(parser.parse_u32(), Ok(0x0405_0607));
        assert_eq!(parser.parse_u48(), Ok(0x0809_0a0b_0c0d));
        assert_eq!(parser.remaining(), 0);
        assert_eq!(parser.parse_u8(), Err(ParseError::ShortInput));
    }

    #[test]
    fn save_and_restore() {
        let mut parser = Parser::from_ref(b"\x00\x01\x00\x02");
        parser.save();
        assert_eq!(parser.parse_u16(), Ok(1));
        parser.save();
        assert_eq!(parser.parse_u16(), Ok(2));
        parser.restore();
        assert_eq!(parser.pos(), 2);
        parser.restore();
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    #[should_panic]
    fn restore_without_save() {
        let mut parser = Parser::from_ref(b"");
        parser.restore();
    }

    #[test]
    fn window() {
        let mut parser = Parser::from_ref(b"\x01\x02\x03\x04");
        parser.enter_window(2).unwrap();
        assert_eq!(parser.remaining(), 2);
        assert_eq!(parser.parse_u8(), Ok(1));
        assert_eq!(parser.parse_u16(), Err(ParseError::ShortInput));
        assert_eq!(
            parser.exit_window(),
            Err(ParseError::form_error("invalid record length"))
        );
        assert_eq!(parser.remaining(), 3);

        let mut parser = Parser::from_ref(b"\x01\x02\x03\x04");
        assert_eq!(parser.enter_window(5), Err(ParseError::ShortInput));
        parser.enter_window(2).unwrap();
        assert_eq!(parser.parse_u16(), Ok(0x0102));
        assert!(parser.exit_window().is_ok());
        assert_eq!(parser.parse_u16(), Ok(0x0304));
    }

    #[test]
    fn compose_and_patch() {
        let mut target = Composer::new();
        target.append_u16(0);
        target.append_u32(0xdead_beef);
        target.patch_u16(0, 0x1234);
        assert_eq!(target.pos(), 6);
        assert_eq!(target.as_slice(), b"\x12\x34\xde\xad\xbe\xef");
        target.append_u48(1);
        assert_eq!(target.len(), 12);
        target.truncate(4);
        assert_eq!(target.pos(), 4);
        assert_eq!(target.as_slice(), b"\x12\x34\xde\xad");
    }

    #[test]
    fn len_prefixed() {
        let mut target = Composer::new();
        target
            .compose_len_prefixed(|target| {
                target.append_slice(b"foo");
                Ok(())
            })
            .unwrap();
        assert_eq!(target.as_slice(), b"\x00\x03foo");

        let res = target.compose_len_prefixed(|target| {
            target.append_slice(&[0; 0x10000]);
            Ok(())
        });
        assert_eq!(res, Err(ComposeError::LongData));
        assert_eq!(target.as_slice(), b"\x00\x03foo");
    }
}
