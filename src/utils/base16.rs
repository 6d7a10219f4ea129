//! Decoding and encoding of Base 16 a.k.a. hex digits.
//!
//! The Base 16 encoding is defined in [RFC 4648]. It really is just a normal
//! hex-encoding using the (case-insensitive) letters ‘A’ to ‘F’ as
//! additional values for the digits.
//!
//! Presentation format uses uppercase hex for record data of unknown
//! types and for TSIG MACs, so encoding produces uppercase digits.
//!
//! [RFC 4648]: https://tools.ietf.org/html/rfc4648

use core::fmt;

//------------ Convenience Functions -----------------------------------------

/// Decodes a string with Base 16 encoded data.
///
/// Whitespace is not allowed. The string must contain an even number of
/// digits.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let mut res = Vec::with_capacity(s.len() / 2);
    let mut buf: Option<u8> = None;
    for ch in s.chars() {
        let value = ch
            .to_digit(16)
            .ok_or(DecodeError::IllegalChar(ch))? as u8;
        match buf.take() {
            Some(high) => res.push(high << 4 | value),
            None => buf = Some(value),
        }
    }
    if buf.is_some() {
        return Err(DecodeError::ShortInput);
    }
    Ok(res)
}

/// Encodes binary data in Base 16 and writes it into a format stream.
///
/// This function is intended to be used in implementations of formatting
/// traits.
pub fn display<Octets, Target>(octets: &Octets, f: &mut Target) -> fmt::Result
where
    Octets: AsRef<[u8]> + ?Sized,
    Target: fmt::Write,
{
    for &octet in octets.as_ref() {
        write!(f, "{:02X}", octet)?;
    }
    Ok(())
}

/// Encodes binary data in Base 16 and returns the encoded data as a string.
pub fn encode_string<B: AsRef<[u8]> + ?Sized>(bytes: &B) -> String {
    let mut res = String::with_capacity(bytes.as_ref().len() * 2);
    // Writing to a string never fails.
    let _ = display(bytes, &mut res);
    res
}

/// Returns a placeholder value that implements `Display` for encoded data.
pub fn encode_display<Octets: AsRef<[u8]> + ?Sized>(
    octets: &Octets,
) -> impl fmt::Display + '_ {
    struct Display<'a>(&'a [u8]);

    impl<'a> fmt::Display for Display<'a> {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            display(self.0, f)
        }
    }

    Display(octets.as_ref())
}

//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding Base 16 data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// A character that isn’t a hex digit was encountered.
    IllegalChar(char),

    /// The data ended in the middle of an octet.
    ShortInput,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::IllegalChar(ch) => {
                write!(f, "illegal character '{}'", ch)
            }
            DecodeError::ShortInput => f.write_str("incomplete input"),
        }
    }
}

impl std::error::Error for DecodeError {}

//============ Test ==========================================================
