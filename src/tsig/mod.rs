//! Support for TSIG.
//!
//! This module provides support for signing message exchanges with TSIG as
//! defined in [RFC 8945].
//!
//! TSIG is intended to provide authentication for message exchanges. Messages
//! are signed using a secret key shared between the two participants. The
//! party sending the request generates a signature over the message using
//! that key and adds it in a special record of record type [TSIG] to the
//! additional section of the message. The receiver verifies the signature
//! using the same key. When creating an answer, it too generates a signature
//! which includes the request’s signature in order to bind request and
//! answer together.
//!
//! TSIG supports a number of algorithms. The specification asks for
//! HMAC-MD5 defined in [RFC 2104]. Since MD5 is widely regarded as unsafe
//! now, we don’t follow that rule and only support the SHA-based
//! algorithms. A record using any other algorithm is treated as using an
//! unknown key. You can choose the algorithm to use for your keys via the
//! [`Algorithm`] enum.
//!
//! Keys are managed via the [`Key`] type. Each key ties together the secret,
//! the algorithm, and a name which is in fact a domain name. [`Key`] values
//! also manage signature truncation.
//!
//! A message is signed by attaching a [`TsigSigning`] value to it via
//! [`Message::set_tsig`]. The signature is then created whenever the wire
//! format of the message is produced. A received message is checked via
//! [`Key::verify`]. Answers that consist of a sequence of messages, such as
//! zone transfers, are produced with a [`StreamSigner`] and checked with a
//! [`StreamVerifier`]. Only some messages of such a sequence need to be
//! signed.
//!
//! [RFC 2104]: https://tools.ietf.org/html/rfc2104
//! [RFC 8945]: https://tools.ietf.org/html/rfc8945
//! [TSIG]: crate::rdata::Tsig
#![cfg(feature = "tsig")]

use crate::base::header::HeaderSection;
use crate::base::iana::{Class, TsigRcode};
use crate::base::message::{Message, TsigState};
use crate::base::name::Name;
use crate::base::record::Record;
use crate::base::wire::ComposeError;
use crate::rdata::tsig::{Time48, Tsig};
use crate::rdata::RecordData;
use crate::utils::config::DefMinMax;
use base64::Engine;
use bytes::Bytes;
use core::{cmp, fmt, mem, str};
use ring::{constant_time, hkdf::KeyType, hmac, rand};
use std::sync::Arc;
use tracing::{debug, trace};

//------------ Configuration -------------------------------------------------

/// The permitted clock skew in seconds for new signatures.
pub const FUDGE: DefMinMax<u16> = DefMinMax::new(300, 0, u16::MAX);

/// The number of unsigned messages allowed in a row within a sequence.
///
/// The message following that many unsigned messages must be signed.
pub const MAX_UNSIGNED: DefMinMax<usize> = DefMinMax::new(99, 0, 99);

//------------ Key -----------------------------------------------------------

/// A key for creating and validating TSIG signatures.
///
/// For the algorithms included in this implementation, keys are octet
/// strings of any length. They are tied to the algorithm they are used
/// with and identified by a domain name.
///
/// Signatures may be truncated. The key keeps both the minimum length of
/// received signatures it accepts and the length of the signatures it
/// creates. By default, received signatures as short as the algorithm
/// allows are accepted and created signatures are not truncated.
#[derive(Debug)]
pub struct Key {
    /// The key’s bits.
    key: hmac::Key,

    /// The algorithm of the key.
    algorithm: Algorithm,

    /// The name of the key as an absolute domain name.
    name: Name,

    /// Minimum length of received signatures.
    ///
    /// This is guaranteed to be within the bounds of the algorithm: at
    /// least 10 and at least half the algorithm’s native signature length.
    /// It will also be no larger than the native signature length.
    min_mac_len: usize,

    /// The length of a signature created with this key.
    ///
    /// This has the same bounds as `min_mac_len`.
    signing_len: usize,
}

/// # Creating Keys
///
impl Key {
    /// Creates a new key from its components.
    ///
    /// If `min_mac_len` is not `None`, the key will accept received
    /// signatures truncated to the given length. If `signing_len` is not
    /// `None`, the signatures produced with this key will be truncated to
    /// the given length. Both values must be within the bounds given by
    /// [`Algorithm::within_len_bounds`] or an error is returned.
    pub fn new(
        algorithm: Algorithm,
        secret: &[u8],
        name: Name,
        min_mac_len: Option<usize>,
        signing_len: Option<usize>,
    ) -> Result<Self, NewKeyError> {
        if !name.is_absolute() {
            return Err(NewKeyError::RelativeName);
        }
        let (min_mac_len, signing_len) =
            Self::calculate_bounds(algorithm, min_mac_len, signing_len)?;
        Ok(Key {
            key: hmac::Key::new(algorithm.into_hmac_algorithm(), secret),
            algorithm,
            name,
            min_mac_len,
            signing_len,
        })
    }

    /// Creates a key from a base64 encoded secret.
    ///
    /// This is the form secrets are usually exchanged in.
    pub fn from_base64(
        algorithm: Algorithm,
        name: Name,
        secret: &str,
    ) -> Result<Self, NewKeyError> {
        let secret = base64::engine::general_purpose::STANDARD
            .decode(secret)
            .map_err(|_| NewKeyError::BadSecret)?;
        Self::new(algorithm, &secret, name, None, None)
    }

    /// Generates a new signing key.
    ///
    /// This is similar to [`new`][Self::new] but generates the bits for the
    /// key from the given `rng`. It returns both the key and bits for
    /// exporting.
    pub fn generate(
        algorithm: Algorithm,
        rng: &dyn rand::SecureRandom,
        name: Name,
        min_mac_len: Option<usize>,
        signing_len: Option<usize>,
    ) -> Result<(Self, Bytes), GenerateKeyError> {
        let mut bytes = vec![0; algorithm.native_len()];
        rng.fill(&mut bytes)?;
        let key = Self::new(algorithm, &bytes, name, min_mac_len, signing_len)?;
        Ok((key, bytes.into()))
    }

    /// Calculates the bounds to use in the key.
    fn calculate_bounds(
        algorithm: Algorithm,
        min_mac_len: Option<usize>,
        signing_len: Option<usize>,
    ) -> Result<(usize, usize), NewKeyError> {
        let min_mac_len = match min_mac_len {
            Some(len) => {
                if !algorithm.within_len_bounds(len) {
                    return Err(NewKeyError::BadMinMacLen);
                }
                len
            }
            None => algorithm.min_len(),
        };
        let signing_len = match signing_len {
            Some(len) => {
                if !algorithm.within_len_bounds(len) {
                    return Err(NewKeyError::BadSigningLen);
                }
                len
            }
            None => algorithm.native_len(),
        };
        Ok((min_mac_len, signing_len))
    }

    /// Creates a signing context for this key.
    fn signing_context(&self) -> hmac::Context {
        hmac::Context::with_key(&self.key)
    }

    /// Returns a the possibly truncated slice of the signature.
    fn signature_slice<'a>(&self, signature: &'a hmac::Tag) -> &'a [u8] {
        &signature.as_ref()[..self.signing_len]
    }
}

/// # Access to Properties
///
impl Key {
    /// Returns the algorithm of this key.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns a reference to the name of this key.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the native length of the signature from this key.
    pub fn native_len(&self) -> usize {
        self.algorithm.native_len()
    }

    /// Returns the minimum acceptable length of a received signature.
    pub fn min_mac_len(&self) -> usize {
        self.min_mac_len
    }

    /// Returns the length of a signature generated by this key.
    pub fn signing_len(&self) -> usize {
        self.signing_len
    }
}

/// # Verification
///
impl Key {
    /// Verifies the signature of a received message.
    ///
    /// The message must have been parsed from its wire format. If the
    /// message is an answer, `request_mac` must be the signature of the
    /// request it answers.
    ///
    /// Returns `TsigRcode::NOERROR` if the signature is valid. Otherwise
    /// returns `FORMERR` if the message isn’t signed at all, `BADKEY` if
    /// it was signed with a different key or algorithm, `BADTIME` if `now`
    /// is outside the signature’s time window, and `BADSIG` if the
    /// signature doesn’t match. The message’s TSIG state is updated
    /// accordingly.
    pub fn verify(
        &self,
        msg: &mut Message,
        request_mac: Option<&[u8]>,
        now: Time48,
    ) -> TsigRcode {
        let res = self.check_message(msg, request_mac, now);
        if res == TsigRcode::NOERROR {
            trace!(key = %self.name, "TSIG signature verified");
            msg.set_tsig_state(TsigState::Verified);
        } else {
            debug!(key = %self.name, error = %res, "TSIG verification failed");
            msg.set_tsig_state(TsigState::Failed);
        }
        res
    }

    fn check_message(
        &self,
        msg: &Message,
        request_mac: Option<&[u8]>,
        now: Time48,
    ) -> TsigRcode {
        let signed = match MessageTsig::from_message(msg) {
            Some(signed) => signed,
            None => return TsigRcode::FORMERR,
        };
        if let Err(err) = self.check_tsig(&signed, now) {
            return err;
        }
        let mut context = self.signing_context();
        if let Some(mac) = request_mac {
            apply_mac(&mut context, mac);
        }
        signed.apply_message(&mut context);
        Variables::from_tsig(signed.tsig).sign(self, &mut context);
        self.compare_signatures(&context.sign(), signed.tsig.mac())
    }

    /// Checks key, time, and MAC length of the record.
    fn check_tsig(
        &self,
        signed: &MessageTsig,
        now: Time48,
    ) -> Result<(), TsigRcode> {
        if *signed.owner != self.name
            || Algorithm::from_name(signed.tsig.algorithm())
                != Some(self.algorithm)
        {
            return Err(TsigRcode::BADKEY);
        }
        if !signed.tsig.is_valid_at(now) {
            return Err(TsigRcode::BADTIME);
        }
        let len = signed.tsig.mac().len();
        if !self.algorithm.within_len_bounds(len) || len < self.min_mac_len {
            return Err(TsigRcode::BADSIG);
        }
        Ok(())
    }

    /// Compares two signatures.
    ///
    /// The first signature is the expected value, the second the provided
    /// one which may be truncated.
    fn compare_signatures(
        &self,
        expected: &hmac::Tag,
        provided: &[u8],
    ) -> TsigRcode {
        let expected = expected.as_ref();
        if provided.len() > expected.len() {
            return TsigRcode::BADSIG;
        }
        match constant_time::verify_slices_are_equal(
            &expected[..provided.len()],
            provided,
        ) {
            Ok(()) => TsigRcode::NOERROR,
            Err(_) => TsigRcode::BADSIG,
        }
    }
}

//------------ TsigSigning ---------------------------------------------------

/// The information necessary to sign an outgoing message.
///
/// A value is attached to a message via [`Message::set_tsig`]. Each time
/// the wire format of the message is created, a TSIG record is generated
/// and appended to it.
#[derive(Clone)]
pub struct TsigSigning {
    /// The key to sign with.
    key: Arc<Key>,

    /// The signature of the request if this signs an answer.
    request_mac: Option<Bytes>,

    /// The permitted clock skew.
    fudge: u16,

    /// The signing time or `None` for the current time.
    time: Option<Time48>,

    /// The TSIG error to report.
    error: TsigRcode,

    /// The server time included in BADTIME answers.
    other: Option<Time48>,

    /// A running context for signing subsequent messages of a sequence.
    ///
    /// If present, only the timers are digested after the message.
    context: Option<hmac::Context>,
}

impl TsigSigning {
    /// Creates a value for signing a request.
    pub fn new(key: Arc<Key>) -> Self {
        TsigSigning {
            key,
            request_mac: None,
            fudge: FUDGE.default(),
            time: None,
            error: TsigRcode::NOERROR,
            other: None,
            context: None,
        }
    }

    /// Creates a value for signing the answer to a request.
    ///
    /// The `request_mac` is the signature of the request.
    pub fn answer(key: Arc<Key>, request_mac: impl Into<Bytes>) -> Self {
        TsigSigning {
            request_mac: Some(request_mac.into()),
            ..Self::new(key)
        }
    }

    /// Creates a value for an answer reporting a TSIG error.
    ///
    /// The answer to a request that failed with `BADTIME` is signed and
    /// carries the time of the request as its signing time and `now` as the
    /// server time. For all other errors the answer carries an empty
    /// signature.
    pub fn error_answer(
        key: Arc<Key>,
        request: &Tsig,
        error: TsigRcode,
        now: Time48,
    ) -> Self {
        TsigSigning {
            time: Some(request.time_signed()),
            error,
            other: (error == TsigRcode::BADTIME).then_some(now),
            ..Self::answer(key, request.mac().clone())
        }
    }

    /// Sets the permitted clock skew in seconds.
    pub fn with_fudge(mut self, fudge: u16) -> Self {
        self.fudge = FUDGE.limit(fudge);
        self
    }

    /// Sets the signing time.
    ///
    /// If this isn’t called, the current time is used.
    pub fn with_time(mut self, time: Time48) -> Self {
        self.time = Some(time);
        self
    }

    /// Returns a reference to the key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the TSIG error reported.
    pub fn error(&self) -> TsigRcode {
        self.error
    }

    /// Returns whether a MAC is generated at all.
    fn is_signing(&self) -> bool {
        self.error == TsigRcode::NOERROR || self.error == TsigRcode::BADTIME
    }

    /// Returns the largest possible size of the generated TSIG record.
    pub(crate) fn max_record_len(&self) -> usize {
        // TYPE, CLASS, TTL, RDLENGTH
        self.key.name.len() + 10
            + self.key.algorithm.into_wire_slice().len()
            // time signed, fudge, MAC size, MAC, original ID, error
            + 6 + 2 + 2 + self.key.signing_len + 2 + 2
            // other len, other data
            + 2 + 6
    }

    /// Creates the TSIG record for the given message.
    ///
    /// The message must be in wire format without the TSIG record.
    pub(crate) fn sign(&self, message: &[u8]) -> Record {
        let variables = Variables {
            time_signed: self.time.unwrap_or_else(Time48::now),
            fudge: self.fudge,
            error: self.error,
            other: self
                .other
                .map(|time| Bytes::copy_from_slice(&time.into_octets()))
                .unwrap_or_default(),
        };
        let mac = if !self.is_signing() {
            Bytes::new()
        } else if let Some(context) = self.context.as_ref() {
            let mut context = context.clone();
            context.update(message);
            variables.sign_timers(&mut context);
            Bytes::copy_from_slice(self.key.signature_slice(&context.sign()))
        } else {
            let mut context = self.key.signing_context();
            if let Some(mac) = self.request_mac.as_ref() {
                apply_mac(&mut context, mac);
            }
            context.update(message);
            variables.sign(&self.key, &mut context);
            Bytes::copy_from_slice(self.key.signature_slice(&context.sign()))
        };
        let original_id = match message {
            [first, second, ..] => u16::from_be_bytes([*first, *second]),
            _ => 0,
        };
        trace!(
            key = %self.key.name,
            error = %self.error,
            mac_len = mac.len(),
            "signing message"
        );
        variables.to_record(&self.key, mac, original_id)
    }
}

impl fmt::Debug for TsigSigning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TsigSigning")
            .field("key", &self.key)
            .field("request_mac", &self.request_mac)
            .field("fudge", &self.fudge)
            .field("time", &self.time)
            .field("error", &self.error)
            .field("other", &self.other)
            .field("subsequent", &self.context.is_some())
            .finish()
    }
}

//------------ StreamSigner --------------------------------------------------

/// Signs a sequence of answer messages.
///
/// The first message is always signed. Subsequent messages can be signed
/// or passed unsigned. Each signature covers all messages since the
/// previous one, so at least every hundredth message needs to be signed
/// as well as the last one.
pub struct StreamSigner {
    /// The key to sign with.
    key: Arc<Key>,

    /// The signature of the request.
    request_mac: Bytes,

    /// The running context or `None` before the first message.
    context: Option<hmac::Context>,
}

impl StreamSigner {
    /// Creates a signer for the answers to a request.
    pub fn new(key: Arc<Key>, request_mac: impl Into<Bytes>) -> Self {
        StreamSigner {
            key,
            request_mac: request_mac.into(),
            context: None,
        }
    }

    /// Returns the wire format of a signed message.
    pub fn sign(
        &mut self,
        msg: &mut Message,
        time: Time48,
    ) -> Result<Bytes, ComposeError> {
        let signing = match self.context.take() {
            Some(context) => TsigSigning {
                context: Some(context),
                ..TsigSigning::new(self.key.clone())
            },
            None => {
                TsigSigning::answer(self.key.clone(), self.request_mac.clone())
            }
        };
        msg.set_tsig(signing.with_time(time));
        let res = msg.to_wire();
        msg.take_tsig();
        let wire = res?;
        let mut context = self.key.signing_context();
        if let Some(RecordData::Tsig(tsig)) =
            msg.generated_tsig().map(Record::data)
        {
            apply_mac(&mut context, tsig.mac());
        }
        self.context = Some(context);
        Ok(wire)
    }

    /// Returns the wire format of a message passed unsigned.
    ///
    /// # Panics
    ///
    /// The first message of a sequence must be signed. This method panics
    /// if it is called before [`sign`][Self::sign].
    pub fn pass(&mut self, msg: &mut Message) -> Result<Bytes, ComposeError> {
        let context = match self.context.as_mut() {
            Some(context) => context,
            None => panic!("first message of a sequence must be signed"),
        };
        msg.take_tsig();
        let wire = msg.to_wire()?;
        context.update(&wire);
        Ok(wire)
    }
}

//------------ StreamVerifier ------------------------------------------------

/// Verifies a sequence of answer messages.
///
/// The first message must be signed. Afterwards, up to [`MAX_UNSIGNED`]
/// messages in a row may be unsigned. Their content is covered by the
/// signature of the next signed message. Once all messages have been
/// processed, [`done`][Self::done] checks that the last one was signed.
pub struct StreamVerifier {
    /// The key to verify with.
    key: Arc<Key>,

    /// The signature of the request.
    request_mac: Bytes,

    /// The running context.
    context: hmac::Context,

    /// The number of messages processed so far.
    messages: usize,

    /// The number of unsigned messages since the last signed one.
    unsigned: usize,

    /// The allowed number of unsigned messages in a row.
    max_unsigned: usize,

    /// Whether the most recent message was signed and verified.
    last_verified: bool,
}

impl StreamVerifier {
    /// Creates a verifier for the answers to a request.
    pub fn new(key: Arc<Key>, request_mac: impl Into<Bytes>) -> Self {
        StreamVerifier {
            context: key.signing_context(),
            key,
            request_mac: request_mac.into(),
            messages: 0,
            unsigned: 0,
            max_unsigned: MAX_UNSIGNED.default(),
            last_verified: false,
        }
    }

    /// Sets the allowed number of unsigned messages in a row.
    pub fn with_max_unsigned(mut self, max: usize) -> Self {
        self.max_unsigned = MAX_UNSIGNED.limit(max);
        self
    }

    /// Verifies the next message of the sequence.
    ///
    /// An unsigned message is accepted with `TsigRcode::NOERROR` unless
    /// too many unsigned messages came before it, in which case `FORMERR`
    /// is returned. Its TSIG state remains unsigned. Otherwise the result
    /// is the same as for [`Key::verify`].
    pub fn verify(&mut self, msg: &mut Message, now: Time48) -> TsigRcode {
        self.messages += 1;
        if self.messages == 1 {
            let res =
                self.key.verify(msg, Some(self.request_mac.as_ref()), now);
            if res == TsigRcode::NOERROR {
                if let Some(RecordData::Tsig(tsig)) =
                    msg.tsig_record().map(Record::data)
                {
                    apply_mac(&mut self.context, tsig.mac());
                }
            }
            self.last_verified = res == TsigRcode::NOERROR;
            return res;
        }

        let res = match MessageTsig::from_message(msg) {
            Some(signed) => self.signed_subsequent(&signed, now),
            None => {
                self.last_verified = false;
                return self.unsigned_subsequent(msg);
            }
        };
        self.last_verified = res == TsigRcode::NOERROR;
        if res == TsigRcode::NOERROR {
            trace!(key = %self.key.name, "TSIG signature verified");
            msg.set_tsig_state(TsigState::Verified);
        } else {
            debug!(key = %self.key.name, error = %res, "TSIG verification failed");
            msg.set_tsig_state(TsigState::Failed);
        }
        res
    }

    /// Applies the content of an unsigned message to the context.
    fn unsigned_subsequent(&mut self, msg: &mut Message) -> TsigRcode {
        if self.unsigned >= self.max_unsigned {
            debug!(
                key = %self.key.name,
                unsigned = self.unsigned,
                "too many unsigned messages"
            );
            msg.set_tsig_state(TsigState::Failed);
            return TsigRcode::FORMERR;
        }
        match msg.raw() {
            Some(raw) => self.context.update(raw),
            None => return TsigRcode::FORMERR,
        }
        self.unsigned += 1;
        TsigRcode::NOERROR
    }

    /// Checks a signed subsequent message and resets the context.
    fn signed_subsequent(
        &mut self,
        signed: &MessageTsig,
        now: Time48,
    ) -> TsigRcode {
        if let Err(err) = self.key.check_tsig(signed, now) {
            return err;
        }

        // Replace current context with new context.
        let mut context = self.key.signing_context();
        mem::swap(&mut self.context, &mut context);

        signed.apply_message(&mut context);
        Variables::from_tsig(signed.tsig).sign_timers(&mut context);
        let res = self
            .key
            .compare_signatures(&context.sign(), signed.tsig.mac());
        apply_mac(&mut self.context, signed.tsig.mac());
        self.unsigned = 0;
        res
    }

    /// Checks that the sequence ended with a verified signed message.
    ///
    /// Returns `TsigRcode::NOERROR` if it did and `FORMERR` otherwise.
    pub fn done(&self) -> TsigRcode {
        if self.last_verified {
            TsigRcode::NOERROR
        } else {
            TsigRcode::FORMERR
        }
    }
}

impl fmt::Debug for StreamVerifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StreamVerifier")
            .field("key", &self.key)
            .field("messages", &self.messages)
            .field("unsigned", &self.unsigned)
            .field("max_unsigned", &self.max_unsigned)
            .field("last_verified", &self.last_verified)
            .finish()
    }
}

//------------ MessageTsig ---------------------------------------------------

/// The TSIG record of a received message.
struct MessageTsig<'a> {
    /// The owner of the record which is the key name.
    owner: &'a Name,

    /// The record data.
    tsig: &'a Tsig,

    /// The octets of the message.
    raw: &'a [u8],

    /// The index of the start of the record.
    start: usize,
}

impl<'a> MessageTsig<'a> {
    /// Get the TSIG record from a parsed message.
    ///
    /// Returns `None` if there is no TSIG record.
    fn from_message(msg: &'a Message) -> Option<Self> {
        let record = msg.tsig_record()?;
        let tsig = match record.data() {
            RecordData::Tsig(tsig) => tsig,
            _ => return None,
        };
        Some(MessageTsig {
            owner: record.owner(),
            tsig,
            raw: msg.raw()?.as_ref(),
            start: msg.tsig_start()?,
        })
    }

    /// Applies the message without the TSIG record to a context.
    ///
    /// The header is restored to its state before signing: the ID is the
    /// original ID and the additional count excludes the TSIG record.
    fn apply_message(&self, context: &mut hmac::Context) {
        let mut header = [0u8; HeaderSection::LEN];
        header.copy_from_slice(&self.raw[..HeaderSection::LEN]);
        header[..2].copy_from_slice(&self.tsig.original_id().to_be_bytes());
        let arcount = u16::from_be_bytes([header[10], header[11]]);
        header[10..].copy_from_slice(&arcount.saturating_sub(1).to_be_bytes());
        context.update(&header);
        context.update(&self.raw[HeaderSection::LEN..self.start]);
    }
}

//------------ Variables -----------------------------------------------------

/// The TSIG variables digested along with a message.
struct Variables {
    /// The time the message was signed.
    time_signed: Time48,

    /// The permitted clock skew.
    fudge: u16,

    /// The TSIG error code.
    error: TsigRcode,

    /// The content of the ‘other’ field.
    other: Bytes,
}

impl Variables {
    fn from_tsig(tsig: &Tsig) -> Self {
        Variables {
            time_signed: tsig.time_signed(),
            fudge: tsig.fudge(),
            error: tsig.error(),
            other: tsig.other().clone(),
        }
    }

    /// Produces a TSIG record from this value and some more data.
    fn to_record(&self, key: &Key, mac: Bytes, original_id: u16) -> Record {
        Record::new(
            key.name.clone(),
            Class::ANY,
            0,
            // The only reason creating TSIG record data can fail here is
            // that the MAC is unreasonable large. Since we control its
            // creation, panicking in this case is fine.
            Tsig::new(
                key.algorithm.to_name(),
                self.time_signed,
                self.fudge,
                mac,
                original_id,
                self.error,
                self.other.clone(),
            )
            .expect("long MAC")
            .into(),
        )
    }

    /// Applies the variables to a signing context.
    ///
    /// This applies the full variables including key information.
    fn sign(&self, key: &Key, context: &mut hmac::Context) {
        // Key name, in canonical wire format
        context.update(key.name.to_canonical().as_slice());
        // CLASS (Always ANY in the current specification)
        context.update(&Class::ANY.to_int().to_be_bytes());
        // TTL (Always 0 in the current specification)
        context.update(&0u32.to_be_bytes());
        // Algorithm Name (in canonical wire format)
        context.update(key.algorithm.into_wire_slice());
        // Time Signed
        context.update(&self.time_signed.into_octets());
        // Fudge
        context.update(&self.fudge.to_be_bytes());
        // Error
        context.update(&self.error.to_int().to_be_bytes());
        // Other Len
        context.update(&(self.other.len() as u16).to_be_bytes());
        // Other
        context.update(&self.other);
    }

    /// Applies only the timing values to the signing context.
    fn sign_timers(&self, context: &mut hmac::Context) {
        // Time Signed
        context.update(&self.time_signed.into_octets());

        // Fudge
        context.update(&self.fudge.to_be_bytes());
    }
}

/// Applies a signature to a signing context.
///
/// Applies the length as a 16 bit big-endian unsigned followed by the
/// actual octets.
fn apply_mac(context: &mut hmac::Context, mac: &[u8]) {
    context.update(&(mac.len() as u16).to_be_bytes());
    context.update(mac);
}

//------------ Algorithm -----------------------------------------------------

/// The supported TSIG algorithms.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    /// Creates a value from its domain name representation.
    ///
    /// Returns `None` if the name doesn’t represent a supported algorithm.
    pub fn from_name(name: &Name) -> Option<Self> {
        let mut labels = name.iter_labels();
        let first = labels.next()?;
        match labels.next() {
            Some(label) if label.is_root() => {}
            _ => return None,
        }
        match first.as_slice().to_ascii_lowercase().as_slice() {
            b"hmac-sha1" => Some(Algorithm::Sha1),
            b"hmac-sha256" => Some(Algorithm::Sha256),
            b"hmac-sha384" => Some(Algorithm::Sha384),
            b"hmac-sha512" => Some(Algorithm::Sha512),
            _ => None,
        }
    }

    /// Returns the ring HMAC algorithm for this TSIG algorithm.
    fn into_hmac_algorithm(self) -> hmac::Algorithm {
        match self {
            Algorithm::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Algorithm::Sha256 => hmac::HMAC_SHA256,
            Algorithm::Sha384 => hmac::HMAC_SHA384,
            Algorithm::Sha512 => hmac::HMAC_SHA512,
        }
    }

    /// Returns a octet slice with the wire-format domain name for this value.
    fn into_wire_slice(self) -> &'static [u8] {
        match self {
            Algorithm::Sha1 => b"\x09hmac-sha1\0",
            Algorithm::Sha256 => b"\x0Bhmac-sha256\0",
            Algorithm::Sha384 => b"\x0Bhmac-sha384\0",
            Algorithm::Sha512 => b"\x0Bhmac-sha512\0",
        }
    }

    /// Returns a domain name for this value.
    pub fn to_name(self) -> Name {
        Name::from_octets(Bytes::from_static(self.into_wire_slice()))
            .expect("valid algorithm name")
    }

    /// Returns the native length of a signature created with this algorithm.
    pub fn native_len(self) -> usize {
        self.into_hmac_algorithm().len()
    }

    /// Returns the smallest allowed length of a truncated signature.
    pub fn min_len(self) -> usize {
        cmp::max(10, self.native_len() / 2)
    }

    /// Returns whether a signature length is within the allowed bounds.
    pub fn within_len_bounds(self, len: usize) -> bool {
        len >= self.min_len() && len <= self.native_len()
    }
}

//--- FromStr

impl str::FromStr for Algorithm {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('.').to_ascii_lowercase().as_str() {
            "hmac-sha1" => Ok(Algorithm::Sha1),
            "hmac-sha256" => Ok(Algorithm::Sha256),
            "hmac-sha384" => Ok(Algorithm::Sha384),
            "hmac-sha512" => Ok(Algorithm::Sha512),
            _ => Err(AlgorithmError),
        }
    }
}

//--- Display

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Algorithm::Sha1 => "hmac-sha1",
            Algorithm::Sha256 => "hmac-sha256",
            Algorithm::Sha384 => "hmac-sha384",
            Algorithm::Sha512 => "hmac-sha512",
        })
    }
}

//============ Error Types ===================================================

//------------ NewKeyError ---------------------------------------------------

/// A key couldn’t be created.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NewKeyError {
    BadMinMacLen,
    BadSigningLen,
    BadSecret,
    RelativeName,
}

//--- Display and Error

impl fmt::Display for NewKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            NewKeyError::BadMinMacLen => {
                f.write_str("minimum signature length out of bounds")
            }
            NewKeyError::BadSigningLen => {
                f.write_str("created signature length out of bounds")
            }
            NewKeyError::BadSecret => f.write_str("invalid base64 secret"),
            NewKeyError::RelativeName => f.write_str("relative key name"),
        }
    }
}

impl std::error::Error for NewKeyError {}

//------------ GenerateKeyError ----------------------------------------------

/// A key couldn’t be generated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerateKeyError {
    NewKey(NewKeyError),
    GenerationFailed,
}

//--- From

impl From<NewKeyError> for GenerateKeyError {
    fn from(err: NewKeyError) -> Self {
        GenerateKeyError::NewKey(err)
    }
}

impl From<ring::error::Unspecified> for GenerateKeyError {
    fn from(_: ring::error::Unspecified) -> Self {
        GenerateKeyError::GenerationFailed
    }
}

//--- Display and Error

impl fmt::Display for GenerateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenerateKeyError::NewKey(err) => fmt::Display::fmt(&err, f),
            GenerateKeyError::GenerationFailed => {
                f.write_str("generating key failed")
            }
        }
    }
}

impl std::error::Error for GenerateKeyError {}

//------------ AlgorithmError ------------------------------------------------

/// An invalid algorithm was provided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AlgorithmError;

//--- Display and Error

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid algorithm")
    }
}

impl std::error::Error for AlgorithmError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::Rtype;
    use crate::base::question::Question;
    use crate::base::header::Section;
    use std::str::FromStr;

    const TIME: u64 = 1_700_000_000;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn test_key(name_str: &str) -> Arc<Key> {
        Arc::new(
            Key::new(Algorithm::Sha256, b"12345678", name(name_str), None, None)
                .unwrap(),
        )
    }

    fn query() -> Message {
        let mut msg = Message::with_id(0x1234);
        msg.push_question(Question::new_in(name("www.example."), Rtype::A))
            .unwrap();
        msg
    }

    fn signed(mut msg: Message, signing: TsigSigning) -> (Bytes, Bytes) {
        msg.set_tsig(signing.with_time(Time48::from_u64(TIME)));
        let wire = msg.to_wire().unwrap();
        let mac = match msg.generated_tsig().unwrap().data() {
            RecordData::Tsig(tsig) => tsig.mac().clone(),
            _ => unreachable!(),
        };
        (wire, mac)
    }

    fn now() -> Time48 {
        Time48::from_u64(TIME)
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(
            Algorithm::from_name(&name("hmac-sha256.")),
            Some(Algorithm::Sha256)
        );
        assert_eq!(
            Algorithm::from_name(&name("HMAC-SHA1.")),
            Some(Algorithm::Sha1)
        );
        assert_eq!(
            Algorithm::from_name(&name("hmac-md5.sig-alg.reg.int.")),
            None
        );
        assert_eq!(Algorithm::Sha384.to_name(), name("hmac-sha384."));
        assert_eq!(Algorithm::Sha512.to_string(), "hmac-sha512");
        assert_eq!(Algorithm::from_str("hmac-sha256."), Ok(Algorithm::Sha256));
        assert_eq!(
            Algorithm::from_str("hmac-md5.sig-alg.reg.int"),
            Err(AlgorithmError)
        );
    }

    #[test]
    fn len_bounds() {
        assert_eq!(Algorithm::Sha1.native_len(), 20);
        assert_eq!(Algorithm::Sha1.min_len(), 10);
        assert_eq!(Algorithm::Sha512.min_len(), 32);
        assert!(Algorithm::Sha256.within_len_bounds(16));
        assert!(!Algorithm::Sha256.within_len_bounds(15));
        assert!(!Algorithm::Sha256.within_len_bounds(33));
        assert_eq!(
            Key::new(Algorithm::Sha256, b"", name("k."), Some(8), None)
                .unwrap_err(),
            NewKeyError::BadMinMacLen
        );
        assert_eq!(
            Key::new(Algorithm::Sha256, b"", name("k."), None, Some(40))
                .unwrap_err(),
            NewKeyError::BadSigningLen
        );
        assert_eq!(
            Key::new(Algorithm::Sha256, b"", name("k"), None, None)
                .unwrap_err(),
            NewKeyError::RelativeName
        );
    }

    #[test]
    fn base64_and_generated_keys() {
        let key =
            Key::from_base64(Algorithm::Sha256, name("example."), "MTIzNDU2Nzg=")
                .unwrap();
        assert_eq!(key.min_mac_len(), 16);
        assert_eq!(key.signing_len(), 32);
        assert_eq!(
            Key::from_base64(Algorithm::Sha256, name("example."), "!!")
                .unwrap_err(),
            NewKeyError::BadSecret
        );

        let rng = rand::SystemRandom::new();
        let (key, secret) =
            Key::generate(Algorithm::Sha1, &rng, name("gen."), None, Some(10))
                .unwrap();
        assert_eq!(secret.len(), 20);
        assert_eq!(key.signing_len(), 10);
    }

    #[test]
    fn sign_and_verify() {
        let key = test_key("example.");
        let (wire, _) = signed(query(), TsigSigning::new(key.clone()));
        let mut msg = Message::from_octets(wire).unwrap();
        assert_eq!(msg.counts().arcount(), 1);
        let tsig = match msg.tsig_record().unwrap().data() {
            RecordData::Tsig(tsig) => tsig.clone(),
            _ => unreachable!(),
        };
        assert_eq!(tsig.original_id(), 0x1234);
        assert_eq!(tsig.mac().len(), 32);
        assert_eq!(tsig.fudge(), 300);
        assert_eq!(key.verify(&mut msg, None, now()), TsigRcode::NOERROR);
        assert!(msg.is_verified());
    }

    #[test]
    fn verify_answer() {
        let key = test_key("example.");
        let (_, request_mac) = signed(query(), TsigSigning::new(key.clone()));
        let mut answer = query();
        answer.header_mut().set_qr(true);
        let (wire, _) =
            signed(answer, TsigSigning::answer(key.clone(), request_mac.clone()));

        let mut msg = Message::from_octets(wire.clone()).unwrap();
        assert_eq!(
            key.verify(&mut msg, Some(request_mac.as_ref()), now()),
            TsigRcode::NOERROR
        );
        let mut msg = Message::from_octets(wire).unwrap();
        assert_eq!(key.verify(&mut msg, None, now()), TsigRcode::BADSIG);
        assert_eq!(msg.tsig_state(), TsigState::Failed);
    }

    #[test]
    fn verify_failures() {
        let key = test_key("example.");
        let (wire, _) = signed(query(), TsigSigning::new(key.clone()));

        let mut msg = Message::from_octets(wire.clone()).unwrap();
        assert_eq!(
            test_key("other.").verify(&mut msg, None, now()),
            TsigRcode::BADKEY
        );

        let mut msg = Message::from_octets(wire.clone()).unwrap();
        let late = Time48::from_u64(TIME + 301);
        assert_eq!(key.verify(&mut msg, None, late), TsigRcode::BADTIME);
        let mut msg = Message::from_octets(wire.clone()).unwrap();
        let edge = Time48::from_u64(TIME - 300);
        assert_eq!(key.verify(&mut msg, None, edge), TsigRcode::NOERROR);

        // Flip the case of the last letter of "www".
        let mut octets = wire.to_vec();
        octets[15] ^= 0x20;
        let mut msg = Message::from_octets(octets).unwrap();
        assert_eq!(key.verify(&mut msg, None, now()), TsigRcode::BADSIG);

        let mut unsigned = query();
        let mut msg = Message::from_octets(unsigned.to_wire().unwrap()).unwrap();
        assert_eq!(key.verify(&mut msg, None, now()), TsigRcode::FORMERR);
        assert_eq!(msg.tsig_state(), TsigState::Failed);
    }

    #[test]
    fn truncated_mac() {
        let short = Arc::new(
            Key::new(
                Algorithm::Sha256,
                b"12345678",
                name("example."),
                None,
                Some(16),
            )
            .unwrap(),
        );
        let (wire, mac) = signed(query(), TsigSigning::new(short));
        assert_eq!(mac.len(), 16);
        let mut msg = Message::from_octets(wire.clone()).unwrap();
        assert_eq!(
            test_key("example.").verify(&mut msg, None, now()),
            TsigRcode::NOERROR
        );

        let strict = Key::new(
            Algorithm::Sha256,
            b"12345678",
            name("example."),
            Some(32),
            None,
        )
        .unwrap();
        let mut msg = Message::from_octets(wire).unwrap();
        assert_eq!(strict.verify(&mut msg, None, now()), TsigRcode::BADSIG);
    }

    #[test]
    fn error_answers() {
        let key = test_key("example.");
        let (wire, _) = signed(query(), TsigSigning::new(key.clone()));
        let request = Message::from_octets(wire).unwrap();
        let request = match request.tsig_record().unwrap().data() {
            RecordData::Tsig(tsig) => tsig.clone(),
            _ => unreachable!(),
        };

        let server_now = Time48::from_u64(TIME + 1000);
        let signing = TsigSigning::error_answer(
            key.clone(),
            &request,
            TsigRcode::BADTIME,
            server_now,
        );
        let record = signing.sign(&query().to_wire().unwrap());
        let tsig = match record.data() {
            RecordData::Tsig(tsig) => tsig.clone(),
            _ => unreachable!(),
        };
        assert_eq!(tsig.error(), TsigRcode::BADTIME);
        assert_eq!(tsig.time_signed(), request.time_signed());
        assert_eq!(tsig.other_time(), Some(server_now));
        assert_eq!(tsig.mac().len(), 32);

        let signing = TsigSigning::error_answer(
            key,
            &request,
            TsigRcode::BADSIG,
            server_now,
        );
        let record = signing.sign(&query().to_wire().unwrap());
        match record.data() {
            RecordData::Tsig(tsig) => {
                assert!(tsig.mac().is_empty());
                assert!(tsig.other().is_empty());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn signature_space_is_reserved() {
        let key = test_key("example.");
        let signing = TsigSigning::new(key);
        let mut msg = query();
        msg.set_tsig(signing.clone());
        let wire = msg.to_wire().unwrap();
        let record_len = wire.len() - query().to_wire().unwrap().len();
        assert!(record_len <= signing.max_record_len());
        assert_eq!(record_len + 8, signing.max_record_len());
    }

    fn answer_with(id: u16, owner: &str) -> Message {
        let mut msg = Message::with_id(id);
        msg.header_mut().set_qr(true);
        msg.add_record(
            Record::from_str(&format!("{} 3600 IN A 192.0.2.1", owner))
                .unwrap(),
            Section::Answer,
        )
        .unwrap();
        msg
    }

    #[test]
    fn stream() {
        let key = test_key("example.");
        let request_mac = Bytes::from_static(b"0123456789abcdef");
        let mut signer = StreamSigner::new(key.clone(), request_mac.clone());
        let wires = [
            signer.sign(&mut answer_with(7, "a.example."), now()).unwrap(),
            signer.pass(&mut answer_with(7, "b.example.")).unwrap(),
            signer.pass(&mut answer_with(7, "c.example.")).unwrap(),
            signer.sign(&mut answer_with(7, "d.example."), now()).unwrap(),
        ];

        let mut verifier = StreamVerifier::new(key.clone(), request_mac.clone());
        for (i, wire) in wires.iter().enumerate() {
            let mut msg = Message::from_octets(wire.clone()).unwrap();
            assert_eq!(verifier.verify(&mut msg, now()), TsigRcode::NOERROR);
            assert_eq!(msg.is_verified(), i == 0 || i == 3);
        }
        assert_eq!(verifier.done(), TsigRcode::NOERROR);

        // Dropping an unsigned message breaks the next signature.
        let mut verifier = StreamVerifier::new(key.clone(), request_mac.clone());
        for (i, wire) in wires.iter().enumerate() {
            if i == 2 {
                continue;
            }
            let mut msg = Message::from_octets(wire.clone()).unwrap();
            let expected =
                if i == 3 { TsigRcode::BADSIG } else { TsigRcode::NOERROR };
            assert_eq!(verifier.verify(&mut msg, now()), expected);
        }

        // Ending on an unsigned message is an error.
        let mut verifier = StreamVerifier::new(key, request_mac);
        for wire in &wires[..3] {
            let mut msg = Message::from_octets(wire.clone()).unwrap();
            assert_eq!(verifier.verify(&mut msg, now()), TsigRcode::NOERROR);
        }
        assert_eq!(verifier.done(), TsigRcode::FORMERR);
    }

    #[test]
    fn stream_unsigned_limit() {
        let key = test_key("example.");
        let mut signer = StreamSigner::new(key.clone(), Bytes::new());
        let first = signer.sign(&mut answer_with(1, "a.example."), now()).unwrap();
        let unsigned = signer.pass(&mut answer_with(1, "b.example.")).unwrap();

        let mut verifier =
            StreamVerifier::new(key.clone(), Bytes::new()).with_max_unsigned(2);
        let mut msg = Message::from_octets(first).unwrap();
        assert_eq!(verifier.verify(&mut msg, now()), TsigRcode::NOERROR);
        for _ in 0..2 {
            let mut msg = Message::from_octets(unsigned.clone()).unwrap();
            assert_eq!(verifier.verify(&mut msg, now()), TsigRcode::NOERROR);
        }
        let mut msg = Message::from_octets(unsigned.clone()).unwrap();
        assert_eq!(verifier.verify(&mut msg, now()), TsigRcode::FORMERR);

        // The first message must be signed.
        let mut verifier = StreamVerifier::new(key, Bytes::new());
        let mut msg = Message::from_octets(unsigned).unwrap();
        assert_eq!(verifier.verify(&mut msg, now()), TsigRcode::FORMERR);
    }
}
