#![cfg(feature = "tsig")]

mod common;

use bytes::Bytes;
use dnswire::base::iana::{Rtype, TsigRcode};
use dnswire::base::{
    Message, Name, OptRecord, Question, Record, Section, TsigState,
};
use dnswire::rdata::{RecordData, Time48};
use dnswire::tsig::{Algorithm, Key, StreamSigner, StreamVerifier, TsigSigning};
use std::str::FromStr;
use std::sync::Arc;

fn key(name: &str) -> Arc<Key> {
    Arc::new(
        Key::new(
            Algorithm::Sha256,
            b"12345678",
            Name::from_str(name).unwrap(),
            None,
            None,
        )
        .unwrap(),
    )
}

fn query() -> Message {
    let mut msg = Message::new();
    msg.push_question(Question::new_in(
        Name::from_str("www.example.").unwrap(),
        Rtype::A,
    ))
    .unwrap();
    msg
}

fn edns_query() -> Message {
    let mut msg = query();
    msg.set_opt(OptRecord::with_payload_size(4096)).unwrap();
    msg
}

fn mac_of(record: &Record) -> Bytes {
    match record.data() {
        RecordData::Tsig(tsig) => tsig.mac().clone(),
        _ => panic!("not a TSIG record"),
    }
}

#[test]
fn request_and_answer() {
    common::init_logging();
    let key = key("example.");

    let mut request = query();
    request.set_tsig(TsigSigning::new(key.clone()));
    let wire = request.to_wire().unwrap();
    assert_eq!(request.tsig_state(), TsigState::Signed);
    let request_mac = mac_of(request.generated_tsig().unwrap());

    let mut received = Message::from_octets(wire).unwrap();
    assert_eq!(
        key.verify(&mut received, None, Time48::now()),
        TsigRcode::NOERROR
    );
    assert!(received.is_signed());
    assert!(received.is_verified());

    let mut answer = query();
    answer.header_mut().set_id(received.header().id());
    answer.header_mut().set_qr(true);
    answer
        .add_record(
            Record::from_str("www.example. 300 IN A 192.0.2.1").unwrap(),
            Section::Answer,
        )
        .unwrap();
    answer.set_tsig(TsigSigning::answer(key.clone(), request_mac.clone()));
    let wire = answer.to_wire().unwrap();

    let mut received = Message::from_octets(wire).unwrap();
    assert_eq!(received.counts().arcount(), 1);
    assert_eq!(
        key.verify(&mut received, Some(request_mac.as_ref()), Time48::now()),
        TsigRcode::NOERROR
    );
}

#[test]
fn tampering_is_detected() {
    common::init_logging();
    let key = key("example.");
    let mut request = query();
    request.set_tsig(TsigSigning::new(key.clone()));
    let wire = request.to_wire().unwrap();

    // Change the question type from A to NS.
    let mut octets = wire.to_vec();
    assert_eq!(&octets[25..27], b"\x00\x01");
    octets[26] = 2;
    let mut received = Message::from_octets(octets).unwrap();
    assert_eq!(
        key.verify(&mut received, None, Time48::now()),
        TsigRcode::BADSIG
    );
    assert_eq!(received.tsig_state(), TsigState::Failed);
}

#[test]
fn wrong_key_or_time() {
    common::init_logging();
    let mut request = query();
    let time = Time48::from_u64(1_700_000_000);
    request.set_tsig(TsigSigning::new(key("example.")).with_time(time));
    let wire = request.to_wire().unwrap();

    let mut received = Message::from_octets(wire.clone()).unwrap();
    assert_eq!(
        key("other.example.").verify(&mut received, None, time),
        TsigRcode::BADKEY
    );

    let sha512 = Key::new(
        Algorithm::Sha512,
        b"12345678",
        Name::from_str("example.").unwrap(),
        None,
        None,
    )
    .unwrap();
    let mut received = Message::from_octets(wire.clone()).unwrap();
    assert_eq!(sha512.verify(&mut received, None, time), TsigRcode::BADKEY);

    let mut received = Message::from_octets(wire).unwrap();
    assert_eq!(
        key("example.").verify(
            &mut received,
            None,
            Time48::from_u64(1_700_000_000 + 600)
        ),
        TsigRcode::BADTIME
    );
}

#[test]
fn truncation_keeps_signature() {
    common::init_logging();
    let key = key("example.");
    let mut answer = query();
    answer.header_mut().set_qr(true);
    for i in 1..=20 {
        answer
            .add_record(
                Record::from_str(&format!(
                    "host{}.example. 300 IN A 192.0.2.{}",
                    i, i
                ))
                .unwrap(),
                Section::Answer,
            )
            .unwrap();
    }
    answer.set_tsig(TsigSigning::new(key.clone()));
    let wire = answer.to_wire_bounded(200).unwrap();
    assert!(wire.len() <= 200);

    let mut received = Message::from_octets(wire).unwrap();
    assert!(received.header().tc());
    assert!(received.counts().ancount() < 20);
    assert!(received.tsig_record().is_some());
    assert_eq!(
        key.verify(&mut received, None, Time48::now()),
        TsigRcode::NOERROR
    );
}

#[test]
fn zone_transfer_stream() {
    common::init_logging();
    let key = key("example.");
    let request_mac = Bytes::from_static(b"request signature");
    let now = Time48::now();

    let mut signer = StreamSigner::new(key.clone(), request_mac.clone());
    let mut wires = Vec::new();
    for i in 0..10 {
        let mut msg = Message::with_id(42);
        msg.header_mut().set_qr(true);
        msg.add_record(
            Record::from_str(&format!("n{}.example. 60 IN A 192.0.2.{}", i, i))
                .unwrap(),
            Section::Answer,
        )
        .unwrap();
        // Sign the first, every fourth, and the last message.
        let wire = if i % 4 == 0 || i == 9 {
            signer.sign(&mut msg, now).unwrap()
        } else {
            signer.pass(&mut msg).unwrap()
        };
        wires.push(wire);
    }

    let mut verifier = StreamVerifier::new(key.clone(), request_mac.clone());
    for (i, wire) in wires.iter().enumerate() {
        let mut msg = Message::from_octets(wire.clone()).unwrap();
        assert_eq!(verifier.verify(&mut msg, now), TsigRcode::NOERROR);
        assert_eq!(msg.is_verified(), i % 4 == 0 || i == 9);
    }
    assert_eq!(verifier.done(), TsigRcode::NOERROR);

    // A verifier for a different request fails right away.
    let mut verifier = StreamVerifier::new(key, Bytes::from_static(b"other"));
    let mut msg = Message::from_octets(wires[0].clone()).unwrap();
    assert_eq!(verifier.verify(&mut msg, now), TsigRcode::BADSIG);
    assert_eq!(verifier.done(), TsigRcode::FORMERR);
}

#[test]
fn signed_edns_query() {
    common::init_logging();
    let key = key("example.");
    let mut request = edns_query();
    request.set_tsig(TsigSigning::new(key.clone()));
    let wire = request.to_wire().unwrap();

    let mut received = Message::from_octets(wire.clone()).unwrap();
    assert_eq!(received.counts().arcount(), 2);
    assert_eq!(received.opt().unwrap().udp_payload_size(), 4096);
    assert!(received.tsig_record().is_some());
    assert_eq!(
        key.verify(&mut received, None, Time48::now()),
        TsigRcode::NOERROR
    );

    // Composing the parsed message again gives the same octets.
    let again = received.to_wire().unwrap();
    assert_eq!(again, wire);
    let mut reparsed = Message::from_octets(again).unwrap();
    assert_eq!(
        key.verify(&mut reparsed, None, Time48::now()),
        TsigRcode::NOERROR
    );
}

#[test]
fn resigning_replaces_signature() {
    common::init_logging();
    let key = key("example.");
    let mut request = edns_query();
    request.set_tsig(TsigSigning::new(key.clone()));
    let wire = request.to_wire().unwrap();

    let mut received = Message::from_octets(wire).unwrap();
    received.set_tsig(TsigSigning::new(key.clone()));
    let wire = received.to_wire().unwrap();

    let mut reparsed = Message::from_octets(wire).unwrap();
    assert_eq!(reparsed.counts().arcount(), 2);
    let additional = reparsed.section(Section::Additional);
    assert_eq!(additional.len(), 2);
    assert_eq!(additional[0].rtype(), Rtype::OPT);
    assert_eq!(additional[1].rtype(), Rtype::TSIG);
    assert_eq!(
        key.verify(&mut reparsed, None, Time48::now()),
        TsigRcode::NOERROR
    );
}

#[test]
fn opt_goes_before_signature() {
    common::init_logging();
    let key = key("example.");
    let mut request = query();
    request.set_tsig(TsigSigning::new(key.clone()));
    let wire = request.to_wire().unwrap();

    let mut received = Message::from_octets(wire).unwrap();
    received.set_opt(OptRecord::new()).unwrap();
    assert_eq!(received.counts().arcount(), 2);
    assert!(received.opt().is_some());
    assert!(received.tsig_record().is_some());

    let wire = received.to_wire().unwrap();
    let mut reparsed = Message::from_octets(wire).unwrap();
    assert!(reparsed.opt().is_some());
    assert!(reparsed.tsig_record().is_some());
    // The signature doesn’t cover the added OPT record.
    assert_eq!(
        key.verify(&mut reparsed, None, Time48::now()),
        TsigRcode::BADSIG
    );
}
