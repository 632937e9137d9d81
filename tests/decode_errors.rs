//! Rejection paths of the textual decoder.
//!
//! Malformed parts must be counted and otherwise ignored, while
//! heterogeneous parts and checksum failures end the session.

use rstest::rstest;
use urkit::{
    DecoderState,
    ErrorKind,
    FountainPart,
    MinimalBytewords,
    PartHeader,
    Ur,
    UrDecoder,
    UrEncoder,
    WordCodec,
    wire,
};
use urkit_testing::{encode_parts, make_message_ur};

/// Re-encode a part after applying `tamper` to its decoded form.
fn rewrite(text: &str, tamper: impl FnOnce(PartHeader, Vec<u8>) -> FountainPart) -> String {
    let parsed = wire::parse(text).expect("well-formed part");
    let cbor = MinimalBytewords.decode(parsed.body()).expect("valid words");
    let (header, data) = FountainPart::from_cbor(&cbor).expect("valid part").into_parts();
    let part = tamper(header, data);
    wire::format_multi(
        parsed.ur_type(),
        part.header().seq_num(),
        part.header().seq_len(),
        &MinimalBytewords.encode(&part.to_cbor().expect("encode part")),
    )
}

#[rstest]
#[case::empty("")]
#[case::missing_body("ur:bytes/")]
#[case::nested_scheme("ur:ur:ur")]
#[case::wrong_scheme(
    "uf:bytes/hdeymejtswhhylkepmykhhtsytsnoyoyaxaedsuttydmmhhpktpmsrjtgwdpfnsboxgwlbaawzuefywkdplrsrjynbvygabwjldapfcsdwkbrkch"
)]
#[case::bad_checksum(
    "ur:bytes/hdeymejtswhhylkepmykhhtsytsnoyoyaxaedsuttydmmhhpktpmsrjtgwdpfnsboxgwlbaawzuefywkdplrsrjynbvygabwjldapfcsdwkbrkcf"
)]
fn single_part_decode_rejects(#[case] text: &str) {
    let err = UrDecoder::decode(text).expect_err("text should be rejected");
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(!err.is_fatal());
}

#[test]
fn malformed_parts_do_not_disturb_session() {
    let ur = make_message_ur(256, "Wolf");
    let parts = encode_parts(&ur, 30, 9);
    let mut decoder = UrDecoder::new();

    decoder.receive_part(&parts[0]).expect("first part");
    let indexes = decoder.received_part_indexes();
    for junk in ["", "ur:bytes/", "ur:bytes/1-9/lpadas", "ur:bytes/x-9/lpadas"] {
        let err = decoder.receive_part(junk).expect_err("junk part");
        assert!(!err.is_fatal(), "{junk:?} ended the session");
    }

    assert_eq!(decoder.state(), DecoderState::Accumulating);
    assert_eq!(decoder.received_part_indexes(), indexes);
    assert_eq!(decoder.processed_parts_count(), 5);

    for part in &parts[1..] {
        decoder.receive_part(part).expect("remaining part");
    }
    assert_eq!(decoder.result_ur(), Some(&ur));
}

#[test]
fn zero_sequence_number_is_tolerated() {
    let parts = encode_parts(&make_message_ur(256, "Wolf"), 30, 1);
    let text = rewrite(&parts[0], |header, data| {
        FountainPart::new(
            PartHeader::new(0, header.seq_len(), header.message_len(), header.checksum()),
            data,
        )
    });

    let mut decoder = UrDecoder::new();
    let err = decoder.receive_part(&text).expect_err("seq_num 0");
    assert_eq!(err.kind(), ErrorKind::InvalidFragmentIndexSet);
    assert_eq!(decoder.state(), DecoderState::Empty);
}

#[test]
fn tampered_fragment_fails_checksum() {
    let parts = encode_parts(&make_message_ur(256, "Wolf"), 30, 9);
    let mut decoder = UrDecoder::new();
    for part in &parts[..8] {
        decoder.receive_part(part).expect("untampered part");
    }

    let tampered = rewrite(&parts[8], |header, mut data| {
        data[0] ^= 0x01;
        FountainPart::new(header, data)
    });
    let err = decoder.receive_part(&tampered).expect_err("corrupt message");

    assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
    assert!(err.is_fatal());
    assert_eq!(decoder.state(), DecoderState::Failure);
    assert_eq!(decoder.result_error(), Some(&err));
    assert!(decoder.result_ur().is_none());
}

#[rstest]
#[case::different_message(make_message_ur(256, "Fox"))]
#[case::different_length(make_message_ur(300, "Wolf"))]
fn heterogeneous_parts_are_fatal(#[case] other: urkit::Ur) {
    let ours = encode_parts(&make_message_ur(256, "Wolf"), 30, 2);
    let theirs = encode_parts(&other, 30, 2);
    let mut decoder = UrDecoder::new();

    decoder.receive_part(&ours[0]).expect("first part");
    let err = decoder.receive_part(&theirs[1]).expect_err("foreign part");
    assert_eq!(err.kind(), ErrorKind::HeterogeneousParts);
    assert!(decoder.is_failure());

    assert!(
        decoder.receive_part(&ours[1]).is_ok(),
        "terminal sessions absorb further parts"
    );
    assert!(decoder.is_failure());
}

#[test]
fn foreign_single_part_ends_latched_session() {
    let ours = encode_parts(&make_message_ur(256, "Wolf"), 30, 5);
    let mut decoder = UrDecoder::new();
    for part in &ours {
        decoder.receive_part(part).expect("multi-part");
    }

    let foreign = UrEncoder::encode(
        &Ur::from_bytes(b"entirely different message").expect("wrap message"),
    );
    let err = decoder.receive_part(&foreign).expect_err("foreign single part");
    assert_eq!(err.kind(), ErrorKind::HeterogeneousParts);
    assert_eq!(decoder.state(), DecoderState::Failure);
    assert!(decoder.result_ur().is_none());
    assert_eq!(decoder.expected_part_count(), Some(9));
}

#[test]
fn matching_single_part_completes_latched_session() {
    let ur = make_message_ur(256, "Wolf");
    let mut decoder = UrDecoder::new();
    for part in encode_parts(&ur, 30, 3) {
        decoder.receive_part(&part).expect("multi-part");
    }

    decoder
        .receive_part(&UrEncoder::encode(&ur))
        .expect("same message in one part");
    assert!(decoder.is_success());
    assert_eq!(decoder.result_ur(), Some(&ur));
}

#[test]
fn inconsistent_first_part_is_not_latched() {
    let parts = encode_parts(&make_message_ur(256, "Wolf"), 30, 1);
    let text = rewrite(&parts[0], |header, _| {
        FountainPart::new(
            PartHeader::new(header.seq_num(), 80_000, 1, header.checksum()),
            vec![0],
        )
    });

    let mut decoder = UrDecoder::new();
    let err = decoder.receive_part(&text).expect_err("impossible header");
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert_eq!(decoder.state(), DecoderState::Empty);
    assert_eq!(decoder.expected_part_count(), None);

    decoder.receive_part(&parts[0]).expect("genuine part");
    assert_eq!(decoder.expected_part_count(), Some(9));
}
