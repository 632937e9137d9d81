//! Tests for `urkit` metrics helpers.
//!
//! These tests verify that counters and gauges update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.
#![cfg(feature = "metrics")]

use std::num::NonZeroUsize;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use rstest::rstest;
use urkit::{
    EncoderConfig,
    SessionRegistry,
    UrDecoder,
    UrEncoder,
    metrics::{DECODE_FAILURES, Outcome, PARTS_EMITTED, PARTS_RECEIVED, SESSIONS_ACTIVE},
};
use urkit_testing::{encode_parts, make_message_ur};

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter_value(snapshotter: &Snapshotter, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| key.key().name() == name)
        .filter(|(key, _, _, _)| {
            label.is_none_or(|(k, v)| key.key().labels().any(|l| l.key() == k && l.value() == v))
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => count,
            _ => 0,
        })
        .sum()
}

#[test]
fn encoder_counts_emitted_parts() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let config = EncoderConfig::new(NonZeroUsize::new(30).expect("non-zero"));
        let mut encoder =
            UrEncoder::new(make_message_ur(256, "Wolf"), &config).expect("encoder");
        for _ in 0..3 {
            encoder.next_part().expect("part");
        }
    });
    assert_eq!(counter_value(&snapshotter, PARTS_EMITTED, None), 3);
}

#[rstest]
#[case::accepted(Outcome::Accepted, 2)]
#[case::ignored(Outcome::Ignored, 1)]
#[case::rejected(Outcome::Rejected, 1)]
fn decoder_labels_received_parts(#[case] outcome: Outcome, #[case] expected: u64) {
    let parts = encode_parts(&make_message_ur(256, "Wolf"), 30, 2);
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let mut decoder = UrDecoder::new();
        decoder.receive_part(&parts[0]).expect("first part");
        decoder.receive_part(&parts[0]).expect("duplicate");
        decoder.receive_part("ur:bytes/").expect_err("malformed");
        decoder.receive_part(&parts[1]).expect("second part");
    });
    assert_eq!(
        counter_value(&snapshotter, PARTS_RECEIVED, Some(("outcome", outcome.as_str()))),
        expected
    );
}

#[test]
fn fatal_failure_is_counted() {
    let ours = encode_parts(&make_message_ur(256, "Wolf"), 30, 1);
    let theirs = encode_parts(&make_message_ur(256, "Fox"), 30, 2);
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let mut decoder = UrDecoder::new();
        decoder.receive_part(&ours[0]).expect("first part");
        decoder.receive_part(&theirs[1]).expect_err("foreign part");
    });
    assert_eq!(counter_value(&snapshotter, DECODE_FAILURES, None), 1);
}

#[test]
fn registry_tracks_active_sessions() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let registry = SessionRegistry::new();
        let a = registry.insert(1_u8);
        let _b = registry.insert(2_u8);
        registry.remove(a);
    });

    let gauge = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .find(|(key, _, _, _)| key.key().name() == SESSIONS_ACTIVE)
        .map(|(_, _, _, value)| value);
    assert!(
        matches!(gauge, Some(DebugValue::Gauge(value)) if (value.into_inner() - 1.0).abs() < f64::EPSILON),
        "unexpected gauge {gauge:?}"
    );
}
