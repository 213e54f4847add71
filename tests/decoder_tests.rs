//! Tests for record decoding
//!
//! These tests verify:
//! - Table-driven field extraction in both byte orders
//! - The all-zero decode property for every supported version
//! - Truncated-block detection

mod common;

use std::collections::HashMap;

use flowscan::format::{layout_for, FormatVersion, V5_LAYOUT, V7_LAYOUT};
use flowscan::scan::{ByteOrder, RecordDecoder};
use flowscan::FlowError;

use common::encode_record;

// =============================================================================
// Field Extraction
// =============================================================================

#[test]
fn test_decode_v5_fields() {
    let fields: HashMap<&'static str, u64> = [
        ("unix_secs", 1500u64),
        ("srcaddr", 0x0A000001), // 10.0.0.1
        ("dstaddr", 0x0A000002),
        ("packets", 12),
        ("octets", 3400),
        ("srcport", 5353),
        ("dstport", 53),
        ("protocol", 17),
        ("src_as", 64512),
    ]
    .into_iter()
    .collect();

    let block = encode_record(&V5_LAYOUT, ByteOrder::Big, &fields);
    let decoder = RecordDecoder::new(&V5_LAYOUT, ByteOrder::Big);
    let record = decoder.decode(&block).unwrap();

    assert_eq!(record.value("unix_secs"), Some(1500));
    assert_eq!(record.value("srcaddr"), Some(0x0A000001));
    assert_eq!(record.value("octets"), Some(3400));
    assert_eq!(record.value("srcport"), Some(5353));
    assert_eq!(record.value("protocol"), Some(17));
    assert_eq!(record.value("src_as"), Some(64512));
    // Unset fields decode as zero.
    assert_eq!(record.value("tos"), Some(0));
    // Unknown columns have no value.
    assert_eq!(record.value("router_sc"), None);
}

#[test]
fn test_decode_v7_extra_fields() {
    let fields: HashMap<&'static str, u64> =
        [("flags", 0xDEAD_u64), ("router_sc", 0x0A0000FE)].into_iter().collect();

    let block = encode_record(&V7_LAYOUT, ByteOrder::Little, &fields);
    let decoder = RecordDecoder::new(&V7_LAYOUT, ByteOrder::Little);
    let record = decoder.decode(&block).unwrap();

    assert_eq!(record.value("flags"), Some(0xDEAD));
    assert_eq!(record.value("router_sc"), Some(0x0A0000FE));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_all_zero_record_decodes_for_every_version() {
    for version in [FormatVersion::V5, FormatVersion::V7] {
        let layout = layout_for(version).unwrap();
        let zeros = vec![0u8; layout.record_width];

        for order in [ByteOrder::Big, ByteOrder::Little] {
            let record = RecordDecoder::new(layout, order).decode(&zeros).unwrap();
            assert!(record.values().iter().all(|&v| v == 0));
            assert_eq!(record.values().len(), layout.fields.len());
        }
    }
}

#[test]
fn test_endianness_yields_identical_values() {
    let fields: HashMap<&'static str, u64> = [
        ("unix_secs", 123456u64),
        ("srcaddr", 0xC0A80001),
        ("octets", 999),
        ("srcport", 443),
        ("protocol", 6),
    ]
    .into_iter()
    .collect();

    let big = RecordDecoder::new(&V5_LAYOUT, ByteOrder::Big)
        .decode(&encode_record(&V5_LAYOUT, ByteOrder::Big, &fields))
        .unwrap();
    let little = RecordDecoder::new(&V5_LAYOUT, ByteOrder::Little)
        .decode(&encode_record(&V5_LAYOUT, ByteOrder::Little, &fields))
        .unwrap();

    assert_eq!(big.values(), little.values());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_short_block_is_truncated_record() {
    let decoder = RecordDecoder::new(&V5_LAYOUT, ByteOrder::Big);
    let short = vec![0u8; V5_LAYOUT.record_width - 7];

    match decoder.decode(&short) {
        Err(FlowError::TruncatedRecord { expected, actual }) => {
            assert_eq!(expected, V5_LAYOUT.record_width);
            assert_eq!(actual, V5_LAYOUT.record_width - 7);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other.map(|_| ())),
    }
}

// =============================================================================
// Presentation
// =============================================================================

#[test]
fn test_row_stringify_and_native() {
    let fields: HashMap<&'static str, u64> =
        [("srcaddr", 10u64), ("protocol", 17u64), ("octets", 50u64)]
            .into_iter()
            .collect();
    let record = RecordDecoder::new(&V5_LAYOUT, ByteOrder::Big)
        .decode(&encode_record(&V5_LAYOUT, ByteOrder::Big, &fields))
        .unwrap();

    let stringified: HashMap<_, _> = record.row(true).into_iter().collect();
    assert_eq!(stringified["srcaddr"].to_string(), "0.0.0.10");
    assert_eq!(stringified["protocol"].to_string(), "UDP");
    assert_eq!(stringified["octets"].to_string(), "50");

    let native: HashMap<_, _> = record.row(false).into_iter().collect();
    assert_eq!(native["srcaddr"].to_string(), "10");
    assert_eq!(native["protocol"].to_string(), "17");
}
