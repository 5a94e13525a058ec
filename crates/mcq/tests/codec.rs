//! End-to-end tests of the mc attribute codec: parameter validation,
//! encoding, options decoding and stats decoding.

use std::time::Duration;

use mcq::Error;
use mcq::netlink::stats::{decode_stats_blob, parse_mc_xstats};
use mcq::netlink::tc::{McConfig, encode_options};
use mcq::netlink::tc_options::{AttrValue, MC_ATTRS, McOptions, decode_fields, parse_mc_options};
use mcq::netlink::types::tc::TcaAttr;
use mcq::netlink::types::tc::qdisc::mc::{self, TcMcQdStats};
use mcq::netlink::{AttrBuilder, AttrIter, DEFAULT_OPTIONS_CAPACITY, parse_attrs};
use mcq::tc::options::mc as mc_params;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

fn encode(params: &[&str], link_speed: Option<u64>) -> Vec<u8> {
    let config = mc_params::parse_params(params, link_speed).unwrap();
    encode_options(&config, DEFAULT_OPTIONS_CAPACITY).unwrap()
}

/// The single child attributes of the outer `TCA_OPTIONS` nest.
fn inner_attrs(block: &[u8]) -> Vec<(u16, u32)> {
    let mut outer = AttrIter::new(block);
    let (kind, payload) = outer.next().unwrap().unwrap();
    assert_eq!(kind, TcaAttr::Options as u16);
    assert!(outer.next().is_none());

    AttrIter::new(payload)
        .map(|r| {
            let (kind, data) = r.unwrap();
            (kind, u32::from_ne_bytes(data.try_into().unwrap()))
        })
        .collect()
}

#[test]
fn scenario_a_absolute_maxrate() {
    let block = encode(&["maxrate", "10mbit"], None);
    assert_eq!(inner_attrs(&block), vec![(mc::TCA_MC_MAX_RATE, 1_250_000)]);

    let fields = decode_fields(&block[4..], MC_ATTRS).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["maxrate"], AttrValue::Rate(1_250_000));
}

#[test]
fn scenario_b_percent_maxrate() {
    let block = encode(&["maxrate", "50%"], Some(1_000_000));
    assert_eq!(inner_attrs(&block), vec![(mc::TCA_MC_MAX_RATE, 500_000)]);
}

#[test]
fn scenario_c_sync() {
    let block = encode(&["sync", "100ms"], None);
    assert_eq!(inner_attrs(&block), vec![(mc::TCA_MC_SYNC_TIME, 100_000)]);

    let opts = parse_mc_options(&block).unwrap();
    assert_eq!(opts.sync, Some(Duration::from_millis(100)));
}

#[test]
fn scenario_d_short_stats_blob() {
    #[repr(C)]
    #[derive(Debug, Default, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
    struct Expected {
        first: [u8; 4],
        rest: [u8; 12],
    }

    let decoded: Expected = decode_stats_blob(&[0xaa, 0xbb, 0xcc, 0xdd]);
    assert_eq!(decoded.first, [0xaa, 0xbb, 0xcc, 0xdd]);
    assert_eq!(decoded.rest, [0; 12]);
}

#[test]
fn scenario_e_truncated_last_record() {
    let mut builder = AttrBuilder::new();
    builder.append_attr_u32(mc::TCA_MC_MAX_RATE, 1_250_000).unwrap();
    builder.append_attr_u32(mc::TCA_MC_BUCKETS_LOG, 10).unwrap();
    let mut data = builder.finish().unwrap();
    // Last record claims 12 bytes but only 8 remain.
    data[8..10].copy_from_slice(&12u16.to_ne_bytes());

    let err = decode_fields(&data, MC_ATTRS).unwrap_err();
    assert!(matches!(
        err,
        Error::TruncatedAttribute {
            offset: 8,
            declared: 12,
            remaining: 8,
        }
    ));
    assert!(parse_attrs(&data).is_err());
    assert!(parse_mc_options(&data).is_err());
}

#[test]
fn round_trip_preserves_present_options() {
    let cases: &[&[&str]] = &[
        &["maxrate", "1bit"],
        &["maxrate", "4gbit"],
        &["sync", "0"],
        &["sync", "1s"],
        &["buckets", "1"],
        &["buckets", "2147483648"],
        &["maxrate", "100kbit", "sync", "250us"],
        &["sync", "5ms", "buckets", "64", "maxrate", "1mbit"],
    ];

    for params in cases {
        let config = mc_params::parse_params(params, None).unwrap();
        let block = encode_options(&config, DEFAULT_OPTIONS_CAPACITY).unwrap();
        let decoded = parse_mc_options(&block).unwrap();

        assert_eq!(
            decoded,
            McOptions {
                maxrate: config.maxrate,
                sync: config.sync,
                buckets: config.buckets,
            },
            "{params:?}"
        );
    }
}

#[test]
fn buckets_round_up_to_power_of_two() {
    let block = encode(&["buckets", "1000"], None);
    assert_eq!(inner_attrs(&block), vec![(mc::TCA_MC_BUCKETS_LOG, 10)]);
    assert_eq!(parse_mc_options(&block).unwrap().buckets, Some(1024));
}

#[test]
fn absent_options_stay_absent() {
    let block = encode(&["sync", "1ms"], None);
    let fields = decode_fields(&block[4..], MC_ATTRS).unwrap();
    assert!(!fields.contains_key("maxrate"));
    assert!(!fields.contains_key("buckets"));

    let empty = encode(&[], None);
    assert_eq!(empty.len(), 4);
    assert_eq!(parse_mc_options(&empty).unwrap(), McOptions::default());
}

#[test]
fn unlimited_rate_is_suppressed() {
    let config = McConfig::new().maxrate(u32::MAX).sync(Duration::from_micros(10));
    let block = encode_options(&config, DEFAULT_OPTIONS_CAPACITY).unwrap();

    let fields = decode_fields(&block[4..], MC_ATTRS).unwrap();
    assert!(!fields.contains_key("maxrate"));
    assert_eq!(fields["sync"], AttrValue::Duration(Duration::from_micros(10)));
}

#[test]
fn validation_failure_produces_no_block() {
    for (params, expected) in [
        (
            &["maxrate", "10zbit"][..],
            Error::InvalidRate {
                token: "10zbit".into(),
            },
        ),
        (
            &["sync", "soon"][..],
            Error::InvalidDuration {
                token: "soon".into(),
            },
        ),
        (
            &["maxrate", "1mbit", "limit", "100"][..],
            Error::UnrecognizedOption {
                token: "limit".into(),
            },
        ),
    ] {
        assert_eq!(mc_params::parse_params(params, None).unwrap_err(), expected);
    }
}

#[test]
fn capacity_bound_is_enforced() {
    let config = mc_params::parse_params(&["maxrate", "1mbit", "sync", "1ms"], None).unwrap();
    assert_eq!(encode_options(&config, 20).unwrap().len(), 20);
    assert!(matches!(
        encode_options(&config, 19).unwrap_err(),
        Error::CapacityExceeded {
            needed: 20,
            capacity: 19,
        }
    ));
}

#[test]
fn stats_blob_truncation_is_zero_filled() {
    let full = TcMcQdStats {
        gc_flows: u64::MAX,
        flows: u32::MAX,
        band_drops: [u64::MAX; 3],
        band_pkt_count: [u32::MAX; 3],
        pad: u32::MAX,
        ..Default::default()
    };
    let bytes = full.as_bytes();

    for k in [1, 4, 8, 64, TcMcQdStats::SIZE] {
        let decoded = parse_mc_xstats(&bytes[..TcMcQdStats::SIZE - k]);
        let out = decoded.as_bytes();
        assert_eq!(&out[..TcMcQdStats::SIZE - k], &bytes[..TcMcQdStats::SIZE - k]);
        assert!(out[TcMcQdStats::SIZE - k..].iter().all(|&b| b == 0), "k = {k}");
    }

    let mut longer = bytes.to_vec();
    longer.extend_from_slice(&[0x55; 40]);
    assert_eq!(parse_mc_xstats(&longer), full);
}
