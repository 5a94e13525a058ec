//! CLI tests for the tc command.
//!
//! These run the binary end to end; nothing here needs network access or
//! root privileges.

use assert_cmd::Command;
use predicates::prelude::*;

fn tc_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tc"))
}

/// Hex of a `TCA_OPTIONS` nest holding the given u32 attributes.
fn options_hex(attrs: &[(u16, u32)]) -> String {
    let mut block = Vec::new();
    let len = 4 + 8 * attrs.len() as u16;
    block.extend_from_slice(&len.to_ne_bytes());
    block.extend_from_slice(&(2u16 | 0x8000).to_ne_bytes());
    for (kind, value) in attrs {
        block.extend_from_slice(&8u16.to_ne_bytes());
        block.extend_from_slice(&kind.to_ne_bytes());
        block.extend_from_slice(&value.to_ne_bytes());
    }
    hex::encode(block)
}

mod global_flags {
    use super::*;

    #[test]
    fn test_help() {
        tc_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Traffic control tool"));
    }

    #[test]
    fn test_version() {
        tc_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tc"));
    }

    #[test]
    fn test_invalid_subcommand() {
        tc_cmd()
            .arg("invalid_command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn test_json_flag_short() {
        tc_cmd().args(["-j", "--help"]).assert().success();
    }

    #[test]
    fn test_pretty_flag() {
        tc_cmd().args(["-p", "--help"]).assert().success();
    }
}

mod encode {
    use super::*;

    #[test]
    fn test_encode_maxrate() {
        tc_cmd()
            .args(["qdisc", "encode", "maxrate", "10mbit"])
            .assert()
            .success()
            .stdout(format!("{}\n", options_hex(&[(1, 1_250_000)])));
    }

    #[test]
    fn test_encode_percent_with_link_speed() {
        tc_cmd()
            .args(["qdisc", "encode", "--link-speed", "1000000", "maxrate", "50%"])
            .assert()
            .success()
            .stdout(format!("{}\n", options_hex(&[(1, 500_000)])));
    }

    #[test]
    fn test_encode_all_options() {
        tc_cmd()
            .args([
                "qdisc", "encode", "maxrate", "10mbit", "sync", "100ms", "buckets", "1000",
            ])
            .assert()
            .success()
            .stdout(format!(
                "{}\n",
                options_hex(&[(1, 1_250_000), (2, 100_000), (3, 10)])
            ));
    }

    #[test]
    fn test_encode_no_params() {
        tc_cmd()
            .args(["qdisc", "encode"])
            .assert()
            .success()
            .stdout(format!("{}\n", options_hex(&[])));
    }

    #[test]
    fn test_encode_json() {
        tc_cmd()
            .args(["-j", "qdisc", "encode", "maxrate", "10mbit"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kind\":\"mc\""))
            .stdout(predicate::str::contains("\"len\":12"));
    }

    #[test]
    fn test_encode_invalid_rate() {
        tc_cmd()
            .args(["qdisc", "encode", "maxrate", "10zbit"])
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("illegal \"maxrate\": 10zbit"));
    }

    #[test]
    fn test_encode_percent_without_link_speed() {
        tc_cmd()
            .args(["qdisc", "encode", "maxrate", "50%"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("maxrate"));
    }

    #[test]
    fn test_encode_unrecognized_option() {
        tc_cmd()
            .args(["qdisc", "encode", "maxrate", "1mbit", "quantum", "1514"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unrecognized option: quantum"));
    }

    #[test]
    fn test_encode_capacity_exceeded() {
        tc_cmd()
            .args(["qdisc", "encode", "--capacity", "8", "maxrate", "1mbit"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("capacity exceeded"));
    }

    #[test]
    fn test_link_speed_conflicts_with_dev() {
        tc_cmd()
            .args([
                "qdisc",
                "encode",
                "--link-speed",
                "1000",
                "--dev",
                "eth0",
                "maxrate",
                "1%",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }
}

mod decode {
    use super::*;

    #[test]
    fn test_decode_options() {
        tc_cmd()
            .args([
                "qdisc",
                "decode",
                &options_hex(&[(1, 1_250_000), (2, 100_000)]),
            ])
            .assert()
            .success()
            .stdout("mc maxrate 10Mbit sync 100ms\n");
    }

    #[test]
    fn test_decode_sentinel_rate_absent() {
        tc_cmd()
            .args(["-j", "qdisc", "decode", &options_hex(&[(1, u32::MAX)])])
            .assert()
            .success()
            .stdout("{\"kind\":\"mc\"}\n");
    }

    #[test]
    fn test_decode_truncated() {
        // Header claims 16 bytes, only 8 present.
        let mut block = Vec::new();
        block.extend_from_slice(&16u16.to_ne_bytes());
        block.extend_from_slice(&1u16.to_ne_bytes());
        block.extend_from_slice(&[0; 4]);

        tc_cmd()
            .args(["qdisc", "decode", &hex::encode(block)])
            .assert()
            .failure()
            .stderr(predicate::str::contains("truncated"));
    }

    #[test]
    fn test_decode_bad_hex() {
        tc_cmd()
            .args(["qdisc", "decode", "zz"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid hex data"));
    }

    #[test]
    fn test_xstats_short_blob() {
        // Only gc_flows present; everything else reads as zero.
        tc_cmd()
            .args(["-j", "qdisc", "xstats", &hex::encode(7u64.to_ne_bytes())])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"gc_flows\":7"))
            .stdout(predicate::str::contains("\"flows\":0"));
    }

    #[test]
    fn test_xstats_text() {
        tc_cmd()
            .args(["qdisc", "xstats", ""])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 flows (0 inactive, 0 throttled)"));
    }
}
