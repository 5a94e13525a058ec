//! tc qdisc command implementation.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use mcq::netlink::DEFAULT_OPTIONS_CAPACITY;
use mcq::netlink::stats::parse_mc_xstats;
use mcq::netlink::tc::encode_options;
use mcq::netlink::tc_options::parse_mc_options;
use mcq::output::{OutputFormat, OutputOptions, Printable};
use mcq::tc::options::mc;
use mcq::util::rate;

#[derive(Args)]
pub struct QdiscCmd {
    #[command(subcommand)]
    action: QdiscAction,
}

#[derive(Subcommand)]
enum QdiscAction {
    /// Encode mc parameters into a TCA_OPTIONS block (printed as hex).
    Encode {
        /// Link speed in bytes/sec, for percentage rates.
        #[arg(long, value_name = "BYTES")]
        link_speed: Option<u64>,

        /// Read the link speed of this device from sysfs.
        #[arg(long, value_name = "DEV", conflicts_with = "link_speed")]
        dev: Option<String>,

        /// Maximum size of the encoded block in bytes.
        #[arg(long, default_value_t = DEFAULT_OPTIONS_CAPACITY)]
        capacity: usize,

        /// mc parameters (maxrate RATE, sync TIME, buckets NUMBER).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Decode an mc options block given as hex.
    Decode {
        /// Options block, with or without the TCA_OPTIONS header.
        #[arg(value_name = "HEX")]
        data: String,
    },

    /// Decode mc extended statistics given as hex.
    Xstats {
        /// Raw TCA_XSTATS payload.
        #[arg(value_name = "HEX")]
        data: String,
    },
}

impl QdiscCmd {
    pub fn run(self, format: OutputFormat, opts: &OutputOptions) -> Result<()> {
        let mut stdout = std::io::stdout().lock();

        match self.action {
            QdiscAction::Encode {
                link_speed,
                dev,
                capacity,
                params,
            } => {
                let link_speed = match dev {
                    Some(dev) => Some(read_link_speed(&dev)?),
                    None => link_speed,
                };
                Self::encode(&mut stdout, link_speed, capacity, &params, format, opts)
            }
            QdiscAction::Decode { data } => {
                let bytes = parse_hex(&data)?;
                let options = parse_mc_options(&bytes)?;
                options.print(&mut stdout, format, opts)?;
                Ok(())
            }
            QdiscAction::Xstats { data } => {
                let bytes = parse_hex(&data)?;
                let stats = parse_mc_xstats(&bytes);
                stats.print(&mut stdout, format, opts)?;
                Ok(())
            }
        }
    }

    fn encode<W: Write>(
        w: &mut W,
        link_speed: Option<u64>,
        capacity: usize,
        params: &[String],
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> Result<()> {
        let config = mc::parse_params(params, link_speed)?;
        let block = encode_options(&config, capacity)?;
        let encoded = hex::encode(&block);

        match format {
            OutputFormat::Text => writeln!(w, "{}", encoded)?,
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "kind": "mc",
                    "len": block.len(),
                    "options": encoded,
                });
                if opts.pretty {
                    serde_json::to_writer_pretty(&mut *w, &json)?;
                } else {
                    serde_json::to_writer(&mut *w, &json)?;
                }
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Read a device's link speed from sysfs, in bytes/sec.
fn read_link_speed(dev: &str) -> Result<u64> {
    let path = format!("/sys/class/net/{}/speed", dev);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read link speed of \"{}\"", dev))?;
    // Devices without a carrier report -1.
    let mbps: u64 = content
        .trim()
        .parse()
        .with_context(|| format!("no usable link speed for \"{}\"", dev))?;
    tracing::debug!(dev, mbps, "read link speed");
    rate::mbps_to_bytes(mbps)
        .with_context(|| format!("link speed of \"{}\" out of range", dev))
}

/// Decode a hex string, ignoring whitespace and an optional `0x` prefix.
fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).with_context(|| format!("invalid hex data: {}", s))
}
