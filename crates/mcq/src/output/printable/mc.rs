//! Printable implementations for mc options and statistics.

use std::io::Write;

use crate::netlink::tc_options::McOptions;
use crate::netlink::types::tc::qdisc::mc::TcMcQdStats;
use crate::output::formatting::{format_rate, format_usecs};
use crate::output::{OutputOptions, Printable};

impl Printable for McOptions {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        write!(w, "mc")?;
        if let Some(rate) = self.maxrate {
            write!(w, " maxrate {}", format_rate(rate as u64))?;
        }
        if let Some(sync) = self.sync {
            write!(w, " sync {}", format_usecs(sync.as_micros() as u64))?;
        }
        if let Some(buckets) = self.buckets {
            write!(w, " buckets {}", buckets)?;
        }
        writeln!(w)
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({ "kind": "mc" });

        if let Some(rate) = self.maxrate {
            obj["maxrate"] = serde_json::json!(rate);
        }
        if let Some(sync) = self.sync {
            obj["sync"] = serde_json::json!(sync.as_micros() as u64);
        }
        if let Some(buckets) = self.buckets {
            obj["buckets"] = serde_json::json!(buckets);
        }
        obj
    }
}

impl Printable for TcMcQdStats {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(
            w,
            "  {} flows ({} inactive, {} throttled)",
            self.flows, self.inactive_flows, self.throttled_flows
        )?;
        write!(
            w,
            "  {} gc, {} highprio, {} throttled",
            self.gc_flows, self.highprio_packets, self.throttled
        )?;
        if self.unthrottle_latency_ns != 0 {
            write!(w, ", {} ns latency", self.unthrottle_latency_ns)?;
        }
        if self.ce_mark != 0 {
            write!(w, ", {} ce_mark", self.ce_mark)?;
        }
        if self.flows_plimit != 0 {
            write!(w, ", {} flows_plimit", self.flows_plimit)?;
        }
        if self.pkts_too_long != 0 {
            write!(w, ", {} too long pkts", self.pkts_too_long)?;
        }
        if self.allocation_errors != 0 {
            write!(w, ", {} alloc errors", self.allocation_errors)?;
        }
        if self.horizon_drops != 0 {
            write!(w, ", {} horizon drops", self.horizon_drops)?;
        }
        if self.horizon_caps != 0 {
            write!(w, ", {} horizon caps", self.horizon_caps)?;
        }
        writeln!(w)?;

        if opts.details {
            for (band, (pkts, drops)) in self
                .band_pkt_count
                .iter()
                .zip(self.band_drops.iter())
                .enumerate()
            {
                writeln!(w, "  band{} {} pkts, {} drops", band, pkts, drops)?;
            }
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::to_value(self).unwrap_or_default();
        obj["total_band_drops"] = serde_json::json!(self.total_band_drops());
        obj
    }
}
