//! Typed TC options parsing.
//!
//! Qdisc options arrive as a nested attribute block. Each qdisc kind has a
//! table describing the attribute ids it understands; ids missing from the
//! table are kept in the raw block but never interpreted, so an older tool
//! can read options from a newer kernel.
//!
//! # Example
//!
//! ```ignore
//! use mcq::netlink::messages::TcMessage;
//! use mcq::netlink::tc_options::{QdiscOptions, parse_qdisc_options};
//!
//! let msg = TcMessage::parse(&reply)?;
//! if let Some(QdiscOptions::Mc(mc)) = parse_qdisc_options(&msg)? {
//!     if let Some(rate) = mc.maxrate {
//!         println!("maxrate {} bytes/sec", rate);
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use super::attr::{AttrIter, NlAttr, get, parse_attrs};
use super::error::Result;
use super::messages::TcMessage;
use super::types::tc::TcaAttr;
use super::types::tc::qdisc::mc;

/// How an attribute payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Plain u32.
    U32,
    /// u32 rate in bytes/sec; `u32::MAX` means unlimited and is dropped.
    Rate32,
    /// u32 duration in microseconds.
    Micros32,
    /// u32 log2 of a count.
    Log2Count32,
}

impl AttrKind {
    /// Minimum payload width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::U32 | Self::Rate32 | Self::Micros32 | Self::Log2Count32 => 4,
        }
    }
}

/// One entry of an attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    /// Attribute id within the options nest.
    pub id: u16,
    /// Field name used by the presentation layer.
    pub name: &'static str,
    /// Payload interpretation.
    pub kind: AttrKind,
}

/// Attributes of the mc qdisc, in id order.
///
/// New kernel attributes are added by appending entries here.
pub const MC_ATTRS: &[AttrSpec] = &[
    AttrSpec {
        id: mc::TCA_MC_MAX_RATE,
        name: "maxrate",
        kind: AttrKind::Rate32,
    },
    AttrSpec {
        id: mc::TCA_MC_SYNC_TIME,
        name: "sync",
        kind: AttrKind::Micros32,
    },
    AttrSpec {
        id: mc::TCA_MC_BUCKETS_LOG,
        name: "buckets",
        kind: AttrKind::Log2Count32,
    },
];

/// A decoded attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue {
    /// Plain number.
    U32(u32),
    /// Rate in bytes/sec.
    Rate(u32),
    /// Time interval.
    Duration(Duration),
    /// Count (already expanded from its log2).
    Count(u32),
}

impl AttrSpec {
    /// Interpret a payload according to this entry.
    ///
    /// Returns `None` for a payload shorter than the expected width, for the
    /// unlimited-rate sentinel, and for a log2 count that does not fit.
    pub fn decode(&self, payload: &[u8]) -> Option<AttrValue> {
        if payload.len() < self.kind.width() {
            tracing::trace!(attr = self.name, len = payload.len(), "short attribute ignored");
            return None;
        }
        let raw = get::opt_u32_ne(payload)?;
        match self.kind {
            AttrKind::U32 => Some(AttrValue::U32(raw)),
            AttrKind::Rate32 if raw == u32::MAX => None,
            AttrKind::Rate32 => Some(AttrValue::Rate(raw)),
            AttrKind::Micros32 => Some(AttrValue::Duration(Duration::from_micros(raw as u64))),
            AttrKind::Log2Count32 => 1u32.checked_shl(raw).map(AttrValue::Count),
        }
    }
}

/// Decode an options block into a field-name map using `table`.
///
/// Unknown ids are skipped; a record that overruns the block fails the
/// whole call.
pub fn decode_fields(
    data: &[u8],
    table: &[AttrSpec],
) -> Result<BTreeMap<&'static str, AttrValue>> {
    let attrs = parse_attrs(data)?;
    let mut fields = BTreeMap::new();
    for spec in table {
        if let Some(value) = attrs.get(spec.id).and_then(|p| spec.decode(p)) {
            fields.insert(spec.name, value);
        }
    }
    Ok(fields)
}

/// Strip an outer `TCA_OPTIONS` nest, if the block is exactly one.
///
/// Blocks produced by [`encode_options`](super::tc::encode_options) carry
/// the nest; the options payload of a kernel reply does not. Only a header
/// with `NLA_F_NESTED` set counts as the wrapper, since `TCA_OPTIONS`
/// shares its id with `TCA_MC_SYNC_TIME`.
pub fn parse_options_attr(data: &[u8]) -> Result<&[u8]> {
    let Ok(hdr) = NlAttr::from_bytes(data) else {
        return Ok(data);
    };
    if hdr.kind() != TcaAttr::Options as u16 || !hdr.is_nested() {
        return Ok(data);
    }

    let mut iter = AttrIter::new(data);
    match iter.next().transpose()? {
        Some((_, payload)) if iter.next().is_none() => Ok(payload),
        _ => Ok(data),
    }
}

/// Parsed qdisc options, strongly typed by qdisc kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QdiscOptions {
    /// mc - multi-queue fair queue
    Mc(McOptions),
    /// Unknown qdisc type (contains raw options)
    Unknown(Vec<u8>),
}

/// mc qdisc options as reported by the kernel.
///
/// A field is `None` when the attribute was absent, too short, or carried
/// the unlimited sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McOptions {
    /// Maximum rate in bytes/sec.
    pub maxrate: Option<u32>,
    /// Synchronization interval.
    pub sync: Option<Duration>,
    /// Number of flow buckets.
    pub buckets: Option<u32>,
}

impl McOptions {
    /// Build from a decoded field map.
    pub fn from_fields(fields: &BTreeMap<&'static str, AttrValue>) -> Self {
        let mut opts = Self::default();
        for (name, value) in fields {
            match (*name, *value) {
                ("maxrate", AttrValue::Rate(rate)) => opts.maxrate = Some(rate),
                ("sync", AttrValue::Duration(d)) => opts.sync = Some(d),
                ("buckets", AttrValue::Count(n)) => opts.buckets = Some(n),
                _ => {}
            }
        }
        opts
    }
}

/// Parse mc options from an options block (with or without the
/// `TCA_OPTIONS` wrapper).
pub fn parse_mc_options(data: &[u8]) -> Result<McOptions> {
    let inner = parse_options_attr(data)?;
    let fields = decode_fields(inner, MC_ATTRS)?;
    Ok(McOptions::from_fields(&fields))
}

/// Parse qdisc options from a TcMessage.
///
/// Returns `Ok(None)` if the message has no kind or no options.
pub fn parse_qdisc_options(msg: &TcMessage) -> Result<Option<QdiscOptions>> {
    let (Some(kind), Some(data)) = (msg.kind(), msg.options.as_ref()) else {
        return Ok(None);
    };

    Ok(Some(match kind {
        mc::KIND => QdiscOptions::Mc(parse_mc_options(data)?),
        _ => QdiscOptions::Unknown(data.clone()),
    }))
}
