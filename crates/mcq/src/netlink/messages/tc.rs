//! Strongly-typed traffic control messages.

use crate::netlink::attr::{get, parse_attrs};
use crate::netlink::error::Result;
use crate::netlink::parse::{parse_prefix, parse_struct};
use crate::netlink::types::tc::{TcMsg, TcaAttr, stats2};

/// Strongly-typed qdisc message, as found in an `RTM_NEWQDISC` reply after
/// the netlink header.
#[derive(Debug, Clone, Default)]
pub struct TcMessage {
    /// Fixed-size header (struct tcmsg).
    pub header: TcMsg,
    /// Qdisc type (e.g., "mc").
    pub kind: Option<String>,
    /// Raw options data (type-specific, nested attributes).
    pub options: Option<Vec<u8>>,
    /// Extended statistics (type-specific).
    pub xstats: Option<Vec<u8>>,
}

impl TcMessage {
    /// Create a new empty TC message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the interface index.
    #[inline]
    pub fn ifindex(&self) -> i32 {
        self.header.tcm_ifindex
    }

    /// Get the handle.
    #[inline]
    pub fn handle(&self) -> u32 {
        self.header.tcm_handle
    }

    /// Get the parent handle.
    #[inline]
    pub fn parent(&self) -> u32 {
        self.header.tcm_parent
    }

    /// Get the qdisc kind.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Parse a message payload: tcmsg header followed by attributes.
    ///
    /// A malformed attribute length anywhere fails the whole message.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (header, rest) = parse_prefix(data, parse_struct::<TcMsg>, "tcmsg")?;
        let attrs = parse_attrs(rest)?;

        let mut msg = TcMessage {
            header,
            ..Default::default()
        };

        if let Some(kind) = attrs.get(TcaAttr::Kind as u16) {
            msg.kind = Some(get::string(kind)?.to_string());
        }
        msg.options = attrs.get(TcaAttr::Options as u16).map(<[u8]>::to_vec);
        msg.xstats = attrs.get(TcaAttr::Xstats as u16).map(<[u8]>::to_vec);

        if let Some(stats) = attrs.get(TcaAttr::Stats2 as u16) {
            // Application-specific stats, store in xstats if not already set
            let nested = parse_attrs(stats)?;
            if msg.xstats.is_none() {
                msg.xstats = nested.get(stats2::TCA_STATS_APP).map(<[u8]>::to_vec);
            }
        }

        tracing::trace!(
            kind = ?msg.kind,
            ifindex = msg.ifindex(),
            attrs = attrs.len(),
            "parsed tc message"
        );
        Ok(msg)
    }
}
