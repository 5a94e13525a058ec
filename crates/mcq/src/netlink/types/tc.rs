//! Traffic control message types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::{Error, Result};

/// Traffic control message (struct tcmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct TcMsg {
    /// Address family.
    pub tcm_family: u8,
    /// Padding.
    pub tcm_pad1: u8,
    /// Padding.
    pub tcm_pad2: u16,
    /// Interface index.
    pub tcm_ifindex: i32,
    /// Qdisc handle.
    pub tcm_handle: u32,
    /// Parent qdisc.
    pub tcm_parent: u32,
    /// Info (depends on message type).
    pub tcm_info: u32,
}

impl TcMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new TC message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interface index.
    pub fn with_ifindex(mut self, ifindex: i32) -> Self {
        self.tcm_ifindex = ifindex;
        self
    }

    /// Set the handle.
    pub fn with_handle(mut self, handle: u32) -> Self {
        self.tcm_handle = handle;
        self
    }

    /// Set the parent.
    pub fn with_parent(mut self, parent: u32) -> Self {
        self.tcm_parent = parent;
        self
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data).map(|(r, _)| r).map_err(|_| {
            Error::Parse(format!(
                "tcmsg needs {} bytes, got {}",
                Self::SIZE,
                data.len()
            ))
        })
    }
}

/// Traffic control attributes (TCA_*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum TcaAttr {
    Unspec = 0,
    Kind = 1,
    Options = 2,
    Stats = 3,
    Xstats = 4,
    Rate = 5,
    Fcnt = 6,
    Stats2 = 7,
}

/// Nested TCA_STATS2 attribute IDs.
pub mod stats2 {
    pub const TCA_STATS_BASIC: u16 = 1;
    pub const TCA_STATS_RATE_EST: u16 = 2;
    pub const TCA_STATS_QUEUE: u16 = 3;
    pub const TCA_STATS_APP: u16 = 4;
}

/// Qdisc-specific attributes and structures.
pub mod qdisc {
    /// mc (multi-queue fair queue) qdisc.
    pub mod mc {
        use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

        /// Qdisc kind string.
        pub const KIND: &str = "mc";

        pub const TCA_MC_UNSPEC: u16 = 0;
        /// Maximum per-flow rate, u32 bytes/sec.
        pub const TCA_MC_MAX_RATE: u16 = 1;
        /// Synchronization interval, u32 microseconds.
        pub const TCA_MC_SYNC_TIME: u16 = 2;
        /// log2 of the flow table size, u32.
        pub const TCA_MC_BUCKETS_LOG: u16 = 3;
        pub const TCA_MC_MAX: u16 = TCA_MC_BUCKETS_LOG;

        /// Number of priority bands reported in the stats.
        pub const MC_BANDS: usize = 3;

        /// Extended statistics (TCA_XSTATS), laid out like `tc_fq_qd_stats`.
        ///
        /// Older kernels send a prefix of this structure; newer ones may
        /// append fields. Decode it with
        /// [`decode_stats_blob`](crate::netlink::stats::decode_stats_blob).
        #[repr(C)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
        #[cfg_attr(feature = "output", derive(serde::Serialize))]
        pub struct TcMcQdStats {
            pub gc_flows: u64,
            pub highprio_packets: u64,
            pub tcp_retrans: u64,
            pub throttled: u64,
            pub flows_plimit: u64,
            pub pkts_too_long: u64,
            pub allocation_errors: u64,
            pub time_next_delayed_flow: i64,
            pub flows: u32,
            pub inactive_flows: u32,
            pub throttled_flows: u32,
            pub unthrottle_latency_ns: u32,
            /// Packets above ce_threshold.
            pub ce_mark: u64,
            pub horizon_drops: u64,
            pub horizon_caps: u64,
            pub fastpath_packets: u64,
            pub band_drops: [u64; MC_BANDS],
            pub band_pkt_count: [u32; MC_BANDS],
            #[cfg_attr(feature = "output", serde(skip))]
            pub pad: u32,
        }

        impl TcMcQdStats {
            /// Size of this structure.
            pub const SIZE: usize = std::mem::size_of::<Self>();

            /// Drops summed over all bands.
            pub fn total_band_drops(&self) -> u64 {
                self.band_drops.iter().sum()
            }

            /// Check if every counter is zero (e.g. an empty blob).
            pub fn is_zero(&self) -> bool {
                *self == Self::default()
            }
        }
    }
}
