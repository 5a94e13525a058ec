//! Netlink attribute (rtattr/nlattr) handling.

use std::collections::BTreeMap;

use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4; // nla_align(size_of::<NlAttr>())

/// Netlink attribute header (mirrors struct nlattr / struct rtattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header, excluding trailing padding.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    ///
    /// The caller guarantees `NLA_HDRLEN + data_len` fits in a `u16`.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nla_len as usize).saturating_sub(NLA_HDRLEN)
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::TruncatedAttribute {
                offset: 0,
                declared: NLA_HDRLEN,
                remaining: data.len(),
            })
    }
}

/// Iterator over netlink attributes in a buffer.
///
/// Yields an error for the first record whose length does not fit the
/// remaining buffer, then stops. Fewer than `NLA_HDRLEN` trailing bytes
/// are treated as padding.
pub struct AttrIter<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }

    /// Check if there are no more attributes.
    pub fn is_empty(&self) -> bool {
        self.failed || self.data.len() < NLA_HDRLEN
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = Result<(u16, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }

        let attr = match NlAttr::from_bytes(self.data) {
            Ok(a) => a,
            Err(_) => return None,
        };

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            self.failed = true;
            return Some(Err(Error::TruncatedAttribute {
                offset: self.offset,
                declared: len,
                remaining: self.data.len(),
            }));
        }

        let payload = &self.data[NLA_HDRLEN..len];
        let aligned_len = nla_align(len);

        // Move to next attribute
        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }
        self.offset += aligned_len;

        Some(Ok((attr.kind(), payload)))
    }
}

/// Attributes of one nesting level, keyed by type.
///
/// Borrows the payloads from the decoded block. A type that occurs more
/// than once keeps its last payload.
#[derive(Debug, Clone, Default)]
pub struct AttrTable<'a> {
    attrs: BTreeMap<u16, &'a [u8]>,
}

impl<'a> AttrTable<'a> {
    /// Get the payload for an attribute type.
    pub fn get(&self, attr_type: u16) -> Option<&'a [u8]> {
        self.attrs.get(&attr_type).copied()
    }

    /// Check whether an attribute type is present.
    pub fn contains(&self, attr_type: u16) -> bool {
        self.attrs.contains_key(&attr_type)
    }

    /// Number of distinct attribute types.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Check if no attributes were decoded.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate over (type, payload) in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &'a [u8])> + '_ {
        self.attrs.iter().map(|(k, v)| (*k, *v))
    }
}

/// Decode one level of an attribute block.
///
/// Fails with [`Error::TruncatedAttribute`] if any record overruns the
/// block; no partial table is returned in that case.
pub fn parse_attrs(data: &[u8]) -> Result<AttrTable<'_>> {
    let mut attrs = BTreeMap::new();
    for attr in AttrIter::new(data) {
        let (attr_type, payload) = attr?;
        attrs.insert(attr_type, payload);
    }
    Ok(AttrTable { attrs })
}

/// Helper functions for extracting typed values from attribute payloads.
///
/// The plain getters fail on a short payload; the `opt_` getters treat a
/// short payload as absent.
pub mod get {
    use super::*;

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        opt_u32_ne(data)
            .ok_or_else(|| Error::InvalidAttribute("truncated u32 attribute".into()))
    }

    /// Extract a u32 value (native endian), `None` if the payload is short.
    pub fn opt_u32_ne(data: &[u8]) -> Option<u32> {
        data.get(..4)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_ne_bytes)
    }

    /// Extract a u64 value (native endian), `None` if the payload is short.
    pub fn opt_u64_ne(data: &[u8]) -> Option<u64> {
        data.get(..8)
            .and_then(|b| b.try_into().ok())
            .map(u64::from_ne_bytes)
    }

    /// Extract a null-terminated string.
    pub fn string(data: &[u8]) -> Result<&str> {
        // Find null terminator or use whole buffer
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..len])
            .map_err(|e| Error::InvalidAttribute(format!("invalid UTF-8: {}", e)))
    }
}
