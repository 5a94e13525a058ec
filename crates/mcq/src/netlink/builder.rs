//! Attribute block builder.

use super::attr::{NLA_F_NESTED, NLA_HDRLEN, NlAttr, nla_align};
use super::error::{Error, Result};

/// Default bound for a qdisc options block, matching the request buffer
/// iproute2 reserves for `TCA_OPTIONS`.
pub const DEFAULT_OPTIONS_CAPACITY: usize = 1024;

/// Builder for a bounded netlink attribute block.
///
/// Nested attributes are opened with [`nest_start`](Self::nest_start) and
/// closed with [`nest_end`](Self::nest_end); the offsets of open nests are
/// kept on a stack, so nests may be arbitrarily deep. Every append checks
/// the capacity before touching the buffer, so a failed append leaves the
/// block unchanged.
#[derive(Debug, Clone)]
pub struct AttrBuilder {
    buf: Vec<u8>,
    capacity: usize,
    nests: Vec<usize>,
}

impl Default for AttrBuilder {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OPTIONS_CAPACITY)
    }
}

impl AttrBuilder {
    /// Create a builder bounded to [`DEFAULT_OPTIONS_CAPACITY`] bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder bounded to `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::new(),
            capacity,
            nests: Vec::new(),
        }
    }

    /// Get the current block length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get the capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of nests that are still open.
    pub fn depth(&self) -> usize {
        self.nests.len()
    }

    fn reserve(&self, additional: usize) -> Result<()> {
        let needed = self.buf.len() + additional;
        if needed > self.capacity {
            return Err(Error::CapacityExceeded {
                needed,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append an attribute with the given type and data.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        let len = NLA_HDRLEN + data.len();
        if len > u16::MAX as usize {
            return Err(Error::CapacityExceeded {
                needed: len,
                capacity: u16::MAX as usize,
            });
        }
        self.reserve(nla_align(len))?;

        let attr = NlAttr::new(attr_type, data.len());
        self.buf.extend_from_slice(attr.as_bytes());
        self.buf.extend_from_slice(data);
        // Pad to alignment
        let aligned = nla_align(self.buf.len());
        self.buf.resize(aligned, 0);
        Ok(())
    }

    /// Append an empty (flag) attribute with no payload.
    pub fn append_attr_empty(&mut self, attr_type: u16) -> Result<()> {
        self.append_attr(attr_type, &[])
    }

    /// Append a u8 attribute.
    pub fn append_attr_u8(&mut self, attr_type: u16, value: u8) -> Result<()> {
        self.append_attr(attr_type, &[value])
    }

    /// Append a u16 attribute (native endian).
    pub fn append_attr_u16(&mut self, attr_type: u16, value: u16) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a u32 attribute (native endian).
    pub fn append_attr_u32(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a u64 attribute (native endian).
    pub fn append_attr_u64(&mut self, attr_type: u16, value: u64) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a null-terminated string attribute.
    pub fn append_attr_str(&mut self, attr_type: u16, value: &str) -> Result<()> {
        let mut data = value.as_bytes().to_vec();
        data.push(0); // null terminator
        self.append_attr(attr_type, &data)
    }

    /// Start a nested attribute.
    pub fn nest_start(&mut self, attr_type: u16) -> Result<()> {
        self.reserve(NLA_HDRLEN)?;
        let offset = self.buf.len();
        // Write placeholder header with nested flag
        let attr = NlAttr::new(attr_type | NLA_F_NESTED, 0);
        self.buf.extend_from_slice(attr.as_bytes());
        self.nests.push(offset);
        Ok(())
    }

    /// End the innermost nested attribute, patching its length.
    pub fn nest_end(&mut self) -> Result<()> {
        let offset = *self.nests.last().ok_or(Error::UnbalancedNest)?;
        let len = self.buf.len() - offset;
        if len > u16::MAX as usize {
            return Err(Error::CapacityExceeded {
                needed: len,
                capacity: u16::MAX as usize,
            });
        }
        self.nests.pop();

        // Update the length in the nested attribute header
        let len_bytes = (len as u16).to_ne_bytes();
        self.buf[offset..offset + 2].copy_from_slice(&len_bytes);
        Ok(())
    }

    /// Finalize and return the block bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        if !self.nests.is_empty() {
            return Err(Error::UnbalancedNest);
        }
        Ok(self.buf)
    }

    /// Get the current buffer for inspection.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
