//! In-memory resource buffers that receive serialized scene data.
//!
//! Buffer 0 holds the metadata document; buffers `1..=N` hold one payload
//! per exportable graphic. Each buffer carries a transient internal name,
//! `memory_resource_{index + 1}`, which the metadata refers to until the
//! references are rewritten to stable file names.

use std::io::{self, Write};

/// Prefix of the internal placeholder names.
pub const PLACEHOLDER_PREFIX: &str = "memory_resource_";

/// A writable byte buffer tagged with its position in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBuffer {
    index: usize,
    bytes: Vec<u8>,
}

impl ResourceBuffer {
    /// Creates an empty buffer at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            bytes: Vec::new(),
        }
    }

    /// Returns the position of this buffer; 0 is the metadata buffer.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true for the metadata buffer.
    #[must_use]
    pub fn is_metadata(&self) -> bool {
        self.index == 0
    }

    /// Returns the internal placeholder name of this buffer.
    #[must_use]
    pub fn placeholder_name(&self) -> String {
        placeholder_name(self.index)
    }

    /// Returns the buffer contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replaces the buffer contents.
    pub fn set_bytes(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
    }

    /// Consumes the buffer, returning its contents.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Write for ResourceBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Returns the internal placeholder name for buffer `index`.
#[must_use]
pub fn placeholder_name(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{}", index + 1)
}

/// Parses a placeholder name back into a buffer index.
///
/// Returns `None` for anything that is not exactly `memory_resource_{k}`
/// with `k >= 1`.
#[must_use]
pub fn parse_placeholder(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(PLACEHOLDER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: usize = digits.parse().ok()?;
    number.checked_sub(1)
}

/// Allocates `count` empty buffers, indexed `0..count`.
#[must_use]
pub fn allocate(count: usize) -> Vec<ResourceBuffer> {
    log::debug!("allocating {count} resource buffers");
    (0..count).map(ResourceBuffer::new).collect()
}
