//! Fixed-capacity escape sequence buffer

/// Longest escape sequence the parser will accumulate
pub const ESC_BUFFER_CAPACITY: usize = 32;

/// The buffer cannot take another byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("escape sequence exceeds {} bytes", ESC_BUFFER_CAPACITY)]
pub struct BufferFull;

/// Bytes of the escape sequence in progress, starting with ESC
#[derive(Debug, Clone)]
pub struct EscBuffer {
    bytes: [u8; ESC_BUFFER_CAPACITY],
    len: usize,
}

impl Default for EscBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EscBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0; ESC_BUFFER_CAPACITY],
            len: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), BufferFull> {
        if self.len == ESC_BUFFER_CAPACITY {
            return Err(BufferFull);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn last(&self) -> Option<u8> {
        self.as_slice().last().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}
