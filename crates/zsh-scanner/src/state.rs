//! Scanner state snapshots
//!
//! The host checkpoints the scanner around incremental re-parses by
//! serializing it into a small byte buffer and restoring it later. The
//! layout is fixed and byte-exact:
//!
//! ```text
//! byte 0: last_glob_paren_depth
//! byte 1: ext_was_in_double_quote
//! byte 2: ext_saw_outside_quote
//! byte 3: context stack depth
//! byte 4: here-document count
//! byte 5: just_returned_variable_name
//! byte 6: just_returned_bare_dollar
//! bytes 7..: one tag byte per context stack entry
//! per here-document: is_raw, started, allows_indent,
//!                    u32 LE delimiter length, delimiter bytes
//! ```
//!
//! Multi-byte integers are little-endian. A snapshot that does not fit the
//! host's buffer is reported as zero bytes written and the host falls back
//! to a full re-parse.

use thiserror::Error;
use zsh_heredoc::Heredoc;

use crate::context::ContextKind;
use crate::Scanner;

/// Snapshot buffer size of the host framework. A serialized scanner never
/// legitimately exceeds this.
pub const SERIALIZATION_BUFFER_SIZE: usize = 1024;

/// Errors restoring a scanner from a serialized snapshot.
///
/// Only a corrupted or foreign buffer produces these; every buffer written
/// by [`Scanner::serialize`] restores cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The buffer ended before the declared state was complete.
    #[error("serialized scanner state truncated at byte {offset}")]
    Truncated { offset: usize },

    /// A context stack entry holds a byte outside the tag range.
    #[error("unknown context tag {tag:#04x} in serialized scanner state")]
    InvalidContextTag { tag: u8 },

    /// The declared state ended before the buffer did.
    #[error("{remaining} trailing bytes after serialized scanner state")]
    TrailingBytes { remaining: usize },
}

struct Writer<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl Writer<'_> {
    fn push(&mut self, byte: u8) -> bool {
        if self.len >= self.buffer.len() {
            return false;
        }
        self.buffer[self.len] = byte;
        self.len += 1;
        true
    }

    fn extend(&mut self, bytes: &[u8]) -> bool {
        if self.len + bytes.len() > self.buffer.len() {
            return false;
        }
        self.buffer[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        true
    }
}

struct Reader<'a> {
    buffer: &'a [u8],
    at: usize,
}

impl<'a> Reader<'a> {
    fn byte(&mut self) -> Result<u8, StateError> {
        let byte =
            *self.buffer.get(self.at).ok_or(StateError::Truncated { offset: self.at })?;
        self.at += 1;
        Ok(byte)
    }

    fn flag(&mut self) -> Result<bool, StateError> {
        Ok(self.byte()? != 0)
    }

    fn bytes(&mut self, count: usize) -> Result<&'a [u8], StateError> {
        let end = self.at.checked_add(count).filter(|&end| end <= self.buffer.len());
        let end = end.ok_or(StateError::Truncated { offset: self.buffer.len() })?;
        let slice = &self.buffer[self.at..end];
        self.at = end;
        Ok(slice)
    }

    fn u32_le(&mut self) -> Result<u32, StateError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.bytes(4)?);
        Ok(u32::from_le_bytes(raw))
    }
}

impl Scanner {
    /// Write the scanner state into `buffer`, returning the number of bytes
    /// written, or 0 when the state does not fit.
    pub fn serialize(&self, buffer: &mut [u8]) -> usize {
        let mut writer = Writer { buffer, len: 0 };

        let header_ok = writer.push(self.last_glob_paren_depth)
            && writer.push(self.ext_was_in_double_quote as u8)
            && writer.push(self.ext_saw_outside_quote as u8)
            && writer.push(self.context.depth() as u8)
            && writer.push(self.heredocs.len() as u8)
            && writer.push(self.just_returned_variable_name as u8)
            && writer.push(self.just_returned_bare_dollar as u8);
        if !header_ok {
            return 0;
        }

        for &tag in self.context.tags() {
            if !writer.push(tag as u8) {
                return 0;
            }
        }

        for heredoc in self.heredocs.records() {
            let record_ok = writer.push(heredoc.is_raw as u8)
                && writer.push(heredoc.started as u8)
                && writer.push(heredoc.allows_indent as u8)
                && writer.extend(&(heredoc.delimiter.len() as u32).to_le_bytes())
                && writer.extend(&heredoc.delimiter);
            if !record_ok {
                return 0;
            }
        }

        writer.len
    }

    /// Restore the scanner from a serialized snapshot, replacing all
    /// current state. An empty buffer resets to the freshly created state.
    pub fn deserialize(&mut self, buffer: &[u8]) -> Result<(), StateError> {
        if buffer.is_empty() {
            self.reset();
            return Ok(());
        }

        let mut reader = Reader { buffer, at: 0 };
        self.last_glob_paren_depth = reader.byte()?;
        self.ext_was_in_double_quote = reader.flag()?;
        self.ext_saw_outside_quote = reader.flag()?;
        let context_depth = reader.byte()? as usize;
        let heredoc_count = reader.byte()? as usize;
        self.just_returned_variable_name = reader.flag()?;
        self.just_returned_bare_dollar = reader.flag()?;

        self.context.clear();
        for _ in 0..context_depth {
            let tag = reader.byte()?;
            let kind =
                ContextKind::from_wire(tag).ok_or(StateError::InvalidContextTag { tag })?;
            self.context.push(kind);
        }

        self.heredocs.clear();
        for _ in 0..heredoc_count {
            let mut heredoc = Heredoc::new();
            heredoc.is_raw = reader.flag()?;
            heredoc.started = reader.flag()?;
            heredoc.allows_indent = reader.flag()?;
            let delimiter_len = reader.u32_le()? as usize;
            heredoc.delimiter = reader.bytes(delimiter_len)?.to_vec();
            self.heredocs.push(heredoc);
        }

        if reader.at != buffer.len() {
            return Err(StateError::TrailingBytes { remaining: buffer.len() - reader.at });
        }
        Ok(())
    }
}
