//! Decode failures for received frames.
//!
//! Builder misuse (wrong category, oversized payloads, overflowing a count
//! byte) is a programmer error and panics instead; see the `# Panics`
//! sections on the builder methods.

use packet::Cursor;
use thiserror::Error;

/// Why a received byte window could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The window is smaller than the layer's fixed header.
    #[error("frame too short: need {need} bytes, got {got}")]
    FrameTooShort { need: usize, got: usize },

    /// A count field promised more trailing elements than the window holds.
    /// `offset` is where the read ran out, relative to the message start.
    #[error("list truncated at offset {offset}")]
    TruncatedList { offset: usize },

    /// An element accessor was called on a response carrying the other
    /// capability category.
    #[error("capability mismatch: expected {expected:#04x}, found {actual:#04x}")]
    CapabilityMismatch { expected: u8, actual: u8 },

    /// An attribute value was not valid UTF-8.
    #[error("attribute text at offset {offset} is not valid UTF-8")]
    MalformedText { offset: usize },
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Maps a cursor underrun inside a count-driven loop to the offset where
/// the failing element read began.
pub(crate) fn truncated_at(cursor: &Cursor<'_>) -> ParseError {
    ParseError::TruncatedList {
        offset: cursor.position(),
    }
}
