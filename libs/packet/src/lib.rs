//! Byte-buffer primitives shared by the wire codecs.
//!
//! Three pieces cover the whole surface:
//! - [`Packet`] is the growable build target. Writers reserve the total size
//!   up front and append fields in wire order; all multi-byte writes are
//!   big-endian.
//! - [`Bytes`] (re-exported) is the read side: an immutable window over
//!   shared storage. Slicing produces overlapping windows without copying,
//!   and the storage lives as long as any window over it.
//! - [`Cursor`] walks a window forward, extracting big-endian integers with
//!   bounds checks. A failed read reports how many bytes it needed versus
//!   how many remained and does not advance.
//!
//! None of these types synchronize internally; cross-thread sharing is the
//! caller's concern.

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;
use thiserror::Error;

pub use bytes::{Bytes, BytesMut};

/// A read ran past the end of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read past end of window: need {need} bytes, got {got}")]
pub struct Underrun {
    pub need: usize,
    pub got: usize,
}

/// Growable append-only buffer for building outgoing messages.
#[derive(Debug, Clone, Default)]
pub struct Packet {
    buf: BytesMut,
}

impl Packet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Ensures room for at least `additional` more bytes ahead of a burst
    /// of writes.
    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    /// Appends the low 24 bits of `value` as 3 big-endian bytes.
    pub fn put_u24(&mut self, value: u32) {
        self.buf.put_uint(u64::from(value & 0x00FF_FFFF), 3);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Converts the accumulated bytes into an immutable shared window.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Forward-only big-endian reader over a byte window.
///
/// Reads never touch bytes past the window end: an underrun leaves the
/// position where it was and returns [`Underrun`].
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Starts the cursor `offset` bytes into the window. An offset past the
    /// end seats the cursor at the end, with nothing left to read.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Window-relative offset of the next read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the window end.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Underrun> {
        if self.remaining() < n {
            return Err(Underrun {
                need: n,
                got: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    pub fn read_u8(&mut self) -> Result<u8, Underrun> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Underrun> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Reads a 3-byte big-endian integer into the low bits of a `u32`.
    pub fn read_u24(&mut self) -> Result<u32, Underrun> {
        Ok(BigEndian::read_uint(self.take(3)?, 3) as u32)
    }

    pub fn read_u32(&mut self) -> Result<u32, Underrun> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, Underrun> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Underrun> {
        self.take(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_writes_big_endian() {
        let mut packet = Packet::new();
        packet.reserve(7);
        packet.put_u8(0x01);
        packet.put_u16(0x2345);
        packet.put_u32(0x6789ABCD);

        assert_eq!(packet.len(), 7);
        assert_eq!(
            packet.as_slice(),
            &[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD]
        );
    }

    #[test]
    fn put_u24_keeps_low_three_bytes() {
        let mut packet = Packet::new();
        packet.put_u24(0xFF001958);

        assert_eq!(packet.as_slice(), &[0x00, 0x19, 0x58]);
    }

    #[test]
    fn put_u64_writes_eight_bytes() {
        let mut packet = Packet::new();
        packet.put_u64(0x0102030405060708);

        assert_eq!(
            packet.as_slice(),
            &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
    }

    #[test]
    fn frozen_windows_share_storage() {
        let mut packet = Packet::new();
        packet.put_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let window = packet.freeze();

        let tail = window.slice(2..);
        assert_eq!(&window[..], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&tail[..], &[0xBE, 0xEF]);
    }

    #[test]
    fn cursor_reads_advance_in_order() {
        let data = [0x01, 0x00, 0x19, 0x58, 0x23, 0x45];
        let mut cursor = Cursor::new(&data);

        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u24().unwrap(), 0x001958);
        assert_eq!(cursor.read_u16().unwrap(), 0x2345);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn read_u64_consumes_eight_bytes() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xFF];
        let mut cursor = Cursor::new(&data);

        assert_eq!(cursor.read_u64().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.read_u64().unwrap_err(), Underrun { need: 8, got: 1 });
    }

    #[test]
    fn cursor_underrun_reports_need_and_got() {
        let data = [0x01, 0x02];
        let mut cursor = Cursor::new(&data);

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err, Underrun { need: 4, got: 2 });
        // A failed read must not consume anything.
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u16().unwrap(), 0x0102);
    }

    #[test]
    fn cursor_at_offset_past_end_has_nothing_left() {
        let data = [0x01, 0x02];
        let mut cursor = Cursor::at(&data, 5);

        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.read_bytes(0).unwrap(), b"");
        assert_eq!(cursor.read_u8().unwrap_err(), Underrun { need: 1, got: 0 });
    }

    #[test]
    fn read_bytes_borrows_from_the_window() {
        let data = [0x54, 0x65, 0x73, 0x74];
        let mut cursor = Cursor::new(&data);

        assert_eq!(cursor.read_bytes(4).unwrap(), b"Test");
    }
}
