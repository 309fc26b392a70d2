//! The frame builder contract and the outermost frame layer.
//!
//! Every message starts with the same 3-byte header: a message-class tag in
//! the low nibble of byte 0, the addressee sub-unit packed into byte 1
//! (type in the high 5 bits, instance id in the low 3), and an operation
//! code in byte 2. Builders compose by ownership: each layer owns the next
//! inner builder and delegates to it after writing its own header.

use std::fmt;

use packet::{Bytes, Packet};

use crate::common::{CType, Opcode};
use crate::error::{ParseError, ParseResult};

/// Size of the outermost frame header.
pub const AVC_HEADER_LEN: usize = 3;

/// Capability shared by every frame layer and leaf message: report the
/// exact serialized size, then append exactly that many bytes.
pub trait FrameBuilder {
    /// Total serialized size in bytes for the current state. Recomputed on
    /// every call, never cached.
    fn encoded_len(&self) -> usize;

    /// Appends exactly [`encoded_len`](FrameBuilder::encoded_len) bytes to
    /// `out`, reserving capacity first.
    fn encode(&self, out: &mut Packet);

    /// Serializes into a fresh window sized to fit.
    fn build(&self) -> Bytes {
        let mut out = Packet::with_capacity(self.encoded_len());
        self.encode(&mut out);
        debug_assert_eq!(out.len(), self.encoded_len());
        out.freeze()
    }
}

/// Pre-encoded payload bytes, for composing frames by hand.
#[derive(Debug, Clone, Default)]
pub struct RawPayload {
    bytes: Vec<u8>,
}

impl RawPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl FrameBuilder for RawPayload {
    fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.bytes.len());
        out.put_slice(&self.bytes);
    }
}

/// Writes the 3-byte frame header. Sub-unit inputs are masked to their
/// field widths: type to 5 bits, id to 3.
pub(crate) fn push_avc_header(
    out: &mut Packet,
    ctype: CType,
    subunit_type: u8,
    subunit_id: u8,
    opcode: Opcode,
) {
    out.put_u8(u8::from(ctype) & 0x0F);
    out.put_u8(((subunit_type & 0x1F) << 3) | (subunit_id & 0x07));
    out.put_u8(opcode.into());
}

/// Generic outermost frame: the 3-byte header over any payload.
#[derive(Debug, Clone)]
pub struct AvcFrameBuilder<P> {
    ctype: CType,
    subunit_type: u8,
    subunit_id: u8,
    opcode: Opcode,
    payload: P,
}

impl<P: FrameBuilder> AvcFrameBuilder<P> {
    pub fn new(
        ctype: CType,
        subunit_type: u8,
        subunit_id: u8,
        opcode: Opcode,
        payload: P,
    ) -> Self {
        Self {
            ctype,
            subunit_type,
            subunit_id,
            opcode,
            payload,
        }
    }
}

impl<P: FrameBuilder> FrameBuilder for AvcFrameBuilder<P> {
    fn encoded_len(&self) -> usize {
        AVC_HEADER_LEN + self.payload.encoded_len()
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.encoded_len());
        push_avc_header(
            out,
            self.ctype,
            self.subunit_type,
            self.subunit_id,
            self.opcode,
        );
        self.payload.encode(out);
    }
}

/// Read-only view of the outermost frame layer.
///
/// Construction verifies the 3-byte header is present. Getters mask their
/// fields out of the raw bytes unconditionally; out-of-range bits in unused
/// positions are discarded, never rejected.
#[derive(Debug, Clone)]
pub struct AvcFrame {
    data: Bytes,
}

impl AvcFrame {
    /// Wraps a window already known to hold the header.
    pub(crate) fn wrap(data: Bytes) -> Self {
        debug_assert!(data.len() >= AVC_HEADER_LEN);
        Self { data }
    }

    /// Wraps `data`, which must hold at least the frame header.
    pub fn parse(data: Bytes) -> ParseResult<Self> {
        if data.len() < AVC_HEADER_LEN {
            return Err(ParseError::FrameTooShort {
                need: AVC_HEADER_LEN,
                got: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Message-class tag from the low 4 bits of byte 0.
    pub fn ctype(&self) -> u8 {
        self.data[0] & 0x0F
    }

    /// Addressee sub-unit type from the high 5 bits of byte 1.
    pub fn subunit_type(&self) -> u8 {
        self.data[1] >> 3
    }

    /// Addressee sub-unit instance from the low 3 bits of byte 1.
    pub fn subunit_id(&self) -> u8 {
        self.data[1] & 0b111
    }

    /// Operation code byte.
    pub fn opcode(&self) -> u8 {
        self.data[2]
    }

    /// Everything after the frame header, sharing the same storage.
    pub fn payload(&self) -> Bytes {
        self.data.slice(AVC_HEADER_LEN..)
    }

    /// The full window this view reads from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    // Dump lines shared with the layers nested inside this one.
    pub(crate) fn field_lines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  └ ctype = {:#04x}", self.ctype())?;
        writeln!(f, "  └ subunit type = {:#04x}", self.subunit_type())?;
        writeln!(f, "  └ subunit id = {:#04x}", self.subunit_id())?;
        writeln!(f, "  └ opcode = {:#04x}", self.opcode())
    }
}

impl fmt::Display for AvcFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AvcFrame: {} bytes", self.data.len())?;
        self.field_lines(f)?;
        writeln!(f, "  └ payload = {}", hex::encode(self.payload()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // AVRCP Get Capabilities request captured from the air.
    const GET_CAPABILITIES_REQUEST: [u8; 11] = [
        0x01, 0x48, 0x00, 0x00, 0x19, 0x58, 0x10, 0x00, 0x00, 0x01, 0x03,
    ];

    // AVRCP pass-through command, play button pushed.
    const PASS_THROUGH_PLAY_PUSHED: [u8; 5] = [0x00, 0x48, 0x7C, 0x44, 0x00];

    #[test]
    fn build_frame_from_raw_payload() {
        let payload = RawPayload::new(&GET_CAPABILITIES_REQUEST[AVC_HEADER_LEN..]);
        let builder = AvcFrameBuilder::new(
            CType::Status,
            0x09,
            0x00,
            Opcode::VendorDependent,
            payload,
        );

        assert_eq!(builder.encoded_len(), GET_CAPABILITIES_REQUEST.len());
        assert_eq!(&builder.build()[..], &GET_CAPABILITIES_REQUEST[..]);
    }

    #[test]
    fn getters_read_masked_fields() {
        let frame = AvcFrame::parse(Bytes::copy_from_slice(&GET_CAPABILITIES_REQUEST)).unwrap();

        assert_eq!(frame.ctype(), u8::from(CType::Status));
        assert_eq!(frame.subunit_type(), 0x09);
        assert_eq!(frame.subunit_id(), 0x00);
        assert_eq!(frame.opcode(), u8::from(Opcode::VendorDependent));
    }

    #[test]
    fn getters_mask_out_of_range_bits() {
        let mut bad = GET_CAPABILITIES_REQUEST;
        bad[0] = 0xFF;
        bad[1] = 0xFF;
        let frame = AvcFrame::parse(Bytes::copy_from_slice(&bad)).unwrap();

        assert_eq!(frame.ctype(), u8::from(CType::Interim));
        assert_eq!(frame.subunit_type(), 0b0001_1111);
        assert_eq!(frame.subunit_id(), 0b0000_0111);
    }

    #[test]
    fn payload_window_starts_after_header() {
        let frame = AvcFrame::parse(Bytes::copy_from_slice(&GET_CAPABILITIES_REQUEST)).unwrap();

        assert_eq!(
            &frame.payload()[..],
            &[0x00, 0x19, 0x58, 0x10, 0x00, 0x00, 0x01, 0x03]
        );
    }

    #[test]
    fn pass_through_frame_parses() {
        let frame = AvcFrame::parse(Bytes::copy_from_slice(&PASS_THROUGH_PLAY_PUSHED)).unwrap();

        assert_eq!(frame.ctype(), u8::from(CType::Control));
        assert_eq!(frame.opcode(), u8::from(Opcode::PassThrough));
        assert_eq!(&frame.payload()[..], &[0x44, 0x00]);
    }

    #[test]
    fn short_window_is_a_decode_error() {
        let err = AvcFrame::parse(Bytes::copy_from_slice(&[0x01, 0x48])).unwrap_err();

        assert_eq!(err, ParseError::FrameTooShort { need: 3, got: 2 });
    }

    #[test]
    fn subunit_inputs_are_masked_on_encode() {
        // Type 0x29 overflows 5 bits, id 0x08 overflows 3; both fold back
        // into the panel address 0x48.
        let builder = AvcFrameBuilder::new(
            CType::Control,
            0x29,
            0x08,
            Opcode::UnitInfo,
            RawPayload::new(vec![0x00]),
        );
        let bytes = builder.build();

        assert_eq!(bytes[1], 0x48);
    }

    #[test]
    fn display_dump_lists_header_fields() {
        let frame = AvcFrame::parse(Bytes::copy_from_slice(&GET_CAPABILITIES_REQUEST)).unwrap();
        let dump = frame.to_string();

        assert!(dump.contains("ctype = 0x01"));
        assert!(dump.contains("opcode = 0x00"));
        assert!(dump.contains("payload = 0019581000000103"));
    }
}
