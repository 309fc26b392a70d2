//! The vendor-dependent sub-frame layer.
//!
//! Vendor messages nest a 7-byte header inside the base frame: the 24-bit
//! organization id, the command PDU, a fragmentation tag, and a 16-bit
//! parameter length covering everything after it. All vendor messages
//! address the panel sub-unit and use the vendor-dependent opcode, so this
//! layer writes the base header itself.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use packet::{Bytes, Packet};
use tracing::debug;

use crate::common::{
    CType, CommandPdu, Opcode, PacketType, BLUETOOTH_COMPANY_ID, SUBUNIT_TYPE_PANEL,
};
use crate::error::{ParseError, ParseResult};
use crate::frame::{push_avc_header, AvcFrame, FrameBuilder, AVC_HEADER_LEN};

/// Fixed overhead in front of a vendor payload: the base frame header plus
/// organization id, command PDU, packet type, and parameter length.
pub const VENDOR_HEADER_LEN: usize = AVC_HEADER_LEN + 7;

/// Writes all [`VENDOR_HEADER_LEN`] leading bytes for a payload of
/// `param_len` bytes.
///
/// # Panics
///
/// Panics if `param_len` does not fit the 16-bit parameter-length field.
pub(crate) fn push_vendor_header(
    out: &mut Packet,
    ctype: CType,
    pdu: CommandPdu,
    packet_type: PacketType,
    param_len: usize,
) {
    assert!(
        param_len <= usize::from(u16::MAX),
        "parameter length {} does not fit 16 bits",
        param_len
    );
    push_avc_header(out, ctype, SUBUNIT_TYPE_PANEL, 0x00, Opcode::VendorDependent);
    out.put_u24(BLUETOOTH_COMPANY_ID);
    out.put_u8(pdu.into());
    out.put_u8(packet_type.into());
    out.put_u16(param_len as u16);
}

/// Generic vendor-dependent frame over any payload builder.
///
/// Serializes the complete message: base header, vendor header, then the
/// payload. The payload length is validated once at construction.
#[derive(Debug, Clone)]
pub struct VendorFrameBuilder<P> {
    ctype: CType,
    pdu: CommandPdu,
    packet_type: PacketType,
    payload: P,
}

impl<P: FrameBuilder> VendorFrameBuilder<P> {
    /// Wraps `payload` in a vendor-dependent frame.
    ///
    /// # Panics
    ///
    /// Panics if the payload serializes to zero bytes or to more than
    /// 65535 bytes. Empty vendor payloads are not valid on the wire, and
    /// anything past 16 bits of length would need fragmentation.
    pub fn new(ctype: CType, pdu: CommandPdu, packet_type: PacketType, payload: P) -> Self {
        let len = payload.encoded_len();
        assert!(len > 0, "vendor payload must not be empty");
        assert!(
            len <= usize::from(u16::MAX),
            "vendor payload of {} bytes requires fragmentation",
            len
        );
        Self {
            ctype,
            pdu,
            packet_type,
            payload,
        }
    }
}

impl<P: FrameBuilder> FrameBuilder for VendorFrameBuilder<P> {
    fn encoded_len(&self) -> usize {
        VENDOR_HEADER_LEN + self.payload.encoded_len()
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.encoded_len());
        push_vendor_header(
            out,
            self.ctype,
            self.pdu,
            self.packet_type,
            self.payload.encoded_len(),
        );
        self.payload.encode(out);
    }
}

/// Read-only view of a vendor-dependent frame.
///
/// Offsets are relative to the message start, so the same window handed to
/// [`AvcFrame`](crate::frame::AvcFrame) parses here as well.
#[derive(Debug, Clone)]
pub struct VendorFrame {
    data: Bytes,
}

impl VendorFrame {
    /// Wraps a window already known to hold the header.
    pub(crate) fn wrap(data: Bytes) -> Self {
        debug_assert!(data.len() >= VENDOR_HEADER_LEN);
        Self { data }
    }

    /// Wraps `data`, which must hold at least the full vendor header.
    pub fn parse(data: Bytes) -> ParseResult<Self> {
        if data.len() < VENDOR_HEADER_LEN {
            return Err(ParseError::FrameTooShort {
                need: VENDOR_HEADER_LEN,
                got: data.len(),
            });
        }
        let frame = Self { data };
        let declared = usize::from(frame.parameter_length());
        let actual = frame.payload().len();
        if declared != actual {
            debug!(declared, actual, "parameter length disagrees with window");
        }
        Ok(frame)
    }

    /// Organization id assembled big-endian from the 3 bytes after the
    /// base header.
    pub fn company_id(&self) -> u32 {
        let mut value: u32 = 0;
        for byte in &self.data[AVC_HEADER_LEN..AVC_HEADER_LEN + 3] {
            value = (value << 8) | u32::from(*byte);
        }
        value
    }

    /// Command PDU byte.
    pub fn command_pdu(&self) -> u8 {
        self.data[6]
    }

    /// Fragmentation tag byte.
    pub fn packet_type(&self) -> u8 {
        self.data[7]
    }

    /// Declared length of everything after the vendor header.
    pub fn parameter_length(&self) -> u16 {
        BigEndian::read_u16(&self.data[8..10])
    }

    /// Payload window following the vendor header, sharing the same
    /// storage.
    pub fn payload(&self) -> Bytes {
        self.data.slice(VENDOR_HEADER_LEN..)
    }

    // Dump lines shared with the leaf views, base-frame lines included.
    pub(crate) fn field_lines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AvcFrame::wrap(self.data.clone()).field_lines(f)?;
        writeln!(f, "  └ company id = {:#08x}", self.company_id())?;
        writeln!(f, "  └ command pdu = {:#04x}", self.command_pdu())?;
        writeln!(f, "  └ packet type = {:#04x}", self.packet_type())?;
        writeln!(f, "  └ parameter length = {}", self.parameter_length())
    }
}

impl fmt::Display for VendorFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VendorFrame: {} bytes", self.data.len())?;
        self.field_lines(f)?;
        writeln!(f, "  └ payload = {}", hex::encode(self.payload()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RawPayload;

    const GET_CAPABILITIES_REQUEST: [u8; 11] = [
        0x01, 0x48, 0x00, 0x00, 0x19, 0x58, 0x10, 0x00, 0x00, 0x01, 0x03,
    ];

    // Interim response to a playback-status notification registration.
    const INTERIM_PLAY_STATUS_NOTIFICATION: [u8; 12] = [
        0x0F, 0x48, 0x00, 0x00, 0x19, 0x58, 0x31, 0x00, 0x00, 0x02, 0x01, 0x00,
    ];

    #[test]
    fn wrap_raw_payload_matches_capture() {
        let builder = VendorFrameBuilder::new(
            CType::Status,
            CommandPdu::GetCapabilities,
            PacketType::Single,
            RawPayload::new(vec![0x03]),
        );

        assert_eq!(builder.encoded_len(), GET_CAPABILITIES_REQUEST.len());
        assert_eq!(&builder.build()[..], &GET_CAPABILITIES_REQUEST[..]);
    }

    #[test]
    fn getters_read_header_fields() {
        let frame =
            VendorFrame::parse(Bytes::copy_from_slice(&GET_CAPABILITIES_REQUEST)).unwrap();

        assert_eq!(frame.company_id(), BLUETOOTH_COMPANY_ID);
        assert_eq!(frame.command_pdu(), u8::from(CommandPdu::GetCapabilities));
        assert_eq!(frame.packet_type(), u8::from(PacketType::Single));
        assert_eq!(frame.parameter_length(), 1);
        assert_eq!(&frame.payload()[..], &[0x03]);
    }

    #[test]
    fn notification_capture_parses() {
        let frame =
            VendorFrame::parse(Bytes::copy_from_slice(&INTERIM_PLAY_STATUS_NOTIFICATION))
                .unwrap();

        assert_eq!(frame.command_pdu(), u8::from(CommandPdu::RegisterNotification));
        assert_eq!(frame.parameter_length(), 2);
        assert_eq!(&frame.payload()[..], &[0x01, 0x00]);
    }

    #[test]
    fn short_window_is_a_decode_error() {
        let err =
            VendorFrame::parse(Bytes::copy_from_slice(&GET_CAPABILITIES_REQUEST[..9])).unwrap_err();

        assert_eq!(err, ParseError::FrameTooShort { need: 10, got: 9 });
    }

    #[test]
    #[should_panic(expected = "vendor payload must not be empty")]
    fn empty_payload_is_rejected() {
        VendorFrameBuilder::new(
            CType::Status,
            CommandPdu::GetPlayStatus,
            PacketType::Single,
            RawPayload::default(),
        );
    }

    #[test]
    #[should_panic(expected = "requires fragmentation")]
    fn oversized_payload_is_rejected() {
        VendorFrameBuilder::new(
            CType::Status,
            CommandPdu::GetElementAttributes,
            PacketType::Single,
            RawPayload::new(vec![0x00; usize::from(u16::MAX) + 1]),
        );
    }

    #[test]
    fn display_dump_lists_header_fields() {
        let frame =
            VendorFrame::parse(Bytes::copy_from_slice(&GET_CAPABILITIES_REQUEST)).unwrap();
        let dump = frame.to_string();

        assert!(dump.contains("ctype = 0x01"));
        assert!(dump.contains("company id = 0x001958"));
        assert!(dump.contains("command pdu = 0x10"));
        assert!(dump.contains("parameter length = 1"));
    }
}
