//! AVRCP message codec.
//!
//! Remote-control signaling rides on 3-byte AV/C frames; vendor-dependent
//! commands add a 7-byte sub-header (company id, command, packet type,
//! parameter length) ahead of the command payload. This crate provides:
//!
//! - builders implementing [`FrameBuilder`], which size and serialize
//!   complete messages into a [`packet::Packet`]
//! - zero-copy views ([`AvcFrame`], [`VendorFrame`], and one per command)
//!   over a shared [`packet::Bytes`] window, validated once at parse time
//!
//! Builders panic on unencodable input (oversized payloads, overflowing
//! element counts); parsers return [`ParseError`] for anything wrong with
//! bytes off the wire. Nothing is internally synchronized: builders and
//! views are plain values, and cross-thread sharing discipline belongs to
//! the caller.
//!
//! ```
//! use avrcp::{
//!     Capability, FrameBuilder, GetCapabilitiesRequest, GetCapabilitiesRequestBuilder,
//!     VendorFrame,
//! };
//!
//! let message = GetCapabilitiesRequestBuilder::new(Capability::EventsSupported).build();
//!
//! let vendor = VendorFrame::parse(message.clone()).unwrap();
//! assert_eq!(vendor.command_pdu(), 0x10);
//!
//! let request = GetCapabilitiesRequest::parse(message).unwrap();
//! assert_eq!(request.capability(), u8::from(Capability::EventsSupported));
//! ```

pub mod capabilities;
pub mod common;
pub mod element_attributes;
pub mod error;
pub mod frame;
pub mod vendor;

pub use capabilities::{
    GetCapabilitiesRequest, GetCapabilitiesRequestBuilder, GetCapabilitiesResponse,
    GetCapabilitiesResponseBuilder,
};
pub use common::{
    CType, Capability, CommandPdu, Event, MediaAttributeId, Opcode, PacketType,
    BLUETOOTH_COMPANY_ID, CHARACTER_SET_UTF8, SUBUNIT_TYPE_PANEL,
};
pub use element_attributes::{
    AttributeEntry, GetElementAttributesRequest, GetElementAttributesRequestBuilder,
    GetElementAttributesResponse, GetElementAttributesResponseBuilder,
};
pub use error::{ParseError, ParseResult};
pub use frame::{AvcFrame, AvcFrameBuilder, FrameBuilder, RawPayload, AVC_HEADER_LEN};
pub use vendor::{VendorFrame, VendorFrameBuilder, VENDOR_HEADER_LEN};
