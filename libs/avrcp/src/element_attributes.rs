//! Media attribute exchange: which text attributes a controller wants for
//! an element, and the attribute text a target returns.
//!
//! A request names an element by 64-bit identifier (zero means the element
//! currently playing) and lists attribute ids in the order they were added.
//! A response carries one entry per attribute: id, character set, value
//! length, then the value bytes. Response entries are keyed by attribute
//! id, so duplicates keep the first value and serialization is ascending.

use std::collections::BTreeMap;
use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use packet::{Bytes, Cursor, Packet};

use crate::common::{CType, CommandPdu, MediaAttributeId, PacketType, CHARACTER_SET_UTF8};
use crate::error::{truncated_at, ParseError, ParseResult};
use crate::frame::FrameBuilder;
use crate::vendor::{push_vendor_header, VendorFrame, VENDOR_HEADER_LEN};

/// Fixed bytes per response entry ahead of the value text: attribute id,
/// character set, value length.
const ENTRY_OVERHEAD: usize = 8;

/// One attribute returned by a target: its wire id and decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntry {
    pub attribute_id: u32,
    pub value: String,
}

/// Builds the attribute request for one element.
///
/// Attribute ids serialize in the order they were added, duplicates
/// included.
#[derive(Debug, Clone)]
pub struct GetElementAttributesRequestBuilder {
    identifier: u64,
    attributes: Vec<MediaAttributeId>,
}

impl GetElementAttributesRequestBuilder {
    /// Request against the element named by `identifier`; zero names the
    /// element currently playing.
    pub fn new(identifier: u64) -> Self {
        Self {
            identifier,
            attributes: Vec::new(),
        }
    }

    /// Appends one requested attribute id.
    ///
    /// # Panics
    ///
    /// Panics if a 256th id would overflow the count byte.
    pub fn add_attribute(mut self, attribute: MediaAttributeId) -> Self {
        assert!(
            self.attributes.len() < 0xFF,
            "attribute count field is one byte"
        );
        self.attributes.push(attribute);
        self
    }
}

impl FrameBuilder for GetElementAttributesRequestBuilder {
    fn encoded_len(&self) -> usize {
        VENDOR_HEADER_LEN + 9 + self.attributes.len() * 4
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.encoded_len());
        let param_len = self.encoded_len() - VENDOR_HEADER_LEN;
        push_vendor_header(
            out,
            CType::Status,
            CommandPdu::GetElementAttributes,
            PacketType::Single,
            param_len,
        );
        out.put_u64(self.identifier);
        out.put_u8(self.attributes.len() as u8);
        for &attribute in &self.attributes {
            out.put_u32(attribute.into());
        }
    }
}

/// Builds the attribute response: one entry per distinct attribute id.
#[derive(Debug, Clone, Default)]
pub struct GetElementAttributesResponseBuilder {
    entries: BTreeMap<MediaAttributeId, String>,
}

impl GetElementAttributesResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the text for one attribute. The first value recorded for an
    /// id wins; later adds for the same id change nothing.
    ///
    /// # Panics
    ///
    /// Panics if the value is longer than the entry length field can
    /// describe, if a 256th distinct entry would overflow the count byte,
    /// or if the entry would push the whole parameter past 16 bits of
    /// length.
    pub fn add_attribute(mut self, attribute: MediaAttributeId, value: impl Into<String>) -> Self {
        let value = value.into();
        assert!(
            value.len() <= usize::from(u16::MAX),
            "attribute value of {} bytes does not fit the entry length field",
            value.len()
        );
        if !self.entries.contains_key(&attribute) {
            assert!(
                self.entries.len() < 0xFF,
                "attribute count field is one byte"
            );
            let param_len = self.parameter_len() + ENTRY_OVERHEAD + value.len();
            assert!(
                param_len <= usize::from(u16::MAX),
                "parameter length {} does not fit 16 bits",
                param_len
            );
            self.entries.entry(attribute).or_insert(value);
        }
        self
    }

    /// Entry-count byte plus every serialized entry.
    fn parameter_len(&self) -> usize {
        1 + self
            .entries
            .values()
            .map(|value| ENTRY_OVERHEAD + value.len())
            .sum::<usize>()
    }
}

impl FrameBuilder for GetElementAttributesResponseBuilder {
    fn encoded_len(&self) -> usize {
        VENDOR_HEADER_LEN + self.parameter_len()
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.encoded_len());
        let param_len = self.encoded_len() - VENDOR_HEADER_LEN;
        push_vendor_header(
            out,
            CType::Stable,
            CommandPdu::GetElementAttributes,
            PacketType::Single,
            param_len,
        );
        out.put_u8(self.entries.len() as u8);
        for (&attribute, value) in &self.entries {
            out.put_u32(attribute.into());
            out.put_u16(CHARACTER_SET_UTF8);
            out.put_u16(value.len() as u16);
            out.put_slice(value.as_bytes());
        }
    }
}

/// Read-only view of an attribute request.
#[derive(Debug, Clone)]
pub struct GetElementAttributesRequest {
    data: Bytes,
}

impl GetElementAttributesRequest {
    const MIN_LEN: usize = VENDOR_HEADER_LEN + 9;

    pub fn parse(data: Bytes) -> ParseResult<Self> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::FrameTooShort {
                need: Self::MIN_LEN,
                got: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Element identifier; zero names the element currently playing.
    pub fn identifier(&self) -> u64 {
        BigEndian::read_u64(&self.data[VENDOR_HEADER_LEN..VENDOR_HEADER_LEN + 8])
    }

    /// Declared attribute id count.
    pub fn attribute_count(&self) -> u8 {
        self.data[VENDOR_HEADER_LEN + 8]
    }

    /// Requested attribute ids in wire order.
    ///
    /// Fails if the declared count runs past the window end.
    pub fn attributes(&self) -> ParseResult<Vec<u32>> {
        let mut cursor = Cursor::at(&self.data, Self::MIN_LEN);
        let mut ids = Vec::with_capacity(usize::from(self.attribute_count()));
        for _ in 0..self.attribute_count() {
            ids.push(cursor.read_u32().map_err(|_| truncated_at(&cursor))?);
        }
        Ok(ids)
    }
}

impl fmt::Display for GetElementAttributesRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GetElementAttributesRequest: {} bytes", self.data.len())?;
        VendorFrame::wrap(self.data.clone()).field_lines(f)?;
        writeln!(f, "  └ identifier = {:#018x}", self.identifier())?;
        match self.attributes() {
            Ok(ids) => {
                writeln!(f, "  └ attribute list: size = {}", ids.len())?;
                for id in ids {
                    writeln!(f, "      └ {:#010x}", id)?;
                }
            }
            Err(_) => writeln!(f, "  └ attribute list: truncated")?,
        }
        Ok(())
    }
}

/// Read-only view of an attribute response.
#[derive(Debug, Clone)]
pub struct GetElementAttributesResponse {
    data: Bytes,
}

impl GetElementAttributesResponse {
    const MIN_LEN: usize = VENDOR_HEADER_LEN + 1;

    pub fn parse(data: Bytes) -> ParseResult<Self> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::FrameTooShort {
                need: Self::MIN_LEN,
                got: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Declared entry count.
    pub fn entry_count(&self) -> u8 {
        self.data[VENDOR_HEADER_LEN]
    }

    /// Decoded entries in wire order.
    ///
    /// Fails if the declared count runs past the window end or an entry's
    /// value is not valid UTF-8. The character set field is read and
    /// discarded; values are decoded as UTF-8 either way.
    pub fn attributes(&self) -> ParseResult<Vec<AttributeEntry>> {
        let mut cursor = Cursor::at(&self.data, Self::MIN_LEN);
        let mut entries = Vec::with_capacity(usize::from(self.entry_count()));
        for _ in 0..self.entry_count() {
            let attribute_id = cursor.read_u32().map_err(|_| truncated_at(&cursor))?;
            let _character_set = cursor.read_u16().map_err(|_| truncated_at(&cursor))?;
            let value_len = cursor.read_u16().map_err(|_| truncated_at(&cursor))?;
            let offset = cursor.position();
            let raw = cursor
                .read_bytes(usize::from(value_len))
                .map_err(|_| truncated_at(&cursor))?;
            let value = String::from_utf8(raw.to_vec())
                .map_err(|_| ParseError::MalformedText { offset })?;
            entries.push(AttributeEntry {
                attribute_id,
                value,
            });
        }
        Ok(entries)
    }
}
