//! Capability enumeration: which organization ids and notification events
//! a target supports.
//!
//! The response payload is a category tag, a one-byte element count, then
//! the elements themselves: 3 bytes each for organization ids, 1 byte each
//! for event codes. Elements are deduplicated and serialize in ascending
//! order no matter how they were added.

use std::collections::BTreeSet;
use std::fmt;

use packet::{Bytes, Cursor, Packet};

use crate::common::{CType, Capability, CommandPdu, Event, PacketType};
use crate::error::{truncated_at, ParseError, ParseResult};
use crate::frame::FrameBuilder;
use crate::vendor::{push_vendor_header, VendorFrame, VENDOR_HEADER_LEN};

/// Payload bytes ahead of the element list: category tag plus count.
const LIST_PREAMBLE_LEN: usize = 2;

/// Most elements the one-byte count field can describe.
const MAX_ELEMENTS: usize = 0xFF;

/// Builds the capability request: a single byte naming the category.
#[derive(Debug, Clone)]
pub struct GetCapabilitiesRequestBuilder {
    capability: Capability,
}

impl GetCapabilitiesRequestBuilder {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }
}

impl FrameBuilder for GetCapabilitiesRequestBuilder {
    fn encoded_len(&self) -> usize {
        VENDOR_HEADER_LEN + 1
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.encoded_len());
        push_vendor_header(
            out,
            CType::Status,
            CommandPdu::GetCapabilities,
            PacketType::Single,
            1,
        );
        out.put_u8(self.capability.into());
    }
}

/// Builds the capability response for one category.
///
/// The category is fixed at construction; every add must match it. Elements
/// live in an ordered set, so duplicates collapse and serialization is
/// ascending.
#[derive(Debug, Clone)]
pub struct GetCapabilitiesResponseBuilder {
    capability: Capability,
    elements: BTreeSet<u32>,
}

impl GetCapabilitiesResponseBuilder {
    /// Response listing supported organization ids, seeded with
    /// `company_id`.
    pub fn company_ids(company_id: u32) -> Self {
        Self {
            capability: Capability::CompanyId,
            elements: BTreeSet::from([company_id & 0x00FF_FFFF]),
        }
    }

    /// Response listing supported notification events, seeded with `event`.
    pub fn events_supported(event: Event) -> Self {
        Self {
            capability: Capability::EventsSupported,
            elements: BTreeSet::from([u32::from(u8::from(event))]),
        }
    }

    /// Records one supported organization id, keeping its low 24 bits.
    ///
    /// # Panics
    ///
    /// Panics if this builder carries supported events, or if a 256th
    /// distinct element would overflow the count byte.
    pub fn add_company_id(mut self, company_id: u32) -> Self {
        assert_eq!(
            self.capability,
            Capability::CompanyId,
            "builder carries supported events, not organization ids"
        );
        self.insert(company_id & 0x00FF_FFFF);
        self
    }

    /// Records one supported notification event.
    ///
    /// # Panics
    ///
    /// Panics if this builder carries organization ids, or if a 256th
    /// distinct element would overflow the count byte.
    pub fn add_event(mut self, event: Event) -> Self {
        assert_eq!(
            self.capability,
            Capability::EventsSupported,
            "builder carries organization ids, not supported events"
        );
        self.insert(u32::from(u8::from(event)));
        self
    }

    fn insert(&mut self, element: u32) {
        if !self.elements.contains(&element) {
            assert!(
                self.elements.len() < MAX_ELEMENTS,
                "capability count field is one byte"
            );
            self.elements.insert(element);
        }
    }

    // Organization ids are 3 bytes on the wire, event codes 1.
    fn element_width(&self) -> usize {
        match self.capability {
            Capability::CompanyId => 3,
            Capability::EventsSupported => 1,
        }
    }
}

impl FrameBuilder for GetCapabilitiesResponseBuilder {
    fn encoded_len(&self) -> usize {
        VENDOR_HEADER_LEN + LIST_PREAMBLE_LEN + self.elements.len() * self.element_width()
    }

    fn encode(&self, out: &mut Packet) {
        out.reserve(self.encoded_len());
        let param_len = self.encoded_len() - VENDOR_HEADER_LEN;
        push_vendor_header(
            out,
            CType::Stable,
            CommandPdu::GetCapabilities,
            PacketType::Single,
            param_len,
        );
        out.put_u8(self.capability.into());
        out.put_u8(self.elements.len() as u8);
        for &element in &self.elements {
            match self.capability {
                Capability::CompanyId => out.put_u24(element),
                Capability::EventsSupported => out.put_u8(element as u8),
            }
        }
    }
}

/// Read-only view of a capability request.
#[derive(Debug, Clone)]
pub struct GetCapabilitiesRequest {
    data: Bytes,
}

impl GetCapabilitiesRequest {
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

    /// Requested capability category byte.
    pub fn capability(&self) -> u8 {
        self.data[VENDOR_HEADER_LEN]
    }
}

impl fmt::Display for GetCapabilitiesRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GetCapabilitiesRequest: {} bytes", self.data.len())?;
        VendorFrame::wrap(self.data.clone()).field_lines(f)?;
        writeln!(f, "  └ capability requested = {:#04x}", self.capability())
    }
}

/// Read-only view of a capability response.
#[derive(Debug, Clone)]
pub struct GetCapabilitiesResponse {
    data: Bytes,
}

impl GetCapabilitiesResponse {
    const MIN_LEN: usize = VENDOR_HEADER_LEN + LIST_PREAMBLE_LEN;

    pub fn parse(data: Bytes) -> ParseResult<Self> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::FrameTooShort {
                need: Self::MIN_LEN,
                got: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Returned capability category byte.
    pub fn capability(&self) -> u8 {
        self.data[VENDOR_HEADER_LEN]
    }

    /// Declared element count.
    pub fn element_count(&self) -> u8 {
        self.data[VENDOR_HEADER_LEN + 1]
    }

    /// Organization ids carried by a company-id response.
    ///
    /// Fails if this response carries the event category instead, or if the
    /// declared count runs past the window end.
    pub fn company_ids(&self) -> ParseResult<Vec<u32>> {
        self.require_capability(Capability::CompanyId)?;
        let mut cursor = Cursor::at(&self.data, Self::MIN_LEN);
        let mut ids = Vec::with_capacity(usize::from(self.element_count()));
        for _ in 0..self.element_count() {
            ids.push(cursor.read_u24().map_err(|_| truncated_at(&cursor))?);
        }
        Ok(ids)
    }

    /// Event codes carried by an events-supported response.
    ///
    /// Fails if this response carries the company-id category instead, or
    /// if the declared count runs past the window end.
    pub fn events_supported(&self) -> ParseResult<Vec<u8>> {
        self.require_capability(Capability::EventsSupported)?;
        let mut cursor = Cursor::at(&self.data, Self::MIN_LEN);
        let mut events = Vec::with_capacity(usize::from(self.element_count()));
        for _ in 0..self.element_count() {
            events.push(cursor.read_u8().map_err(|_| truncated_at(&cursor))?);
        }
        Ok(events)
    }

    fn require_capability(&self, expected: Capability) -> ParseResult<()> {
        let actual = self.capability();
        if actual != u8::from(expected) {
            return Err(ParseError::CapabilityMismatch {
                expected: expected.into(),
                actual,
            });
        }
        Ok(())
    }
}
