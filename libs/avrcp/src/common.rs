//! Protocol constants and wire enumerations shared by every message family.
//!
//! All multi-byte fields in this protocol are big-endian. Parser getters
//! hand back raw masked integers so unknown wire values stay representable;
//! converting to these enums is the caller's opt-in via `try_from`.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 24-bit organization identifier carried by every vendor-dependent frame.
pub const BLUETOOTH_COMPANY_ID: u32 = 0x001958;

/// Character-set tag marking attribute text as UTF-8.
pub const CHARACTER_SET_UTF8: u16 = 0x006A;

/// Sub-unit type of the remote-control panel, the addressee of every
/// vendor-dependent message.
pub const SUBUNIT_TYPE_PANEL: u8 = 0x09;

/// Message-class tag carried in the low 4 bits of the first frame byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CType {
    Control = 0x0,
    Status = 0x1,
    Notify = 0x3,
    Accepted = 0x9,
    Rejected = 0xA,
    Stable = 0xC,
    Changed = 0xD,
    Interim = 0xF,
}

/// Operation code in the third frame byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Opcode {
    VendorDependent = 0x00,
    UnitInfo = 0x30,
    SubunitInfo = 0x31,
    PassThrough = 0x7C,
}

/// Vendor-dependent command identifiers (AVRCP v1.6.1 section 4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CommandPdu {
    GetCapabilities = 0x10,
    ListApplicationSettingAttributes = 0x11,
    GetElementAttributes = 0x20,
    GetPlayStatus = 0x30,
    RegisterNotification = 0x31,
}

/// Fragmentation tag of a vendor-dependent frame. Only unfragmented
/// messages are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PacketType {
    Single = 0x00,
}

/// Which kind of capability list is being requested or returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Capability {
    CompanyId = 0x02,
    EventsSupported = 0x03,
}

/// Notification events a target can report (AVRCP v1.6.1 appendix H).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Event {
    PlaybackStatusChanged = 0x01,
    TrackChanged = 0x02,
    PlaybackPosChanged = 0x05,
    PlayerApplicationSettingChanged = 0x08,
    NowPlayingContentChanged = 0x09,
    AvailablePlayersChanged = 0x0A,
    AddressedPlayerChanged = 0x0B,
    UidsChanged = 0x0C,
    VolumeChanged = 0x0D,
}

/// Media attribute identifiers for now-playing metadata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u32)]
pub enum MediaAttributeId {
    Title = 0x01,
    ArtistName = 0x02,
    AlbumName = 0x03,
    TrackNumber = 0x04,
    TotalNumberOfTracks = 0x05,
    Genre = 0x06,
    PlayingTime = 0x07,
    DefaultCoverArt = 0x08,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_round_trip_through_try_from() {
        assert_eq!(CType::try_from(0x0C), Ok(CType::Stable));
        assert_eq!(Opcode::try_from(0x7C), Ok(Opcode::PassThrough));
        assert_eq!(CommandPdu::try_from(0x20), Ok(CommandPdu::GetElementAttributes));
        assert_eq!(Capability::try_from(0x03), Ok(Capability::EventsSupported));
        assert_eq!(Event::try_from(0x0D), Ok(Event::VolumeChanged));
        assert_eq!(MediaAttributeId::try_from(0x07), Ok(MediaAttributeId::PlayingTime));
    }

    #[test]
    fn unknown_wire_values_are_rejected() {
        assert!(CType::try_from(0x02).is_err());
        assert!(Capability::try_from(0x01).is_err());
        assert!(Event::try_from(0x03).is_err());
        assert!(MediaAttributeId::try_from(0x09).is_err());
    }
}
