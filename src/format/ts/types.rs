/// Size of a transport packet.
pub const TS_PACKET_SIZE: usize = 188;
/// Size of the fixed transport packet header.
pub const TS_HEADER_SIZE: usize = 4;
/// First byte of every transport packet.
pub const TS_SYNC_BYTE: u8 = 0x47;
/// PID of stuffing packets.
pub const PID_NULL: u16 = 0x1FFF;

/// Clock of PTS/DTS values.
pub const PTS_HZ: u64 = 90_000;
/// PTS/DTS are 33 bit counters.
pub const PTS_MASK: u64 = 0x1_FFFF_FFFF;

// PES
/// Prefix opening every PES unit.
pub const PES_START_CODE: [u8; 3] = [0x00, 0x00, 0x01];
/// Start code, stream id, length and the two flag bytes plus header length.
pub const PES_MIN_HEADER_SIZE: usize = 9;
/// Private stream 1
pub const STREAM_ID_PRIVATE_1: u8 = 0xBD;

/// Fixed header of a transport packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TSHeader {
    /// Transport error indicator
    pub transport_error: bool,
    /// A PES unit starts in this packet
    pub payload_unit_start: bool,
    /// Transport priority bit
    pub transport_priority: bool,
    /// 13 bit packet identifier
    pub pid: u16,
    /// Transport scrambling control
    pub scrambling_control: u8,
    /// An adaptation field follows the header
    pub adaptation_field_exists: bool,
    /// The packet carries payload
    pub contains_payload: bool,
    /// Continuity counter
    pub continuity_counter: u8,
}

/// Video stream ids 0xE0..=0xEF.
pub fn pes_is_video(stream_id: u8) -> bool {
    stream_id & 0xF0 == 0xE0
}

/// Audio stream ids 0xC0..=0xDF plus private stream 1, which carries AC-3 in DVB.
pub fn pes_is_audio(stream_id: u8) -> bool {
    stream_id & 0xE0 == 0xC0 || stream_id == STREAM_ID_PRIVATE_1
}
