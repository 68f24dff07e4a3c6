use super::types::*;
use crate::error::{DemuxError, Result};

/// Parses the 4 byte header of a transport packet.
pub fn parse_header(data: &[u8]) -> Result<TSHeader> {
    if data.len() < TS_HEADER_SIZE {
        return Err(DemuxError::InvalidData("TS packet too short".into()));
    }

    if data[0] != TS_SYNC_BYTE {
        return Err(DemuxError::InvalidData("Invalid sync byte".into()));
    }

    Ok(TSHeader {
        transport_error: (data[1] & 0x80) != 0,
        payload_unit_start: (data[1] & 0x40) != 0,
        transport_priority: (data[1] & 0x20) != 0,
        pid: (((data[1] & 0x1F) as u16) << 8) | data[2] as u16,
        scrambling_control: (data[3] >> 6) & 0x03,
        adaptation_field_exists: (data[3] & 0x20) != 0,
        contains_payload: (data[3] & 0x10) != 0,
        continuity_counter: data[3] & 0x0F,
    })
}

/// Length of the adaptation field following the header, if the packet has one.
pub fn adaptation_field_length(data: &[u8], header: &TSHeader) -> Result<Option<usize>> {
    if !header.adaptation_field_exists {
        return Ok(None);
    }

    let length = *data
        .get(TS_HEADER_SIZE)
        .ok_or_else(|| DemuxError::InvalidData("Adaptation field length missing".into()))?
        as usize;
    if data.len() < TS_HEADER_SIZE + 1 + length {
        return Err(DemuxError::InvalidData("Adaptation field too short".into()));
    }

    Ok(Some(length))
}

/// Offset of the payload within the packet (header plus adaptation field).
pub fn payload_offset(data: &[u8], header: &TSHeader) -> Result<usize> {
    let offset = match adaptation_field_length(data, header)? {
        Some(length) => TS_HEADER_SIZE + 1 + length,
        None => TS_HEADER_SIZE,
    };

    if offset > data.len() {
        return Err(DemuxError::InvalidData(format!(
            "Payload offset {} beyond packet end",
            offset
        )));
    }
    Ok(offset)
}
