use super::types::*;
use bytes::{BufMut, BytesMut};

/// Largest payload handed out per slice of an unbounded PES unit.
pub const MAX_PES_SLICE: usize = 0xFFF0;

/// What the demultiplexer needs from a PES header.
///
/// Parsing never fails: a header too short or in an unexpected syntax simply
/// yields no timestamps, and the payload offset is clamped to the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PesHeader {
    /// Stream id following the start code
    pub stream_id: u8,
    /// Data alignment indicator
    pub data_alignment: bool,
    /// Presentation time stamp (33 bits)
    pub pts: Option<u64>,
    /// Decoding time stamp (33 bits)
    pub dts: Option<u64>,
    /// Offset of the first payload byte
    pub payload_offset: usize,
}

impl PesHeader {
    /// Parses the header at the start of `buf`.
    pub fn parse(buf: &[u8]) -> Self {
        let stream_id = buf.get(3).copied().unwrap_or(0);
        let payload_offset = match buf.get(8) {
            Some(&len) => (PES_MIN_HEADER_SIZE + len as usize).min(buf.len()),
            None => buf.len(),
        };

        Self {
            stream_id,
            data_alignment: buf.get(6).is_some_and(|b| b & 0x04 != 0),
            pts: pes_get_pts(buf),
            dts: pes_get_dts(buf),
            payload_offset,
        }
    }
}

/// MPEG-2 syntax, unscrambled, carrying audio or video.
fn has_timestamp_syntax(buf: &[u8]) -> bool {
    if buf.len() < PES_MIN_HEADER_SIZE {
        return false;
    }
    if !(pes_is_video(buf[3]) || pes_is_audio(buf[3])) {
        return false;
    }
    // '10' marker bits, scrambling control 0
    (buf[6] & 0xC0) == 0x80 && (buf[6] & 0x30) == 0
}

/// Decodes a 5 byte PTS/DTS field.
fn read_timestamp(b: &[u8]) -> u64 {
    (((b[0] & 0x0E) as u64) << 29)
        | ((b[1] as u64) << 22)
        | (((b[2] & 0xFE) as u64) << 14)
        | ((b[3] as u64) << 7)
        | ((b[4] & 0xFE) as u64 >> 1)
}

/// PTS of the PES unit in `buf`, if it carries one.
pub fn pes_get_pts(buf: &[u8]) -> Option<u64> {
    if has_timestamp_syntax(buf) && buf.len() > 13 && (buf[7] & 0x80) != 0 {
        Some(read_timestamp(&buf[9..14]) & PTS_MASK)
    } else {
        None
    }
}

/// DTS of the PES unit in `buf`, if it carries one.
pub fn pes_get_dts(buf: &[u8]) -> Option<u64> {
    if has_timestamp_syntax(buf) && buf.len() > 18 && (buf[7] & 0x40) != 0 {
        Some(read_timestamp(&buf[14..19]) & PTS_MASK)
    } else {
        None
    }
}

/// Collects the payloads of transport packets into PES units.
///
/// A unit is handed out once the next unit starts; for units with a declared
/// length it is returned whole, units of undeclared length (video) are handed
/// out in slices of at most [`MAX_PES_SLICE`] payload bytes, each slice after
/// the first carrying a minimal header of its own.
#[derive(Debug)]
pub struct PesAssembler {
    data: BytesMut,
    offset: usize,
    slice: BytesMut,
    max_size: usize,
}

impl PesAssembler {
    /// Creates an assembler dropping units that grow past `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            data: BytesMut::new(),
            offset: 0,
            slice: BytesMut::new(),
            max_size,
        }
    }

    /// Drops everything collected so far.
    pub fn reset(&mut self) {
        self.data.clear();
        self.offset = 0;
    }

    /// Number of bytes collected for the current unit.
    pub fn buffered(&self) -> usize {
        self.data.len()
    }

    /// Adds the payload of one transport packet.
    pub fn put_packet(&mut self, payload: &[u8], payload_unit_start: bool) {
        if payload_unit_start {
            self.reset();
        } else if self.data.is_empty() {
            // still waiting for a unit start
            return;
        }

        if self.data.len() + payload.len() > self.max_size {
            log::error!(
                "PES buffer overrun ({} bytes), resetting",
                self.data.len() + payload.len()
            );
            self.reset();
            return;
        }

        self.data.extend_from_slice(payload);
    }

    /// Returns the next complete PES unit or slice, if any.
    pub fn try_get_pes(&mut self) -> Option<&[u8]> {
        if self.offset >= self.data.len() || self.data.len() < 6 {
            return None;
        }

        if self.data[..3] != PES_START_CODE {
            log::debug!("Dropping PES data without start code");
            self.reset();
            return None;
        }

        if self.offset == 0 {
            let declared = u16::from_be_bytes([self.data[4], self.data[5]]) as usize;
            if declared != 0 {
                let total = declared + 6;
                if total > self.data.len() {
                    return None;
                }
                // anything after the declared length is stuffing
                self.offset = self.data.len();
                return Some(&self.data[..total]);
            }
            // undeclared length, hand out in slices
            self.offset = 6;
        }

        let len = (self.data.len() - self.offset).min(MAX_PES_SLICE);
        self.slice.clear();

        if self.offset == 6 {
            self.slice.extend_from_slice(&self.data[..4]);
            self.slice.put_u16(len as u16);
        } else {
            self.slice.extend_from_slice(&self.data[..4]);
            self.slice.put_u16((len + 3) as u16);
            self.slice.put_slice(&[0x80, 0x00, 0x00]);
        }
        self.slice
            .extend_from_slice(&self.data[self.offset..self.offset + len]);
        self.offset += len;

        Some(&self.slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_timestamp(prefix: u8, ts: u64) -> [u8; 5] {
        [
            (prefix << 4) | (((ts >> 29) & 0x0E) as u8) | 0x01,
            (ts >> 22) as u8,
            (((ts >> 14) & 0xFE) as u8) | 0x01,
            (ts >> 7) as u8,
            (((ts << 1) & 0xFE) as u8) | 0x01,
        ]
    }

    fn pes(stream_id: u8, pts: Option<u64>, dts: Option<u64>, payload: &[u8]) -> Vec<u8> {
        let mut fields = Vec::new();
        let mut flags = 0u8;
        match (pts, dts) {
            (Some(pts), Some(dts)) => {
                flags = 0xC0;
                fields.extend_from_slice(&encode_timestamp(0x3, pts));
                fields.extend_from_slice(&encode_timestamp(0x1, dts));
            }
            (Some(pts), None) => {
                flags = 0x80;
                fields.extend_from_slice(&encode_timestamp(0x2, pts));
            }
            _ => {}
        }
        let length = 3 + fields.len() + payload.len();
        let mut out = vec![0x00, 0x00, 0x01, stream_id];
        out.extend_from_slice(&(length as u16).to_be_bytes());
        out.extend_from_slice(&[0x84, flags, fields.len() as u8]);
        out.extend_from_slice(&fields);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_header_timestamps() {
        let unit = pes(0xBD, Some(0x1_2345_6789), Some(0x0_9876_5432), &[1, 2, 3]);
        let header = PesHeader::parse(&unit);

        assert_eq!(header.pts, Some(0x1_2345_6789));
        assert_eq!(header.dts, Some(0x0_9876_5432));
        assert!(header.data_alignment);
        assert_eq!(header.payload_offset, 19);
        assert_eq!(&unit[header.payload_offset..], &[1, 2, 3]);
    }

    #[test]
    fn test_header_soft_failures() {
        // too short for anything
        let header = PesHeader::parse(&[0x00, 0x00, 0x01]);
        assert_eq!(header.pts, None);
        assert_eq!(header.payload_offset, 3);

        // PTS flag set but no room for the field
        let mut unit = pes(0xC0, Some(1234), None, &[]);
        unit.truncate(12);
        let header = PesHeader::parse(&unit);
        assert_eq!(header.pts, None);
        assert_eq!(header.payload_offset, 12);

        // padding stream never carries timestamps
        let unit = pes(0xBE, Some(1234), None, &[9]);
        assert_eq!(PesHeader::parse(&unit).pts, None);

        // scrambled
        let mut unit = pes(0xE0, Some(1234), None, &[9]);
        unit[6] |= 0x10;
        assert_eq!(PesHeader::parse(&unit).pts, None);
    }

    #[test]
    fn test_bounded_unit_returned_once_complete() {
        let unit = pes(0xBD, Some(90000), None, &[0xAA; 300]);
        let mut assembler = PesAssembler::new(1 << 20);

        assembler.put_packet(&unit[..184], true);
        assert!(assembler.try_get_pes().is_none());
        assembler.put_packet(&unit[184..], false);
        assert_eq!(assembler.try_get_pes().unwrap(), &unit[..]);
        assert!(assembler.try_get_pes().is_none());
    }

    #[test]
    fn test_stuffing_after_bounded_unit_ignored() {
        let unit = pes(0xBD, Some(90000), None, &[0xAA; 20]);
        let mut assembler = PesAssembler::new(1 << 20);

        let mut payload = unit.clone();
        payload.resize(184, 0xFF);
        assembler.put_packet(&payload, true);
        assert_eq!(assembler.try_get_pes().unwrap(), &unit[..]);
        assert!(assembler.try_get_pes().is_none());
    }

    #[test]
    fn test_payload_before_unit_start_dropped() {
        let mut assembler = PesAssembler::new(1 << 20);
        assembler.put_packet(&[0xAA; 184], false);
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn test_unbounded_unit_is_sliced() {
        let mut unit = pes(0xE0, Some(3600), None, &vec![0x11; MAX_PES_SLICE + 100]);
        unit[4] = 0;
        unit[5] = 0;
        let mut assembler = PesAssembler::new(1 << 20);
        assembler.put_packet(&unit, true);

        let first = assembler.try_get_pes().unwrap().to_vec();
        assert_eq!(first.len(), 6 + MAX_PES_SLICE);
        assert_eq!(PesHeader::parse(&first).pts, Some(3600));

        let second = assembler.try_get_pes().unwrap().to_vec();
        let header = PesHeader::parse(&second);
        assert_eq!(header.pts, None);
        assert_eq!(header.payload_offset, 9);
        // the 8 header bytes behind the length field went out with the first slice
        assert_eq!(second.len() - header.payload_offset, 100 + 8);
        assert_eq!(u16::from_be_bytes([second[4], second[5]]) as usize, second.len() - 6);

        assert!(assembler.try_get_pes().is_none());
    }

    #[test]
    fn test_overrun_resets() {
        let mut assembler = PesAssembler::new(300);
        assembler.put_packet(&[0x00, 0x00, 0x01, 0xBD, 0x00, 0x00], true);
        assembler.put_packet(&[0u8; 184], false);
        assembler.put_packet(&[0u8; 184], false);
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn test_garbage_without_start_code() {
        let mut assembler = PesAssembler::new(1 << 20);
        assembler.put_packet(&[0x12; 184], true);
        assert!(assembler.try_get_pes().is_none());
        assert_eq!(assembler.buffered(), 0);
    }
}
