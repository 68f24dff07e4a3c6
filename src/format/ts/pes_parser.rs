use super::align::AlignmentBuffer;
use super::pes::{PesAssembler, PesHeader};
use crate::av::AudioInformation;
use crate::codec::CodecParser;
use crate::config::DemuxConfig;
use bytes::{Bytes, BytesMut};

/// One assembled access unit, still in the 90 kHz clock domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPayload {
    /// Payload of the access unit
    pub data: Bytes,
    /// Presentation time stamp
    pub pts: Option<u64>,
    /// Decoding time stamp
    pub dts: Option<u64>,
    /// Always zero, durations are not derived
    pub duration: u64,
    /// Parameters found in the payload's codec headers
    pub audio: Option<AudioInformation>,
}

/// Tracks PTS/DTS across the PES units of one access unit.
///
/// `cur_*` follow the stream, `pts`/`dts` are latched for the next payload
/// and cleared when it goes out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimestampTracker {
    cur_pts: Option<u64>,
    cur_dts: Option<u64>,
    pts: Option<u64>,
    dts: Option<u64>,
}

impl TimestampTracker {
    /// Follows the timestamps of one PES header.
    pub fn update(&mut self, header: &PesHeader) {
        let pts = header.pts;
        let dts = header.dts.or(pts);

        // a non-zero PTS moves the DTS and vice versa
        if pts.is_some_and(|v| v != 0) {
            self.cur_dts = dts;
        }
        if dts.is_some_and(|v| v != 0) {
            self.cur_pts = pts;
        }

        if self.dts.is_none() {
            self.dts = self.cur_dts;
        }
        if self.pts.is_none() {
            self.pts = self.cur_pts;
        }
    }

    /// Hands out the latched pair and clears it.
    pub fn take(&mut self) -> (Option<u64>, Option<u64>) {
        (self.pts.take(), self.dts.take())
    }

    /// The latched pair, left in place.
    pub fn pending(&self) -> (Option<u64>, Option<u64>) {
        (self.pts, self.dts)
    }
}

/// Turns the payloads of one PID's transport packets into access units.
#[derive(Debug)]
pub struct PesParser {
    codec: CodecParser,
    assembler: PesAssembler,
    packet: BytesMut,
    align: AlignmentBuffer,
    timestamps: TimestampTracker,
}

impl PesParser {
    /// Creates a parser using the buffer limits of `config`.
    pub fn new(codec: CodecParser, config: &DemuxConfig) -> Self {
        Self {
            codec,
            assembler: PesAssembler::new(config.max_pes_size),
            packet: BytesMut::new(),
            align: AlignmentBuffer::new(config.align_buffer_cap),
            timestamps: TimestampTracker::default(),
        }
    }

    /// Codec parser used for alignment and audio information.
    pub fn codec(&self) -> CodecParser {
        self.codec
    }

    /// Bytes collected for the PES unit in progress.
    pub fn buffered(&self) -> usize {
        self.assembler.buffered()
    }

    /// Bytes waiting in the alignment buffer.
    pub fn aligned_buffered(&self) -> usize {
        self.align.len()
    }

    /// Timestamp state of the unit in progress.
    pub fn timestamps(&self) -> &TimestampTracker {
        &self.timestamps
    }

    /// Feeds the payload of one transport packet.
    ///
    /// A unit start completes the previous PES unit, which is processed
    /// before the new data is queued. At most one payload comes out per call.
    pub fn parse(&mut self, payload: &[u8], payload_unit_start: bool) -> Option<ParsedPayload> {
        let parsed = if payload_unit_start {
            self.assemble()
        } else {
            None
        };

        self.assembler.put_packet(payload, payload_unit_start);
        parsed
    }

    fn assemble(&mut self) -> Option<ParsedPayload> {
        let first = self.assembler.try_get_pes()?;
        self.packet.clear();
        self.packet.extend_from_slice(first);

        let header = PesHeader::parse(&self.packet);
        self.timestamps.update(&header);

        // more to come?
        while let Some(pes) = self.assembler.try_get_pes() {
            let slice = PesHeader::parse(pes);
            self.timestamps.update(&slice);
            self.packet.extend_from_slice(&pes[slice.payload_offset..]);
        }

        let payload = &self.packet[header.payload_offset..];

        if header.data_alignment || self.codec.disable_alignment() {
            let audio = self.codec.parse_payload(payload);
            let data = Bytes::copy_from_slice(payload);
            return Some(self.emit(data, audio));
        }

        log::debug!("Aligning stream ({} bytes)", payload.len());
        self.align.push(payload);

        let codec = self.codec;
        let (data, audio) = self.align.take_run(&codec, |run| {
            (Bytes::copy_from_slice(run), codec.parse_payload(run))
        })?;
        Some(self.emit(data, audio))
    }

    fn emit(&mut self, data: Bytes, audio: Option<AudioInformation>) -> ParsedPayload {
        let (pts, dts) = self.timestamps.take();
        ParsedPayload {
            data,
            pts,
            dts,
            duration: 0,
            audio,
        }
    }
}
