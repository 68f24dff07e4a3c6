use super::types::*;
use crate::av::AudioInformation;
use crate::utils::BitReader;
use crate::{DemuxError, Result};

/// Fields of an Enhanced AC-3 sync frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eac3Header {
    /// Substream type
    pub frame_type: Eac3FrameType,
    /// Frame size in bytes
    pub frame_size: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Audio blocks per frame
    pub num_blocks: u32,
    /// `acmod`
    pub channel_mode: u32,
    /// Low frequency effects channel present
    pub lfeon: u32,
}

impl Eac3Header {
    /// Bit rate implied by frame size and duration, truncated toward zero.
    pub fn bit_rate(&self) -> u32 {
        (8.0 * self.frame_size as f64 * self.sample_rate as f64
            / (self.num_blocks as f64 * 256.0)) as u32
    }

    /// Channel count including LFE.
    pub fn channels(&self) -> u32 {
        AC3_CHANNELS_TABLE[self.channel_mode as usize] + self.lfeon
    }

    /// Parameters as announced to the sink.
    pub fn audio_information(&self) -> AudioInformation {
        AudioInformation {
            channels: self.channels(),
            sample_rate: self.sample_rate,
            bit_rate: self.bit_rate(),
            ..Default::default()
        }
    }
}

fn read_frame_size(buf: &[u8]) -> Result<usize> {
    let mut bs = BitReader::with_bit_len(buf, 40);
    bs.skip_bits(16)?; // syncword
    bs.skip_bits(2)?; // strmtyp
    bs.skip_bits(3)?; // substreamid
    Ok(((bs.read_bits(11)? + 1) << 1) as usize)
}

/// Frame size of the E-AC-3 frame starting at `buf`, if there is one.
pub fn check_alignment_header(buf: &[u8]) -> Option<usize> {
    if !has_sync_word(buf) {
        return None;
    }
    read_frame_size(buf).ok()
}

/// Parses the sync frame header of the E-AC-3 frame starting at `buf`.
pub fn parse_header(buf: &[u8]) -> Result<Eac3Header> {
    if !has_sync_word(buf) {
        return Err(DemuxError::Codec("Invalid E-AC-3 sync word".into()));
    }

    let mut bs = BitReader::with_bit_len(&buf[2..], AC3_HEADER_SIZE * 8);

    let bsid = bs.show_bits(29)? & 0x1F;
    if !EAC3_BSID_RANGE.contains(&bsid) {
        return Err(DemuxError::Codec(format!("Not an E-AC-3 bsid: {}", bsid)));
    }

    let frame_type = Eac3FrameType::from(bs.read_bits(2)?);
    if frame_type == Eac3FrameType::Reserved {
        return Err(DemuxError::Codec("Reserved E-AC-3 frame type".into()));
    }

    bs.skip_bits(3)?; // substreamid

    let frame_size = ((bs.read_bits(11)? + 1) << 1) as usize;
    if frame_size < AC3_HEADER_SIZE {
        return Err(DemuxError::Codec(format!(
            "E-AC-3 frame too small: {} bytes",
            frame_size
        )));
    }

    let sr_code = bs.read_bits(2)?;
    let (sample_rate, num_blocks) = if sr_code == 3 {
        let sr_code2 = bs.read_bits(2)?;
        if sr_code2 == 3 {
            return Err(DemuxError::Codec("Invalid E-AC-3 fscod2".into()));
        }
        (AC3_SAMPLE_RATE_TABLE[sr_code2 as usize] / 2, 6)
    } else {
        let numblkscod = bs.read_bits(2)?;
        (
            AC3_SAMPLE_RATE_TABLE[sr_code as usize],
            EAC3_BLOCKS[numblkscod as usize],
        )
    };

    let channel_mode = bs.read_bits(3)?;
    let lfeon = bs.read_bits(1)?;

    Ok(Eac3Header {
        frame_type,
        frame_size,
        sample_rate,
        num_blocks,
        channel_mode,
        lfeon,
    })
}

/// Audio parameters of the E-AC-3 frame at the start of `payload`.
pub fn parse_payload(payload: &[u8]) -> Option<AudioInformation> {
    match parse_header(payload) {
        Ok(header) => Some(header.audio_information()),
        Err(e) => {
            log::debug!("Skipping E-AC-3 payload: {}", e);
            None
        }
    }
}
