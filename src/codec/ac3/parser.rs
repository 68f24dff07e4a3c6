use super::types::*;
use crate::av::AudioInformation;
use crate::utils::BitReader;
use crate::{DemuxError, Result};

/// The two leading fields every AC-3 frame carries after its CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ac3SyncInfo {
    /// Sample rate code
    pub fscod: u32,
    /// Frame size code
    pub frmsizecod: u32,
}

impl Ac3SyncInfo {
    /// Frame size in bytes.
    pub fn frame_size(&self) -> usize {
        AC3_FRAME_SIZE_TABLE[self.frmsizecod as usize][self.fscod as usize] as usize * 2
    }
}

/// Fields of an AC-3 bit stream information header that matter for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ac3Header {
    /// Bit stream identification
    pub bsid: u32,
    /// Sample rate code
    pub fscod: u32,
    /// Frame size code
    pub frmsizecod: u32,
    /// Audio coding mode
    pub acmod: u32,
    /// Low frequency effects channel present
    pub lfeon: u32,
}

impl Ac3Header {
    /// Reduced sample rate shift for the (rare) half/quarter rate streams.
    fn sr_shift(&self) -> u32 {
        self.bsid.max(8) - 8
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        AC3_SAMPLE_RATE_TABLE[self.fscod as usize] >> self.sr_shift()
    }

    /// Nominal bit rate in bits per second.
    pub fn bit_rate(&self) -> u32 {
        (AC3_BITRATE_TABLE[(self.frmsizecod >> 1) as usize] * 1000) >> self.sr_shift()
    }

    /// Channel count including LFE.
    pub fn channels(&self) -> u32 {
        AC3_CHANNELS_TABLE[self.acmod as usize] + self.lfeon
    }

    /// Frame size in bytes.
    pub fn frame_size(&self) -> usize {
        Ac3SyncInfo {
            fscod: self.fscod,
            frmsizecod: self.frmsizecod,
        }
        .frame_size()
    }

    /// Parameters as announced to the sink.
    pub fn audio_information(&self) -> AudioInformation {
        AudioInformation {
            channels: self.channels(),
            sample_rate: self.sample_rate(),
            bit_rate: self.bit_rate(),
            ..Default::default()
        }
    }
}

/// Reads sync word, CRC, `fscod` and `frmsizecod`.
pub fn parse_sync_info(buf: &[u8]) -> Result<Ac3SyncInfo> {
    if !has_sync_word(buf) {
        return Err(DemuxError::Codec("Invalid AC-3 sync word".into()));
    }

    let mut bs = BitReader::with_bit_len(buf, 40);
    bs.skip_bits(16)?; // syncword
    bs.skip_bits(16)?; // crc1
    let fscod = bs.read_bits(2)?;
    let frmsizecod = bs.read_bits(6)?;

    if fscod == 3 || frmsizecod > AC3_MAX_FRMSIZECOD {
        return Err(DemuxError::Codec(format!(
            "Invalid AC-3 fscod {} / frmsizecod {}",
            fscod, frmsizecod
        )));
    }

    Ok(Ac3SyncInfo { fscod, frmsizecod })
}

/// Frame size of the AC-3 frame starting at `buf`, if there is one.
pub fn check_alignment_header(buf: &[u8]) -> Option<usize> {
    parse_sync_info(buf).ok().map(|info| info.frame_size())
}

/// Parses the bit stream information of the frame starting at `buf`.
pub fn parse_header(buf: &[u8]) -> Result<Ac3Header> {
    if !has_sync_word(buf) {
        return Err(DemuxError::Codec("Invalid AC-3 sync word".into()));
    }

    let mut bs = BitReader::with_bit_len(&buf[2..], AC3_HEADER_SIZE * 8);

    // read ahead to bsid to tell AC-3 from E-AC-3
    let bsid = bs.show_bits(29)? & 0x1F;
    if bsid > AC3_MAX_BSID {
        return Err(DemuxError::Codec(format!("Not an AC-3 bsid: {}", bsid)));
    }

    bs.skip_bits(16)?; // crc1
    let fscod = bs.read_bits(2)?;
    let frmsizecod = bs.read_bits(6)?;
    bs.skip_bits(5)?; // bsid
    bs.skip_bits(3)?; // bsmod
    let acmod = bs.read_bits(3)?;

    if fscod == 3 || frmsizecod > AC3_MAX_FRMSIZECOD {
        return Err(DemuxError::Codec(format!(
            "Invalid AC-3 fscod {} / frmsizecod {}",
            fscod, frmsizecod
        )));
    }

    if acmod == AC3_CHMODE_STEREO {
        bs.skip_bits(2)?; // dsurmod
    } else {
        if (acmod & 1) != 0 && acmod != AC3_CHMODE_MONO {
            bs.skip_bits(2)?; // cmixlev
        }
        if (acmod & 4) != 0 {
            bs.skip_bits(2)?; // surmixlev
        }
    }
    let lfeon = bs.read_bits(1)?;

    Ok(Ac3Header {
        bsid,
        fscod,
        frmsizecod,
        acmod,
        lfeon,
    })
}

/// Audio parameters of the AC-3 frame at the start of `payload`.
pub fn parse_payload(payload: &[u8]) -> Option<AudioInformation> {
    match parse_header(payload) {
        Ok(header) => Some(header.audio_information()),
        Err(e) => {
            log::debug!("Skipping AC-3 payload: {}", e);
            None
        }
    }
}
