//! # Codec header parsers
//!
//! Each elementary stream gets one [`CodecParser`]. The parser decides whether
//! a position in the reassembled payload starts a codec frame (used to realign
//! streams whose PES units do not start on frame boundaries) and extracts
//! stream parameters from complete frames.

/// AC-3 and Enhanced AC-3
pub mod ac3;

use crate::av::{AudioInformation, CodecType};

/// Codec specific behaviour of a stream parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecParser {
    /// Forwards payloads untouched and never realigns.
    Passthrough,
    /// Dolby Digital
    Ac3,
    /// Dolby Digital Plus
    Eac3,
}

impl CodecParser {
    /// Picks the parser for a codec, `None` when the codec is not handled at all.
    pub fn for_codec(codec: CodecType) -> Option<Self> {
        match codec {
            CodecType::AC3 => Some(CodecParser::Ac3),
            CodecType::EAC3 => Some(CodecParser::Eac3),
            CodecType::Mpeg2Video
            | CodecType::H264
            | CodecType::Mpeg2Audio
            | CodecType::AAC
            | CodecType::LATM
            | CodecType::DTS
            | CodecType::Teletext
            | CodecType::DvbSubtitle => Some(CodecParser::Passthrough),
            CodecType::Unrecognized => None,
        }
    }

    /// Minimum number of bytes `check_alignment_header` needs.
    pub fn header_size(&self) -> usize {
        match self {
            CodecParser::Passthrough => 0,
            CodecParser::Ac3 | CodecParser::Eac3 => ac3::AC3_HEADER_SIZE,
        }
    }

    /// Whether payloads are taken as they come, without realignment.
    pub fn disable_alignment(&self) -> bool {
        matches!(self, CodecParser::Passthrough)
    }

    /// Frame size in bytes if `buffer` begins with a frame of this codec.
    pub fn check_alignment_header(&self, buffer: &[u8]) -> Option<usize> {
        match self {
            CodecParser::Passthrough => None,
            CodecParser::Ac3 => ac3::check_alignment_header(buffer),
            CodecParser::Eac3 => ac3::eac3::check_alignment_header(buffer),
        }
    }

    /// Stream parameters carried by the frame at the start of `payload`.
    pub fn parse_payload(&self, payload: &[u8]) -> Option<AudioInformation> {
        match self {
            CodecParser::Passthrough => None,
            CodecParser::Ac3 => ac3::parse_payload(payload),
            CodecParser::Eac3 => ac3::eac3::parse_payload(payload),
        }
    }
}
