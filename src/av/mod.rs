//! Stream identity, metadata and output types shared by the parsers and the
//! demultiplexer.

mod packet;
pub use packet::*;

/// Codec carried by an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    /// MPEG-2 video
    Mpeg2Video,
    /// H.264 / AVC video
    H264,
    /// MPEG-1/2 audio layer I-III
    Mpeg2Audio,
    /// AAC in ADTS
    AAC,
    /// AAC in LATM
    LATM,
    /// Dolby Digital
    AC3,
    /// Dolby Digital Plus
    EAC3,
    /// DTS audio
    DTS,
    /// EBU teletext
    Teletext,
    /// DVB bitmap subtitles
    DvbSubtitle,
    /// Anything this crate has no parser for
    Unrecognized,
}

/// Broad class of content a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamContent {
    /// Video frames
    Video,
    /// Audio frames
    Audio,
    /// Subtitle pages
    Subtitle,
    /// Teletext pages
    Teletext,
    /// Not classified
    None,
}

impl CodecType {
    /// Content class derived from the codec.
    pub fn content(self) -> StreamContent {
        match self {
            CodecType::Mpeg2Video | CodecType::H264 => StreamContent::Video,
            CodecType::Mpeg2Audio
            | CodecType::AAC
            | CodecType::LATM
            | CodecType::AC3
            | CodecType::EAC3
            | CodecType::DTS => StreamContent::Audio,
            CodecType::Teletext => StreamContent::Teletext,
            CodecType::DvbSubtitle => StreamContent::Subtitle,
            CodecType::Unrecognized => StreamContent::None,
        }
    }
}

/// Identity of one elementary stream within the multiplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDescriptor {
    pid: u16,
    codec: CodecType,
    content: StreamContent,
}

impl StreamDescriptor {
    /// Describes the stream on `pid`. Only the low 13 bits of the PID are kept.
    pub fn new(pid: u16, codec: CodecType) -> Self {
        Self {
            pid: pid & 0x1FFF,
            codec,
            content: codec.content(),
        }
    }

    /// Transport PID
    pub fn pid(&self) -> u16 {
        self.pid
    }

    /// Codec of the stream
    pub fn codec(&self) -> CodecType {
        self.codec
    }

    /// Content class of the stream
    pub fn content(&self) -> StreamContent {
        self.content
    }
}

/// Audio parameters recovered from a codec header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioInformation {
    /// Number of channels including LFE
    pub channels: u32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit rate in bits per second
    pub bit_rate: u32,
    /// Bits per sample, 0 when not applicable
    pub bits_per_sample: u32,
    /// Block alignment, 0 when not applicable
    pub block_align: u32,
}

impl AudioInformation {
    /// Whether `other` differs in a way worth announcing.
    pub fn differs_from(&self, other: &AudioInformation) -> bool {
        self.channels != other.channels
            || self.sample_rate != other.sample_rate
            || self.bit_rate != other.bit_rate
    }
}

/// Picture parameters recovered from a video header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VideoInformation {
    /// Frame rate denominator
    pub fps_scale: u32,
    /// Frame rate numerator
    pub fps_rate: u32,
    /// Picture height in pixels
    pub height: u32,
    /// Picture width in pixels
    pub width: u32,
    /// Display aspect ratio, 0.0 when unknown
    pub aspect: f32,
    /// Pixel aspect numerator
    pub pixel_aspect_num: i32,
    /// Pixel aspect denominator
    pub pixel_aspect_den: i32,
}

impl VideoInformation {
    /// Rejects pictures no real stream produces.
    pub fn is_sane(&self) -> bool {
        self.width >= 320
            && self.height >= 240
            && self.pixel_aspect_num > 0
            && self.pixel_aspect_den > 0
            && self.aspect >= 0.0
    }

    /// Same picture geometry as `other`.
    pub fn same_picture(&self, other: &VideoInformation) -> bool {
        self.width == other.width && self.height == other.height && self.aspect == other.aspect
    }
}

/// Receiver of everything the demultiplexer produces.
///
/// Implementations are shared between the streams of a demultiplexer, hence
/// `&self` receivers.
pub trait StreamSink: Send + Sync {
    /// Takes ownership of one finished packet.
    fn send_stream_packet(&self, packet: StreamPacket);

    /// Whether the receiver has seen the stream setup and wants change
    /// notifications.
    fn is_ready(&self) -> bool {
        true
    }

    /// Called when the audio or video parameters of a stream changed.
    fn request_stream_change(&self) {}
}
