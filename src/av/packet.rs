use super::{CodecType, StreamContent};
use bytes::Bytes;

/// One reassembled, timestamped unit of codec payload.
///
/// Timestamps and duration are expressed in the demultiplexer's output time
/// base. A packet only exists with both timestamps present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPacket {
    /// Codec payload
    pub data: Bytes,
    /// Presentation time stamp
    pub pts: u64,
    /// Decoding time stamp
    pub dts: u64,
    /// Duration, zero when unknown
    pub duration: u64,
    /// PID the packet arrived on
    pub pid: u16,
    /// Codec of the stream
    pub codec: CodecType,
    /// Content class of the stream
    pub content: StreamContent,
}

impl StreamPacket {
    /// Creates an untimed packet; content type follows the codec.
    pub fn new(data: impl Into<Bytes>, pid: u16, codec: CodecType) -> Self {
        Self {
            data: data.into(),
            pts: 0,
            dts: 0,
            duration: 0,
            pid,
            codec,
            content: codec.content(),
        }
    }

    /// Sets the presentation time stamp.
    pub fn with_pts(mut self, pts: u64) -> Self {
        self.pts = pts;
        self
    }

    /// Sets the decoding time stamp.
    pub fn with_dts(mut self, dts: u64) -> Self {
        self.dts = dts;
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there is no payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
